use crate::error::JubileeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use jubilee_api_structs::event::get_event::*;
use jubilee_domain::{CelebrationEvent, ID};
use jubilee_infra::JubileeContext;

pub async fn get_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<JubileeContext>,
) -> Result<HttpResponse, JubileeError> {
    let usecase = GetEventUseCase {
        event_id: path_params.event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(&event)))
        .map_err(JubileeError::from)
}

#[derive(Debug)]
pub struct GetEventUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for JubileeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventUseCase {
    type Response = CelebrationEvent;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEvent";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))
    }
}
