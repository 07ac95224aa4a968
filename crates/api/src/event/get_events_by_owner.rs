use crate::error::JubileeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use jubilee_api_structs::event::get_events_by_owner::*;
use jubilee_domain::{CelebrationEvent, ID};
use jubilee_infra::JubileeContext;

pub async fn get_events_by_owner_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<JubileeContext>,
) -> Result<HttpResponse, JubileeError> {
    let usecase = GetEventsByOwnerUseCase {
        user_id: path_params.user_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|events| HttpResponse::Ok().json(APIResponse::new(&events)))
        .map_err(JubileeError::from)
}

#[derive(Debug)]
pub struct GetEventsByOwnerUseCase {
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    UserNotFound(ID),
}

impl From<UseCaseError> for JubileeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventsByOwnerUseCase {
    type Response = Vec<CelebrationEvent>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEventsByOwner";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        if ctx.repos.users.find(&self.user_id).await.is_none() {
            return Err(UseCaseError::UserNotFound(self.user_id.clone()));
        }
        Ok(ctx.repos.events.find_by_owner(&self.user_id).await)
    }
}
