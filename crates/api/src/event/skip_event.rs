use crate::error::JubileeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use jubilee_api_structs::event::skip_event::*;
use jubilee_domain::{OccurrenceStatus, ID};
use jubilee_infra::JubileeContext;

pub async fn skip_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<JubileeContext>,
) -> Result<HttpResponse, JubileeError> {
    let usecase = SkipEventUseCase {
        event_id: path_params.event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse { skipped: true }))
        .map_err(JubileeError::from)
}

/// Marks the live occurrence of an event as skipped, so that the upcoming
/// cycle posts no celebration card. The occurrence row is kept, which stops
/// the reminder pass from resolving the event again this cycle.
#[derive(Debug)]
pub struct SkipEventUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NoLiveOccurrence(ID),
}

impl From<UseCaseError> for JubileeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NoLiveOccurrence(event_id) => Self::NotFound(format!(
                "The event with id: {}, has no upcoming occurrence to skip.",
                event_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SkipEventUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "SkipEvent";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        let occurrence = match ctx.repos.occurrences.find_by_event(&self.event_id).await {
            Some(occurrence) => occurrence,
            None => return Err(UseCaseError::NoLiveOccurrence(self.event_id.clone())),
        };

        ctx.repos
            .occurrences
            .update_status(&occurrence.id, OccurrenceStatus::Skipped)
            .await;

        Ok(())
    }
}
