use super::subscribers::DeleteOccurrenceOnEventDeleted;
use crate::error::JubileeError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use jubilee_api_structs::event::delete_event::*;
use jubilee_domain::{CelebrationEvent, ID};
use jubilee_infra::JubileeContext;

pub async fn delete_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<JubileeContext>,
) -> Result<HttpResponse, JubileeError> {
    let usecase = DeleteEventUseCase {
        event_id: path_params.event_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(&event)))
        .map_err(JubileeError::from)
}

#[derive(Debug)]
pub struct DeleteEventUseCase {
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
impl UseCase for DeleteEventUseCase {
    type Response = CelebrationEvent;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .delete(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(DeleteOccurrenceOnEventDeleted)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use jubilee_domain::{EventKind, EventOccurrence, EventMessage, MessageActivity, MessageKind};
    use jubilee_infra::setup_context_inmemory;

    #[actix_web::main]
    #[test]
    async fn delete_nonexisting_event() {
        let (ctx, _) = setup_context_inmemory();
        let mut usecase = DeleteEventUseCase {
            event_id: Default::default(),
        };
        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));
    }

    #[actix_web::main]
    #[test]
    async fn delete_cascades_to_occurrence_and_ledger() {
        let (ctx, _) = setup_context_inmemory();
        let event = CelebrationEvent {
            id: Default::default(),
            owner_user_id: Default::default(),
            kind: EventKind::Other,
            title: "Name day".into(),
            message: String::new(),
            image_url: String::new(),
            date: NaiveDate::from_ymd(2020, 4, 4),
            time_zone: chrono_tz::UTC,
            team_ids: Vec::new(),
        };
        ctx.repos.events.insert(&event).await.unwrap();

        let occurrence = EventOccurrence::new(event.id.clone(), 1000);
        ctx.repos.occurrences.insert(&occurrence).await.unwrap();
        let message = EventMessage::new(
            occurrence.id.clone(),
            event.id.clone(),
            MessageKind::Preview,
            MessageActivity {
                event_id: event.id.clone(),
                owner_user_id: event.owner_user_id.clone(),
                owner_name: "Mia".into(),
                owner_chat_id: "29:mia".into(),
                conversation_id: "a:mia-chat".into(),
                title: event.title.clone(),
                message: String::new(),
                image_url: String::new(),
                event_date: Some(event.date),
            },
            2000,
        );
        ctx.repos.messages.insert(&message).await.unwrap();

        let usecase = DeleteEventUseCase {
            event_id: event.id.clone(),
        };
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx.repos.events.find(&event.id).await.is_none());
        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_none());
        assert!(ctx
            .repos
            .messages
            .find_by_occurrence(&occurrence.id)
            .await
            .is_empty());
    }
}
