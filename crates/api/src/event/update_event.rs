use super::subscribers::SyncOccurrenceOnEventUpdated;
use crate::error::JubileeError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use chrono_tz::Tz;
use jubilee_api_structs::event::update_event::*;
use jubilee_domain::{date, CelebrationEvent, EventKind, ID};
use jubilee_infra::JubileeContext;

pub async fn update_event_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<JubileeContext>,
) -> Result<HttpResponse, JubileeError> {
    let body = body.0;
    let usecase = UpdateEventUseCase {
        event_id: path_params.event_id.clone(),
        kind: body.kind,
        title: body.title,
        message: body.message,
        image_url: body.image_url,
        date: body.date,
        time_zone: body.time_zone,
        team_ids: body.team_ids,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse::new(&res.event)))
        .map_err(JubileeError::from)
}

#[derive(Debug)]
pub struct UpdateEventUseCase {
    pub event_id: ID,
    pub kind: Option<EventKind>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub image_url: Option<String>,
    pub date: Option<String>,
    pub time_zone: Option<String>,
    pub team_ids: Option<Vec<ID>>,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub event: CelebrationEvent,
    /// The recurrence date or timezone changed, which invalidates the live
    /// occurrence of this event
    pub schedule_changed: bool,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidDate(String),
    InvalidTimezone(String),
    StorageError,
}

impl From<UseCaseError> for JubileeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::InvalidDate(d) => Self::BadClientData(format!(
                "Invalid date: {}. It should be formatted as year-month-day.",
                d
            )),
            UseCaseError::InvalidTimezone(tz) => {
                Self::BadClientData(format!("Invalid timezone: {}.", tz))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateEventUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateEvent";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        let mut event = match ctx.repos.events.find(&self.event_id).await {
            Some(event) => event,
            None => return Err(UseCaseError::NotFound(self.event_id.clone())),
        };

        let mut schedule_changed = false;

        if let Some(datestr) = &self.date {
            let (year, month, day) = date::is_valid_date(datestr)
                .map_err(|_| UseCaseError::InvalidDate(datestr.clone()))?;
            let date = NaiveDate::from_ymd(year, month, day);
            if date != event.date {
                event.date = date;
                schedule_changed = true;
            }
        }

        if let Some(tz) = &self.time_zone {
            let time_zone: Tz = tz
                .parse()
                .map_err(|_| UseCaseError::InvalidTimezone(tz.clone()))?;
            if time_zone != event.time_zone {
                event.time_zone = time_zone;
                schedule_changed = true;
            }
        }

        if let Some(kind) = self.kind {
            event.kind = kind;
        }
        if let Some(title) = self.title.take() {
            event.title = title;
        }
        if let Some(message) = self.message.take() {
            event.message = message;
        }
        if let Some(image_url) = self.image_url.take() {
            event.image_url = image_url;
        }
        if let Some(team_ids) = self.team_ids.take() {
            event.team_ids = team_ids;
        }

        ctx.repos
            .events
            .save(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseRes {
            event,
            schedule_changed,
        })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncOccurrenceOnEventUpdated)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use jubilee_domain::{EventOccurrence, User};
    use jubilee_infra::setup_context_inmemory;

    fn empty_update(event_id: ID) -> UpdateEventUseCase {
        UpdateEventUseCase {
            event_id,
            kind: None,
            title: None,
            message: None,
            image_url: None,
            date: None,
            time_zone: None,
            team_ids: None,
        }
    }

    async fn seed_event(ctx: &JubileeContext) -> CelebrationEvent {
        let owner = User {
            id: Default::default(),
            name: "Noah".into(),
            chat_id: "29:noah".into(),
            conversation_id: None,
        };
        ctx.repos.users.insert(&owner).await.unwrap();
        let event = CelebrationEvent {
            id: Default::default(),
            owner_user_id: owner.id,
            kind: EventKind::Anniversary,
            title: "Work anniversary".into(),
            message: "Cheers!".into(),
            image_url: String::new(),
            date: NaiveDate::from_ymd(2019, 8, 20),
            time_zone: chrono_tz::UTC,
            team_ids: Vec::new(),
        };
        ctx.repos.events.insert(&event).await.unwrap();
        event
    }

    #[actix_web::main]
    #[test]
    async fn update_nonexisting_event() {
        let (ctx, _) = setup_context_inmemory();
        let mut usecase = empty_update(Default::default());
        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::NotFound(_))));
    }

    #[actix_web::main]
    #[test]
    async fn date_change_flags_schedule_change() {
        let (ctx, _) = setup_context_inmemory();
        let event = seed_event(&ctx).await;

        let mut usecase = empty_update(event.id.clone());
        usecase.date = Some("2019-9-1".into());
        let res = usecase.execute(&ctx).await.unwrap();

        assert!(res.schedule_changed);
        assert_eq!(res.event.date, NaiveDate::from_ymd(2019, 9, 1));
    }

    #[actix_web::main]
    #[test]
    async fn cosmetic_change_keeps_schedule() {
        let (ctx, _) = setup_context_inmemory();
        let event = seed_event(&ctx).await;

        let mut usecase = empty_update(event.id.clone());
        usecase.title = Some("New title".into());
        let res = usecase.execute(&ctx).await.unwrap();

        assert!(!res.schedule_changed);
        assert_eq!(res.event.title, "New title");
    }

    #[actix_web::main]
    #[test]
    async fn date_change_invalidates_live_occurrence() {
        let (ctx, _) = setup_context_inmemory();
        let event = seed_event(&ctx).await;
        let occurrence = EventOccurrence::new(event.id.clone(), 1000);
        ctx.repos.occurrences.insert(&occurrence).await.unwrap();

        let mut usecase = empty_update(event.id.clone());
        usecase.date = Some("2019-9-1".into());
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn cosmetic_change_keeps_live_occurrence() {
        let (ctx, _) = setup_context_inmemory();
        let event = seed_event(&ctx).await;
        let occurrence = EventOccurrence::new(event.id.clone(), 1000);
        ctx.repos.occurrences.insert(&occurrence).await.unwrap();

        let mut usecase = empty_update(event.id.clone());
        usecase.message = Some("Hurray!".into());
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_some());
    }
}
