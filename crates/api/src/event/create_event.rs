use crate::error::JubileeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use chrono_tz::Tz;
use jubilee_api_structs::event::create_event::*;
use jubilee_domain::{date, CelebrationEvent, EventKind, ID, MAX_EVENTS_PER_OWNER};
use jubilee_infra::JubileeContext;

pub async fn create_event_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<JubileeContext>,
) -> Result<HttpResponse, JubileeError> {
    let body = body.0;
    let usecase = CreateEventUseCase {
        owner_user_id: body.owner_user_id,
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
        .map(|event| HttpResponse::Created().json(APIResponse::new(&event)))
        .map_err(JubileeError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub owner_user_id: ID,
    pub kind: EventKind,
    pub title: String,
    pub message: String,
    pub image_url: String,
    pub date: String,
    pub time_zone: String,
    pub team_ids: Vec<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    OwnerNotFound(ID),
    InvalidDate(String),
    InvalidTimezone(String),
    TooManyEvents,
    StorageError,
}

impl From<UseCaseError> for JubileeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::OwnerNotFound(user_id) => {
                Self::NotFound(format!("The user with id: {}, was not found.", user_id))
            }
            UseCaseError::InvalidDate(d) => Self::BadClientData(format!(
                "Invalid date: {}. It should be formatted as year-month-day.",
                d
            )),
            UseCaseError::InvalidTimezone(tz) => {
                Self::BadClientData(format!("Invalid timezone: {}.", tz))
            }
            UseCaseError::TooManyEvents => Self::Conflict(format!(
                "A user can have at most {} events.",
                MAX_EVENTS_PER_OWNER
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateEventUseCase {
    type Response = CelebrationEvent;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        let (year, month, day) = date::is_valid_date(&self.date)
            .map_err(|_| UseCaseError::InvalidDate(self.date.clone()))?;
        let time_zone: Tz = self
            .time_zone
            .parse()
            .map_err(|_| UseCaseError::InvalidTimezone(self.time_zone.clone()))?;

        let owner = ctx.repos.users.find(&self.owner_user_id).await;
        let owner = match owner {
            Some(owner) => owner,
            None => return Err(UseCaseError::OwnerNotFound(self.owner_user_id.clone())),
        };

        let existing = ctx.repos.events.find_by_owner(&owner.id).await;
        if existing.len() >= MAX_EVENTS_PER_OWNER {
            return Err(UseCaseError::TooManyEvents);
        }

        let event = CelebrationEvent {
            id: Default::default(),
            owner_user_id: owner.id,
            kind: self.kind,
            title: std::mem::take(&mut self.title),
            message: std::mem::take(&mut self.message),
            image_url: std::mem::take(&mut self.image_url),
            date: NaiveDate::from_ymd(year, month, day),
            time_zone,
            team_ids: std::mem::take(&mut self.team_ids),
        };

        ctx.repos
            .events
            .insert(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(event)
    }
}
