use super::{
    cards,
    delivery::{deliver_and_record, Destination},
};
use crate::error::JubileeError;
use crate::shared::usecase::UseCase;
use chrono::prelude::*;
use jubilee_domain::{
    date, CelebrationEvent, DeliveryOutcome, EventMessage, EventOccurrence, MessageActivity,
    MessageKind, User,
};
use jubilee_infra::{AttachmentLayout, ChatActivity, JubileeContext};
use tracing::{info, warn};

/// Resolves events entering the look-ahead window into occurrences and sends
/// the owner a reminder card for each. An event with a live occurrence is
/// left alone, which makes the pass idempotent within a cycle.
#[derive(Debug)]
pub struct SendUpcomingPreviewsUseCase {
    /// UTC timestamp in millis the pass reasons from
    pub reference_time: i64,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub occurrences_created: usize,
    pub previews_sent: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for JubileeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendUpcomingPreviewsUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "SendUpcomingPreviews";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        let reference_date = Utc.timestamp_millis(self.reference_time).date().naive_utc();
        let window = date::reference_window(reference_date, ctx.config.look_ahead_days);

        let events = ctx
            .repos
            .events
            .find_by_month_day(&window)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!("Found {} events inside the look-ahead window", events.len());

        let mut unresolved = Vec::with_capacity(events.len());
        for event in events {
            if ctx.repos.occurrences.find_by_event(&event.id).await.is_none() {
                unresolved.push(event);
            }
        }

        let owner_ids = unresolved
            .iter()
            .map(|e| e.owner_user_id.clone())
            .collect::<Vec<_>>();
        let owners = ctx
            .repos
            .users
            .find_many(&owner_ids)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut res = UseCaseRes {
            occurrences_created: 0,
            previews_sent: 0,
        };

        for event in unresolved {
            let owner = match owners.iter().find(|u| u.id == event.owner_user_id) {
                Some(owner) => owner,
                None => {
                    warn!(
                        "Owner {} of event {} no longer exists, not resolving it",
                        event.owner_user_id, event.id
                    );
                    continue;
                }
            };

            let upcoming =
                date::upcoming_event_date(event.event_month(), event.event_day(), reference_date);
            let scheduled_at =
                date::occurrence_instant(upcoming, ctx.config.time_to_post, event.time_zone);

            let occurrence = EventOccurrence::new(event.id.clone(), scheduled_at);
            ctx.repos
                .occurrences
                .insert(&occurrence)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            res.occurrences_created += 1;

            // The day itself gets the celebration card, not a reminder
            if upcoming == reference_date {
                continue;
            }

            if self
                .send_preview(ctx, &event, owner, &occurrence, upcoming)
                .await?
            {
                res.previews_sent += 1;
            }
        }

        Ok(res)
    }
}

impl SendUpcomingPreviewsUseCase {
    async fn send_preview(
        &self,
        ctx: &JubileeContext,
        event: &CelebrationEvent,
        owner: &User,
        occurrence: &EventOccurrence,
        upcoming: NaiveDate,
    ) -> Result<bool, UseCaseError> {
        let conversation_id = match &owner.conversation_id {
            Some(conversation_id) => conversation_id.clone(),
            None => {
                warn!(
                    "Owner {} has no personal conversation yet, skipping the reminder for event {}",
                    owner.id, event.id
                );
                return Ok(false);
            }
        };

        let activity = MessageActivity {
            event_id: event.id.clone(),
            owner_user_id: owner.id.clone(),
            owner_name: owner.name.clone(),
            owner_chat_id: owner.chat_id.clone(),
            conversation_id: conversation_id.clone(),
            title: event.title.clone(),
            message: event.message.clone(),
            image_url: event.image_url.clone(),
            event_date: Some(upcoming),
        };

        let expire_at =
            occurrence.scheduled_at + ctx.config.preview_expiry_hours * 60 * 60 * 1000;
        let message = EventMessage::new(
            occurrence.id.clone(),
            event.id.clone(),
            MessageKind::Preview,
            activity,
            expire_at,
        );
        ctx.repos
            .messages
            .insert(&message)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let chat_activity = ChatActivity {
            text: cards::preview_text(&owner.name),
            attachment_layout: AttachmentLayout::List,
            attachments: vec![cards::preview_card(&message.activity)],
            mentions: Vec::new(),
        };

        let mut batch = [message];
        let outcome = deliver_and_record(
            ctx,
            &conversation_id,
            &chat_activity,
            &mut batch,
            Destination::Owner,
        )
        .await;

        Ok(outcome == DeliveryOutcome::Sent)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use jubilee_domain::{EventKind, ID};
    use jubilee_infra::setup_context_inmemory;

    fn millis(year: i32, month: u32, day: u32) -> i64 {
        Utc.ymd(year, month, day).and_hms(6, 0, 0).timestamp_millis()
    }

    async fn seed_owner(ctx: &JubileeContext) -> User {
        let owner = User {
            id: Default::default(),
            name: "Ada".into(),
            chat_id: "29:ada".into(),
            conversation_id: Some("a:ada-chat".into()),
        };
        ctx.repos.users.insert(&owner).await.unwrap();
        owner
    }

    async fn seed_event(
        ctx: &JubileeContext,
        owner_user_id: ID,
        month: u32,
        day: u32,
    ) -> CelebrationEvent {
        let event = CelebrationEvent {
            id: Default::default(),
            owner_user_id,
            kind: EventKind::Birthday,
            title: "Birthday".into(),
            message: "Hurray!".into(),
            image_url: String::new(),
            date: NaiveDate::from_ymd(1990, month, day),
            time_zone: chrono_tz::UTC,
            team_ids: Vec::new(),
        };
        ctx.repos.events.insert(&event).await.unwrap();
        event
    }

    #[actix_web::main]
    #[test]
    async fn resolves_events_entering_the_window() {
        let (ctx, transport) = setup_context_inmemory();
        let owner = seed_owner(&ctx).await;
        let event = seed_event(&ctx, owner.id.clone(), 6, 3).await;

        let usecase = SendUpcomingPreviewsUseCase {
            reference_time: millis(2024, 6, 1),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.occurrences_created, 1);
        assert_eq!(res.previews_sent, 1);
        assert_eq!(transport.sent_count(), 1);

        let occurrence = ctx.repos.occurrences.find_by_event(&event.id).await.unwrap();
        let expected = Utc.ymd(2024, 6, 3).and_hms(10, 0, 0).timestamp_millis();
        assert_eq!(occurrence.scheduled_at, expected);
    }

    #[actix_web::main]
    #[test]
    async fn second_pass_is_idempotent() {
        let (ctx, transport) = setup_context_inmemory();
        let owner = seed_owner(&ctx).await;
        seed_event(&ctx, owner.id.clone(), 6, 3).await;

        let usecase = SendUpcomingPreviewsUseCase {
            reference_time: millis(2024, 6, 1),
        };
        execute(usecase, &ctx).await.unwrap();

        let usecase = SendUpcomingPreviewsUseCase {
            reference_time: millis(2024, 6, 1),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.occurrences_created, 0);
        assert_eq!(res.previews_sent, 0);
        assert_eq!(transport.sent_count(), 1);
    }

    #[actix_web::main]
    #[test]
    async fn event_outside_the_window_is_untouched() {
        let (ctx, transport) = setup_context_inmemory();
        let owner = seed_owner(&ctx).await;
        let event = seed_event(&ctx, owner.id.clone(), 9, 20).await;

        let usecase = SendUpcomingPreviewsUseCase {
            reference_time: millis(2024, 6, 1),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.occurrences_created, 0);
        assert_eq!(transport.sent_count(), 0);
        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn no_reminder_when_the_event_is_today() {
        let (ctx, transport) = setup_context_inmemory();
        let owner = seed_owner(&ctx).await;
        let event = seed_event(&ctx, owner.id.clone(), 6, 1).await;

        let usecase = SendUpcomingPreviewsUseCase {
            reference_time: millis(2024, 6, 1),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.occurrences_created, 1);
        assert_eq!(res.previews_sent, 0);
        assert_eq!(transport.sent_count(), 0);
        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn leap_day_event_matches_synthetic_window_entry() {
        let (ctx, _) = setup_context_inmemory();
        let owner = seed_owner(&ctx).await;
        // 2025 is not a leap year, Feb 29 falls inside the window ending Mar 1
        let event = seed_event(&ctx, owner.id.clone(), 2, 29).await;

        let usecase = SendUpcomingPreviewsUseCase {
            reference_time: millis(2025, 2, 27),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.occurrences_created, 1);
        let occurrence = ctx.repos.occurrences.find_by_event(&event.id).await.unwrap();
        // Feb 29 collapses to Feb 28 in a non-leap year
        let expected = Utc.ymd(2025, 2, 28).and_hms(10, 0, 0).timestamp_millis();
        assert_eq!(occurrence.scheduled_at, expected);
    }

    #[actix_web::main]
    #[test]
    async fn owner_without_conversation_gets_no_reminder() {
        let (ctx, transport) = setup_context_inmemory();
        let owner = User {
            id: Default::default(),
            name: "Bo".into(),
            chat_id: "29:bo".into(),
            conversation_id: None,
        };
        ctx.repos.users.insert(&owner).await.unwrap();
        let event = seed_event(&ctx, owner.id.clone(), 6, 3).await;

        let usecase = SendUpcomingPreviewsUseCase {
            reference_time: millis(2024, 6, 1),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        // The occurrence is still resolved so the celebration card can go out
        assert_eq!(res.occurrences_created, 1);
        assert_eq!(res.previews_sent, 0);
        assert_eq!(transport.sent_count(), 0);
        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_some());
    }
}
