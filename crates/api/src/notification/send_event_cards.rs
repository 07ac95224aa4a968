use super::{
    cards::{self, EventCardPayload},
    delivery::{deliver_and_record, Destination},
};
use crate::error::JubileeError;
use crate::shared::usecase::UseCase;
use jubilee_domain::{
    CelebrationEvent, DeliveryOutcome, EventMessage, EventOccurrence, MessageActivity,
    MessageKind, Team, User, ID,
};
use jubilee_infra::{AttachmentLayout, ChatActivity, JubileeContext};
use tracing::{info, warn};

/// Posts the celebration cards of every occurrence due at the reference
/// minute. Due events are grouped per team: a team with few of them gets one
/// message per card, a busy day gets them combined into carousels with a
/// shared caption. Processed occurrences are deleted, delivery failures stay
/// behind in the ledger for the retry pass.
#[derive(Debug)]
pub struct SendEventCardsUseCase {
    /// UTC timestamp in millis the pass reasons from
    pub reference_time: i64,
}

#[derive(Debug)]
pub struct UseCaseRes {
    pub occurrences_due: usize,
    pub cards_sent: usize,
    pub cards_failed: usize,
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

struct DueItem {
    occurrence: EventOccurrence,
    event: CelebrationEvent,
    owner: User,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendEventCardsUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "SendEventCards";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        let due = ctx
            .repos
            .occurrences
            .find_due_at(self.reference_time)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!("Found {} occurrences due for celebration", due.len());

        let mut res = UseCaseRes {
            occurrences_due: due.len(),
            cards_sent: 0,
            cards_failed: 0,
        };
        if due.is_empty() {
            return Ok(res);
        }

        let event_ids = due.iter().map(|o| o.event_id.clone()).collect::<Vec<_>>();
        let events = ctx
            .repos
            .events
            .find_many(&event_ids)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let owner_ids = events
            .iter()
            .map(|e| e.owner_user_id.clone())
            .collect::<Vec<_>>();
        let owners = ctx
            .repos
            .users
            .find_many(&owner_ids)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Group the due events per destination team, in resolution order
        let mut team_batches: Vec<(ID, Vec<DueItem>)> = Vec::new();
        for occurrence in &due {
            let event = match events.iter().find(|e| e.id == occurrence.event_id) {
                Some(event) => event,
                None => continue,
            };
            let owner = match owners.iter().find(|u| u.id == event.owner_user_id) {
                Some(owner) => owner,
                None => {
                    warn!(
                        "Owner {} of due event {} no longer exists, nothing to post",
                        event.owner_user_id, event.id
                    );
                    continue;
                }
            };
            for team_id in &event.team_ids {
                let item = DueItem {
                    occurrence: occurrence.clone(),
                    event: event.clone(),
                    owner: owner.clone(),
                };
                match team_batches.iter_mut().find(|(id, _)| id == team_id) {
                    Some((_, items)) => items.push(item),
                    None => team_batches.push((team_id.clone(), vec![item])),
                }
            }
        }

        for (team_id, items) in team_batches {
            let team = match ctx.repos.teams.find(&team_id).await {
                Some(team) => team,
                None => {
                    warn!("Team {} is not registered anymore, dropping its cards", team_id);
                    continue;
                }
            };
            self.post_in_team(ctx, &team, &items, &mut res).await?;
        }

        // Every due occurrence is spent, successful or not. Failed sends
        // live on in the ledger and are the retry pass's business.
        for occurrence in &due {
            ctx.repos.occurrences.delete(&occurrence.id).await;
        }

        Ok(res)
    }
}

impl SendEventCardsUseCase {
    async fn post_in_team(
        &self,
        ctx: &JubileeContext,
        team: &Team,
        items: &[DueItem],
        res: &mut UseCaseRes,
    ) -> Result<(), UseCaseError> {
        let total = items.len();
        let mut batch_messages: Vec<EventMessage> = Vec::new();
        let mut batch_payloads: Vec<EventCardPayload> = Vec::new();

        for (index, item) in items.iter().enumerate() {
            let counter = index + 1;

            let activity = MessageActivity {
                event_id: item.event.id.clone(),
                owner_user_id: item.owner.id.clone(),
                owner_name: item.owner.name.clone(),
                owner_chat_id: item.owner.chat_id.clone(),
                conversation_id: team.conversation_id.clone(),
                title: item.event.title.clone(),
                message: item.event.message.clone(),
                image_url: item.event.image_url.clone(),
                event_date: None,
            };
            let expire_at =
                item.occurrence.scheduled_at + ctx.config.event_expiry_hours * 60 * 60 * 1000;
            let message = EventMessage::new(
                item.occurrence.id.clone(),
                item.event.id.clone(),
                MessageKind::Event,
                activity,
                expire_at,
            );
            ctx.repos
                .messages
                .insert(&message)
                .await
                .map_err(|_| UseCaseError::StorageError)?;

            batch_payloads.push(EventCardPayload::new(&message.activity, &item.event.title));
            batch_messages.push(message);

            let flush_combined = total > ctx.config.carousel_threshold
                && (counter % ctx.config.carousel_cap == 0 || counter == total);
            if flush_combined {
                batch_payloads.sort_by(|a, b| a.owner_name.cmp(&b.owner_name));
                let chat_activity = ChatActivity {
                    text: cards::carousel_caption(&batch_payloads),
                    attachment_layout: AttachmentLayout::Carousel,
                    attachments: batch_payloads.iter().map(|p| p.card.clone()).collect(),
                    mentions: cards::batch_mentions(&batch_payloads),
                };
                self.flush(ctx, team, chat_activity, &mut batch_messages, res)
                    .await;
                batch_payloads.clear();
            } else if total <= ctx.config.carousel_threshold {
                let chat_activity = ChatActivity {
                    text: String::new(),
                    attachment_layout: AttachmentLayout::Carousel,
                    attachments: vec![batch_payloads[0].card.clone()],
                    mentions: Vec::new(),
                };
                self.flush(ctx, team, chat_activity, &mut batch_messages, res)
                    .await;
                batch_payloads.clear();
            }
        }

        Ok(())
    }

    async fn flush(
        &self,
        ctx: &JubileeContext,
        team: &Team,
        chat_activity: ChatActivity,
        batch_messages: &mut Vec<EventMessage>,
        res: &mut UseCaseRes,
    ) {
        let outcome = deliver_and_record(
            ctx,
            &team.conversation_id,
            &chat_activity,
            batch_messages,
            Destination::Team(&team.id),
        )
        .await;

        if outcome == DeliveryOutcome::Sent {
            res.cards_sent += batch_messages.len();
        } else {
            res.cards_failed += batch_messages.len();
        }
        batch_messages.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use chrono::prelude::*;
    use jubilee_domain::{EventKind, OccurrenceStatus, RETRYABLE_STATUS_CODES};
    use jubilee_infra::setup_context_inmemory;

    fn reference() -> i64 {
        Utc.ymd(2024, 6, 3).and_hms(10, 0, 0).timestamp_millis()
    }

    async fn seed_team(ctx: &JubileeContext) -> Team {
        let team = Team {
            id: Default::default(),
            name: "Engineering".into(),
            conversation_id: "19:eng".into(),
        };
        ctx.repos.teams.insert(&team).await.unwrap();
        team
    }

    async fn seed_due_event(
        ctx: &JubileeContext,
        team: &Team,
        owner_name: &str,
        title: &str,
    ) -> (CelebrationEvent, EventOccurrence) {
        let owner = User {
            id: Default::default(),
            name: owner_name.into(),
            chat_id: format!("29:{}", owner_name.to_lowercase()),
            conversation_id: None,
        };
        ctx.repos.users.insert(&owner).await.unwrap();

        let event = CelebrationEvent {
            id: Default::default(),
            owner_user_id: owner.id,
            kind: EventKind::Birthday,
            title: title.into(),
            message: "Hurray!".into(),
            image_url: String::new(),
            date: NaiveDate::from_ymd(1990, 6, 3),
            time_zone: chrono_tz::UTC,
            team_ids: vec![team.id.clone()],
        };
        ctx.repos.events.insert(&event).await.unwrap();

        let occurrence = EventOccurrence::new(event.id.clone(), reference());
        ctx.repos.occurrences.insert(&occurrence).await.unwrap();

        (event, occurrence)
    }

    #[actix_web::main]
    #[test]
    async fn few_due_events_are_posted_individually() {
        let (ctx, transport) = setup_context_inmemory();
        let team = seed_team(&ctx).await;
        for (name, title) in [("Ada", "Birthday"), ("Bo", "Anniversary"), ("Cy", "Name day")] {
            seed_due_event(&ctx, &team, name, title).await;
        }

        let usecase = SendEventCardsUseCase {
            reference_time: reference(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.occurrences_due, 3);
        assert_eq!(res.cards_sent, 3);
        let sent = transport.sent();
        assert_eq!(sent.len(), 3);
        for (_, activity) in &sent {
            assert_eq!(activity.attachments.len(), 1);
            assert_eq!(activity.text, "");
        }
    }

    #[actix_web::main]
    #[test]
    async fn more_than_threshold_is_combined_into_one_carousel() {
        let (ctx, transport) = setup_context_inmemory();
        let team = seed_team(&ctx).await;
        for name in ["Dee", "Ada", "Cy", "Bo"] {
            seed_due_event(&ctx, &team, name, "Birthday").await;
        }

        let usecase = SendEventCardsUseCase {
            reference_time: reference(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.cards_sent, 4);
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        let (_, activity) = &sent[0];
        assert_eq!(activity.attachments.len(), 4);
        assert!(activity.text.starts_with("Stop the presses! Today "));
        // Caption and mentions are ordered by owner name
        assert_eq!(activity.mentions[0].mentioned_name, "Ada");
        assert_eq!(activity.mentions[3].mentioned_name, "Dee");
    }

    #[actix_web::main]
    #[test]
    async fn overflow_beyond_the_cap_starts_a_new_batch() {
        let (ctx, transport) = setup_context_inmemory();
        let team = seed_team(&ctx).await;
        for name in ["A", "B", "C", "D", "E", "F", "G"] {
            seed_due_event(&ctx, &team, name, "Birthday").await;
        }

        let usecase = SendEventCardsUseCase {
            reference_time: reference(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.cards_sent, 7);
        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1.attachments.len(), 6);
        assert_eq!(sent[1].1.attachments.len(), 1);
        // A trailing batch of one gets no caption
        assert_eq!(sent[1].1.text, "");
    }

    #[actix_web::main]
    #[test]
    async fn due_occurrences_are_spent_after_the_pass() {
        let (ctx, _) = setup_context_inmemory();
        let team = seed_team(&ctx).await;
        let (event, _) = seed_due_event(&ctx, &team, "Ada", "Birthday").await;

        let usecase = SendEventCardsUseCase {
            reference_time: reference(),
        };
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn skipped_occurrence_is_neither_posted_nor_spent() {
        let (ctx, transport) = setup_context_inmemory();
        let team = seed_team(&ctx).await;
        let (event, occurrence) = seed_due_event(&ctx, &team, "Ada", "Birthday").await;
        ctx.repos
            .occurrences
            .update_status(&occurrence.id, OccurrenceStatus::Skipped)
            .await;

        let usecase = SendEventCardsUseCase {
            reference_time: reference(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.occurrences_due, 0);
        assert_eq!(transport.sent_count(), 0);
        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn failed_send_stays_behind_in_the_ledger() {
        let (ctx, transport) = setup_context_inmemory();
        let team = seed_team(&ctx).await;
        let (event, occurrence) = seed_due_event(&ctx, &team, "Ada", "Birthday").await;

        transport.set_default_outcome(DeliveryOutcome::Failed {
            status: 503,
            body: "Service unavailable".into(),
        });

        let usecase = SendEventCardsUseCase {
            reference_time: reference(),
        };
        let res = execute(usecase, &ctx).await.unwrap();

        assert_eq!(res.cards_sent, 0);
        assert_eq!(res.cards_failed, 1);
        // Occurrence is spent anyway, the ledger row carries the retry
        assert!(ctx.repos.occurrences.find_by_event(&event.id).await.is_none());
        let rows = ctx.repos.messages.find_by_occurrence(&occurrence.id).await;
        assert_eq!(rows.len(), 1);
        assert!(RETRYABLE_STATUS_CODES.contains(&rows[0].last_status_code().unwrap()));
    }
}
