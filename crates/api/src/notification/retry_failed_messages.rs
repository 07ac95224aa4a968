use super::{
    cards,
    delivery::{deliver_and_record, Destination},
};
use crate::error::JubileeError;
use crate::shared::usecase::UseCase;
use futures::{stream, StreamExt};
use jubilee_domain::{DeliveryOutcome, EventMessage, MessageKind};
use jubilee_infra::{AttachmentLayout, ChatActivity, JubileeContext};
use tracing::info;

/// Drains the ledger of failed sends: expired rows are purged, the rest are
/// resent with exponential backoff between attempts. Celebration cards go
/// first, reminders after, a bounded number of rows in flight at a time.
#[derive(Debug)]
pub struct RetryFailedMessagesUseCase {}

/// Rows in flight at once during a retry pass
const MAX_PARALLELISM: usize = 4;

#[derive(Debug)]
pub struct UseCaseRes {
    pub expired_purged: i64,
    pub retried: usize,
    pub delivered: usize,
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
impl UseCase for RetryFailedMessagesUseCase {
    type Response = UseCaseRes;

    type Error = UseCaseError;

    const NAME: &'static str = "RetryFailedMessages";

    async fn execute(&mut self, ctx: &JubileeContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let expired_purged = ctx.repos.messages.delete_expired(now).await.deleted_count;

        let retryable = ctx
            .repos
            .messages
            .find_retryable()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        info!(
            "Retry pass: purged {} expired rows, {} rows left to resend",
            expired_purged,
            retryable.len()
        );

        let (event_rows, preview_rows): (Vec<EventMessage>, Vec<EventMessage>) = retryable
            .into_iter()
            .partition(|m| m.kind == MessageKind::Event);

        let retried = event_rows.len() + preview_rows.len();
        let mut delivered = 0;

        for rows in vec![event_rows, preview_rows] {
            let outcomes = stream::iter(rows)
                .map(|row| retry_message(ctx, row))
                .buffer_unordered(MAX_PARALLELISM)
                .collect::<Vec<bool>>()
                .await;
            delivered += outcomes.into_iter().filter(|ok| *ok).count();
        }

        Ok(UseCaseRes {
            expired_purged,
            retried,
            delivered,
        })
    }
}

/// Resends one ledger row, sleeping `base^attempt` between attempts. Stops
/// on success, on a non-retryable status or when the attempt budget is
/// spent. Every attempt's outcome lands in the ledger.
async fn retry_message(ctx: &JubileeContext, mut message: EventMessage) -> bool {
    let card = match message.kind {
        MessageKind::Event => cards::event_card(&message.activity),
        MessageKind::Preview => cards::preview_card(&message.activity),
    };
    let chat_activity = ChatActivity {
        text: String::new(),
        attachment_layout: AttachmentLayout::List,
        attachments: vec![card],
        mentions: Vec::new(),
    };
    let conversation_id = message.activity.conversation_id.clone();

    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let outcome = deliver_and_record(
            ctx,
            &conversation_id,
            &chat_activity,
            std::slice::from_mut(&mut message),
            Destination::Owner,
        )
        .await;

        match outcome {
            DeliveryOutcome::Sent => return true,
            outcome if !outcome.is_retryable() => return false,
            _ => {
                if attempt >= ctx.config.max_send_attempts {
                    return false;
                }
                let delay = ctx.config.retry_base_delay_ms.saturating_pow(attempt);
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;
    use jubilee_domain::{MessageActivity, MessageSendResult};
    use jubilee_infra::setup_context_inmemory;

    fn row_factory(kind: MessageKind, status_code: u16, expire_at: i64) -> EventMessage {
        let mut message = EventMessage::new(
            Default::default(),
            Default::default(),
            kind,
            MessageActivity {
                event_id: Default::default(),
                owner_user_id: Default::default(),
                owner_name: "Ada".into(),
                owner_chat_id: "29:ada".into(),
                conversation_id: "a:ada-chat".into(),
                title: "Birthday".into(),
                message: String::new(),
                image_url: String::new(),
                event_date: None,
            },
            expire_at,
        );
        message.send_result = Some(MessageSendResult {
            status_code,
            response_body: String::new(),
            attempted_at: 0,
        });
        message
    }

    fn fast_ctx() -> (JubileeContext, std::sync::Arc<jubilee_infra::StubChatTransport>) {
        let (mut ctx, transport) = setup_context_inmemory();
        ctx.config.retry_base_delay_ms = 1;
        (ctx, transport)
    }

    #[actix_web::main]
    #[test]
    async fn expired_rows_are_purged_not_retried() {
        let (ctx, transport) = fast_ctx();
        let expired = row_factory(MessageKind::Preview, 503, 0);
        ctx.repos.messages.insert(&expired).await.unwrap();

        let res = execute(RetryFailedMessagesUseCase {}, &ctx).await.unwrap();

        assert_eq!(res.expired_purged, 1);
        assert_eq!(res.retried, 0);
        assert_eq!(transport.sent_count(), 0);
        assert!(ctx.repos.messages.find(&expired.id).await.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn non_retryable_status_is_left_alone() {
        let (ctx, transport) = fast_ctx();
        let row = row_factory(MessageKind::Preview, 400, i64::MAX);
        ctx.repos.messages.insert(&row).await.unwrap();

        let res = execute(RetryFailedMessagesUseCase {}, &ctx).await.unwrap();

        assert_eq!(res.retried, 0);
        assert_eq!(transport.sent_count(), 0);
    }

    #[actix_web::main]
    #[test]
    async fn transient_failure_is_delivered_on_a_later_attempt() {
        let (ctx, transport) = fast_ctx();
        let row = row_factory(MessageKind::Event, 429, i64::MAX);
        ctx.repos.messages.insert(&row).await.unwrap();

        transport.script_outcome(DeliveryOutcome::Failed {
            status: 503,
            body: "Service unavailable".into(),
        });
        // Scripted outcomes run out, the default `Sent` takes over

        let res = execute(RetryFailedMessagesUseCase {}, &ctx).await.unwrap();

        assert_eq!(res.retried, 1);
        assert_eq!(res.delivered, 1);
        assert_eq!(transport.sent_count(), 2);
        let stored = ctx.repos.messages.find(&row.id).await.unwrap();
        assert_eq!(stored.last_status_code(), Some(200));
    }

    #[actix_web::main]
    #[test]
    async fn gives_up_after_the_attempt_budget() {
        let (ctx, transport) = fast_ctx();
        let row = row_factory(MessageKind::Event, 503, i64::MAX);
        ctx.repos.messages.insert(&row).await.unwrap();

        transport.set_default_outcome(DeliveryOutcome::Failed {
            status: 503,
            body: "Service unavailable".into(),
        });

        let res = execute(RetryFailedMessagesUseCase {}, &ctx).await.unwrap();

        assert_eq!(res.delivered, 0);
        assert_eq!(transport.sent_count() as u32, ctx.config.max_send_attempts);
        let stored = ctx.repos.messages.find(&row.id).await.unwrap();
        assert_eq!(stored.last_status_code(), Some(503));
    }

    #[actix_web::main]
    #[test]
    async fn celebration_cards_are_resent_before_reminders() {
        let (ctx, transport) = fast_ctx();
        let preview = row_factory(MessageKind::Preview, 503, i64::MAX);
        let event = row_factory(MessageKind::Event, 503, i64::MAX);
        ctx.repos.messages.insert(&preview).await.unwrap();
        ctx.repos.messages.insert(&event).await.unwrap();

        let res = execute(RetryFailedMessagesUseCase {}, &ctx).await.unwrap();

        assert_eq!(res.delivered, 2);
        let sent = transport.sent();
        assert!(sent[0].1.attachments[0].title.starts_with("Today we celebrate"));
        assert!(sent[1].1.attachments[0].title.ends_with("is coming up!\n\n"));
    }

    #[actix_web::main]
    #[test]
    async fn successful_rows_are_not_picked_up_again() {
        let (ctx, transport) = fast_ctx();
        let row = row_factory(MessageKind::Event, 503, i64::MAX);
        ctx.repos.messages.insert(&row).await.unwrap();

        execute(RetryFailedMessagesUseCase {}, &ctx).await.unwrap();
        assert_eq!(transport.sent_count(), 1);

        let res = execute(RetryFailedMessagesUseCase {}, &ctx).await.unwrap();
        assert_eq!(res.retried, 0);
        assert_eq!(transport.sent_count(), 1);
    }
}
