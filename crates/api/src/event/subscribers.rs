use super::update_event::{UpdateEventUseCase, UseCaseRes as UpdateEventRes};
use crate::event::delete_event::DeleteEventUseCase;
use crate::shared::usecase::Subscriber;
use jubilee_domain::CelebrationEvent;
use jubilee_infra::JubileeContext;

/// Drops the live occurrence and any pending ledger rows of an event whose
/// schedule changed, so the next reminder pass resolves it afresh.
pub struct SyncOccurrenceOnEventUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateEventUseCase> for SyncOccurrenceOnEventUpdated {
    async fn notify(&self, res: &UpdateEventRes, ctx: &JubileeContext) {
        if !res.schedule_changed {
            return;
        }
        invalidate_occurrence(&res.event, ctx).await;
    }
}

pub struct DeleteOccurrenceOnEventDeleted;

#[async_trait::async_trait(?Send)]
impl Subscriber<DeleteEventUseCase> for DeleteOccurrenceOnEventDeleted {
    async fn notify(&self, event: &CelebrationEvent, ctx: &JubileeContext) {
        invalidate_occurrence(event, ctx).await;
    }
}

async fn invalidate_occurrence(event: &CelebrationEvent, ctx: &JubileeContext) {
    ctx.repos.occurrences.delete_by_event(&event.id).await;
    ctx.repos.messages.delete_by_event(&event.id).await;
}
