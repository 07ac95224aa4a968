mod cards;
mod delivery;
mod retry_failed_messages;
mod send_event_cards;
mod send_upcoming_previews;

use crate::shared::usecase::execute;
use actix_web::{web, HttpResponse};
use chrono::DateTime;
use jubilee_api_structs::notification as notification_structs;
use jubilee_api_structs::notification::QueryParams;
use jubilee_infra::JubileeContext;
use retry_failed_messages::RetryFailedMessagesUseCase;
use send_event_cards::SendEventCardsUseCase;
use send_upcoming_previews::SendUpcomingPreviewsUseCase;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/notify/preview",
        web::post().to(send_upcoming_previews_controller),
    );
    cfg.route("/notify/event", web::post().to(send_event_cards_controller));
    cfg.route(
        "/notify/retry",
        web::post().to(retry_failed_messages_controller),
    );
}

// The trigger endpoints answer 200 whatever happens. The scheduled trigger
// behind them treats any non-200 as "invoke again right away", which would
// double-send cards on partial failures. Failures are logged and the ledger
// carries the retries.

/// A missing or unparseable `currentDateTime` falls back to the server clock
fn reference_time(query: &QueryParams, ctx: &JubileeContext) -> i64 {
    query
        .current_date_time
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|instant| instant.timestamp_millis())
        .unwrap_or_else(|| ctx.sys.get_timestamp_millis())
}

async fn send_upcoming_previews_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<JubileeContext>,
) -> HttpResponse {
    let usecase = SendUpcomingPreviewsUseCase {
        reference_time: reference_time(&query_params, &ctx),
    };

    match execute(usecase, &ctx).await {
        Ok(res) => {
            HttpResponse::Ok().json(notification_structs::send_upcoming_previews::APIResponse {
                occurrences_created: res.occurrences_created,
                previews_sent: res.previews_sent,
            })
        }
        Err(_) => HttpResponse::Ok().finish(),
    }
}

async fn send_event_cards_controller(
    query_params: web::Query<QueryParams>,
    ctx: web::Data<JubileeContext>,
) -> HttpResponse {
    let usecase = SendEventCardsUseCase {
        reference_time: reference_time(&query_params, &ctx),
    };

    match execute(usecase, &ctx).await {
        Ok(res) => HttpResponse::Ok().json(notification_structs::send_event_cards::APIResponse {
            occurrences_due: res.occurrences_due,
            cards_sent: res.cards_sent,
            cards_failed: res.cards_failed,
        }),
        Err(_) => HttpResponse::Ok().finish(),
    }
}

async fn retry_failed_messages_controller(ctx: web::Data<JubileeContext>) -> HttpResponse {
    match execute(RetryFailedMessagesUseCase {}, &ctx).await {
        Ok(res) => {
            HttpResponse::Ok().json(notification_structs::retry_failed_messages::APIResponse {
                expired_purged: res.expired_purged,
                retried: res.retried,
                delivered: res.delivered,
            })
        }
        Err(_) => HttpResponse::Ok().finish(),
    }
}
