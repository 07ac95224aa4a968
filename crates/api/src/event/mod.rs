mod create_event;
mod delete_event;
mod get_event;
mod get_events_by_owner;
mod skip_event;
mod subscribers;
mod update_event;

use actix_web::web;
use create_event::create_event_controller;
use delete_event::delete_event_controller;
use get_event::get_event_controller;
use get_events_by_owner::get_events_by_owner_controller;
use skip_event::skip_event_controller;
use update_event::update_event_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/events", web::post().to(create_event_controller));
    cfg.route(
        "/user/{user_id}/events",
        web::get().to(get_events_by_owner_controller),
    );
    cfg.route("/events/{event_id}", web::get().to(get_event_controller));
    cfg.route("/events/{event_id}", web::put().to(update_event_controller));
    cfg.route(
        "/events/{event_id}",
        web::delete().to(delete_event_controller),
    );
    cfg.route(
        "/events/{event_id}/skip",
        web::post().to(skip_event_controller),
    );
}
