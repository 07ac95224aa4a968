use jubilee_domain::{DeliveryOutcome, EventMessage, MessageSendResult, ID};
use jubilee_infra::{ChatActivity, JubileeContext};
use tracing::{error, warn};

/// Where an activity is headed, which decides the compensation on a 404.
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    /// Personal conversation, nothing to clean up when it is gone
    Owner,
    /// Team channel. A 404 means the bot was uninstalled from the team, so
    /// its registration and memberships are dropped.
    Team(&'a ID),
}

/// Sends one activity and records the outcome on every ledger row it covers.
/// A carousel batch shares a single send, so all of its rows get the same
/// result.
pub async fn deliver_and_record(
    ctx: &JubileeContext,
    conversation_id: &str,
    activity: &ChatActivity,
    messages: &mut [EventMessage],
    destination: Destination<'_>,
) -> DeliveryOutcome {
    let outcome = ctx
        .transport
        .send_to_conversation(conversation_id, activity)
        .await;

    if let DeliveryOutcome::Failed { status: 404, .. } = &outcome {
        if let Destination::Team(team_id) = destination {
            warn!(
                "Team {} is gone (404 on send), removing its registration and memberships",
                team_id
            );
            ctx.repos.teams.delete(team_id).await;
            ctx.repos.memberships.delete_by_team(team_id).await;
        }
    }

    let attempted_at = ctx.sys.get_timestamp_millis();
    let send_result = MessageSendResult::from_outcome(&outcome, attempted_at);
    for message in messages.iter_mut() {
        message.send_result = Some(send_result.clone());
        if let Err(e) = ctx.repos.messages.save(message).await {
            error!(
                "Unable to record the send result for message {}: {:?}",
                message.id, e
            );
        }
    }

    outcome
}

#[cfg(test)]
mod test {
    use super::*;
    use jubilee_domain::{MessageActivity, MessageKind, Team, TeamMembership};
    use jubilee_infra::{setup_context_inmemory, AttachmentLayout};

    fn activity_factory() -> ChatActivity {
        ChatActivity {
            text: String::new(),
            attachment_layout: AttachmentLayout::Carousel,
            attachments: Vec::new(),
            mentions: Vec::new(),
        }
    }

    fn message_factory() -> EventMessage {
        EventMessage::new(
            Default::default(),
            Default::default(),
            MessageKind::Event,
            MessageActivity {
                event_id: Default::default(),
                owner_user_id: Default::default(),
                owner_name: "Ada".into(),
                owner_chat_id: "29:ada".into(),
                conversation_id: "19:team".into(),
                title: "Birthday".into(),
                message: String::new(),
                image_url: String::new(),
                event_date: None,
            },
            i64::MAX,
        )
    }

    #[actix_web::main]
    #[test]
    async fn records_result_on_every_row_of_the_batch() {
        let (ctx, _) = setup_context_inmemory();
        let mut messages = vec![message_factory(), message_factory()];
        for m in &messages {
            ctx.repos.messages.insert(m).await.unwrap();
        }

        let outcome = deliver_and_record(
            &ctx,
            "19:team",
            &activity_factory(),
            &mut messages,
            Destination::Owner,
        )
        .await;

        assert_eq!(outcome, DeliveryOutcome::Sent);
        for m in &messages {
            let stored = ctx.repos.messages.find(&m.id).await.unwrap();
            assert_eq!(stored.last_status_code(), Some(200));
        }
    }

    #[actix_web::main]
    #[test]
    async fn gone_team_is_cleaned_up_on_404() {
        let (ctx, transport) = setup_context_inmemory();
        let team = Team {
            id: Default::default(),
            name: "Engineering".into(),
            conversation_id: "19:team".into(),
        };
        ctx.repos.teams.insert(&team).await.unwrap();
        ctx.repos
            .memberships
            .insert(&TeamMembership {
                user_id: Default::default(),
                team_id: team.id.clone(),
            })
            .await
            .unwrap();

        transport.set_default_outcome(DeliveryOutcome::Failed {
            status: 404,
            body: "Conversation not found".into(),
        });

        let mut messages = vec![message_factory()];
        ctx.repos.messages.insert(&messages[0]).await.unwrap();

        deliver_and_record(
            &ctx,
            "19:team",
            &activity_factory(),
            &mut messages,
            Destination::Team(&team.id),
        )
        .await;

        assert!(ctx.repos.teams.find(&team.id).await.is_none());
        assert!(ctx.repos.memberships.find_by_team(&team.id).await.is_empty());
        let stored = ctx.repos.messages.find(&messages[0].id).await.unwrap();
        assert_eq!(stored.last_status_code(), Some(404));
    }

    #[actix_web::main]
    #[test]
    async fn owner_destination_never_deletes_teams() {
        let (ctx, transport) = setup_context_inmemory();
        let team = Team {
            id: Default::default(),
            name: "Engineering".into(),
            conversation_id: "19:team".into(),
        };
        ctx.repos.teams.insert(&team).await.unwrap();

        transport.set_default_outcome(DeliveryOutcome::Failed {
            status: 404,
            body: "Conversation not found".into(),
        });

        let mut messages = vec![message_factory()];
        ctx.repos.messages.insert(&messages[0]).await.unwrap();

        deliver_and_record(
            &ctx,
            "a:personal",
            &activity_factory(),
            &mut messages,
            Destination::Owner,
        )
        .await;

        assert!(ctx.repos.teams.find(&team.id).await.is_some());
    }
}
