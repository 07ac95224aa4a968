use jubilee_domain::MessageActivity;
use jubilee_infra::{HeroCard, Mention};

/// Reminder card sent to the event owner ahead of the celebration
pub fn preview_card(activity: &MessageActivity) -> HeroCard {
    HeroCard {
        title: format!(
            "{}'s \"{}\" is coming up!\n\n",
            activity.owner_name, activity.title
        ),
        text: activity.message.clone(),
        image_url: activity.image_url.clone(),
    }
}

pub fn preview_text(owner_name: &str) -> String {
    format!(
        "Hi {}! A celebration you added is coming up. Here is the card I am going to share:",
        owner_name
    )
}

/// Celebration card posted in a team
pub fn event_card(activity: &MessageActivity) -> HeroCard {
    HeroCard {
        title: format!(
            "Today we celebrate {}'s \"{}\"!\n\n",
            activity.owner_name, activity.title
        ),
        text: activity.message.clone(),
        image_url: activity.image_url.clone(),
    }
}

/// One due event prepared for posting in a team, carried until its batch
/// is flushed.
#[derive(Debug, Clone)]
pub struct EventCardPayload {
    pub owner_name: String,
    pub owner_chat_id: String,
    pub mention_line: String,
    pub card: HeroCard,
}

impl EventCardPayload {
    pub fn new(activity: &MessageActivity, title: &str) -> Self {
        Self {
            owner_name: activity.owner_name.clone(),
            owner_chat_id: activity.owner_chat_id.clone(),
            mention_line: format!("<at>{}</at> is celebrating {}", activity.owner_name, title),
            card: event_card(activity),
        }
    }
}

/// Combined caption above a carousel of celebration cards. A batch of one
/// gets no caption, the card speaks for itself.
pub fn carousel_caption(payloads: &[EventCardPayload]) -> String {
    if payloads.len() <= 1 {
        return String::new();
    }

    let lines = payloads
        .iter()
        .map(|p| p.mention_line.clone())
        .collect::<Vec<_>>();
    let (last, rest) = lines.split_last().unwrap();

    format!(
        "Stop the presses! Today {} and {}. That's a lot of merrymaking for one day, pace yourselves! \n\n",
        rest.join(", "),
        last
    )
}

/// Mention entities for a batch, one per distinct owner. An owner with
/// several events in the same batch is mentioned once.
pub fn batch_mentions(payloads: &[EventCardPayload]) -> Vec<Mention> {
    let mut mentions: Vec<Mention> = Vec::new();
    for payload in payloads {
        if mentions.iter().any(|m| m.mentioned_id == payload.owner_chat_id) {
            continue;
        }
        mentions.push(Mention {
            text: format!("<at>{}</at>", payload.owner_name),
            mentioned_id: payload.owner_chat_id.clone(),
            mentioned_name: payload.owner_name.clone(),
        });
    }
    mentions
}

#[cfg(test)]
mod test {
    use super::*;

    fn payload_factory(owner_name: &str, owner_chat_id: &str, title: &str) -> EventCardPayload {
        let activity = MessageActivity {
            event_id: Default::default(),
            owner_user_id: Default::default(),
            owner_name: owner_name.into(),
            owner_chat_id: owner_chat_id.into(),
            conversation_id: "19:team".into(),
            title: title.into(),
            message: String::new(),
            image_url: String::new(),
            event_date: None,
        };
        EventCardPayload::new(&activity, title)
    }

    #[test]
    fn no_caption_for_a_single_card() {
        let payloads = vec![payload_factory("Ada", "29:ada", "Birthday")];
        assert_eq!(carousel_caption(&payloads), "");
    }

    #[test]
    fn caption_joins_last_entry_with_and() {
        let payloads = vec![
            payload_factory("Ada", "29:ada", "Birthday"),
            payload_factory("Bo", "29:bo", "Anniversary"),
            payload_factory("Cy", "29:cy", "Name day"),
        ];
        let caption = carousel_caption(&payloads);
        assert_eq!(
            caption,
            "Stop the presses! Today <at>Ada</at> is celebrating Birthday, <at>Bo</at> is celebrating Anniversary and <at>Cy</at> is celebrating Name day. That's a lot of merrymaking for one day, pace yourselves! \n\n"
        );
    }

    #[test]
    fn mentions_are_deduped_per_owner() {
        let payloads = vec![
            payload_factory("Ada", "29:ada", "Birthday"),
            payload_factory("Ada", "29:ada", "Anniversary"),
            payload_factory("Bo", "29:bo", "Name day"),
        ];
        let mentions = batch_mentions(&payloads);
        assert_eq!(mentions.len(), 2);
        assert_eq!(mentions[0].mentioned_id, "29:ada");
        assert_eq!(mentions[1].mentioned_id, "29:bo");
    }
}
