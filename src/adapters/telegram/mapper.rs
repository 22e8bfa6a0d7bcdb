//! Map Bot API update JSON to domain entities.
//!
//! Only the fields the bot acts on are deserialized; everything else is ignored by serde.

use crate::domain::{InboundUpdate, MessageEvent, NewMember};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<TgMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgMessage {
    pub date: i64,
    pub chat: TgChat,
    #[serde(default)]
    pub from: Option<TgUser>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub entities: Vec<TgEntity>,
    #[serde(default)]
    pub new_chat_members: Vec<TgUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgChat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: i64,
}

/// Map one update to a domain update.
///
/// * private chats are not moderated and yield nothing.
/// * `new_chat_members` → `NewMembers` (bots joining are skipped).
/// * text or caption → `Message`; messages without text, without a sender, or starting with a
///   bot command are dropped (commands belong to the command layer, not moderation).
pub fn update_to_domain(update: &Update) -> Option<InboundUpdate> {
    let msg = update.message.as_ref()?;
    if msg.chat.kind == "private" {
        return None;
    }

    if !msg.new_chat_members.is_empty() {
        let members: Vec<NewMember> = msg
            .new_chat_members
            .iter()
            .filter(|u| !u.is_bot)
            .map(|u| NewMember {
                user_id: u.id,
                first_name: u.first_name.clone(),
            })
            .collect();
        if members.is_empty() {
            return None;
        }
        return Some(InboundUpdate::NewMembers {
            chat_id: msg.chat.id,
            members,
        });
    }

    let from = msg.from.as_ref()?;
    if is_bot_command(msg) {
        return None;
    }
    let text = msg
        .text
        .as_deref()
        .or(msg.caption.as_deref())
        .filter(|t| !t.trim().is_empty())?;

    Some(InboundUpdate::Message(MessageEvent::new(
        msg.chat.id,
        from.id,
        text,
        msg.date,
    )))
}

fn is_bot_command(msg: &TgMessage) -> bool {
    msg.text.is_some()
        && msg
            .entities
            .iter()
            .any(|e| e.kind == "bot_command" && e.offset == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_message_maps_to_message_event() {
        let u = parse(
            r#"{"update_id":10,"message":{"message_id":1,"date":1700000000,
                "chat":{"id":-100123,"type":"supergroup"},
                "from":{"id":5,"is_bot":false,"first_name":"Ann"},
                "text":"hello"}}"#,
        );
        assert_eq!(
            update_to_domain(&u),
            Some(InboundUpdate::Message(MessageEvent::new(
                -100123,
                5,
                "hello",
                1_700_000_000
            )))
        );
    }

    #[test]
    fn caption_is_used_when_text_is_absent() {
        let u = parse(
            r#"{"update_id":11,"message":{"message_id":2,"date":5,
                "chat":{"id":1,"type":"group"},"from":{"id":5,"first_name":"A"},
                "caption":"see bit.ly/x"}}"#,
        );
        match update_to_domain(&u) {
            Some(InboundUpdate::Message(m)) => assert_eq!(m.text, "see bit.ly/x"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn messages_without_text_or_sender_are_dropped() {
        let sticker = parse(
            r#"{"update_id":12,"message":{"message_id":3,"date":5,
                "chat":{"id":1,"type":"group"},"from":{"id":5,"first_name":"A"}}}"#,
        );
        assert_eq!(update_to_domain(&sticker), None);

        let channel_post = parse(
            r#"{"update_id":13,"message":{"message_id":4,"date":5,
                "chat":{"id":1,"type":"group"},"text":"hi"}}"#,
        );
        assert_eq!(update_to_domain(&channel_post), None);

        let blank = parse(
            r#"{"update_id":14,"message":{"message_id":5,"date":5,
                "chat":{"id":1,"type":"group"},"from":{"id":5,"first_name":"A"},
                "text":"   "}}"#,
        );
        assert_eq!(update_to_domain(&blank), None);
    }

    #[test]
    fn bot_commands_are_not_moderated() {
        let u = parse(
            r#"{"update_id":15,"message":{"message_id":6,"date":5,
                "chat":{"id":1,"type":"group"},"from":{"id":5,"first_name":"A"},
                "text":"/rules","entities":[{"type":"bot_command","offset":0,"length":6}]}}"#,
        );
        assert_eq!(update_to_domain(&u), None);
    }

    #[test]
    fn new_members_map_without_bots() {
        let u = parse(
            r#"{"update_id":16,"message":{"message_id":7,"date":5,
                "chat":{"id":-5,"type":"supergroup"},"from":{"id":1,"first_name":"Inviter"},
                "new_chat_members":[
                    {"id":8,"is_bot":false,"first_name":"Bea"},
                    {"id":9,"is_bot":true,"first_name":"SpamBot"}]}}"#,
        );
        assert_eq!(
            update_to_domain(&u),
            Some(InboundUpdate::NewMembers {
                chat_id: -5,
                members: vec![NewMember {
                    user_id: 8,
                    first_name: "Bea".into()
                }],
            })
        );
    }

    #[test]
    fn private_chats_are_ignored() {
        let u = parse(
            r#"{"update_id":18,"message":{"message_id":8,"date":5,
                "chat":{"id":5,"type":"private"},"from":{"id":5,"first_name":"A"},
                "text":"https://spam.xyz"}}"#,
        );
        assert_eq!(update_to_domain(&u), None);
    }

    #[test]
    fn updates_without_message_are_ignored() {
        let u = parse(r#"{"update_id":17,"edited_message":{"message_id":1}}"#);
        assert_eq!(update_to_domain(&u), None);
    }
}
