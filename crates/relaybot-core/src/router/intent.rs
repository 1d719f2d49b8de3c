//! Classification of inbound messages into a closed set of intents.
//!
//! Commands work in every chat. Free text is answered in private chats
//! always, and in groups only when the bot is mentioned.

use relaybot_types::chat::{ChatKind, InboundMessage};

use super::mention::{mentions_bot, strip_mentions};

/// What the router should do with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `/start`
    Greet,
    /// `/help`
    Help,
    /// `/ask <question>`; the question may be empty.
    Ask(String),
    /// `/resetc` or `/reset`
    Reset,
    /// Free text addressed to the bot.
    Plain(String),
    /// Not for us: no reply, no model call, no store change.
    Ineligible,
}

/// Classify a message. `bot_username` is the bot's handle without `@`;
/// when unknown, group messages can only reach the bot through commands.
pub fn classify(message: &InboundMessage, bot_username: Option<&str>) -> Intent {
    if message.chat_kind == ChatKind::Channel {
        return Intent::Ineligible;
    }

    let text = message.text.trim();
    if text.is_empty() {
        return Intent::Ineligible;
    }

    if text.starts_with('/') {
        return classify_command(text, bot_username);
    }

    if !message.chat_kind.is_multi_party() {
        return Intent::Plain(text.to_string());
    }

    match bot_username {
        Some(username) if mentions_bot(text, username) => {
            let stripped = strip_mentions(text, username);
            if stripped.is_empty() {
                Intent::Ineligible
            } else {
                Intent::Plain(stripped)
            }
        }
        _ => Intent::Ineligible,
    }
}

fn classify_command(text: &str, bot_username: Option<&str>) -> Intent {
    let (head, rest) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };

    let head = &head[1..];
    let (name, target) = match head.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (head, None),
    };

    // `/cmd@otherbot` is addressed to a different bot in the same group.
    if let (Some(target), Some(username)) = (target, bot_username) {
        if !target.eq_ignore_ascii_case(username.trim_start_matches('@')) {
            return Intent::Ineligible;
        }
    }

    match name.to_lowercase().as_str() {
        "start" => Intent::Greet,
        "help" => Intent::Help,
        "resetc" | "reset" => Intent::Reset,
        "ask" => {
            let question = match bot_username {
                Some(username) => strip_mentions(rest, username),
                None => rest.to_string(),
            };
            Intent::Ask(question)
        }
        _ => Intent::Ineligible,
    }
}

#[cfg(test)]
mod tests {
    use relaybot_types::chat::ChatId;

    use super::*;

    const BOT: Option<&str> = Some("relaybot");

    fn private(text: &str) -> InboundMessage {
        InboundMessage::new(ChatId::from(42), ChatKind::Private, text)
    }

    fn group(text: &str) -> InboundMessage {
        InboundMessage::new(ChatId::from(-100), ChatKind::Supergroup, text)
    }

    #[test]
    fn test_private_text_is_plain() {
        assert_eq!(classify(&private("  Hello "), BOT), Intent::Plain("Hello".into()));
        assert_eq!(classify(&private("Hello"), None), Intent::Plain("Hello".into()));
    }

    #[test]
    fn test_blank_text_is_ineligible() {
        assert_eq!(classify(&private("   "), BOT), Intent::Ineligible);
    }

    #[test]
    fn test_group_without_mention_is_ineligible() {
        assert_eq!(classify(&group("what is Rust?"), BOT), Intent::Ineligible);
        assert_eq!(classify(&group("@relaybot hi"), None), Intent::Ineligible);
    }

    #[test]
    fn test_group_mention_is_plain_without_mention() {
        assert_eq!(
            classify(&group("@relaybot what is Rust?"), BOT),
            Intent::Plain("what is Rust?".into())
        );
        assert_eq!(classify(&group("@relaybot"), BOT), Intent::Ineligible);
    }

    #[test]
    fn test_commands() {
        assert_eq!(classify(&private("/start"), BOT), Intent::Greet);
        assert_eq!(classify(&private("/HELP"), BOT), Intent::Help);
        assert_eq!(classify(&private("/resetc"), BOT), Intent::Reset);
        assert_eq!(classify(&private("/reset"), BOT), Intent::Reset);
        assert_eq!(classify(&private("/unknown"), BOT), Intent::Ineligible);
    }

    #[test]
    fn test_ask_command_in_group() {
        assert_eq!(
            classify(&group("/ask what is Rust?"), BOT),
            Intent::Ask("what is Rust?".into())
        );
        assert_eq!(classify(&group("/ask"), BOT), Intent::Ask(String::new()));
        assert_eq!(
            classify(&group("/ask\nmulti\nline"), BOT),
            Intent::Ask("multi\nline".into())
        );
    }

    #[test]
    fn test_command_with_bot_suffix() {
        assert_eq!(
            classify(&group("/ask@RelayBot why?"), BOT),
            Intent::Ask("why?".into())
        );
        assert_eq!(classify(&group("/ask@otherbot why?"), BOT), Intent::Ineligible);
        assert_eq!(classify(&group("/help@otherbot"), None), Intent::Help);
    }

    #[test]
    fn test_channel_posts_are_ineligible() {
        let msg = InboundMessage::new(ChatId::from(-5), ChatKind::Channel, "/start");
        assert_eq!(classify(&msg, BOT), Intent::Ineligible);
    }

    #[test]
    fn test_basic_group_follows_multi_party_rules() {
        let msg = |text: &str| InboundMessage::new(ChatId::from(-7), ChatKind::Group, text);
        assert_eq!(classify(&msg("hello all"), BOT), Intent::Ineligible);
        assert_eq!(
            classify(&msg("@relaybot hello"), BOT),
            Intent::Plain("hello".to_string())
        );
    }
}
