//! Fixed user-facing texts.
//!
//! Error replies never include status codes, response bodies, or any other
//! detail from the underlying [`GatewayError`]; that detail goes to the log.

use relaybot_types::error::GatewayError;

pub const GREETING: &str = "Hello! I'm an AI assistant bot. You can:\n\
    \u{2022} Send me a direct message\n\
    \u{2022} Use /ask <question> in groups\n\
    \u{2022} Mention me with @ in groups\n\
    \u{2022} Use /resetc to clear conversation context\n\
    \u{2022} Use /help for more information";

pub const RESET_CONFIRMATION: &str = "Conversation context has been cleared.";

pub const ASK_USAGE: &str = "Please provide a question after /ask command.";

pub const TIMEOUT_REPLY: &str = "Sorry, the assistant took too long to respond. Please try again.";

pub const EMPTY_MESSAGE_REPLY: &str = "Please send a non-empty message.";

pub const GENERIC_ERROR_REPLY: &str =
    "Sorry, something went wrong while getting a response. Please try again later.";

/// Help text, which states how much context the bot keeps.
pub fn help_text(max_context_size: usize) -> String {
    let memory_line = match max_context_size {
        0 => "I don't keep conversation context between messages.".to_string(),
        1 => "I maintain context of the last message in each chat.".to_string(),
        n => format!("I maintain context of the last {n} messages in each chat."),
    };

    format!(
        "Available commands:\n\
         \u{2022} /start - Initialize the bot\n\
         \u{2022} /ask <question> - Ask a question\n\
         \u{2022} /resetc - Clear conversation context\n\
         \u{2022} /help - Show this help message\n\n\
         In groups, you can also mention me with @ to ask questions.\n\
         {memory_line}"
    )
}

/// The message shown in chat when a model call fails.
pub fn error_reply(error: &GatewayError) -> &'static str {
    match error {
        GatewayError::Timeout(_) => TIMEOUT_REPLY,
        GatewayError::InvalidInput(_) => EMPTY_MESSAGE_REPLY,
        GatewayError::Transport(_)
        | GatewayError::Api { .. }
        | GatewayError::MalformedResponse(_) => GENERIC_ERROR_REPLY,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_help_text_mentions_context_size() {
        assert!(help_text(10).contains("last 10 messages"));
        assert!(help_text(1).contains("last message"));
        assert!(help_text(0).contains("don't keep"));
        assert!(help_text(10).contains("/resetc"));
    }

    #[test]
    fn test_error_reply_hides_details() {
        let err = GatewayError::Api {
            status_code: 401,
            message: "invalid api key sk-123".to_string(),
        };
        let reply = error_reply(&err);
        assert!(!reply.contains("401"));
        assert!(!reply.contains("sk-123"));
        assert_eq!(reply, GENERIC_ERROR_REPLY);
    }

    #[test]
    fn test_error_reply_per_kind() {
        assert_eq!(
            error_reply(&GatewayError::Timeout(Duration::from_secs(30))),
            TIMEOUT_REPLY
        );
        assert_eq!(
            error_reply(&GatewayError::InvalidInput("empty".into())),
            EMPTY_MESSAGE_REPLY
        );
        assert_eq!(
            error_reply(&GatewayError::Transport("connection refused".into())),
            GENERIC_ERROR_REPLY
        );
    }
}
