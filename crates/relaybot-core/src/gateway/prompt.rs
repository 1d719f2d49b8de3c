//! Prompt assembly.
//!
//! `build_prompt` produces the role-tagged message list sent to
//! chat-style APIs. `render_transcript` flattens the same request into one
//! string for APIs that only accept a single message.

use relaybot_types::chat::{Role, Turn};
use relaybot_types::llm::{PromptMessage, PromptRequest, PromptRole};

/// Build a prompt from the chat history and the new user message.
///
/// Order: system instruction (if any), history oldest-first, new message.
/// The parent response id is taken from the newest assistant turn that has one.
pub fn build_prompt(system: Option<&str>, history: &[Turn], new_message: &str) -> PromptRequest {
    let mut messages = Vec::with_capacity(history.len() + 2);

    if let Some(system) = system.map(str::trim).filter(|s| !s.is_empty()) {
        messages.push(PromptMessage::new(PromptRole::System, system));
    }

    messages.extend(
        history
            .iter()
            .map(|turn| PromptMessage::new(turn.role.into(), turn.text.clone())),
    );
    messages.push(PromptMessage::new(PromptRole::User, new_message));

    PromptRequest {
        messages,
        parent_response_id: last_response_id(history),
    }
}

/// Response id of the newest assistant turn carrying one.
pub fn last_response_id(history: &[Turn]) -> Option<String> {
    history
        .iter()
        .rev()
        .find(|turn| turn.role == Role::Assistant)
        .and_then(|turn| turn.response_id.clone())
}

/// Flatten a prompt into a single plain-text message.
///
/// Without history this is just the new message. With history:
///
/// ```text
/// Previous conversation:
/// User: ...
/// Assistant: ...
///
/// Current message: ...
/// ```
///
/// A system instruction, when present, is placed above everything else.
pub fn render_transcript(request: &PromptRequest) -> String {
    let conversation = request.conversation();
    let (current, history) = match conversation.split_last() {
        Some((last, rest)) => (last.content.as_str(), rest),
        None => ("", conversation),
    };

    let mut out = String::new();
    if let Some(system) = request.system() {
        out.push_str(system);
        out.push_str("\n\n");
    }

    if history.is_empty() {
        out.push_str(current);
        return out;
    }

    out.push_str("Previous conversation:\n");
    for message in history {
        out.push_str(speaker_label(message.role));
        out.push_str(": ");
        out.push_str(&message.content);
        out.push('\n');
    }
    out.push_str("\nCurrent message: ");
    out.push_str(current);
    out
}

fn speaker_label(role: PromptRole) -> &'static str {
    match role {
        PromptRole::System => "System",
        PromptRole::User => "User",
        PromptRole::Assistant => "Assistant",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<Turn> {
        vec![
            Turn::user("What is Rust?"),
            Turn::assistant("A systems language.").with_response_id(Some("resp-1".into())),
        ]
    }

    #[test]
    fn test_build_prompt_empty_history() {
        let req = build_prompt(None, &[], "Hello");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, PromptRole::User);
        assert_eq!(req.messages[0].content, "Hello");
        assert!(req.parent_response_id.is_none());
    }

    #[test]
    fn test_build_prompt_orders_system_history_new_message() {
        let req = build_prompt(Some("Be brief."), &history(), "Is it fast?");
        let roles: Vec<PromptRole> = req.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                PromptRole::System,
                PromptRole::User,
                PromptRole::Assistant,
                PromptRole::User
            ]
        );
        assert_eq!(req.messages[3].content, "Is it fast?");
        assert_eq!(req.parent_response_id.as_deref(), Some("resp-1"));
    }

    #[test]
    fn test_build_prompt_skips_blank_system() {
        let req = build_prompt(Some("   "), &[], "Hello");
        assert!(req.system().is_none());
    }

    #[test]
    fn test_last_response_id_uses_newest_assistant_turn() {
        let mut turns = history();
        turns.push(Turn::user("More?"));
        turns.push(Turn::assistant("Sure.").with_response_id(Some("resp-2".into())));
        assert_eq!(last_response_id(&turns).as_deref(), Some("resp-2"));

        turns.push(Turn::assistant("No id."));
        assert!(last_response_id(&turns).is_none());
    }

    #[test]
    fn test_render_transcript_without_history() {
        let req = build_prompt(None, &[], "Hello");
        assert_eq!(render_transcript(&req), "Hello");
    }

    #[test]
    fn test_render_transcript_with_history() {
        let req = build_prompt(None, &history(), "Is it fast?");
        assert_eq!(
            render_transcript(&req),
            "Previous conversation:\n\
             User: What is Rust?\n\
             Assistant: A systems language.\n\
             \n\
             Current message: Is it fast?"
        );
    }

    #[test]
    fn test_render_transcript_with_system() {
        let req = build_prompt(Some("Be brief."), &[], "Hello");
        assert_eq!(render_transcript(&req), "Be brief.\n\nHello");
    }
}
