//! `@botname` mention handling for multi-party chats.
//!
//! Matching is ASCII case-insensitive and respects word boundaries, so
//! `@relaybot_dev` does not count as a mention of `@relaybot` and neither
//! does `me@relaybot` inside an e-mail address.

use std::ops::Range;

/// Whether `text` mentions the bot `username` (with or without leading `@`).
pub fn mentions_bot(text: &str, username: &str) -> bool {
    !mention_ranges(text, username).is_empty()
}

/// Remove every mention of `username` from `text` and trim the result.
pub fn strip_mentions(text: &str, username: &str) -> String {
    let ranges = mention_ranges(text, username);
    if ranges.is_empty() {
        return text.trim().to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in ranges {
        out.push_str(&text[cursor..range.start]);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out.trim().to_string()
}

fn is_handle_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn mention_ranges(text: &str, username: &str) -> Vec<Range<usize>> {
    let handle = username.trim().trim_start_matches('@').as_bytes();
    if handle.is_empty() {
        return Vec::new();
    }

    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'@' {
            let end = i + 1 + handle.len();
            let preceded_ok = i == 0 || !is_handle_byte(bytes[i - 1]);
            let matches = end <= bytes.len() && bytes[i + 1..end].eq_ignore_ascii_case(handle);
            let followed_ok = bytes.get(end).is_none_or(|b| !is_handle_byte(*b));
            if preceded_ok && matches && followed_ok {
                ranges.push(i..end);
                i = end;
                continue;
            }
        }
        i += 1;
    }
    ranges
}
