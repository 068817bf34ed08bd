//! Edit reconstruction for a network without native edits.
//!
//! Most Gitter edits are small typo fixes, so instead of repeating the whole
//! message we find the common prefix and suffix (snapped to word boundaries)
//! and show only the changed region with one word of context on each side.
//!
//! Scanning works on `char`s. Two strings that differ only in combining marks
//! on the same base character can still be cut inside a grapheme cluster.

use std::collections::HashMap;

use crate::common::RemoteMessage;
use crate::config::RelayConfig;

use super::formatter::{escape_html, final_word, first_word};

const ELLIPSIS: &str = "...";

/// The changed region of an edited message, plus display context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDiff {
    /// Last word of the common prefix, with a leading ellipsis if truncated.
    pub before: String,
    /// Text of the old version that was replaced.
    pub removed: String,
    /// Text of the new version that replaced it.
    pub added: String,
    /// First word of the common suffix, with a trailing ellipsis if truncated.
    pub after: String,
}

impl EditDiff {
    /// Plain text rendering: `(edited) before removed after => before added after`.
    pub fn body(&self, config: &RelayConfig) -> String {
        format!(
            "{} {}{}{} => {}{}{}",
            config.edit_marker,
            self.before,
            self.removed,
            self.after,
            self.before,
            self.added,
            self.after
        )
    }

    /// HTML rendering with the removed and added text colored.
    pub fn formatted_body(&self, config: &RelayConfig) -> String {
        let before = escape_html(&self.before);
        let after = escape_html(&self.after);
        format!(
            "<i>{}</i> {}<font color=\"{}\">{}</font>{} =&gt; {}<font color=\"{}\">{}</font>{}",
            escape_html(&config.edit_marker),
            before,
            escape_html(&config.removed_color),
            escape_html(&self.removed),
            after,
            before,
            escape_html(&config.added_color),
            escape_html(&self.added),
            after
        )
    }
}

/// Compute the edited region between two versions of a message.
pub fn diff_edit(prev: &str, curr: &str) -> EditDiff {
    let prev: Vec<char> = prev.chars().collect();
    let curr: Vec<char> = curr.chars().collect();

    let mut prefix_len = prev
        .iter()
        .zip(&curr)
        .take_while(|(p, c)| p == c)
        .count();
    // retreat to the start of a word
    while prefix_len > 0 && !curr[prefix_len - 1].is_whitespace() {
        prefix_len -= 1;
    }

    let mut suffix_len = prev
        .iter()
        .rev()
        .zip(curr.iter().rev())
        .take_while(|(p, c)| p == c)
        .count();
    // retreat to the end of a word
    while suffix_len > 0 && !curr[curr.len() - suffix_len].is_whitespace() {
        suffix_len -= 1;
    }

    // Prefix and suffix may overlap when one version repeats text of the
    // other; the middle regions then shrink to empty rather than invert.
    let curr_mid_end = (curr.len() - suffix_len).max(prefix_len);
    let prev_mid_end = (prev.len() - suffix_len).max(prefix_len);

    let prefix: String = curr[..prefix_len].iter().collect();
    let suffix: String = curr[curr_mid_end..].iter().collect();

    let mut before = final_word(&prefix).to_string();
    if before != prefix {
        before = format!("{} {}", ELLIPSIS, before);
    }

    let mut after = first_word(&suffix).to_string();
    if after != suffix {
        after = format!("{} {}", after, ELLIPSIS);
    }

    EditDiff {
        before,
        removed: prev[prefix_len..prev_mid_end].iter().collect(),
        added: curr[prefix_len..curr_mid_end].iter().collect(),
        after,
    }
}

/// Last message seen from each Gitter sender in one room.
///
/// Entries live as long as the room; the number of distinct senders bounds it.
#[derive(Debug, Default)]
pub struct EditCache {
    last_by_sender: HashMap<String, RemoteMessage>,
}

impl EditCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `message` as the sender's latest and return the version it revises.
    ///
    /// Returns `None` for first versions and for edits whose predecessor was
    /// never seen; those are relayed as fresh messages.
    pub fn record(&mut self, sender_id: &str, message: &RemoteMessage) -> Option<RemoteMessage> {
        let previous = self
            .last_by_sender
            .insert(sender_id.to_string(), message.clone());
        if message.v > 1 {
            previous
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.last_by_sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_by_sender.is_empty()
    }
}
