//! Typed moderation notes and their wire encoding.
//!
//! A note is stored and transported as `"[KIND] message"`. The moderation
//! dashboard categorizes and colors flags by that prefix, so the encoding
//! is a contract: `Display` and `parse` must round-trip every kind.

use serde::{Deserialize, Serialize};

/// Category of a moderation note.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoteKind {
    /// Repetitive-token spam heuristic tripped
    Spam,
    /// Combined content length over the classifier budget
    Length,
    /// External classifier flagged the content
    Ai,
    /// Profanity determination came back positive
    Profanity,
    /// A classifier call failed; manual review required (fail closed)
    Error,
    /// Free-form note, typically written by a human moderator
    Other,
}

impl NoteKind {
    /// The bracketed tag as it appears on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            NoteKind::Spam => "SPAM",
            NoteKind::Length => "LENGTH",
            NoteKind::Ai => "AI",
            NoteKind::Profanity => "PROFANITY",
            NoteKind::Error => "ERROR",
            NoteKind::Other => "OTHER",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "SPAM" => Some(NoteKind::Spam),
            "LENGTH" => Some(NoteKind::Length),
            "AI" => Some(NoteKind::Ai),
            "PROFANITY" => Some(NoteKind::Profanity),
            "ERROR" => Some(NoteKind::Error),
            "OTHER" => Some(NoteKind::Other),
            _ => None,
        }
    }
}

/// A typed moderation annotation: tagged variant internally, `"[KIND]
/// message"` at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationNote {
    pub kind: NoteKind,
    pub message: String,
}

impl ModerationNote {
    pub fn new(kind: NoteKind, message: impl Into<String>) -> Self {
        ModerationNote {
            kind,
            message: message.into(),
        }
    }

    /// Parse a stored note string back into its typed form.
    ///
    /// Strings without a recognized `[KIND]` prefix (e.g. free-form human
    /// notes) come back as `Other` with the whole string as the message.
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix('[') {
            if let Some((tag, message)) = rest.split_once(']') {
                if let Some(kind) = NoteKind::from_tag(tag) {
                    return ModerationNote {
                        kind,
                        message: message.trim_start().to_string(),
                    };
                }
            }
        }
        ModerationNote {
            kind: NoteKind::Other,
            message: raw.to_string(),
        }
    }
}

impl std::fmt::Display for ModerationNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.tag(), self.message)
    }
}
