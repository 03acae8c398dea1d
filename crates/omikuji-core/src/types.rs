use std::fmt;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OmikujiError;

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';
const STAR_SLOTS: u8 = 5;

/// Current instant as an ISO-8601 string (`2026-01-01T09:00:00.000Z`).
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Fortune
// ---------------------------------------------------------------------------

/// The six omikuji outcomes, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fortune {
    #[serde(rename = "大吉")]
    Daikichi,
    #[serde(rename = "中吉")]
    Chukichi,
    #[serde(rename = "小吉")]
    Shokichi,
    #[serde(rename = "吉")]
    Kichi,
    #[serde(rename = "末吉")]
    Suekichi,
    #[serde(rename = "凶")]
    Kyo,
}

impl Fortune {
    pub const ALL: [Fortune; 6] = [
        Fortune::Daikichi,
        Fortune::Chukichi,
        Fortune::Shokichi,
        Fortune::Kichi,
        Fortune::Suekichi,
        Fortune::Kyo,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Fortune::Daikichi => "大吉",
            Fortune::Chukichi => "中吉",
            Fortune::Shokichi => "小吉",
            Fortune::Kichi => "吉",
            Fortune::Suekichi => "末吉",
            Fortune::Kyo => "凶",
        }
    }

    /// Fixed 1–5 score behind the star rating.
    pub fn score(self) -> u8 {
        match self {
            Fortune::Daikichi => 5,
            Fortune::Chukichi => 4,
            Fortune::Shokichi | Fortune::Kichi => 3,
            Fortune::Suekichi => 2,
            Fortune::Kyo => 1,
        }
    }

    pub fn star_rating(self) -> String {
        star_rating(self.score())
    }
}

impl fmt::Display for Fortune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Fortune {
    type Err = OmikujiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Fortune::ALL
            .into_iter()
            .find(|f| f.label() == s)
            .ok_or_else(|| OmikujiError::UnknownFortune(s.to_string()))
    }
}

/// `score` filled stars followed by empty ones; always five glyphs.
/// Scores above five are clamped.
pub fn star_rating(score: u8) -> String {
    let filled = score.min(STAR_SLOTS);
    let mut out = String::with_capacity(STAR_SLOTS as usize * FILLED_STAR.len_utf8());
    out.extend(std::iter::repeat(FILLED_STAR).take(filled as usize));
    out.extend(std::iter::repeat(EMPTY_STAR).take((STAR_SLOTS - filled) as usize));
    out
}

// ---------------------------------------------------------------------------
// FortuneRecord
// ---------------------------------------------------------------------------

/// One drawn fortune. `star_rating` is always derived from `fortune`, so the
/// record can only be built through [`FortuneRecord::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneRecord {
    pub fortune: Fortune,
    star_rating: String,
    pub lucky_color: String,
    pub lucky_item: String,
    pub lucky_spot: String,
    pub timestamp: String,
}

impl FortuneRecord {
    pub fn new(
        fortune: Fortune,
        lucky_color: impl Into<String>,
        lucky_item: impl Into<String>,
        lucky_spot: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            fortune,
            star_rating: fortune.star_rating(),
            lucky_color: lucky_color.into(),
            lucky_item: lucky_item.into(),
            lucky_spot: lucky_spot.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn star_rating(&self) -> &str {
        &self.star_rating
    }
}

// ---------------------------------------------------------------------------
// FortuneContext
// ---------------------------------------------------------------------------

/// Caller-supplied summary of an earlier draw, used to ground chat prompts.
/// Lenient: every field is optional and accepts either spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FortuneContext {
    pub fortune: String,
    #[serde(alias = "lucky_color")]
    pub lucky_color: String,
    #[serde(alias = "lucky_item")]
    pub lucky_item: String,
    #[serde(alias = "lucky_spot")]
    pub lucky_spot: String,
}

impl From<&FortuneRecord> for FortuneContext {
    fn from(record: &FortuneRecord) -> Self {
        Self {
            fortune: record.fortune.label().to_string(),
            lucky_color: record.lucky_color.clone(),
            lucky_item: record.lucky_item.clone(),
            lucky_spot: record.lucky_spot.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatTurn
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation. Held by the caller, never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self::at(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::at(Role::Assistant, content)
    }

    fn at(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: now_timestamp(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Opaque token threading a draw and its follow-up chats through the
/// agent's memory. Any non-empty string is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// `<prefix>-<token>`; never empty because of the separator.
    pub fn with_prefix(prefix: &str, token: impl fmt::Display) -> Self {
        Self(format!("{prefix}-{token}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
