use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Stable handle for a question held in the catalog.
///
/// Questions loaded from the backend carry their server id; fallback data has
/// no id, so a synthetic key is assigned while the catalog is built. Keys are
/// what the view state and id-based mutations address, never question text.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum QuestionKey {
    Remote(i64),
    Local(u32),
}

impl QuestionKey {
    /// Server id, when the question has been persisted remotely.
    pub fn remote_id(self) -> Option<i64> {
        match self {
            QuestionKey::Remote(id) => Some(id),
            QuestionKey::Local(_) => None,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        if let Some(rest) = value.strip_prefix("local-") {
            return rest.parse().ok().map(QuestionKey::Local);
        }
        value.parse().ok().map(QuestionKey::Remote)
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKey::Remote(id) => write!(f, "{id}"),
            QuestionKey::Local(n) => write!(f, "local-{n}"),
        }
    }
}

impl FromStr for QuestionKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        QuestionKey::parse(value.trim()).ok_or_else(|| format!("invalid question key '{value}'"))
    }
}

impl Serialize for QuestionKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for QuestionKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        QuestionKey::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid question key '{value}'")))
    }
}

/// Hands out synthetic keys in load order.
#[derive(Debug, Default)]
pub(crate) struct LocalKeys {
    next: u32,
}

impl LocalKeys {
    /// Reuse the server id when present, otherwise mint the next local key.
    pub(crate) fn key_for(&mut self, id: Option<i64>) -> QuestionKey {
        match id {
            Some(id) => QuestionKey::Remote(id),
            None => {
                let key = QuestionKey::Local(self.next);
                self.next += 1;
                key
            }
        }
    }
}
