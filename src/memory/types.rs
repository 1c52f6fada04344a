use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flat string-to-string metadata carried by records and index entries.
pub type Metadata = BTreeMap<String, String>;

/// Who or what produced a memory. Serialized as its plain tag string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemoryKind {
    User,
    Assistant,
    Interaction,
    /// Caller-supplied tag.
    Other(String),
}

impl MemoryKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Interaction => "interaction",
            Self::Other(tag) => tag,
        }
    }
}

impl Default for MemoryKind {
    fn default() -> Self {
        Self::Interaction
    }
}

impl fmt::Display for MemoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MemoryKind {
    fn from(s: &str) -> Self {
        match s {
            "user" => Self::User,
            "assistant" => Self::Assistant,
            "interaction" => Self::Interaction,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for MemoryKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<MemoryKind> for String {
    fn from(kind: MemoryKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A single remembered utterance. Write-once: there is no update or delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub text: String,
    pub kind: MemoryKind,
    pub emotional_context: String,
    pub created_at: DateTime<Utc>,
    pub metadata: Metadata,
}

impl MemoryRecord {
    /// Metadata stored alongside the embedding: kind, emotional context and
    /// creation time, with caller metadata merged over them.
    pub fn index_metadata(&self) -> Metadata {
        let mut data = Metadata::new();
        data.insert("kind".into(), self.kind.to_string());
        data.insert("emotional_context".into(), self.emotional_context.clone());
        data.insert("created_at".into(), self.created_at.to_rfc3339());
        data.extend(
            self.metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        data
    }
}

/// What gets submitted to `MemoryManager::remember`.
#[derive(Debug, Clone)]
pub struct RememberRequest {
    pub text: String,
    pub kind: MemoryKind,
    pub emotional_context: String,
    pub metadata: Metadata,
}

impl RememberRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MemoryKind::Interaction,
            emotional_context: "neutral".into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<MemoryKind>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_emotion(mut self, emotional_context: impl Into<String>) -> Self {
        self.emotional_context = emotional_context.into();
        self
    }

    /// Attach a metadata value. Values are stringified on the way in.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }
}

/// One ranked hit from a `VectorIndex` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub key: String,
    pub score: f64,
    pub metadata: Metadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        assert_eq!(MemoryKind::from("user"), MemoryKind::User);
        assert_eq!(MemoryKind::from("note"), MemoryKind::Other("note".into()));
        assert_eq!(MemoryKind::Other("note".into()).to_string(), "note");

        let json = serde_json::to_string(&MemoryKind::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn request_stringifies_metadata() {
        let req = RememberRequest::new("hi")
            .with_metadata("turn", 3)
            .with_metadata("pinned", true);
        assert_eq!(req.metadata["turn"], "3");
        assert_eq!(req.metadata["pinned"], "true");
        assert_eq!(req.kind, MemoryKind::Interaction);
        assert_eq!(req.emotional_context, "neutral");
    }

    #[test]
    fn caller_metadata_overrides_projected_fields() {
        let record = MemoryRecord {
            id: "abc".into(),
            text: "hello".into(),
            kind: MemoryKind::User,
            emotional_context: "positive".into(),
            created_at: Utc::now(),
            metadata: Metadata::from([("kind".to_string(), "custom".to_string())]),
        };
        let projected = record.index_metadata();
        assert_eq!(projected["kind"], "custom");
        assert_eq!(projected["emotional_context"], "positive");
        assert!(projected.contains_key("created_at"));
    }
}
