use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Conversation identifier as issued by the remote service (C…, D…, G…)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ChatId(pub String);

impl ChatId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChatId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChatId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Message identifier. The remote service identifies messages by their
/// timestamp, `"<unix-seconds>.<sequence>"`, which is unique per channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wall-clock time encoded in the id, to the second.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = self.0.split('.').next()?.parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_timestamp() {
        let id = MessageId::from("1512085950.000216");
        let ts = id.timestamp().unwrap();
        assert_eq!(ts.timestamp(), 1_512_085_950);
    }

    #[test]
    fn test_message_id_timestamp_garbage() {
        assert!(MessageId::from("not-a-ts").timestamp().is_none());
        assert!(MessageId::from("").timestamp().is_none());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ChatId::from("C1")).unwrap();
        assert_eq!(json, "\"C1\"");
        let user: UserId = serde_json::from_str("\"U9\"").unwrap();
        assert_eq!(user, UserId::from("U9"));
    }
}
