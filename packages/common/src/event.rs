use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Core event trait
pub trait Event: Send + Sync + Sized + Serialize + DeserializeOwned {
    /// Get the event topic (e.g., "contest.published")
    fn topic(&self) -> &str;

    /// Convert event to a generic event
    fn to_generic_event(&self) -> GenericEvent {
        GenericEvent {
            topic: self.topic().to_string(),
            payload: serde_json::to_value(self).unwrap_or_default(),
        }
    }

    /// Create an event from a generic event
    fn from_generic_event(e: &GenericEvent) -> Result<Self, anyhow::Error> {
        let payload: Self = serde_json::from_value(e.payload.clone())?;
        Ok(payload)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericEvent {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Outward-facing contest happenings that warrant a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContestEvent {
    /// The contest left DRAFT.
    Published { contest_id: i32, title: String },
    /// Round 2 was created; these competitors advance.
    QualifiersAnnounced {
        contest_id: i32,
        round_id: i32,
        competitor_ids: Vec<i32>,
    },
}

impl ContestEvent {
    pub const PUBLISHED: &'static str = "contest.published";
    pub const QUALIFIERS_ANNOUNCED: &'static str = "contest.qualifiers_announced";
}

impl Event for ContestEvent {
    fn topic(&self) -> &str {
        match self {
            Self::Published { .. } => Self::PUBLISHED,
            Self::QualifiersAnnounced { .. } => Self::QUALIFIERS_ANNOUNCED,
        }
    }
}
