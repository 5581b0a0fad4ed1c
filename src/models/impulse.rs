use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the logged urge would have helped or hurt the goal it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpulseKind {
    Positive,
    Negative,
}

impl ImpulseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpulseKind::Positive => "positive",
            ImpulseKind::Negative => "negative",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "positive" => Ok(ImpulseKind::Positive),
            "negative" => Ok(ImpulseKind::Negative),
            _ => Err(format!("Invalid impulse kind: {}", s)),
        }
    }
}

/// A single logged impulse. Immutable from the scoring engine's point of
/// view: classification is always derived from `kind` and `acted_on`,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impulse {
    pub id: String,
    pub goal_id: String,
    pub description: String,
    pub kind: ImpulseKind,
    pub acted_on: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for logging a new impulse. `created_at` is normally omitted and
/// defaults to the current moment; callers backfilling history may supply
/// an explicit RFC 3339 timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpulseCreateInput {
    pub goal_id: String,
    pub description: String,
    pub kind: ImpulseKind,
    pub acted_on: bool,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpulseUpdateInput {
    pub description: Option<String>,
    pub kind: Option<ImpulseKind>,
    pub acted_on: Option<bool>,
    pub notes: Option<Option<String>>,
}
