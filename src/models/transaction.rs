use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A spend recorded against a budget, counted into whichever cycle window
/// its timestamp falls in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub budget_id: String,
    pub amount: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreateInput {
    pub budget_id: String,
    pub amount: f64,
    pub description: Option<String>,
    pub created_at: Option<String>,
}
