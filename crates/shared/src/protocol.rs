use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::InterviewId;

/// One interview as the analysis service reports it. The service owns these
/// records; clients hold a snapshot replaced wholesale on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: InterviewId,
    pub title: String,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of the typed-transcript creation call, for transcripts entered
/// directly instead of uploaded as files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewDraft {
    pub title: String,
    pub transcript: String,
}
