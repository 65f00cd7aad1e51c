use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::GradeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityProgress {
    Initialized,
    Started,
    InProgress,
    Submitted,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradingProgress {
    FullyGraded,
    Pending,
    PendingManual,
    Failed,
    NotReady,
}

/// AGS score record. Built per submission and never stored locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub user_id: String,
    pub score_given: f64,
    pub score_maximum: f64,
    pub activity_progress: ActivityProgress,
    pub grading_progress: GradingProgress,
    pub timestamp: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Score {
    /// Final score for a finished activity.
    pub fn completed(user_id: &str, score_given: f64, score_maximum: f64) -> Result<Self, GradeError> {
        validate_score(score_given, score_maximum)?;
        Ok(Self {
            user_id: user_id.to_string(),
            score_given,
            score_maximum,
            activity_progress: ActivityProgress::Completed,
            grading_progress: GradingProgress::FullyGraded,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            comment: None,
        })
    }
}

pub fn validate_score(score_given: f64, score_maximum: f64) -> Result<(), GradeError> {
    if !score_maximum.is_finite() || score_maximum <= 0.0 {
        return Err(GradeError::InvalidScore(format!(
            "scoreMaximum must be a positive number, got {score_maximum}"
        )));
    }
    if !score_given.is_finite() || score_given < 0.0 {
        return Err(GradeError::InvalidScore(format!(
            "scoreGiven must be a non-negative number, got {score_given}"
        )));
    }
    if score_given > score_maximum {
        return Err(GradeError::InvalidScore(format!(
            "scoreGiven {score_given} exceeds scoreMaximum {score_maximum}"
        )));
    }
    Ok(())
}

/// Raw response of the grade service to a score submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionReceipt {
    pub body: serde_json::Value,
}
