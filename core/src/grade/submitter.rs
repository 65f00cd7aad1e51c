use std::sync::Arc;

use tracing::info;

use crate::errors::GradeError;
use crate::lti::{LaunchToken, Score, SubmissionReceipt};
use crate::provider::GradeService;

/// Posts a completed, fully graded score for the launching user.
/// Failures are surfaced as-is; retrying is up to the caller.
#[derive(Clone)]
pub struct ScoreSubmitter {
    grades: Arc<dyn GradeService>,
}

impl ScoreSubmitter {
    pub fn new(grades: Arc<dyn GradeService>) -> Self {
        Self { grades }
    }

    pub async fn submit(
        &self,
        token: &LaunchToken,
        line_item_id: &str,
        score_given: f64,
        score_maximum: f64,
    ) -> Result<SubmissionReceipt, GradeError> {
        let score = Score::completed(&token.user, score_given, score_maximum)?;
        self.submit_score(token, line_item_id, &score).await
    }

    pub async fn submit_score(
        &self,
        token: &LaunchToken,
        line_item_id: &str,
        score: &Score,
    ) -> Result<SubmissionReceipt, GradeError> {
        let receipt = self
            .grades
            .submit_score(token, line_item_id, score)
            .await
            .map_err(GradeError::upstream_submission)?;

        info!(
            user = %score.user_id,
            line_item = line_item_id,
            score_given = score.score_given,
            score_maximum = score.score_maximum,
            "score submitted"
        );
        Ok(receipt)
    }
}
