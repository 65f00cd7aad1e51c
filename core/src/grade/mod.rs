//! Grade passback: launch gate, line-item resolution and score submission.

pub mod gate;
pub mod resolver;
pub mod submitter;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

pub use gate::{extract_ltik, LaunchContextGate};
pub use resolver::{LineItemPolicy, LineItemResolver, ResourceLinkSource};
pub use submitter::ScoreSubmitter;

use crate::errors::GradeError;
use crate::lti::{score::validate_score, LaunchToken, ResolvedLineItem, SubmissionReceipt};
use crate::provider::GradeService;

#[derive(Debug, Clone)]
pub struct PassbackOutcome {
    pub line_item: ResolvedLineItem,
    pub receipt: SubmissionReceipt,
}

/// Resolver and submitter composed for one grade request.
#[derive(Clone)]
pub struct GradePassback {
    resolver: LineItemResolver,
    submitter: ScoreSubmitter,
}

impl GradePassback {
    pub fn new(grades: Arc<dyn GradeService>) -> Self {
        Self {
            resolver: LineItemResolver::new(grades.clone()),
            submitter: ScoreSubmitter::new(grades),
        }
    }

    /// The score is checked before resolution so a bad request never
    /// creates a line item.
    pub async fn pass_back(
        &self,
        token: &LaunchToken,
        policy: &LineItemPolicy,
        score_given: f64,
        score_maximum: f64,
    ) -> Result<PassbackOutcome, GradeError> {
        validate_score(score_given, score_maximum)?;

        let line_item = self.resolver.resolve(token, policy, score_maximum).await?;
        tracing::debug!(
            line_item = %line_item.id,
            origin = line_item.origin.as_str(),
            "line item resolved"
        );

        let receipt = self
            .submitter
            .submit(token, &line_item.id, score_given, score_maximum)
            .await?;
        Ok(PassbackOutcome { line_item, receipt })
    }
}
