//! Blending the model's confidence with the completeness review

use crate::config::ScoringConfig;
use crate::types::{MissingInfoItem, MissingInfoKind};

use super::answer::AnswerDraft;
use super::completeness::CompletenessReport;

const ASPECT_PRIORITY: i64 = 3;

/// Weighted confidence, clamped into [0, 1]
pub fn blend_confidence(original: f32, completeness: f32, weights: &ScoringConfig) -> f32 {
    (original * weights.answer_weight + completeness * weights.completeness_weight).clamp(0.0, 1.0)
}

/// Fold a completeness report into a draft
///
/// Each missing aspect becomes a `context` gap, appended in report order.
pub fn merge_completeness(draft: &mut AnswerDraft, report: &CompletenessReport, weights: &ScoringConfig) {
    draft.confidence = blend_confidence(draft.confidence, report.completeness_score, weights);

    draft.missing_info.extend(report.missing_aspects.iter().map(|aspect| {
        MissingInfoItem::new(
            MissingInfoKind::Context,
            aspect.as_str(),
            format!("Find additional documents that cover: {}", aspect),
            ASPECT_PRIORITY,
        )
    }));
}
