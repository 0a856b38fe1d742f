use crate::config::PUSH_EPSILON;
use crate::types::{EnrichedRecord, OutcomeStatus, Side};

/// Classify one enriched record. First matching rule wins; anything not
/// explicitly decided is Pending, never a guessed Win/Loss.
pub fn classify(rec: &EnrichedRecord) -> OutcomeStatus {
    let (Some(prediction), Some(line)) = (rec.model_prediction, rec.line) else {
        return OutcomeStatus::Pending;
    };

    if !rec.completed {
        return classify_in_progress(prediction, line, rec.actual_total, rec.early_label);
    }

    let Some(actual) = rec.actual_total else {
        return OutcomeStatus::Pending;
    };
    if is_push(actual, line) {
        return OutcomeStatus::Push;
    }

    let correct = match prediction {
        Side::Over => actual > line,
        Side::Under => actual < line,
    };
    if correct {
        OutcomeStatus::Win
    } else {
        OutcomeStatus::Loss
    }
}

/// An early label only locks the outcome once a live total exists to back it.
fn classify_in_progress(
    prediction: Side,
    line: f64,
    actual_total: Option<f64>,
    early_label: Option<Side>,
) -> OutcomeStatus {
    let Some(actual) = actual_total else {
        return OutcomeStatus::Pending;
    };
    if is_push(actual, line) {
        return OutcomeStatus::Push;
    }
    match early_label {
        Some(label) if label == prediction => OutcomeStatus::Win,
        Some(_) => OutcomeStatus::Loss,
        None => OutcomeStatus::Pending,
    }
}

#[inline]
fn is_push(actual: f64, line: f64) -> bool {
    (actual - line).abs() < PUSH_EPSILON
}
