//! Lifecycle stage derivation

use crate::domain::Stage;

/// Derive the stage from a release's tags
///
/// `award` beats `tender` beats `planning`; otherwise the first tag is kept
/// as-is, or [`Stage::Unknown`] when there are none.
pub fn derive_stage(tags: &[String]) -> Stage {
    let has = |wanted: &str| tags.iter().any(|tag| tag == wanted);

    if has("award") {
        Stage::Award
    } else if has("tender") {
        Stage::Tender
    } else if has("planning") {
        Stage::Planning
    } else {
        match tags.first() {
            Some(first) => Stage::Other(first.clone()),
            None => Stage::Unknown,
        }
    }
}
