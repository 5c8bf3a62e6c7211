use crate::suggestion::engine::Suggestion;
use crate::units::UnitId;

/// Selected units that came from the suggestion and are still selected.
///
/// Recomputed from the current selection every time rather than tracked
/// across toggles. Result follows selection order.
pub fn ai_marked(suggestion: &Suggestion, selection: &[UnitId]) -> Vec<UnitId> {
    selection
        .iter()
        .filter(|id| suggestion.suggested_unit_ids.contains(id))
        .cloned()
        .collect()
}

pub fn is_ai_marked(suggestion: &Suggestion, selection: &[UnitId], unit_id: &str) -> bool {
    suggestion.suggested_unit_ids.iter().any(|id| id == unit_id)
        && selection.iter().any(|id| id == unit_id)
}
