use serde::{Deserialize, Serialize};
use crate::class_records::ClassRecord;
use crate::units::{Unit, UnitId, UnitStatus};

/// How much direct evidence backs a suggestion; ordered Low < Medium < High
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Units likely covered in the lesson being recorded, in curriculum order
    pub suggested_unit_ids: Vec<UnitId>,
    /// Unit to plan for the lesson after that
    pub suggested_next_unit_id: Option<UnitId>,
    pub confidence: Confidence,
}

impl Suggestion {
    pub fn empty() -> Self {
        Suggestion {
            suggested_unit_ids: Vec::new(),
            suggested_next_unit_id: None,
            confidence: Confidence::Low,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.suggested_unit_ids.is_empty() && self.suggested_next_unit_id.is_none()
    }
}

/// Recommend the units covered in the upcoming lesson and the one to plan next.
///
/// Tiers, first match wins:
/// 1. high: the latest record's plan names an existing, unfinished unit
/// 2. medium: some units are Practicing
/// 3. low: the earliest NotStarted unit
///
/// Equal `order` values keep their input order; equal record dates resolve to
/// the first such record in the input.
pub fn suggest(units: &[Unit], records: &[ClassRecord]) -> Suggestion {
    let sorted = sorted_by_order(units);
    let practicing: Vec<&Unit> = sorted
        .iter()
        .copied()
        .filter(|u| u.status == UnitStatus::Practicing)
        .collect();

    if let Some(planned) = latest_record(records).and_then(|r| planned_unit(&sorted, r)) {
        let suggested_unit_ids = if practicing.is_empty() {
            vec![planned.id.clone()]
        } else {
            ids(&practicing)
        };
        tracing::debug!(unit_id = %planned.id, "Suggestion from previous lesson plan");
        return Suggestion {
            suggested_unit_ids,
            suggested_next_unit_id: next_unfinished_after(&sorted, planned.order),
            confidence: Confidence::High,
        };
    }

    // `sorted` is ascending and stable, so the last Practicing unit has the greatest order
    if let Some(last_practicing) = practicing.last() {
        tracing::debug!(practicing = practicing.len(), "Suggestion from units in practice");
        return Suggestion {
            suggested_unit_ids: ids(&practicing),
            suggested_next_unit_id: next_unfinished_after(&sorted, last_practicing.order),
            confidence: Confidence::Medium,
        };
    }

    match sorted.iter().find(|u| u.status == UnitStatus::NotStarted) {
        Some(first) => {
            tracing::debug!(unit_id = %first.id, "Suggestion from first untouched unit");
            Suggestion {
                suggested_unit_ids: vec![first.id.clone()],
                suggested_next_unit_id: next_unfinished_after(&sorted, first.order),
                confidence: Confidence::Low,
            }
        }
        None => Suggestion::empty(),
    }
}

fn sorted_by_order(units: &[Unit]) -> Vec<&Unit> {
    let mut sorted: Vec<&Unit> = units.iter().collect();
    sorted.sort_by_key(|u| u.order);
    sorted
}

/// Most recent record; the earliest input position wins on equal dates
fn latest_record(records: &[ClassRecord]) -> Option<&ClassRecord> {
    records
        .iter()
        .fold(None, |best: Option<&ClassRecord>, r| match best {
            Some(b) if b.date >= r.date => Some(b),
            _ => Some(r),
        })
}

fn planned_unit<'a>(sorted: &[&'a Unit], record: &ClassRecord) -> Option<&'a Unit> {
    let plan = record.planned_unit_id()?;
    sorted
        .iter()
        .copied()
        .find(|u| u.id == plan)
        .filter(|u| !u.is_completed())
}

fn next_unfinished_after(sorted: &[&Unit], order: i64) -> Option<UnitId> {
    sorted
        .iter()
        .find(|u| u.order > order && !u.is_completed())
        .map(|u| u.id.clone())
}

fn ids(units: &[&Unit]) -> Vec<UnitId> {
    units.iter().map(|u| u.id.clone()).collect()
}
