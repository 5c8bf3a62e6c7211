use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::class_records::ClassRecord;
use crate::suggestion::engine::Suggestion;
use crate::suggestion::progression::next_status;
use crate::suggestion::selection;
use crate::units::{Unit, UnitId, UnitStatus};
use crate::validators::{ValidationError, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub unit_id: UnitId,
    pub new_status: UnitStatus,
}

/// Lesson record being filled in before it is saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub date: NaiveDate,
    pub unit_ids: Vec<UnitId>,
    pub unit_status_updates: Vec<StatusUpdate>,
    /// 0 until the tutor picks a level
    pub understanding: u8,
    pub student_mood: String,
    pub homework_assigned: String,
    pub next_class_plan: String,
}

fn status_for(units: &[Unit], unit_id: &str) -> Option<UnitStatus> {
    units.iter().find(|u| u.id == unit_id).map(|u| next_status(u.status))
}

impl LessonDraft {
    pub fn new(date: NaiveDate) -> Self {
        LessonDraft {
            date,
            unit_ids: Vec::new(),
            unit_status_updates: Vec::new(),
            understanding: 0,
            student_mood: String::new(),
            homework_assigned: String::new(),
            next_class_plan: String::new(),
        }
    }

    /// Draft pre-filled from a suggestion.
    ///
    /// Suggested units are selected with their status advanced one step;
    /// ids no longer in the curriculum get no status update.
    pub fn prefill(date: NaiveDate, suggestion: &Suggestion, units: &[Unit]) -> Self {
        let mut draft = LessonDraft::new(date);
        draft.unit_ids = suggestion.suggested_unit_ids.clone();
        draft.unit_status_updates = suggestion
            .suggested_unit_ids
            .iter()
            .filter_map(|id| {
                status_for(units, id).map(|new_status| StatusUpdate {
                    unit_id: id.clone(),
                    new_status,
                })
            })
            .collect();
        if let Some(next) = &suggestion.suggested_next_unit_id {
            draft.next_class_plan = next.clone();
        }
        draft
    }

    /// Unticking a unit also drops its status update
    pub fn toggle_unit(&mut self, unit_id: &str, checked: bool) {
        let selected = self.unit_ids.iter().any(|id| id == unit_id);
        if checked && !selected {
            self.unit_ids.push(unit_id.to_string());
        } else if !checked {
            self.unit_ids.retain(|id| id != unit_id);
            self.unit_status_updates.retain(|u| u.unit_id != unit_id);
        }
    }

    /// Override the pre-filled status of a selected unit
    pub fn set_status(&mut self, unit_id: &str, status: UnitStatus) {
        if let Some(update) = self.unit_status_updates.iter_mut().find(|u| u.unit_id == unit_id) {
            update.new_status = status;
        }
    }

    /// Rebuild status updates to match the selection, keeping existing choices
    pub fn sync_status_updates(&mut self, units: &[Unit]) {
        let updates = self
            .unit_ids
            .iter()
            .map(|id| {
                self.unit_status_updates
                    .iter()
                    .find(|u| &u.unit_id == id)
                    .cloned()
                    .unwrap_or_else(|| StatusUpdate {
                        unit_id: id.clone(),
                        new_status: status_for(units, id).unwrap_or(UnitStatus::NotStarted),
                    })
            })
            .collect();
        self.unit_status_updates = updates;
    }

    /// Selected units that still carry the suggestion marker
    pub fn ai_marked(&self, suggestion: &Suggestion) -> Vec<UnitId> {
        selection::ai_marked(suggestion, &self.unit_ids)
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.unit_ids.is_empty() {
            errors.push(ValidationError::NoUnitsSelected);
        }
        if !(1..=5).contains(&self.understanding) {
            errors.push(ValidationError::UnderstandingOutOfRange);
        }
        for id in &self.unit_ids {
            if !self.unit_status_updates.iter().any(|u| &u.unit_id == id) {
                errors.push(ValidationError::MissingStatusUpdate { unit_id: id.clone() });
            }
        }
        for update in &self.unit_status_updates {
            if !self.unit_ids.contains(&update.unit_id) {
                errors.push(ValidationError::UnselectedStatusUpdate { unit_id: update.unit_id.clone() });
            }
        }
        errors.into_result()
    }

    pub fn to_record(&self, id: String, student_id: &str) -> ClassRecord {
        ClassRecord {
            id,
            student_id: student_id.to_string(),
            date: self.date,
            unit_ids: self.unit_ids.clone(),
            understanding: self.understanding,
            student_mood: self.student_mood.clone(),
            homework_assigned: self.homework_assigned.clone(),
            next_class_plan: self.next_class_plan.clone(),
        }
    }
}
