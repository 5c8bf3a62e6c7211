use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::units::UnitId;

/// Log entry for one lesson
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassRecord {
    pub id: String,
    pub student_id: String,
    pub date: NaiveDate,
    /// Units covered in the lesson
    #[serde(default)]
    pub unit_ids: Vec<UnitId>,
    /// 1-5
    pub understanding: u8,
    #[serde(default)]
    pub student_mood: String,
    #[serde(default)]
    pub homework_assigned: String,
    /// Usually a unit id chosen from the suggestion, but free text when typed by hand
    #[serde(default)]
    pub next_class_plan: String,
}

impl ClassRecord {
    /// The planned next unit, if the plan field is set
    pub fn planned_unit_id(&self) -> Option<&str> {
        let plan = self.next_class_plan.trim();
        if plan.is_empty() {
            None
        } else {
            Some(plan)
        }
    }
}

pub fn understanding_label(level: u8) -> Option<&'static str> {
    match level {
        1 => Some("理解不足"),
        2 => Some("やや不安"),
        3 => Some("普通"),
        4 => Some("概ね理解"),
        5 => Some("完全理解"),
        _ => None,
    }
}
