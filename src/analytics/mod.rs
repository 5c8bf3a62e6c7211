use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::class_records::ClassRecord;
use crate::students::Student;
use crate::units::{Unit, UnitStatus};

/// Per-student progress card
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub needs_review: usize,
    pub total_units: usize,
    /// Percent, rounded
    pub completion_rate: u32,
    pub latest_date: Option<NaiveDate>,
    pub latest_understanding: Option<u8>,
}

fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 / total as f64 * 100.0).round() as u32
}

impl StudentSummary {
    pub fn compute(units: &[Unit], latest: Option<&ClassRecord>) -> Self {
        let count = |pred: fn(UnitStatus) -> bool| units.iter().filter(|u| pred(u.status)).count();
        let completed = count(|s| s == UnitStatus::Completed);

        StudentSummary {
            completed,
            in_progress: count(UnitStatus::is_in_progress),
            not_started: count(|s| s == UnitStatus::NotStarted),
            needs_review: count(|s| s == UnitStatus::NeedsReview),
            total_units: units.len(),
            completion_rate: completion_rate(completed, units.len()),
            latest_date: latest.map(|r| r.date),
            latest_understanding: latest.map(|r| r.understanding),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub student_id: String,
    pub name: String,
    pub completed: usize,
    pub total: usize,
}

/// Totals across every student
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_students: usize,
    pub total_units: usize,
    pub completed_units: usize,
    pub total_records: usize,
    pub progress: Vec<StudentProgress>,
}

impl DashboardSummary {
    pub fn compute(students: &[Student], units: &[Unit], records: &[ClassRecord]) -> Self {
        let progress = students
            .iter()
            .map(|student| {
                let owned: Vec<&Unit> = units.iter().filter(|u| u.student_id == student.id).collect();
                StudentProgress {
                    student_id: student.id.clone(),
                    name: student.name.clone(),
                    completed: owned.iter().filter(|u| u.is_completed()).count(),
                    total: owned.len(),
                }
            })
            .collect();

        DashboardSummary {
            total_students: students.len(),
            total_units: units.len(),
            completed_units: units.iter().filter(|u| u.is_completed()).count(),
            total_records: records.len(),
            progress,
        }
    }
}
