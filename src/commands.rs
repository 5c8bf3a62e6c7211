use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use crate::analytics::{DashboardSummary, StudentSummary};
use crate::class_records::ClassRecord;
use crate::db::generate_id;
use crate::error::TutorError;
use crate::lessons::LessonDraft;
use crate::state::app::AppState;
use crate::students::{Goal, Student};
use crate::suggestion::engine::Suggestion;
use crate::units::{Unit, UnitStatus};
use crate::validators::{self, StudentForm, ValidationErrors};

/// Draft pre-filled for the lesson form, plus the suggestion behind it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedLesson {
    pub draft: LessonDraft,
    pub suggestion: Suggestion,
}

/// One page of a student's lesson history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHistory {
    pub records: Vec<ClassRecord>,
    /// Records left out of this page
    pub hidden: usize,
}

async fn require_student(state: &AppState, student_id: &str) -> Result<Student, TutorError> {
    state
        .db
        .get_student(student_id)
        .await?
        .ok_or_else(|| TutorError::not_found("student", student_id))
}

async fn require_unit(state: &AppState, unit_id: &str) -> Result<Unit, TutorError> {
    state
        .db
        .get_unit(unit_id)
        .await?
        .ok_or_else(|| TutorError::not_found("unit", unit_id))
}

/// Publish a fresh suggestion after a write. Failures are logged, not returned,
/// since the write itself already succeeded.
async fn refresh_feed(state: &AppState, student_id: &str) {
    if let Err(e) = state.feed.refresh(student_id).await {
        tracing::warn!(student_id = %student_id, error = %e, "Failed to refresh suggestion feed");
    }
}

pub async fn register_student(state: &AppState, form: StudentForm) -> Result<Student, TutorError> {
    validators::validate_student_form(&form)?;
    let student = Student {
        id: generate_id(),
        student_id: form.student_id.trim().to_string(),
        name: form.name.trim().to_string(),
        grade: form.grade,
        school_type: form.school_type,
        goals: form.goals,
        subjects: form.subjects,
    };
    state.db.put_student(&student).await?;
    tracing::info!(student_id = %student.id, display_id = %student.student_id, "Student registered");
    Ok(student)
}

pub async fn update_goals(state: &AppState, student_id: &str, goals: Vec<Goal>) -> Result<Student, TutorError> {
    let mut errors = ValidationErrors::default();
    validators::validate_goals(&goals, &mut errors);
    errors.into_result()?;

    let mut student = require_student(state, student_id).await?;
    student.goals = goals;
    state.db.put_student(&student).await?;
    Ok(student)
}

pub async fn list_students(state: &AppState) -> Result<Vec<Student>, TutorError> {
    state.db.list_students().await
}

/// Append a unit to the end of the student's curriculum.
/// The new order is one past the highest in use, so it stays unique after deletes.
pub async fn add_unit(state: &AppState, student_id: &str, subject: &str, name: &str) -> Result<Unit, TutorError> {
    require_student(state, student_id).await?;
    let existing = state.db.units_for_student(student_id).await?;
    let order = existing.iter().map(|u| u.order).max().unwrap_or(0) + 1;
    let unit = Unit::new(
        generate_id(),
        student_id.to_string(),
        subject.to_string(),
        name.to_string(),
        order,
    );
    state.db.put_unit(&unit).await?;
    tracing::info!(student_id = %student_id, unit_id = %unit.id, order = unit.order, "Unit added");
    refresh_feed(state, student_id).await;
    Ok(unit)
}

pub async fn update_unit_status(state: &AppState, unit_id: &str, status: UnitStatus) -> Result<Unit, TutorError> {
    let mut unit = require_unit(state, unit_id).await?;
    unit.apply_status(status, Utc::now());
    state.db.put_unit(&unit).await?;
    refresh_feed(state, &unit.student_id).await;
    Ok(unit)
}

pub async fn delete_unit(state: &AppState, unit_id: &str) -> Result<(), TutorError> {
    let unit = require_unit(state, unit_id).await?;
    state.db.delete_unit(unit_id).await?;
    tracing::info!(unit_id = %unit_id, "Unit deleted");
    refresh_feed(state, &unit.student_id).await;
    Ok(())
}

pub async fn list_units(state: &AppState, student_id: &str) -> Result<Vec<Unit>, TutorError> {
    state.db.units_for_student(student_id).await
}

pub async fn get_suggestion(state: &AppState, student_id: &str) -> Result<Suggestion, TutorError> {
    let units = state.db.units_for_student(student_id).await?;
    let records = state.db.class_records_for_student(student_id).await?;
    Ok(state.cache.suggest(&units, &records))
}

pub async fn prepare_lesson_draft(
    state: &AppState,
    student_id: &str,
    today: NaiveDate,
) -> Result<PreparedLesson, TutorError> {
    let units = state.db.units_for_student(student_id).await?;
    let records = state.db.class_records_for_student(student_id).await?;
    let suggestion = state.cache.suggest(&units, &records);
    let draft = LessonDraft::prefill(today, &suggestion, &units);
    Ok(PreparedLesson { draft, suggestion })
}

/// Persist a lesson and apply its unit status updates
pub async fn save_class_record(
    state: &AppState,
    student_id: &str,
    draft: &LessonDraft,
) -> Result<ClassRecord, TutorError> {
    draft.validate()?;
    require_student(state, student_id).await?;

    let record = draft.to_record(generate_id(), student_id);
    state.db.put_class_record(&record).await?;

    let now = Utc::now();
    let selected = draft
        .unit_status_updates
        .iter()
        .filter(|u| draft.unit_ids.contains(&u.unit_id));
    for update in selected {
        match state.db.get_unit(&update.unit_id).await? {
            Some(mut unit) => {
                unit.apply_status(update.new_status, now);
                state.db.put_unit(&unit).await?;
            }
            None => {
                tracing::warn!(unit_id = %update.unit_id, "Status update for missing unit skipped");
            }
        }
    }

    state.metrics.record_saved();
    tracing::info!(
        student_id = %student_id,
        record_id = %record.id,
        units = record.unit_ids.len(),
        "Class record saved"
    );
    refresh_feed(state, student_id).await;
    Ok(record)
}

/// Newest first; truncated to the configured page size unless `show_all`
pub async fn class_record_history(
    state: &AppState,
    student_id: &str,
    show_all: bool,
) -> Result<RecordHistory, TutorError> {
    let mut records = state.db.class_records_for_student(student_id).await?;
    let page = state.config.record_page_size;
    let hidden = if show_all { 0 } else { records.len().saturating_sub(page) };
    if !show_all {
        records.truncate(page);
    }
    Ok(RecordHistory { records, hidden })
}

pub async fn student_summary(state: &AppState, student_id: &str) -> Result<StudentSummary, TutorError> {
    let units = state.db.units_for_student(student_id).await?;
    let latest = state.db.latest_class_record(student_id).await?;
    Ok(StudentSummary::compute(&units, latest.as_ref()))
}

pub async fn dashboard(state: &AppState) -> Result<DashboardSummary, TutorError> {
    let students = state.db.list_students().await?;
    let units = state.db.all_units().await?;
    let records = state.db.all_class_records().await?;
    Ok(DashboardSummary::compute(&students, &units, &records))
}
