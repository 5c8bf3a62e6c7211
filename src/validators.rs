use std::fmt;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::students::{Goal, SchoolType};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("生徒IDを入力してください")]
    MissingStudentId,
    #[error("氏名を入力してください")]
    MissingName,
    #[error("学年を選択してください")]
    MissingGrade,
    #[error("科目を1つ以上選択してください")]
    NoSubjects,
    #[error("目標を1つ以上設定してください")]
    NoGoals,
    #[error("目標の説明を入力してください (goal {index})")]
    MissingGoalDescription { index: usize },
    #[error("目標点数は0から100の範囲で入力してください (goal {index})")]
    TargetScoreOutOfRange { index: usize },
    #[error("授業日の形式が正しくありません: {0}")]
    InvalidDate(String),
    #[error("実施した単元を1つ以上選択してください")]
    NoUnitsSelected,
    #[error("理解度を選択してください")]
    UnderstandingOutOfRange,
    #[error("ステータス更新がありません (unit {unit_id})")]
    MissingStatusUpdate { unit_id: String },
    #[error("選択されていない単元のステータス更新があります (unit {unit_id})")]
    UnselectedStatusUpdate { unit_id: String },
}

/// All rule violations found in one form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, err: &ValidationError) -> bool {
        self.0.contains(err)
    }

    /// Ok when no rule was violated
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Student registration form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    pub student_id: String,
    pub name: String,
    pub grade: String,
    pub school_type: SchoolType,
    pub subjects: Vec<String>,
    pub goals: Vec<Goal>,
}

pub fn validate_goals(goals: &[Goal], errors: &mut ValidationErrors) {
    if goals.is_empty() {
        errors.push(ValidationError::NoGoals);
    }
    for (index, goal) in goals.iter().enumerate() {
        if goal.description.trim().is_empty() {
            errors.push(ValidationError::MissingGoalDescription { index });
        }
        if goal.target_score.map_or(false, |s| s > 100) {
            errors.push(ValidationError::TargetScoreOutOfRange { index });
        }
    }
}

pub fn validate_student_form(form: &StudentForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if form.student_id.trim().is_empty() {
        errors.push(ValidationError::MissingStudentId);
    }
    if form.name.trim().is_empty() {
        errors.push(ValidationError::MissingName);
    }
    if form.grade.trim().is_empty() {
        errors.push(ValidationError::MissingGrade);
    }
    if form.subjects.is_empty() {
        errors.push(ValidationError::NoSubjects);
    }
    validate_goals(&form.goals, &mut errors);
    errors.into_result()
}

/// Parse a `yyyy-MM-dd` form date
pub fn parse_form_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}
