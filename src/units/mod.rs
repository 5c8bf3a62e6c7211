use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type UnitId = String;

/// Progress of one curriculum unit.
///
/// The main track runs NotStarted → Introduced → Practicing →
/// WaitingConfirmation → Completed; NeedsReview and OnHold are side branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitStatus {
    #[default]
    NotStarted,
    Introduced,
    Practicing,
    WaitingConfirmation,
    Completed,
    NeedsReview,
    OnHold,
}

impl UnitStatus {
    pub const ALL: [UnitStatus; 7] = [
        UnitStatus::NotStarted,
        UnitStatus::Introduced,
        UnitStatus::Practicing,
        UnitStatus::WaitingConfirmation,
        UnitStatus::Completed,
        UnitStatus::NeedsReview,
        UnitStatus::OnHold,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UnitStatus::NotStarted => "未着手",
            UnitStatus::Introduced => "導入済み",
            UnitStatus::Practicing => "演習中",
            UnitStatus::WaitingConfirmation => "定着確認待ち",
            UnitStatus::Completed => "完了",
            UnitStatus::NeedsReview => "要復習",
            UnitStatus::OnHold => "保留",
        }
    }

    /// Started but not yet finished
    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            UnitStatus::Introduced | UnitStatus::Practicing | UnitStatus::WaitingConfirmation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    pub student_id: String,
    pub subject: String,
    pub name: String,
    /// Position in the student's curriculum, ascending
    pub order: i64,
    #[serde(default = "default_estimated_sessions")]
    pub estimated_sessions: u32,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub status: UnitStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_due_date: Option<NaiveDate>,
}

fn default_estimated_sessions() -> u32 {
    1
}

fn default_weight() -> u32 {
    1
}

impl Unit {
    pub fn new<S: Into<String>>(id: S, student_id: S, subject: S, name: S, order: i64) -> Self {
        Unit {
            id: id.into(),
            student_id: student_id.into(),
            subject: subject.into(),
            name: name.into(),
            order,
            estimated_sessions: default_estimated_sessions(),
            weight: default_weight(),
            status: UnitStatus::NotStarted,
            completion_date: None,
            review_due_date: None,
        }
    }

    pub fn with_status(mut self, status: UnitStatus) -> Self {
        self.status = status;
        self
    }

    /// Change status, stamping the completion date on Completed
    pub fn apply_status(&mut self, status: UnitStatus, now: DateTime<Utc>) {
        self.status = status;
        if status == UnitStatus::Completed {
            self.completion_date = Some(now);
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == UnitStatus::Completed
    }
}
