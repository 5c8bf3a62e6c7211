use crate::units::UnitStatus;

/// Status to pre-fill for a unit covered in a lesson.
///
/// Walks the main track one step and sends NeedsReview back to Practicing.
/// Completed and OnHold stay where they are.
pub fn next_status(status: UnitStatus) -> UnitStatus {
    match status {
        UnitStatus::NotStarted => UnitStatus::Introduced,
        UnitStatus::Introduced => UnitStatus::Practicing,
        UnitStatus::Practicing => UnitStatus::WaitingConfirmation,
        UnitStatus::WaitingConfirmation => UnitStatus::Completed,
        UnitStatus::NeedsReview => UnitStatus::Practicing,
        other => other,
    }
}
