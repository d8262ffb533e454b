use shared_types::{
    MilestoneState, MIN_MILESTONE_LENGTH, RATING_CLOSE_BEFORE_END, REFUND_PERIOD_LENGTH,
};

/// Milestones must leave room for the rating window and the closing refund
/// week.
pub fn valid_length(length: u64) -> bool {
    length >= MIN_MILESTONE_LENGTH
}

/// Regulator bids close three weeks ahead of the milestone end.
///
/// Cannot underflow for any activated milestone: `end_time` is at least
/// `MIN_MILESTONE_LENGTH`, which exceeds `RATING_CLOSE_BEFORE_END`.
pub fn bid_deadline(end_time: u64) -> u64 {
    debug_assert!(end_time >= RATING_CLOSE_BEFORE_END);
    end_time - RATING_CLOSE_BEFORE_END
}

/// The refund stage may open once the milestone enters its final week.
pub fn refund_stage_open(end_time: u64, now: u64) -> bool {
    now >= end_time - REFUND_PERIOD_LENGTH
}

/// Stored state promoted to `Completion` once the scheduled window has fully
/// elapsed. Inactive and already-completed milestones pass through unchanged.
pub fn computed_state(stored: MilestoneState, end_time: u64, now: u64) -> MilestoneState {
    match stored {
        MilestoneState::InProgress | MilestoneState::RefundPeriod if now >= end_time => {
            MilestoneState::Completion
        }
        other => other,
    }
}
