use shared_types::BASIS_POINTS;

/// A regulator's split weight: established reputation and this poll's tally
/// blended by the configured basis-point share. The established share bounds
/// how far a single poll's votes can move the outcome.
pub fn blended_weight(reputation: i128, tally: i128, established_bps: i128) -> Option<i128> {
    let established = reputation.checked_mul(established_bps)?;
    let fresh = tally.checked_mul(BASIS_POINTS.checked_sub(established_bps)?)?;
    established.checked_add(fresh)?.checked_div(BASIS_POINTS)
}

/// Proportional share of an objective's reward cap, floored. Zero total
/// weight pays zero; reward is never manufactured.
pub fn reward_share(max_reward: i128, weight: i128, total_weight: i128) -> Option<i128> {
    if total_weight == 0 {
        return Some(0);
    }
    max_reward.checked_mul(weight)?.checked_div(total_weight)
}
