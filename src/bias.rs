//! Bias ratio: how over-represented a race is among people shot by police in
//! a state, relative to that race's share of the state's population.
//!
//! ```text
//! bias(R, S) = (shot of race R in S / all shot in S) / population share of R in S
//! ```
//!
//! The numerator count comes from the armed-filtered incidents while the
//! state total always counts every incident in the state.

use serde::Serialize;

use crate::data::{Incident, StateDemographics};
use crate::filter::Race;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateBias {
    pub state: String,
    pub code: String,
    /// Filtered incidents of the selected race in the state.
    pub race_count: usize,
    /// Filtered incidents of any race in the state.
    pub filtered_count: usize,
    /// All incidents in the state, before the armed filter.
    pub state_total: usize,
    pub population_share: Option<f64>,
    /// `None` when the population share is missing or zero.
    pub ratio: Option<f64>,
}

/// Ratio of the shooting share to the population share.
///
/// Returns `Some(0.0)` when the state has no incidents at all, and `None`
/// when the population share is missing, zero or not finite.
pub fn bias_ratio(
    race_count: usize,
    state_total: usize,
    population_share: Option<f64>,
) -> Option<f64> {
    if state_total == 0 {
        return Some(0.0);
    }
    let share = population_share.filter(|s| s.is_finite() && *s > 0.0)?;
    let shot_share = race_count as f64 / state_total as f64;
    Some(shot_share / share)
}

/// Bias ratio of `race` for every state in `demographics`, in file order.
pub fn compute_bias_table(
    all: &[Incident],
    filtered: &[&Incident],
    demographics: &[StateDemographics],
    race: Race,
) -> Vec<StateBias> {
    demographics
        .iter()
        .map(|demo| {
            let state_total = all.iter().filter(|r| r.state == demo.code).count();
            let in_state: Vec<&&Incident> =
                filtered.iter().filter(|r| r.state == demo.code).collect();
            let race_count = in_state.iter().filter(|r| r.race == race.label()).count();
            let population_share = demo.share(race.label());

            // No filtered incidents here: ratio is zero regardless of share.
            let ratio = if in_state.is_empty() {
                Some(0.0)
            } else {
                bias_ratio(race_count, state_total, population_share)
            };

            StateBias {
                state: demo.state.clone(),
                code: demo.code.clone(),
                race_count,
                filtered_count: in_state.len(),
                state_total,
                population_share,
                ratio,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_basic() {
        // 3 of 10 shot, 15% of population -> 2x over-represented
        let r = bias_ratio(3, 10, Some(0.15)).unwrap();
        assert!((r - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_zero_state_total() {
        assert_eq!(bias_ratio(0, 0, Some(0.5)), Some(0.0));
        assert_eq!(bias_ratio(0, 0, None), Some(0.0));
    }

    #[test]
    fn test_ratio_undefined_share() {
        assert_eq!(bias_ratio(1, 4, Some(0.0)), None);
        assert_eq!(bias_ratio(1, 4, None), None);
        assert_eq!(bias_ratio(1, 4, Some(f64::NAN)), None);
    }
}
