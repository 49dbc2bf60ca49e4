//! Per-cell update rule: self-preservation gate then majority takeover
//!
//! A neighbor color must reach the takeover threshold (3 of up to 8
//! neighbors by default) before it can claim a cell. Among colors sharing
//! the highest qualifying count the winner is drawn uniformly.
//!
//! The weighted policies first give the cell a chance to keep its color
//! based on how widespread that color is across the whole grid:
//!
//! | policy      | keeps color with probability |
//! |-------------|------------------------------|
//! | plain       | never (no gate)              |
//! | progressive | `1 - share`                  |
//! | regressive  | `share`                      |
//! | random      | fresh uniform threshold      |
//!
//! Only the plain rule has the rare random recolor, and only the weighted
//! rules skip the cell's own color when scanning for a majority.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TideError};
use crate::core::types::ColorLabel;
use crate::simulation::census::{ColorCensus, ColorShares};
use crate::simulation::random::{chance, random_element, uniform_float, RandomSource};

/// Scale the gate probabilities are drawn on
const GATE_SCALE: f64 = 100.0;

/// Self-preservation policy applied before majority takeover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// No gate; rare random recolor instead
    #[serde(alias = "none")]
    Plain,
    /// Widespread colors resist change more strongly
    Progressive,
    /// Widespread colors resist change less, speeding their turnover
    Regressive,
    /// Resistance drawn at random for every cell visit
    Random,
}

impl UpdatePolicy {
    /// Whether the policy needs whole-grid color shares
    pub fn is_weighted(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

impl FromStr for UpdatePolicy {
    type Err = TideError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "plain" => Ok(Self::Plain),
            "progressive" => Ok(Self::Progressive),
            "regressive" => Ok(Self::Regressive),
            "random" => Ok(Self::Random),
            other => Err(TideError::config(format!(
                "unknown policy '{}', expected none, progressive, regressive or random",
                other
            ))),
        }
    }
}

impl fmt::Display for UpdatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plain => "plain",
            Self::Progressive => "progressive",
            Self::Regressive => "regressive",
            Self::Random => "random",
        };
        write!(f, "{}", name)
    }
}

/// Tunable constants of the rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleParams {
    /// Neighbor count at which a color becomes a takeover candidate
    pub takeover_threshold: u32,
    /// `(success, total)` odds of the plain rule's random recolor
    pub mutation_chance: (u32, u32),
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            takeover_threshold: 3,
            mutation_chance: (1, 1000),
        }
    }
}

/// What the rule decided for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellDecision {
    /// No color qualified for takeover
    Unchanged,
    /// The self-preservation gate held
    Preserved,
    /// Rare random recolor (plain rule only)
    Mutated(ColorLabel),
    /// A neighbor majority claimed the cell
    TakenOver(ColorLabel),
}

impl CellDecision {
    /// Color to write, if any
    pub fn new_color(self) -> Option<ColorLabel> {
        match self {
            Self::Mutated(color) | Self::TakenOver(color) => Some(color),
            Self::Unchanged | Self::Preserved => None,
        }
    }
}

/// Configured update rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRule {
    pub policy: UpdatePolicy,
    pub params: RuleParams,
}

impl UpdateRule {
    pub fn new(policy: UpdatePolicy, params: RuleParams) -> Self {
        Self { policy, params }
    }

    /// Decide the fate of a cell colored `current`.
    ///
    /// `global` must be present for weighted policies. `palette` lists the
    /// colors the plain rule's random recolor may pick.
    pub fn decide(
        &self,
        current: ColorLabel,
        neighbors: &ColorCensus,
        global: Option<&ColorShares>,
        palette: &[ColorLabel],
        rng: &mut impl RandomSource,
    ) -> Result<CellDecision> {
        if self.policy.is_weighted() {
            let shares = global.ok_or_else(|| {
                TideError::domain(format!("{} policy requires whole-grid color shares", self.policy))
            })?;
            if self_preserved(self.policy, shares.fraction(current), rng)? {
                return Ok(CellDecision::Preserved);
            }
            let candidates = majority_candidates(neighbors, Some(current), self.params.takeover_threshold);
            return pick_takeover(&candidates, rng);
        }

        let (success, total) = self.params.mutation_chance;
        if chance(rng, f64::from(success), f64::from(total))? {
            return Ok(CellDecision::Mutated(*random_element(rng, palette)?));
        }

        let candidates = majority_candidates(neighbors, None, self.params.takeover_threshold);
        pick_takeover(&candidates, rng)
    }
}

/// Self-preservation gate for a cell whose color covers `share` of the grid.
///
/// Total over policies: the plain rule has no gate and never preserves.
pub(crate) fn self_preserved(policy: UpdatePolicy, share: f64, rng: &mut impl RandomSource) -> Result<bool> {
    let share = share.clamp(0.0, 1.0);
    match policy {
        UpdatePolicy::Plain => Ok(false),
        UpdatePolicy::Progressive => chance(rng, GATE_SCALE - share * GATE_SCALE, GATE_SCALE),
        UpdatePolicy::Regressive => chance(rng, share * GATE_SCALE, GATE_SCALE),
        UpdatePolicy::Random => {
            let threshold = uniform_float(rng, GATE_SCALE)?;
            chance(rng, threshold, GATE_SCALE)
        }
    }
}

/// Colors tied at the highest count reaching `threshold`, in label order.
///
/// `exclude` drops one color from consideration entirely.
pub fn majority_candidates(
    neighbors: &ColorCensus,
    exclude: Option<ColorLabel>,
    threshold: u32,
) -> Vec<ColorLabel> {
    let mut threshold = threshold;
    let mut replacements = Vec::new();

    for (color, count) in neighbors.iter() {
        if Some(color) == exclude {
            continue;
        }
        if count == threshold {
            replacements.push(color);
        } else if count > threshold {
            replacements.clear();
            replacements.push(color);
            threshold = count;
        }
    }

    replacements
}

fn pick_takeover(candidates: &[ColorLabel], rng: &mut impl RandomSource) -> Result<CellDecision> {
    if candidates.is_empty() {
        return Ok(CellDecision::Unchanged);
    }
    Ok(CellDecision::TakenOver(*random_element(rng, candidates)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::random::testing::{FixedRandom, ScriptedRandom};
    use crate::spatial::grid::Cell;

    const A: ColorLabel = ColorLabel(0);
    const B: ColorLabel = ColorLabel(1);
    const C: ColorLabel = ColorLabel(2);
    const D: ColorLabel = ColorLabel(3);
    const PALETTE: [ColorLabel; 4] = [A, B, C, D];

    fn census(colors: &[ColorLabel]) -> ColorCensus {
        let cells: Vec<Cell> = colors.iter().map(|&c| Cell::new(c)).collect();
        ColorCensus::of(&cells)
    }

    fn plain() -> UpdateRule {
        UpdateRule::new(UpdatePolicy::Plain, RuleParams::default())
    }

    fn shares(colors: &[ColorLabel]) -> ColorShares {
        census(colors).normalize(colors.len()).unwrap()
    }

    #[test]
    fn test_unanimous_neighbors_take_over() {
        // 0.5 * 1000 = 500 > 1, so the recolor branch stays closed
        let mut rng = FixedRandom::new(0.5, 0);
        let adj = census(&[B; 8]);
        let decision = plain().decide(A, &adj, None, &PALETTE, &mut rng).unwrap();
        assert_eq!(decision, CellDecision::TakenOver(B));
    }

    #[test]
    fn test_tie_picks_one_of_the_leaders() {
        let adj = census(&[B, B, B, C, C, C, D, D]);
        for pick in 0..2 {
            let mut rng = FixedRandom::new(0.5, pick);
            let decision = plain().decide(A, &adj, None, &PALETTE, &mut rng).unwrap();
            assert_eq!(decision, CellDecision::TakenOver([B, C][pick]));
        }
    }

    #[test]
    fn test_below_threshold_is_noop() {
        let mut rng = FixedRandom::new(0.5, 0);
        let adj = census(&[B, B, C, C, D, D, A, A]);
        let decision = plain().decide(A, &adj, None, &PALETTE, &mut rng).unwrap();
        assert_eq!(decision, CellDecision::Unchanged);
    }

    #[test]
    fn test_strict_majority_beats_threshold_ties() {
        let adj = census(&[B, B, B, B, C, C, C, D]);
        assert_eq!(majority_candidates(&adj, None, 3), vec![B]);
    }

    #[test]
    fn test_plain_rule_considers_own_color() {
        let mut rng = FixedRandom::new(0.5, 0);
        let adj = census(&[A, A, A, A, B, B, B, C]);
        let decision = plain().decide(A, &adj, None, &PALETTE, &mut rng).unwrap();
        assert_eq!(decision, CellDecision::TakenOver(A));
    }

    #[test]
    fn test_plain_rule_random_recolor() {
        // First draw opens the 1/1000 branch, second picks palette slot 3
        let mut rng = ScriptedRandom::new(vec![0.0, 0.8]);
        let adj = census(&[B; 8]);
        let decision = plain().decide(A, &adj, None, &PALETTE, &mut rng).unwrap();
        assert_eq!(decision, CellDecision::Mutated(D));
    }

    #[test]
    fn test_weighted_rule_skips_own_color() {
        let rule = UpdateRule::new(UpdatePolicy::Regressive, RuleParams::default());
        let global = shares(&[B, B, B, A]);
        let mut rng = FixedRandom::new(0.5, 0);
        // A covers 25% of the grid: regressive keeps it only on draws <= 25
        let adj = census(&[A, A, A, A, A, B, B, C]);
        let decision = rule.decide(A, &adj, Some(&global), &PALETTE, &mut rng).unwrap();
        assert_eq!(decision, CellDecision::Unchanged);

        let adj = census(&[A, A, A, A, A, B, B, B]);
        let decision = rule.decide(A, &adj, Some(&global), &PALETTE, &mut rng).unwrap();
        assert_eq!(decision, CellDecision::TakenOver(B));
    }

    #[test]
    fn test_weighted_rule_requires_global_shares() {
        let rule = UpdateRule::new(UpdatePolicy::Progressive, RuleParams::default());
        let mut rng = FixedRandom::new(0.5, 0);
        let result = rule.decide(A, &census(&[B; 8]), None, &PALETTE, &mut rng);
        assert!(matches!(result, Err(TideError::Domain(_))));
    }

    #[test]
    fn test_progressive_gate_boundaries() {
        // share 0: threshold 100, every draw keeps the color
        for unit in [0.0, 0.5, 0.999_999] {
            let mut rng = FixedRandom::new(unit, 0);
            assert!(self_preserved(UpdatePolicy::Progressive, 0.0, &mut rng).unwrap());
        }
        // share 1: threshold 0, only an exact zero draw keeps it
        let mut rng = FixedRandom::new(0.0, 0);
        assert!(self_preserved(UpdatePolicy::Progressive, 1.0, &mut rng).unwrap());
        for unit in [0.000_001, 0.5, 0.999_999] {
            let mut rng = FixedRandom::new(unit, 0);
            assert!(!self_preserved(UpdatePolicy::Progressive, 1.0, &mut rng).unwrap());
        }
    }

    #[test]
    fn test_regressive_gate_boundaries() {
        for unit in [0.000_001, 0.5, 0.999_999] {
            let mut rng = FixedRandom::new(unit, 0);
            assert!(!self_preserved(UpdatePolicy::Regressive, 0.0, &mut rng).unwrap());
        }
        for unit in [0.0, 0.5, 0.999_999] {
            let mut rng = FixedRandom::new(unit, 0);
            assert!(self_preserved(UpdatePolicy::Regressive, 1.0, &mut rng).unwrap());
        }
    }

    #[test]
    fn test_random_gate_uses_fresh_threshold() {
        let mut keep = ScriptedRandom::new(vec![0.9, 0.1]);
        assert!(self_preserved(UpdatePolicy::Random, 0.3, &mut keep).unwrap());
        let mut release = ScriptedRandom::new(vec![0.1, 0.9]);
        assert!(!self_preserved(UpdatePolicy::Random, 0.3, &mut release).unwrap());
    }

    #[test]
    fn test_plain_policy_has_no_gate() {
        let mut rng = FixedRandom::new(0.0, 0);
        assert!(!self_preserved(UpdatePolicy::Plain, 1.0, &mut rng).unwrap());
    }

    #[test]
    fn test_preserved_cell_reports_gate() {
        let rule = UpdateRule::new(UpdatePolicy::Progressive, RuleParams::default());
        let global = shares(&[B, B, B, B]);
        let mut rng = FixedRandom::new(0.5, 0);
        // A is absent from the grid shares: share 0 always preserves
        let decision = rule.decide(A, &census(&[B; 8]), Some(&global), &PALETTE, &mut rng).unwrap();
        assert_eq!(decision, CellDecision::Preserved);
        assert_eq!(decision.new_color(), None);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("none".parse::<UpdatePolicy>().unwrap(), UpdatePolicy::Plain);
        assert_eq!("Progressive".parse::<UpdatePolicy>().unwrap(), UpdatePolicy::Progressive);
        assert!(matches!("chaotic".parse::<UpdatePolicy>(), Err(TideError::Config(_))));
        assert!(!UpdatePolicy::Plain.is_weighted());
        assert!(UpdatePolicy::Random.is_weighted());
    }
}
