//! Time-decay award family: the effective value of a completion tapers as
//! it lags the task's creation, to discourage stalling.

use async_trait::async_trait;

use common::{AwardContext, Result};

use crate::fingerprint::Fingerprint;
use crate::variables::VariableStore;
use crate::{Strategy, VARIABLE_BASIC_POINTS, VARIABLE_BONUS_POINTS};

/// Width of the linear decay ramp, in minutes.
pub const VARIABLE_DECAY_WINDOW_MINUTES: &str = "variable_decay_window_minutes";
/// Half-life of the exponential decay, in minutes.
pub const VARIABLE_HALF_LIFE_MINUTES: &str = "variable_half_life_minutes";
/// Completions faster than this still earn the bonus points.
pub const VARIABLE_BONUS_WINDOW_MINUTES: &str = "variable_bonus_window_minutes";

/// Output of one family member for a `(points, minutes)` pair.
///
/// Every member guarantees, for `points >= 0` and `minutes >= 0`:
/// `0 <= time_effective <= points * 60`, `basic >= partial_bonus`, and
/// `partial_bonus >= time_effective`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayedAward {
    /// Decayed, time-effective value (point-minutes).
    pub time_effective: f64,
    /// Undecayed full value (point-minutes).
    pub basic: f64,
    /// Half-protected bonus value: decays at half the rate.
    pub partial_bonus: f64,
}

/// Shared shape of the family: `basic = points * 60`, the member supplies
/// only the decay factor in `[0, 1]`.
fn decayed_award(points: f64, factor: f64) -> DecayedAward {
    let basic = points.max(0.0) * 60.0;
    let factor = factor.clamp(0.0, 1.0);
    DecayedAward {
        time_effective: basic * factor,
        basic,
        partial_bonus: basic * (1.0 + factor) / 2.0,
    }
}

fn linear_factor(minutes: f64, window: f64) -> f64 {
    if window <= 0.0 {
        return 0.0;
    }
    (1.0 - minutes / window).clamp(0.0, 1.0)
}

fn half_life_factor(minutes: f64, half_life: f64) -> f64 {
    if half_life <= 0.0 {
        return 0.0;
    }
    0.5f64.powf(minutes / half_life).clamp(0.0, 1.0)
}

/// Base points for a context: the task's own points when set, otherwise the
/// strategy's basic-points variable.
fn context_points(ctx: &AwardContext, fallback: f64) -> f64 {
    if ctx.task_points > 0.0 {
        ctx.task_points
    } else {
        fallback
    }
}

const LINEAR_ALGORITHM: &str = "\
factor(m) = clamp(1 - m / window, 0, 1)
basic = points * 60
time_effective = basic * factor(m)
partial_bonus = basic * (1 + factor(m)) / 2
award = time_effective / 60 + bonus when m <= bonus_window";

/// Linear ramp: full value at completion time zero, nothing after the
/// decay window closes.
pub struct LinearDecayStrategy {
    variables: VariableStore,
    fingerprint: Fingerprint,
}

impl LinearDecayStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            variables: VariableStore::default()
                .with(VARIABLE_BASIC_POINTS, 10)
                .with(VARIABLE_BONUS_POINTS, 5)
                .with(VARIABLE_DECAY_WINDOW_MINUTES, 10_080.0) // one week
                .with(VARIABLE_BONUS_WINDOW_MINUTES, 60.0),
            fingerprint: Fingerprint::of_algorithm(LINEAR_ALGORITHM)?,
        })
    }

    /// Family contract: the decayed triple for a `(points, minutes)` pair.
    pub fn decay(&self, points: f64, minutes: f64) -> DecayedAward {
        let window = self.variables.numeric(VARIABLE_DECAY_WINDOW_MINUTES);
        decayed_award(points, linear_factor(minutes.max(0.0), window))
    }

    fn award_for(&self, ctx: &AwardContext) -> f64 {
        let minutes = ctx.elapsed_minutes();
        let points = context_points(ctx, self.basic_points());
        let decayed = self.decay(points, minutes);
        let bonus_window = self.variables.numeric(VARIABLE_BONUS_WINDOW_MINUTES);
        let bonus = if minutes <= bonus_window {
            self.bonus_points()
        } else {
            0.0
        };
        decayed.time_effective / 60.0 + bonus
    }
}

#[async_trait]
impl Strategy for LinearDecayStrategy {
    fn name(&self) -> &str {
        "Linear Time Decay"
    }

    fn description(&self) -> &str {
        "Task value ramps down linearly from completion time zero to nothing \
         at the end of the decay window; fast completions keep the bonus."
    }

    fn name_slug(&self) -> &str {
        "time_decay_linear"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn variables(&self) -> &VariableStore {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }

    fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    async fn calculate_points(&self, ctx: &AwardContext) -> Result<f64> {
        Ok(self.award_for(ctx))
    }

    fn simulate(&self, ctx: &AwardContext) -> Result<f64> {
        Ok(self.award_for(ctx))
    }
}

const HALF_LIFE_ALGORITHM: &str = "\
factor(m) = 0.5 ^ (m / half_life)
basic = points * 60
time_effective = basic * factor(m)
partial_bonus = basic * (1 + factor(m)) / 2
award = time_effective / 60 + bonus when m <= bonus_window";

/// Exponential taper: the effective value halves every half-life, never
/// quite reaching zero.
pub struct HalfLifeDecayStrategy {
    variables: VariableStore,
    fingerprint: Fingerprint,
}

impl HalfLifeDecayStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            variables: VariableStore::default()
                .with(VARIABLE_BASIC_POINTS, 10)
                .with(VARIABLE_BONUS_POINTS, 5)
                .with(VARIABLE_HALF_LIFE_MINUTES, 1_440.0) // one day
                .with(VARIABLE_BONUS_WINDOW_MINUTES, 60.0),
            fingerprint: Fingerprint::of_algorithm(HALF_LIFE_ALGORITHM)?,
        })
    }

    /// Family contract: the decayed triple for a `(points, minutes)` pair.
    pub fn decay(&self, points: f64, minutes: f64) -> DecayedAward {
        let half_life = self.variables.numeric(VARIABLE_HALF_LIFE_MINUTES);
        decayed_award(points, half_life_factor(minutes.max(0.0), half_life))
    }

    fn award_for(&self, ctx: &AwardContext) -> f64 {
        let minutes = ctx.elapsed_minutes();
        let points = context_points(ctx, self.basic_points());
        let decayed = self.decay(points, minutes);
        let bonus_window = self.variables.numeric(VARIABLE_BONUS_WINDOW_MINUTES);
        let bonus = if minutes <= bonus_window {
            self.bonus_points()
        } else {
            0.0
        };
        decayed.time_effective / 60.0 + bonus
    }
}

#[async_trait]
impl Strategy for HalfLifeDecayStrategy {
    fn name(&self) -> &str {
        "Half-Life Time Decay"
    }

    fn description(&self) -> &str {
        "Task value halves every half-life after creation; fast completions \
         keep the bonus."
    }

    fn name_slug(&self) -> &str {
        "time_decay_half_life"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn variables(&self) -> &VariableStore {
        &self.variables
    }

    fn variables_mut(&mut self) -> &mut VariableStore {
        &mut self.variables
    }

    fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    async fn calculate_points(&self, ctx: &AwardContext) -> Result<f64> {
        Ok(self.award_for(ctx))
    }

    fn simulate(&self, ctx: &AwardContext) -> Result<f64> {
        Ok(self.award_for(ctx))
    }
}
