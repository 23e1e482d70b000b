use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task/user context handed to a strategy when points are calculated.
/// Assembled by the task service; the engine never loads it itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardContext {
    pub user_id: String,
    pub task_id: String,
    /// Base points attached to the task by its author. Zero means "use the
    /// strategy's own basic-points variable".
    pub task_points: f64,
    pub task_created_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Per-region equity indicators, row-major. Only geography-aware
    /// strategies read this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity_grid: Option<Vec<Vec<f64>>>,
    /// (row, col) of the acting user's region within `equity_grid`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<(usize, usize)>,
}

impl AwardContext {
    /// Minimal context for a task completed `minutes` after creation.
    pub fn timed(user_id: impl Into<String>, task_id: impl Into<String>, task_points: f64, created_at: DateTime<Utc>, minutes: f64) -> Self {
        Self {
            user_id: user_id.into(),
            task_id: task_id.into(),
            task_points,
            task_created_at: created_at,
            completed_at: created_at + chrono::Duration::seconds((minutes * 60.0) as i64),
            equity_grid: None,
            region: None,
        }
    }

    /// Whole minutes elapsed between task creation and completion,
    /// clamped at zero when the timestamps arrive out of order.
    pub fn elapsed_minutes(&self) -> f64 {
        let seconds = (self.completed_at - self.task_created_at).num_seconds();
        (seconds.max(0) as f64) / 60.0
    }
}

/// Audit record of one award. The caller persists it; `hash_version` ties
/// the number back to the exact formula that produced it even after the
/// strategy's variables have been retuned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointAward {
    pub id: String,
    pub strategy_id: String,
    pub hash_version: String,
    pub user_id: String,
    pub task_id: String,
    pub points: f64,
    pub awarded_at: DateTime<Utc>,
}

impl PointAward {
    pub fn record(strategy_id: impl Into<String>, hash_version: impl Into<String>, points: f64, ctx: &AwardContext) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            strategy_id: strategy_id.into(),
            hash_version: hash_version.into(),
            user_id: ctx.user_id.clone(),
            task_id: ctx.task_id.clone(),
            points,
            awarded_at: ctx.completed_at,
        }
    }
}

/// Output format for strategy logic graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    Mermaid,
    Dot,
}

impl std::fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphFormat::Mermaid => write!(f, "mermaid"),
            GraphFormat::Dot => write!(f, "dot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_minutes_clamps_reversed_timestamps() {
        let created = Utc::now();
        let ctx = AwardContext {
            user_id: "u1".into(),
            task_id: "t1".into(),
            task_points: 5.0,
            task_created_at: created,
            completed_at: created - chrono::Duration::minutes(10),
            equity_grid: None,
            region: None,
        };
        assert_eq!(ctx.elapsed_minutes(), 0.0);
    }

    #[test]
    fn timed_context_reports_elapsed_minutes() {
        let ctx = AwardContext::timed("u1", "t1", 5.0, Utc::now(), 30.0);
        assert!((ctx.elapsed_minutes() - 30.0).abs() < 0.1);
    }

    #[test]
    fn award_record_carries_strategy_identity() {
        let ctx = AwardContext::timed("u1", "t1", 5.0, Utc::now(), 0.0);
        let award = PointAward::record("equity_hotspot", "ab".repeat(32), 35.0, &ctx);
        assert_eq!(award.strategy_id, "equity_hotspot");
        assert_eq!(award.hash_version.len(), 64);
        assert_eq!(award.user_id, "u1");
        assert!(!award.id.is_empty());
    }
}
