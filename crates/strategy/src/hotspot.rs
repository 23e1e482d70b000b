//! Getis-Ord Gi* spatial hotspot statistic and the equity-aware award
//! strategy built on top of it.

use async_trait::async_trait;
use tracing::debug;

use common::{AwardContext, Error, GraphFormat, Result};

use crate::fingerprint::Fingerprint;
use crate::variables::VariableStore;
use crate::{Strategy, VARIABLE_BASIC_POINTS, VARIABLE_BONUS_POINTS};

/// Rectangular, fully-populated grid of per-region indicator values,
/// stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Grid {
    /// Build from row vectors. Empty or ragged input is rejected — the
    /// statistic is only defined on a full 2-D matrix.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let first = rows
            .first()
            .ok_or_else(|| Error::InvalidGrid("grid has no rows".to_string()))?;
        let cols = first.len();
        if cols == 0 {
            return Err(Error::InvalidGrid("grid has empty rows".to_string()));
        }
        let mut values = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::InvalidGrid(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            values.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count `n`.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col]
    }
}

/// One grid cell paired with its Gi* score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCell {
    pub row: usize,
    pub col: usize,
    pub score: f64,
}

/// Per-cell Getis-Ord Gi* z-scores.
///
/// Weights are binary rook contiguity including the cell itself; cells
/// outside the boundary contribute nothing. The standard deviation is the
/// population form (denominator `n`). Grids with fewer than two cells or
/// with no variance score zero everywhere.
pub fn getis_ord_gi_star(grid: &Grid) -> Vec<Vec<f64>> {
    let n = grid.len();
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut scores = vec![vec![0.0; cols]; rows];
    if n < 2 {
        return scores;
    }

    let nf = n as f64;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for r in 0..rows {
        for c in 0..cols {
            let v = grid.get(r, c);
            sum += v;
            sum_sq += v * v;
        }
    }
    let mean = sum / nf;
    let s = (sum_sq / nf - mean * mean).max(0.0).sqrt();
    if s == 0.0 {
        return scores;
    }

    for r in 0..rows {
        for c in 0..cols {
            // Binary weights: Σw and Σw² are both the neighborhood size.
            let mut weighted_sum = 0.0;
            let mut w_sum = 0.0;
            for (nr, nc) in rook_neighborhood(r, c, rows, cols) {
                weighted_sum += grid.get(nr, nc);
                w_sum += 1.0;
            }
            let numerator = weighted_sum - mean * w_sum;
            // Clamp the radicand: float error can push it fractionally
            // below zero when the neighborhood covers most of the grid.
            let radicand = ((nf * w_sum - w_sum * w_sum) / (nf - 1.0)).max(0.0);
            let denominator = s * radicand.sqrt();
            scores[r][c] = if denominator == 0.0 {
                0.0
            } else {
                numerator / denominator
            };
        }
    }
    scores
}

/// Every cell paired with its score, strongest hotspot first. The sort is
/// stable and deterministic; tie order beyond that is unspecified.
pub fn rank_hotspots(grid: &Grid) -> Vec<RankedCell> {
    let scores = getis_ord_gi_star(grid);
    let mut ranked: Vec<RankedCell> = scores
        .iter()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &score)| RankedCell { row, col, score })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// The cell itself plus its in-bounds up/down/left/right neighbors.
fn rook_neighborhood(row: usize, col: usize, rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut cells = vec![(row, col)];
    if row > 0 {
        cells.push((row - 1, col));
    }
    if row + 1 < rows {
        cells.push((row + 1, col));
    }
    if col > 0 {
        cells.push((row, col - 1));
    }
    if col + 1 < cols {
        cells.push((row, col + 1));
    }
    cells
}

/// Gi* significance threshold variable (z at the 95% level by default).
pub const VARIABLE_SIGNIFICANCE_THRESHOLD: &str = "variable_significance_threshold";

const ALGORITHM: &str = "\
gi_star(i) = (sum_j w_ij * x_j - mean(x) * W_i) / (S * sqrt((n * S1_i - W_i^2) / (n - 1)))
w_ij = 1 for j in rook(i) union {i}, 0 otherwise
S = sqrt(mean(x^2) - mean(x)^2)
award = basic + bonus when gi_star(region) <= -threshold, else basic";

/// Geography-aware strategy: completions in regions the Gi* statistic marks
/// as significant equity cold spots earn the bonus on top of the basic
/// award. Contexts without spatial data earn the basic award only.
pub struct EquityHotspotStrategy {
    variables: VariableStore,
    fingerprint: Fingerprint,
}

impl EquityHotspotStrategy {
    pub fn new() -> Result<Self> {
        Ok(Self {
            variables: VariableStore::default()
                .with(VARIABLE_BASIC_POINTS, 10)
                .with(VARIABLE_BONUS_POINTS, 25)
                .with(VARIABLE_SIGNIFICANCE_THRESHOLD, 1.96),
            fingerprint: Fingerprint::of_algorithm(ALGORITHM)?,
        })
    }

    fn award_for(&self, ctx: &AwardContext) -> Result<f64> {
        // Dispatch-time snapshot of everything the formula reads.
        let basic = self.basic_points();
        let bonus = self.bonus_points();
        let threshold = self.variables.numeric(VARIABLE_SIGNIFICANCE_THRESHOLD);

        let (Some(grid_rows), Some((row, col))) = (&ctx.equity_grid, ctx.region) else {
            debug!(task = %ctx.task_id, "no spatial context — basic award only");
            return Ok(basic);
        };
        let grid = Grid::from_rows(grid_rows)?;
        if row >= grid.rows() || col >= grid.cols() {
            return Err(Error::InvalidGrid(format!(
                "region ({row}, {col}) outside {}x{} grid",
                grid.rows(),
                grid.cols()
            )));
        }

        let z = getis_ord_gi_star(&grid)[row][col];
        if z <= -threshold {
            debug!(task = %ctx.task_id, z, "cold-spot completion — bonus applies");
            Ok(basic + bonus)
        } else {
            Ok(basic)
        }
    }
}

#[async_trait]
impl Strategy for EquityHotspotStrategy {
    fn name(&self) -> &str {
        "Equity Hotspot"
    }

    fn description(&self) -> &str {
        "Scores every region with the Getis-Ord Gi* statistic and grants the \
         bonus for task completions inside statistically significant equity \
         cold spots."
    }

    fn name_slug(&self) -> &str {
        "equity_hotspot"
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
        self.award_for(ctx)
    }

    fn simulate(&self, ctx: &AwardContext) -> Result<f64> {
        self.award_for(ctx)
    }

    fn logic_graph(&self, format: GraphFormat) -> String {
        match format {
            GraphFormat::Mermaid => "graph TD\n  grid[\"equity grid\"] --> gi[\"Gi* z-score per cell\"]\n  gi --> sig{\"z <= -threshold?\"}\n  sig -->|yes| bonus[\"basic + bonus\"]\n  sig -->|no| basic[\"basic\"]\n".to_string(),
            GraphFormat::Dot => "digraph equity_hotspot { grid -> gi_star -> significant; significant -> bonus [label=\"yes\"]; significant -> basic [label=\"no\"]; }".to_string(),
        }
    }
}
