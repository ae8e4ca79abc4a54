use crate::dataset::{paired_sample, CountryRecord, Pollutant};
use crate::significance::is_significant;
use crate::spearman::spearman_pair;
use rayon::prelude::*;
use serde::Serialize;

/// Pairs with fewer observations than this are reported without a
/// coefficient. Matches the upstream pipeline's minimum sample gate.
pub const MIN_OBSERVATIONS: usize = 10;

/// One cell of the pollutant correlation heatmap.
#[derive(Clone, Debug, Serialize)]
pub struct PollutantCorrelation {
    pub pollutant_a: Pollutant,
    pub pollutant_b: Pollutant,
    /// None when fewer than [`MIN_OBSERVATIONS`] countries report both.
    pub coefficient: Option<f64>,
    pub n_observations: usize,
    pub significant: bool,
}

/// Spearman correlation for every ordered pollutant pair, self-pairs
/// included: always K^2 = 36 results, in row-major pair order.
///
/// Each pair is independent, so the cells are computed in parallel; indexed
/// collection keeps the output order deterministic.
pub fn correlation_grid(rows: &[CountryRecord]) -> Vec<PollutantCorrelation> {
    let k = Pollutant::ALL.len();
    (0..k * k)
        .into_par_iter()
        .map(|cell| {
            let a = Pollutant::ALL[cell / k];
            let b = Pollutant::ALL[cell % k];
            correlate_pair(rows, a, b)
        })
        .collect()
}

fn correlate_pair(rows: &[CountryRecord], a: Pollutant, b: Pollutant) -> PollutantCorrelation {
    let (xs, ys) = paired_sample(rows, a, b);
    let n = xs.len();

    if n < MIN_OBSERVATIONS {
        return PollutantCorrelation {
            pollutant_a: a,
            pollutant_b: b,
            coefficient: None,
            n_observations: n,
            significant: false,
        };
    }

    let r = spearman_pair(&xs, &ys);
    PollutantCorrelation {
        pollutant_a: a,
        pollutant_b: b,
        coefficient: Some(r),
        n_observations: n,
        significant: is_significant(r, n),
    }
}

/// The off-diagonal cell with the largest |r|, for the heatmap insight line.
pub fn strongest_pair(grid: &[PollutantCorrelation]) -> Option<&PollutantCorrelation> {
    grid.iter()
        .filter(|c| c.pollutant_a != c.pollutant_b)
        .filter(|c| c.coefficient.is_some())
        .max_by(|lhs, rhs| {
            let l = lhs.coefficient.unwrap_or(0.0).abs();
            let r = rhs.coefficient.unwrap_or(0.0).abs();
            l.total_cmp(&r)
        })
}
