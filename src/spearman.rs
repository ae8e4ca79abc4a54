use crate::rank::rank_data;
use ndarray::Array1;

/// Spearman rank correlation of two paired samples: Pearson computed on the
/// tie-averaged ranks of each input.
///
/// A zero denominator (all values identical on either side, so the rank
/// array has no variance) yields 0.0 rather than an error. The dashboard
/// treats a constant column as "no monotonic relationship"; whether that
/// should instead be reported as undefined is an open question upstream, so
/// the historical behavior is kept.
pub fn spearman_pair(x: &Array1<f64>, y: &Array1<f64>) -> f64 {
    assert_eq!(
        x.len(),
        y.len(),
        "Spearman correlation requires index-aligned samples of equal length"
    );
    assert!(!x.is_empty(), "Spearman correlation requires at least one pair");

    let rank_x = rank_data(x);
    let rank_y = rank_data(y);
    pearson_on_ranks(&rank_x, &rank_y)
}

fn pearson_on_ranks(rank_x: &Array1<f64>, rank_y: &Array1<f64>) -> f64 {
    let n = rank_x.len() as f64;
    let mean_x = rank_x.sum() / n;
    let mean_y = rank_y.sum() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (rx, ry) in rank_x.iter().zip(rank_y.iter()) {
        let dx = rx - mean_x;
        let dy = ry - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    cov / denom
}
