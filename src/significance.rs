use statrs::distribution::{ContinuousCDF, Normal};

/// Two-tailed critical value at alpha ~ 0.05 under the large-sample normal
/// approximation. Deliberately not an exact Student-t quantile: displayed
/// significance must match the dashboard, which uses the fixed 1.96 rule.
pub const CRITICAL_Z: f64 = 1.96;

/// Approximate t-statistic for a correlation coefficient r over n samples.
///
/// Perfect correlation (r^2 == 1) makes the denominator zero; the statistic
/// is infinite there, not NaN, so it compares cleanly against any threshold.
pub fn t_statistic(r: f64, n: usize) -> f64 {
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return if r >= 0.0 { f64::INFINITY } else { f64::NEG_INFINITY };
    }
    r * ((n as f64 - 2.0) / denom).sqrt()
}

pub fn is_significant(r: f64, n: usize) -> bool {
    t_statistic(r, n).abs() > CRITICAL_Z
}

/// Two-sided p-value from the normal approximation of the t-statistic.
/// Reported for context only; the significance flag stays on [`CRITICAL_Z`].
pub fn approx_p_value(r: f64, n: usize) -> f64 {
    let t = t_statistic(r, n);
    if t.is_infinite() {
        return 0.0;
    }
    let normal = standard_normal();
    let p = 2.0 * normal.cdf(-t.abs());
    p.clamp(0.0, 1.0)
}

pub fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("Normal(0,1) should always be constructible")
}
