use ndarray::Array1;

/// Tie-averaged 1-based ranks. Every maximal run of equal values gets the
/// mean of the ranks the run spans, so the rank sum is always n(n+1)/2.
///
/// Non-finite inputs are a caller bug; reject them before ranking.
pub fn rank_data(data: &Array1<f64>) -> Array1<f64> {
    debug_assert!(
        data.iter().all(|v| v.is_finite()),
        "rank_data requires finite inputs"
    );

    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = Array1::<f64>::zeros(n);
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && data[order[j + 1]] == data[order[i]] {
            j += 1;
        }
        // midpoint of the 1-based ranks i+1 ..= j+1
        let rank = (i + j + 2) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }
    ranks
}
