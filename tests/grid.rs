use aircorr::dataset::{paired_sample, CountryRecord, Pollutant};
use aircorr::grid::{correlation_grid, strongest_pair, MIN_OBSERVATIONS};
use aircorr::significance::{approx_p_value, is_significant, t_statistic};
use aircorr::{rank_data, spearman_pair};
use ndarray::{array, Array1};

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

fn record(code: &str, values: [Option<f64>; 6]) -> CountryRecord {
    CountryRecord {
        country_code: code.to_string(),
        country_name: code.to_string(),
        iso3: None,
        city_count: 1,
        latitude: None,
        longitude: None,
        pm25: values[0],
        pm10: values[1],
        no2: values[2],
        o3: values[3],
        so2: values[4],
        co: values[5],
        pollutants_available: values.iter().filter(|v| v.is_some()).count() as u32,
        quality_score: None,
    }
}

#[test]
fn rank_sum_is_invariant_under_ties() {
    let cases: Vec<Array1<f64>> = vec![
        array![3.0, 1.0, 2.0],
        array![5.0, 5.0, 5.0, 5.0],
        array![10.0, 20.0, 20.0, 30.0, 20.0, 1.0, 1.0],
        array![42.0],
    ];
    for data in cases {
        let n = data.len() as f64;
        let ranks = rank_data(&data);
        assert!(approx_eq(ranks.sum(), n * (n + 1.0) / 2.0, 1e-12));
    }

    let empty = rank_data(&Array1::<f64>::zeros(0));
    assert!(empty.is_empty());
}

#[test]
fn tied_values_share_the_mean_rank() {
    let ranks = rank_data(&array![10.0, 20.0, 20.0, 30.0]);
    assert_eq!(ranks, array![1.0, 2.5, 2.5, 4.0]);
}

#[test]
fn monotone_sequences_correlate_perfectly() {
    let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
    let up = array![2.0, 4.0, 6.0, 8.0, 10.0];
    let down = array![10.0, 8.0, 6.0, 4.0, 2.0];

    assert!(approx_eq(spearman_pair(&x, &up), 1.0, 1e-12));
    assert!(approx_eq(spearman_pair(&x, &down), -1.0, 1e-12));
}

#[test]
fn constant_input_yields_zero_coefficient() {
    let x = array![7.0, 7.0, 7.0, 7.0];
    let y = array![1.0, 2.0, 3.0, 4.0];
    assert_eq!(spearman_pair(&x, &y), 0.0);
    assert_eq!(spearman_pair(&y, &x), 0.0);
}

#[test]
fn perfect_correlation_has_infinite_t_and_is_significant() {
    assert!(t_statistic(1.0, 20).is_infinite());
    assert!(t_statistic(-1.0, 20).is_infinite());
    assert!(is_significant(1.0, 20));
    assert!(is_significant(-1.0, 20));
}

#[test]
fn significance_flips_at_the_normal_critical_value() {
    // For n = 12 the 1.96 threshold corresponds to |r| ~ 0.5268.
    assert!(!is_significant(0.5267, 12));
    assert!(is_significant(0.5269, 12));
    assert!(!is_significant(-0.5267, 12));
    assert!(is_significant(-0.5269, 12));

    // The flag is monotone in |r|: once it turns on it stays on.
    let mut seen_significant = false;
    for step in 0..=1000 {
        let r = step as f64 / 1000.0;
        let flag = is_significant(r, 12);
        if seen_significant {
            assert!(flag, "flag regressed at r = {}", r);
        }
        seen_significant = flag;
    }
    assert!(seen_significant);
}

#[test]
fn approximate_p_value_agrees_with_the_flag() {
    // Under the normal approximation, |t| > 1.96 and p < 0.05 coincide.
    assert!(approx_p_value(0.5269, 12) < 0.05);
    assert!(approx_p_value(0.5267, 12) > 0.05);
    assert_eq!(approx_p_value(1.0, 15), 0.0);
    assert!(approx_eq(approx_p_value(0.0, 50), 1.0, 1e-12));
}

#[test]
fn paired_sample_keeps_rows_aligned() {
    let rows = vec![
        record("AA", [Some(1.0), Some(10.0), None, None, None, None]),
        record("BB", [Some(2.0), None, None, None, None, None]),
        record("CC", [None, Some(30.0), None, None, None, None]),
        record("DD", [Some(4.0), Some(40.0), None, None, None, None]),
    ];
    let (xs, ys) = paired_sample(&rows, Pollutant::Pm25, Pollutant::Pm10);
    assert_eq!(xs, array![1.0, 4.0]);
    assert_eq!(ys, array![10.0, 40.0]);
}

#[test]
fn grid_always_has_thirty_six_cells() {
    let grid = correlation_grid(&[]);
    assert_eq!(grid.len(), 36);
    assert!(grid.iter().all(|c| c.coefficient.is_none()));
    assert!(grid.iter().all(|c| !c.significant));
    assert!(grid.iter().all(|c| c.n_observations == 0));

    // Row-major pair order
    assert_eq!(grid[0].pollutant_a, Pollutant::Pm25);
    assert_eq!(grid[0].pollutant_b, Pollutant::Pm25);
    assert_eq!(grid[1].pollutant_b, Pollutant::Pm10);
    assert_eq!(grid[6].pollutant_a, Pollutant::Pm10);
    assert_eq!(grid[35].pollutant_a, Pollutant::Co);
    assert_eq!(grid[35].pollutant_b, Pollutant::Co);
}

#[test]
fn nine_qualifying_rows_are_below_the_gate() {
    let rows: Vec<CountryRecord> = (0..MIN_OBSERVATIONS - 1)
        .map(|i| {
            let v = i as f64;
            record(&format!("C{}", i), [Some(v), Some(v * 2.0), None, None, None, None])
        })
        .collect();

    let grid = correlation_grid(&rows);
    let cell = &grid[1]; // (pm25, pm10)
    assert_eq!(cell.n_observations, 9);
    assert!(cell.coefficient.is_none());
    assert!(!cell.significant);
}

#[test]
fn self_pair_is_perfect_and_significant() {
    let rows: Vec<CountryRecord> = (0..12)
        .map(|i| {
            let v = 1.5 * i as f64 + 3.0;
            record(&format!("C{}", i), [Some(v), None, None, None, None, None])
        })
        .collect();

    let grid = correlation_grid(&rows);
    let cell = &grid[0]; // (pm25, pm25)
    assert_eq!(cell.n_observations, 12);
    assert!(approx_eq(cell.coefficient.unwrap(), 1.0, 1e-12));
    assert!(cell.significant);
}

#[test]
fn grid_is_symmetric_across_the_diagonal() {
    // 14 rows, mixed presence and ties across three pollutants.
    let mut rows = Vec::new();
    for i in 0..14 {
        let v = i as f64;
        let pm25 = Some(v);
        let pm10 = if i == 3 { None } else { Some((v * 7.0) % 5.0) };
        let no2 = Some(if i % 2 == 0 { v } else { 20.0 - v });
        rows.push(record(&format!("C{}", i), [pm25, pm10, no2, None, None, None]));
    }

    let grid = correlation_grid(&rows);
    let k = Pollutant::ALL.len();
    for a in 0..k {
        for b in 0..k {
            let ab = &grid[a * k + b];
            let ba = &grid[b * k + a];
            assert_eq!(ab.n_observations, ba.n_observations);
            assert_eq!(ab.significant, ba.significant);
            match (ab.coefficient, ba.coefficient) {
                (Some(x), Some(y)) => assert!(approx_eq(x, y, 1e-12)),
                (None, None) => {}
                _ => panic!("asymmetric presence for pair ({}, {})", a, b),
            }
        }
    }
}

#[test]
fn strongest_pair_skips_the_diagonal() {
    let mut rows = Vec::new();
    for i in 0..12 {
        let v = i as f64;
        // pm25 and pm10 perfectly anti-correlated; no2 weakly related
        rows.push(record(
            &format!("C{}", i),
            [Some(v), Some(-v), Some((v * 3.0) % 7.0), None, None, None],
        ));
    }

    let grid = correlation_grid(&rows);
    let strongest = strongest_pair(&grid).expect("grid has off-diagonal cells");
    assert_ne!(strongest.pollutant_a, strongest.pollutant_b);
    assert!(approx_eq(strongest.coefficient.unwrap(), -1.0, 1e-12));
}
