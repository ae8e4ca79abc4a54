//! Client-side aggregates: the dashboard re-derives a handful of scalars
//! (medians, top-N rankings, COVID digests) from the loaded artifacts
//! instead of shipping them precomputed.

use crate::artifacts::CovidImpact;
use crate::dataset::Pollutant;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use strum_macros::{Display, EnumString};

/// Which per-year summary statistic the filter bar has selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Median,
    Average,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YearFilter {
    All,
    Year(i32),
}

/// Per-year, per-pollutant measurement summary from `pollution.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Measurement {
    pub average: Option<f64>,
    pub median: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub std: Option<f64>,
    #[serde(default)]
    pub measurement_count: Option<u64>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Measurement {
    pub fn stat(&self, kind: StatKind) -> Option<f64> {
        match kind {
            StatKind::Median => self.median,
            StatKind::Average => self.average,
        }
    }
}

/// One country's nested measurement history: year -> pollutant -> summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollutionHistory {
    pub country_code: String,
    pub country_name: String,
    pub years: BTreeMap<i32, HashMap<Pollutant, Measurement>>,
}

/// Reduces one country's history to a single scalar for the current filter
/// state. A specific year reads that year's chosen statistic directly; "all
/// years" takes the mean of the per-year values that exist.
pub fn country_scalar(
    history: &PollutionHistory,
    pollutant: Pollutant,
    year: YearFilter,
    stat: StatKind,
) -> Option<f64> {
    match year {
        YearFilter::Year(y) => history.years.get(&y)?.get(&pollutant)?.stat(stat),
        YearFilter::All => {
            let values: Vec<f64> = history
                .years
                .values()
                .filter_map(|by_pollutant| by_pollutant.get(&pollutant))
                .filter_map(|m| m.stat(stat))
                .collect();
            if values.is_empty() {
                return None;
            }
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

/// Headline value across all countries: the median of the country scalars,
/// matching the upstream pipeline's use of medians for global figures.
pub fn global_scalar(
    histories: &[PollutionHistory],
    pollutant: Pollutant,
    year: YearFilter,
    stat: StatKind,
) -> Option<f64> {
    let mut values: Vec<f64> = histories
        .iter()
        .filter_map(|h| country_scalar(h, pollutant, year, stat))
        .collect();
    median(&mut values)
}

/// Median with the middle pair averaged for even lengths. Sorts in place.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct RankedCountry {
    pub country_code: String,
    pub country_name: String,
    pub value: f64,
}

/// Countries ranked by their scalar for the current filter state. Feeds the
/// top/bottom-10 bars and the map tooltips.
pub fn top_countries(
    histories: &[PollutionHistory],
    pollutant: Pollutant,
    year: YearFilter,
    stat: StatKind,
    count: usize,
    ascending: bool,
) -> Vec<RankedCountry> {
    let mut ranked: Vec<RankedCountry> = histories
        .iter()
        .filter_map(|h| {
            country_scalar(h, pollutant, year, stat).map(|value| RankedCountry {
                country_code: h.country_code.clone(),
                country_name: h.country_name.clone(),
                value,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        if ascending {
            a.value.total_cmp(&b.value)
        } else {
            b.value.total_cmp(&a.value)
        }
    });
    ranked.truncate(count);
    ranked
}

/// Per-pollutant digest of the 2019 -> 2020 variation records.
#[derive(Clone, Debug, Serialize)]
pub struct CovidSummary {
    pub median_variation_pct: f64,
    pub biggest_drop: CovidImpact,
    pub biggest_rise: CovidImpact,
    pub top_drops: Vec<CovidImpact>,
    pub top_rises: Vec<CovidImpact>,
}

pub fn covid_summary(impacts: &[CovidImpact], pollutant: Pollutant) -> Option<CovidSummary> {
    let mut relevant: Vec<&CovidImpact> = impacts
        .iter()
        .filter(|c| c.parameter == pollutant && c.variation_pct.is_some())
        .collect();
    if relevant.is_empty() {
        return None;
    }

    relevant.sort_by(|a, b| {
        a.variation_pct
            .unwrap_or(0.0)
            .total_cmp(&b.variation_pct.unwrap_or(0.0))
    });

    let mut variations: Vec<f64> = relevant.iter().filter_map(|c| c.variation_pct).collect();
    let median_variation_pct = median(&mut variations)?;

    let top_drops: Vec<CovidImpact> = relevant.iter().take(5).map(|c| (*c).clone()).collect();
    let top_rises: Vec<CovidImpact> = relevant.iter().rev().take(5).map(|c| (*c).clone()).collect();

    Some(CovidSummary {
        median_variation_pct,
        biggest_drop: relevant.first().map(|c| (*c).clone())?,
        biggest_rise: relevant.last().map(|c| (*c).clone())?,
        top_drops,
        top_rises,
    })
}
