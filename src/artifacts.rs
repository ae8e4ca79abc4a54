//! Typed models for the precomputed JSON artifacts and a directory loader.
//!
//! Everything here is a frozen upstream output: the analysis pipeline
//! (cleaning, PCA, regression training, chi-square tests) already ran and
//! wrote these files. The dashboard only reads them.

use crate::dataset::{CountryRecord, Pollutant};
use crate::stats::PollutionHistory;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Pollutant vs socio-economic indicator correlation, computed server-side.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Correlation {
    pub pollutant: Pollutant,
    pub indicator: String,
    pub axis: String,
    pub correlation: Option<f64>,
    pub p_value: Option<f64>,
    pub significant: bool,
    #[serde(default)]
    pub very_significant: bool,
    pub n_observations: Option<u64>,
    #[serde(default)]
    pub strength: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Period {
    pub start: i32,
    pub end: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_countries: u64,
    pub total_measurements: u64,
    pub period: Period,
    pub pollutants: Vec<Pollutant>,
    #[serde(default)]
    pub pollutant_labels: HashMap<Pollutant, String>,
    pub who_limits: HashMap<Pollutant, f64>,
    #[serde(default)]
    pub units: HashMap<Pollutant, String>,
    pub median_values: HashMap<Pollutant, f64>,
    pub above_who_pct: HashMap<Pollutant, f64>,
}

/// Global linear trend per pollutant over the observation period.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemporalTrend {
    #[serde(rename = "polluant")]
    pub pollutant: Pollutant,
    #[serde(rename = "pente_annuelle")]
    pub annual_slope: f64,
    pub variation_pct: f64,
    pub r2: f64,
    pub p_value: f64,
    #[serde(rename = "tendance")]
    pub trend: String,
    #[serde(rename = "significatif")]
    pub significance: String,
}

/// 2019 -> 2020 concentration change for one country and pollutant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CovidImpact {
    pub country_code: String,
    pub country_name: String,
    pub parameter: Pollutant,
    pub val_2019: Option<f64>,
    pub val_2020: Option<f64>,
    pub variation_pct: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelComparison {
    pub model: String,
    pub r2_train: f64,
    pub r2_test: f64,
    pub rmse: f64,
    pub mae: f64,
    pub cv_mean: f64,
    pub cv_std: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub variable: String,
    pub importance: f64,
}

/// Indicator coverage per thematic axis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completeness {
    #[serde(rename = "axe")]
    pub axis: String,
    #[serde(rename = "nb_indicateurs")]
    pub indicator_count: u32,
    #[serde(rename = "pays_complets")]
    pub complete_countries: u32,
    #[serde(rename = "pays_partiels")]
    pub partial_countries: u32,
    #[serde(rename = "pct_complets")]
    pub pct_complete: f64,
    #[serde(rename = "pct_partiels")]
    pub pct_partial: f64,
}

/// PCA loadings: one map per component, variable name -> loading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PcaData {
    pub loadings: Vec<HashMap<String, f64>>,
    pub variables: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub test: String,
    #[serde(default)]
    pub description: String,
    pub chi2: f64,
    pub dof: u32,
    pub p_value: f64,
    pub cramers_v: f64,
    #[serde(rename = "significatif")]
    pub significant: bool,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default)]
    pub conclusion: String,
}

/// The full artifact snapshot a dashboard session works from.
#[derive(Clone, Debug)]
pub struct DashboardData {
    pub countries: Vec<CountryRecord>,
    pub pollution: Vec<PollutionHistory>,
    pub correlations: Vec<Correlation>,
    pub stats: GlobalStats,
    pub covid: Vec<CovidImpact>,
    pub models: Vec<ModelComparison>,
    pub features: Vec<FeatureImportance>,
    pub completeness: Vec<Completeness>,
    pub pca: PcaData,
    pub temporal: Vec<TemporalTrend>,
    pub chi2: Vec<ChiSquareResult>,
}

fn read_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, Box<dyn Error>> {
    let path = dir.join(name);
    let file = File::open(&path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    Ok(value)
}

impl DashboardData {
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self, Box<dyn Error>> {
        let dir = dir.as_ref();
        Ok(DashboardData {
            countries: read_json(dir, "countries.json")?,
            pollution: read_json(dir, "pollution.json")?,
            correlations: read_json(dir, "correlations.json")?,
            stats: read_json(dir, "stats.json")?,
            covid: read_json(dir, "covid_impact.json")?,
            models: read_json(dir, "models.json")?,
            features: read_json(dir, "features.json")?,
            completeness: read_json(dir, "completude.json")?,
            pca: read_json(dir, "acp.json")?,
            temporal: read_json(dir, "temporal_global.json")?,
            chi2: read_json(dir, "chi2.json")?,
        })
    }

    /// Indicator correlations for one pollutant, strongest first.
    pub fn correlations_for_pollutant(
        &self,
        pollutant: Pollutant,
        significant_only: bool,
    ) -> Vec<&Correlation> {
        let mut out: Vec<&Correlation> = self
            .correlations
            .iter()
            .filter(|c| c.pollutant == pollutant)
            .filter(|c| !significant_only || c.significant)
            .collect();
        out.sort_by(|a, b| {
            let l = a.correlation.unwrap_or(0.0).abs();
            let r = b.correlation.unwrap_or(0.0).abs();
            r.total_cmp(&l)
        });
        out
    }

    pub fn covid_for_pollutant(&self, pollutant: Pollutant) -> Vec<&CovidImpact> {
        let mut out: Vec<&CovidImpact> = self
            .covid
            .iter()
            .filter(|c| c.parameter == pollutant && c.variation_pct.is_some())
            .collect();
        out.sort_by(|a, b| {
            a.variation_pct
                .unwrap_or(0.0)
                .total_cmp(&b.variation_pct.unwrap_or(0.0))
        });
        out
    }

    /// Random Forest wins on this dataset; fall back to the first entry if
    /// the artifact ever changes model names.
    pub fn best_model(&self) -> Option<&ModelComparison> {
        self.models
            .iter()
            .find(|m| m.model == "Random Forest")
            .or_else(|| self.models.first())
    }

    pub fn top_features(&self, count: usize) -> &[FeatureImportance] {
        &self.features[..count.min(self.features.len())]
    }

    pub fn median_pollution(&self, pollutant: Pollutant) -> Option<f64> {
        self.stats.median_values.get(&pollutant).copied()
    }

    pub fn above_who_pct(&self, pollutant: Pollutant) -> Option<f64> {
        self.stats.above_who_pct.get(&pollutant).copied()
    }

    pub fn who_limit(&self, pollutant: Pollutant) -> Option<f64> {
        self.stats.who_limits.get(&pollutant).copied()
    }
}
