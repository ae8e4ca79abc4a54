use ndarray::Array1;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The six pollutants measured upstream. The set is closed: every artifact
/// and every grid cell is keyed by one of these codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    No2,
    O3,
    So2,
    Co,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm25,
        Pollutant::Pm10,
        Pollutant::No2,
        Pollutant::O3,
        Pollutant::So2,
        Pollutant::Co,
    ];

    pub fn info(self) -> &'static PollutantInfo {
        &POLLUTANTS[self as usize]
    }
}

/// Display metadata for one pollutant. WHO limits are the 2021 annual
/// guideline values used for the above-limit markers.
pub struct PollutantInfo {
    pub code: Pollutant,
    pub label: &'static str,
    pub unit: &'static str,
    pub who_limit: f64,
}

pub static POLLUTANTS: [PollutantInfo; 6] = [
    PollutantInfo { code: Pollutant::Pm25, label: "PM2.5", unit: "µg/m³", who_limit: 5.0 },
    PollutantInfo { code: Pollutant::Pm10, label: "PM10", unit: "µg/m³", who_limit: 15.0 },
    PollutantInfo { code: Pollutant::No2, label: "NO₂", unit: "µg/m³", who_limit: 10.0 },
    PollutantInfo { code: Pollutant::O3, label: "O₃", unit: "µg/m³", who_limit: 100.0 },
    PollutantInfo { code: Pollutant::So2, label: "SO₂", unit: "µg/m³", who_limit: 40.0 },
    PollutantInfo { code: Pollutant::Co, label: "CO", unit: "µg/m³", who_limit: 4000.0 },
];

/// One row of `countries.json`: a country with its per-pollutant aggregate
/// concentrations. Field presence is independent per row; a missing
/// measurement is an explicit null, never imputed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(rename = "code_pays")]
    pub country_code: String,
    #[serde(rename = "nom_pays")]
    pub country_name: String,
    #[serde(rename = "code_pays_iso3", default)]
    pub iso3: Option<String>,
    #[serde(rename = "nb_villes", default)]
    pub city_count: u32,
    #[serde(rename = "latitude_moyenne", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "longitude_moyenne", default)]
    pub longitude: Option<f64>,
    #[serde(rename = "pollution_pm25", default)]
    pub pm25: Option<f64>,
    #[serde(rename = "pollution_pm10", default)]
    pub pm10: Option<f64>,
    #[serde(rename = "pollution_no2", default)]
    pub no2: Option<f64>,
    #[serde(rename = "pollution_o3", default)]
    pub o3: Option<f64>,
    #[serde(rename = "pollution_so2", default)]
    pub so2: Option<f64>,
    #[serde(rename = "pollution_co", default)]
    pub co: Option<f64>,
    #[serde(rename = "nb_polluants_disponibles", default)]
    pub pollutants_available: u32,
    #[serde(rename = "score_qualite", default)]
    pub quality_score: Option<f64>,
}

impl CountryRecord {
    pub fn value(&self, pollutant: Pollutant) -> Option<f64> {
        match pollutant {
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
            Pollutant::No2 => self.no2,
            Pollutant::O3 => self.o3,
            Pollutant::So2 => self.so2,
            Pollutant::Co => self.co,
        }
    }
}

/// Extracts the paired sample for (a, b): values from every row where both
/// pollutants are present, in row order. The two arrays stay index-aligned,
/// so position i of each comes from the same country.
pub fn paired_sample(
    rows: &[CountryRecord],
    a: Pollutant,
    b: Pollutant,
) -> (Array1<f64>, Array1<f64>) {
    let mut xs = Vec::with_capacity(rows.len());
    let mut ys = Vec::with_capacity(rows.len());
    for row in rows {
        if let (Some(va), Some(vb)) = (row.value(a), row.value(b)) {
            xs.push(va);
            ys.push(vb);
        }
    }
    (Array1::from(xs), Array1::from(ys))
}
