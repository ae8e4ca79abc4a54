pub mod artifacts;
pub mod dataset;
pub mod grid;
pub mod rank;
pub mod significance;
pub mod spearman;
pub mod stats;

pub use dataset::{CountryRecord, Pollutant};
pub use grid::{correlation_grid, strongest_pair, PollutantCorrelation};
pub use rank::rank_data;
pub use spearman::spearman_pair;
