mod engine;
mod types;

pub use engine::{chart_series, simulate};
pub use types::{ChartSeries, SimulationInput, SimulationResult, YearlySnapshot};
