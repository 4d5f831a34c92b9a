use serde::Serialize;

pub const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub monthly_contribution: f64,
    pub duration_years: u32,
    pub annual_rate_percent: f64,
}

impl SimulationInput {
    pub fn total_months(&self) -> u64 {
        u64::from(self.duration_years) * u64::from(MONTHS_PER_YEAR)
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / MONTHS_PER_YEAR as f64 / 100.0
    }
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            monthly_contribution: 10_000.0,
            duration_years: 10,
            annual_rate_percent: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySnapshot {
    pub year_index: u32,
    pub accumulated_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub total_invested: f64,
    pub final_value: f64,
    pub total_gain: f64,
    pub series: Vec<YearlySnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub years: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}
