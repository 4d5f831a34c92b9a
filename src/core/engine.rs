use super::types::{
    ChartSeries, MONTHS_PER_YEAR, SimulationInput, SimulationResult, YearlySnapshot,
};

/// Interest accrues on the running balance before each month-end contribution.
/// Snapshots and the final value are rounded for display only.
pub fn simulate(input: &SimulationInput) -> SimulationResult {
    let total_months = input.total_months();
    let months_per_year = u64::from(MONTHS_PER_YEAR);
    let growth = 1.0 + input.monthly_rate();

    let mut total = 0.0_f64;
    let mut series = Vec::with_capacity(input.duration_years as usize);
    for month in 1..=total_months {
        total = total * growth + input.monthly_contribution;
        if month % months_per_year == 0 {
            series.push(YearlySnapshot {
                year_index: (month / months_per_year) as u32,
                accumulated_value: total.round(),
            });
        }
    }

    let total_invested = input.monthly_contribution * total_months as f64;
    let final_value = total.round();
    SimulationResult {
        total_invested,
        final_value,
        total_gain: final_value - total_invested,
        series,
    }
}

pub fn chart_series(result: &SimulationResult) -> ChartSeries {
    let (years, values) = result
        .series
        .iter()
        .map(|snapshot| {
            (
                format!("Year {}", snapshot.year_index),
                snapshot.accumulated_value,
            )
        })
        .unzip();
    ChartSeries { years, values }
}
