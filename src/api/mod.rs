use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{ChartSeries, SimulationInput, SimulationResult, chart_series, simulate};

pub const MAX_DURATION_YEARS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("--{flag} must be a finite number")]
    NotFinite { flag: &'static str },
    #[error("--monthly-contribution must be >= 0")]
    NegativeContribution,
    #[error("--annual-rate-percent must be >= 0")]
    NegativeRate,
    #[error("--duration-years must be a whole number of years")]
    FractionalDuration,
    #[error("--duration-years must be between 1 and {max}")]
    DurationOutOfRange { max: u32 },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

// JSON clients send numbers; query strings and text inputs send strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    // Blank text counts as zero, unparsable text as NaN.
    fn coerce(&self) -> f64 {
        match self {
            FieldValue::Number(v) => *v,
            FieldValue::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    0.0
                } else {
                    text.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    #[serde(alias = "monthlyInvestment")]
    monthly_contribution: Option<FieldValue>,
    #[serde(alias = "years")]
    duration_years: Option<FieldValue>,
    #[serde(alias = "interestRate")]
    annual_rate_percent: Option<FieldValue>,
}

#[derive(Parser, Debug)]
#[command(
    name = "sip",
    about = "Projects the value of a systematic monthly investment plan",
    allow_negative_numbers = true
)]
pub struct Cli {
    #[arg(long, default_value_t = 10_000.0, help = "Amount invested every month")]
    monthly_contribution: f64,
    #[arg(long, default_value_t = 10.0, help = "Investment period in whole years")]
    duration_years: f64,
    #[arg(
        long,
        default_value_t = 12.0,
        help = "Expected nominal annual return in percent, e.g. 12"
    )]
    annual_rate_percent: f64,
    #[arg(long, help = "Include year labels and values for charting")]
    chart: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    input: SimulationInput,
    #[serde(flatten)]
    result: SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart: Option<ChartSeries>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn build_input(cli: &Cli) -> Result<SimulationInput, InputError> {
    for (flag, value) in [
        ("monthly-contribution", cli.monthly_contribution),
        ("duration-years", cli.duration_years),
        ("annual-rate-percent", cli.annual_rate_percent),
    ] {
        if !value.is_finite() {
            return Err(InputError::NotFinite { flag });
        }
    }

    if cli.monthly_contribution < 0.0 {
        return Err(InputError::NegativeContribution);
    }

    if cli.annual_rate_percent < 0.0 {
        return Err(InputError::NegativeRate);
    }

    if cli.duration_years.fract() != 0.0 {
        return Err(InputError::FractionalDuration);
    }

    if !(1.0..=MAX_DURATION_YEARS as f64).contains(&cli.duration_years) {
        return Err(InputError::DurationOutOfRange {
            max: MAX_DURATION_YEARS,
        });
    }

    Ok(SimulationInput {
        monthly_contribution: cli.monthly_contribution,
        duration_years: cli.duration_years as u32,
        annual_rate_percent: cli.annual_rate_percent,
    })
}

fn default_cli_for_api() -> Cli {
    let defaults = SimulationInput::default();
    Cli {
        monthly_contribution: defaults.monthly_contribution,
        duration_years: defaults.duration_years as f64,
        annual_rate_percent: defaults.annual_rate_percent,
        chart: true,
    }
}

fn api_input_from_payload(payload: SimulatePayload) -> Result<SimulationInput, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v.coerce();
    }
    if let Some(v) = payload.duration_years {
        cli.duration_years = v.coerce();
    }
    if let Some(v) = payload.annual_rate_percent {
        cli.annual_rate_percent = v.coerce();
    }

    build_input(&cli)
}

#[cfg(test)]
fn api_input_from_json(json: &str) -> Result<SimulationInput, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_input_from_payload(payload).map_err(|e| e.to_string())
}

fn build_simulate_response(input: SimulationInput, include_chart: bool) -> SimulateResponse {
    let result = simulate(&input);
    let chart = include_chart.then(|| chart_series(&result));
    SimulateResponse {
        input,
        result,
        chart,
    }
}

pub fn run_cli(cli: Cli) -> Result<String, CliError> {
    let input = build_input(&cli)?;
    let response = build_simulate_response(input, cli.chart);
    Ok(serde_json::to_string_pretty(&response)?)
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/defaults", get(defaults_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "SIP HTTP API listening");
    info!("Local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn defaults_handler() -> Response {
    json_response(StatusCode::OK, SimulationInput::default())
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let input = match api_input_from_payload(payload) {
        Ok(input) => input,
        Err(err) => {
            warn!(error = %err, "rejected simulation input");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    let response = build_simulate_response(input, true);
    debug!(
        monthly_contribution = input.monthly_contribution,
        duration_years = input.duration_years,
        annual_rate_percent = input.annual_rate_percent,
        final_value = response.result.final_value,
        "simulation computed"
    );
    json_response(StatusCode::OK, response)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
