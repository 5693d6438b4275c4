use axum::{
    Router,
    extract::{Json, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use log::{info, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{
    MAX_HORIZON_MONTHS, MAX_MORTGAGE_TERM_YEARS, SCENARIO_FIELDS, ScenarioParameters,
    ScenarioReport, SimulationError, simulate,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid numeric value: {field}: {reason}")]
    InvalidNumeric { field: &'static str, reason: String },

    #[error("Invalid JSON payload: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router() -> Router {
    Router::new()
        .route("/api/simulate", post(simulate_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(host: IpAddr, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::new(host, port);
    let listener = TcpListener::bind(addr).await?;
    info!("rent-vs-buy HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_handler(payload: Result<Json<Value>, JsonRejection>) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            let err = ApiError::InvalidPayload(rejection.body_text());
            warn!("rejected simulate request: {err}");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    match run_simulation_request(&body) {
        Ok(report) => json_response(StatusCode::OK, report),
        Err(err) => {
            warn!("rejected simulate request: {err}");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    }
}

fn run_simulation_request(body: &Value) -> Result<ScenarioReport, ApiError> {
    let params = parameters_from_json(body)?;
    let result = simulate(&params)?;
    Ok(ScenarioReport::new(&params, &result))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
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

/// Presence is checked for every field before any value is coerced, so a
/// request missing several fields names all of them at once.
pub fn parameters_from_json(body: &Value) -> Result<ScenarioParameters, ApiError> {
    let Some(fields) = body.as_object() else {
        return Err(ApiError::InvalidPayload(
            "expected a JSON object of scenario fields".to_string(),
        ));
    };

    let missing = SCENARIO_FIELDS
        .iter()
        .filter(|name| !fields.contains_key(**name))
        .map(|name| name.to_string())
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(ApiError::MissingFields(missing));
    }

    Ok(ScenarioParameters {
        home_price: amount(fields, "home_price")?,
        down_payment_pct: amount(fields, "down_payment_pct")?,
        mortgage_rate_annual: amount(fields, "mortgage_rate_annual")?,
        mortgage_term_years: count(fields, "mortgage_term_years", MAX_MORTGAGE_TERM_YEARS)?,
        property_tax_rate_annual: amount(fields, "property_tax_rate_annual")?,
        maintenance_annual: amount(fields, "maintenance_annual")?,
        insurance_annual: amount(fields, "insurance_annual")?,
        hoa_monthly: amount(fields, "hoa_monthly")?,
        closing_costs_buy_pct: amount(fields, "closing_costs_buy_pct")?,
        closing_costs_sell_pct: amount(fields, "closing_costs_sell_pct")?,
        rent_current: amount(fields, "rent_current")?,
        rent_growth_annual: amount(fields, "rent_growth_annual")?,
        alt_invest_growth_annual: amount(fields, "alt_invest_growth_annual")?,
        monthly_invest_growth_annual: amount(fields, "monthly_invest_growth_annual")?,
        home_appreciation_annual: amount(fields, "home_appreciation_annual")?,
        tax_rate: amount(fields, "tax_rate")?,
        property_tax_deduction_cap: amount(fields, "property_tax_deduction_cap")?,
        months_live_in: count(fields, "months_live_in", MAX_HORIZON_MONTHS)?,
        months_rent_out: count(fields, "months_rent_out", MAX_HORIZON_MONTHS)?,
        rent_while_out: amount(fields, "rent_while_out")?,
        rent_collected_home: amount(fields, "rent_collected_home")?,
    })
}

/// Accepts JSON numbers and numeric strings.
fn amount(fields: &Map<String, Value>, field: &'static str) -> Result<f64, ApiError> {
    let value = match fields.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(invalid(field, fields.get(field), "expected a number")),
    }
}

/// Accepts non-negative integers, integer strings, and JSON floats, which
/// are truncated toward zero. Values above `max` are rejected.
fn count(fields: &Map<String, Value>, field: &'static str, max: u32) -> Result<u32, ApiError> {
    let raw = fields.get(field);
    let value = match raw {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(v) => u32::try_from(v).ok(),
            None => n
                .as_f64()
                .filter(|v| v.is_finite() && *v > -1.0 && *v < f64::from(u32::MAX))
                .map(|v| v.trunc() as u32),
        },
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    value
        .filter(|v| *v <= max)
        .ok_or_else(|| invalid(field, raw, &format!("expected an integer from 0 to {max}")))
}

fn invalid(field: &'static str, raw: Option<&Value>, expected: &str) -> ApiError {
    let shown = raw.map_or_else(|| "null".to_string(), Value::to_string);
    ApiError::InvalidNumeric {
        field,
        reason: format!("{expected}, got {shown}"),
    }
}
