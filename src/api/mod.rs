mod coerce;
mod error;

use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    Projection, ProjectionInputs, ProjectionSummary, YearlyRecord, format_inr, run_projection,
    summarize,
};

pub use coerce::{parse_float_prefix, parse_int_prefix};
pub use error::{CliError, InputError};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Longest horizon accepted at the boundary.
pub const MAX_YEARS: u32 = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    #[serde(deserialize_with = "coerce::lenient_int")]
    initial_amount: Option<f64>,
    #[serde(deserialize_with = "coerce::lenient_int")]
    monthly_contribution: Option<f64>,
    #[serde(alias = "interestRate", deserialize_with = "coerce::lenient_float")]
    annual_interest_rate: Option<f64>,
    #[serde(deserialize_with = "coerce::lenient_float")]
    inflation_rate: Option<f64>,
    #[serde(alias = "years", deserialize_with = "coerce::lenient_int")]
    number_of_years: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sip",
    about = "SIP calculator: yearly projection of a lump sum plus monthly contributions"
)]
pub struct Cli {
    #[arg(long, default_value_t = 1_500_000.0, help = "Lump sum invested at year 0")]
    initial_amount: f64,
    #[arg(
        long,
        default_value_t = 15_000.0,
        help = "Amount invested at the start of each month of year 1"
    )]
    monthly_contribution: f64,
    #[arg(
        long,
        default_value_t = 15.0,
        allow_negative_numbers = true,
        help = "Nominal annual interest rate in percent, compounded monthly"
    )]
    interest_rate: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual escalation of the monthly contribution in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 15.0,
        help = "Investment horizon in years; fractions are truncated"
    )]
    years: f64,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    inputs: ProjectionInputs,
    years: Vec<YearlyRecord>,
    summary: ProjectionSummary,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_inputs(cli: &Cli) -> Result<ProjectionInputs, InputError> {
    for (field, value) in [
        ("initialAmount", cli.initial_amount),
        ("monthlyContribution", cli.monthly_contribution),
        ("annualInterestRate", cli.interest_rate),
        ("inflationRate", cli.inflation_rate),
        ("numberOfYears", cli.years),
    ] {
        if !value.is_finite() {
            return Err(InputError::NonFinite { field });
        }
    }

    if cli.initial_amount < 0.0 {
        return Err(InputError::Negative {
            field: "initialAmount",
        });
    }
    if cli.monthly_contribution < 0.0 {
        return Err(InputError::Negative {
            field: "monthlyContribution",
        });
    }
    if cli.interest_rate <= -100.0 {
        return Err(InputError::AtOrBelow {
            field: "annualInterestRate",
            min: -100.0,
        });
    }
    if cli.inflation_rate < 0.0 {
        return Err(InputError::Negative {
            field: "inflationRate",
        });
    }
    if cli.years < 0.0 {
        return Err(InputError::Negative {
            field: "numberOfYears",
        });
    }
    let years = cli.years.trunc();
    if years > f64::from(MAX_YEARS) {
        return Err(InputError::Above {
            field: "numberOfYears",
            max: f64::from(MAX_YEARS),
        });
    }

    Ok(ProjectionInputs {
        initial_amount: cli.initial_amount,
        monthly_contribution: cli.monthly_contribution,
        annual_interest_rate: cli.interest_rate,
        inflation_rate: cli.inflation_rate,
        number_of_years: years as u32,
    })
}

pub fn run_cli(cli: &Cli) -> Result<String, CliError> {
    let inputs = build_inputs(cli)?;
    let projection = run_projection(&inputs);
    let summary = summarize(&inputs, &projection);

    Ok(match cli.output {
        OutputFormat::Table => render_report(&inputs, &projection, &summary),
        OutputFormat::Json => {
            let response = build_project_response(inputs, projection, summary);
            serde_json::to_string_pretty(&response)?
        }
    })
}

fn render_report(
    inputs: &ProjectionInputs,
    projection: &Projection,
    summary: &ProjectionSummary,
) -> String {
    const HEADERS: [&str; 5] = [
        "Year",
        "Monthly Amount",
        "Total Invested",
        "Interest Amount",
        "Maturity Value",
    ];

    let rows: Vec<[String; 5]> = projection
        .years
        .iter()
        .map(|row| {
            [
                row.year.to_string(),
                format_inr(row.monthly_contribution),
                format_inr(row.cumulative_invested),
                format_inr(row.yearly_interest),
                format_inr(row.maturity_value),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Maturity Value: {}",
        format_inr(summary.maturity_value)
    );
    match summary.inflation {
        Some(insight) => {
            let _ = writeln!(
                out,
                "- Even though the estimated rate of return is {}%, if inflation rate of {}% is static, the real rate of interest is {:.2}%",
                inputs.annual_interest_rate, inputs.inflation_rate, insight.real_rate_of_return
            );
            let _ = writeln!(
                out,
                "- In {} years, the monthly amount you can withdraw will be {}",
                inputs.number_of_years,
                format_inr(summary.monthly_withdrawal)
            );
            let _ = writeln!(
                out,
                "- Adjusted for inflation provided, this amount will probably be equivalent to {} in today's value",
                format_inr(insight.todays_value_withdrawal)
            );
            let _ = writeln!(
                out,
                "- Try to increase your monthly investment amount so that it at least matches the current inflation rate."
            );
        }
        None => {
            let _ = writeln!(
                out,
                "- The maximum amount you can withdraw every month every year is {}",
                format_inr(summary.monthly_withdrawal)
            );
        }
    }
    out.push('\n');

    push_table_row(&mut out, &widths, HEADERS.iter().map(|h| h.to_string()));
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_table_row(&mut out, &widths, separator);
    for row in rows {
        push_table_row(&mut out, &widths, row);
    }
    out
}

fn push_table_row<I>(out: &mut String, widths: &[usize], cells: I)
where
    I: IntoIterator<Item = String>,
{
    let line: Vec<String> = cells
        .into_iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:>width$}"))
        .collect();
    let _ = writeln!(out, "{}", line.join("  "));
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("SIP HTTP API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/");
    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(payload: Result<Query<ProjectPayload>, QueryRejection>) -> Response {
    match payload {
        Ok(Query(payload)) => project_response(payload),
        Err(rejection) => rejected_payload_response(&rejection.body_text()),
    }
}

async fn project_post_handler(payload: Result<Json<ProjectPayload>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(payload)) => project_response(payload),
        Err(rejection) => rejected_payload_response(&rejection.body_text()),
    }
}

fn rejected_payload_response(reason: &str) -> Response {
    log::warn!("rejected projection payload: {reason}");
    error_response(StatusCode::BAD_REQUEST, reason)
}

fn project_response(payload: ProjectPayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(err) => {
            log::warn!("rejected projection request: {err}");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };
    log::debug!("projecting {inputs:?}");

    let projection = run_projection(&inputs);
    let summary = summarize(&inputs, &projection);
    json_response(
        StatusCode::OK,
        build_project_response(inputs, projection, summary),
    )
}

fn build_project_response(
    inputs: ProjectionInputs,
    projection: Projection,
    summary: ProjectionSummary,
) -> ProjectResponse {
    ProjectResponse {
        inputs,
        years: projection.years,
        summary,
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<ProjectionInputs, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload).map_err(|e| e.to_string())
}

fn inputs_from_payload(payload: ProjectPayload) -> Result<ProjectionInputs, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.initial_amount {
        cli.initial_amount = v;
    }
    if let Some(v) = payload.monthly_contribution {
        cli.monthly_contribution = v;
    }
    if let Some(v) = payload.annual_interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.inflation_rate {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.number_of_years {
        cli.years = v;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        initial_amount: 1_500_000.0,
        monthly_contribution: 15_000.0,
        interest_rate: 15.0,
        inflation_rate: 0.0,
        years: 15.0,
        output: OutputFormat::Json,
    }
}
