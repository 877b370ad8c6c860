use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInputs {
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    /// Nominal annual rate in percent, compounded monthly for contributions.
    pub annual_interest_rate: f64,
    /// Annual escalation of the monthly contribution in percent.
    pub inflation_rate: f64,
    pub number_of_years: u32,
}

/// One row of the projection table. Amounts are raw values, never formatted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRecord {
    pub year: u32,
    pub monthly_contribution: f64,
    pub cumulative_invested: f64,
    /// Interest attributed to this year alone. Approximate: only the lump
    /// sum's previous-year growth is netted out.
    pub yearly_interest: f64,
    pub total_interest: f64,
    pub maturity_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub years: Vec<YearlyRecord>,
    pub maturity_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InflationInsight {
    pub real_rate_of_return: f64,
    pub todays_value_withdrawal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub maturity_value: f64,
    pub total_invested: f64,
    pub total_interest: f64,
    pub monthly_withdrawal: f64,
    pub inflation: Option<InflationInsight>,
}
