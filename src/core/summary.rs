use super::types::{InflationInsight, Projection, ProjectionInputs, ProjectionSummary};

/// Share of the maturity value (percent) assumed withdrawable each month,
/// roughly a 10% annual drawdown.
pub const MONTHLY_WITHDRAWAL_RATE_PCT: f64 = 0.8333;

pub fn summarize(inputs: &ProjectionInputs, projection: &Projection) -> ProjectionSummary {
    let maturity_value = projection.maturity_value;
    let total_invested = projection
        .years
        .last()
        .map(|row| row.cumulative_invested)
        .unwrap_or(inputs.initial_amount);

    let inflation = (inputs.inflation_rate != 0.0).then(|| {
        let real_fraction = (inputs.annual_interest_rate - inputs.inflation_rate)
            / (100.0 + inputs.inflation_rate);
        InflationInsight {
            real_rate_of_return: 100.0 * real_fraction,
            todays_value_withdrawal: maturity_value * (real_fraction / 12.0),
        }
    });

    ProjectionSummary {
        maturity_value,
        total_invested,
        total_interest: maturity_value - total_invested,
        monthly_withdrawal: MONTHLY_WITHDRAWAL_RATE_PCT / 100.0 * maturity_value,
        inflation,
    }
}
