use super::types::{Projection, ProjectionInputs, YearlyRecord};

const MONTHS_PER_YEAR: f64 = 12.0;
const MAX_PREALLOCATED_YEARS: u32 = 1_024;

pub fn run_projection(inputs: &ProjectionInputs) -> Projection {
    project(
        inputs.initial_amount,
        inputs.monthly_contribution,
        inputs.annual_interest_rate,
        inputs.inflation_rate,
        inputs.number_of_years,
    )
}

/// Projects a SIP year by year.
///
/// The lump sum compounds annually at the nominal rate while the monthly
/// contributions grow as an annuity-due compounded monthly. The monthly amount
/// is escalated by `inflation_rate` after each year, and each year's annuity
/// is valued as if that year's amount had been paid since month one.
///
/// A zero horizon yields no rows and a maturity value equal to
/// `initial_amount`. A zero rate values contributions at their plain sum.
/// Any `u32` horizon is accepted; month counts and exponents are carried as
/// `f64` so long horizons never overflow.
pub fn project(
    initial_amount: f64,
    monthly_contribution: f64,
    annual_interest_rate: f64,
    inflation_rate: f64,
    number_of_years: u32,
) -> Projection {
    let monthly_rate = annual_interest_rate / 12.0 / 100.0;
    let annual_growth = 1.0 + annual_interest_rate / 100.0;
    let escalation = 1.0 + inflation_rate / 100.0;

    let mut years = Vec::with_capacity(number_of_years.min(MAX_PREALLOCATED_YEARS) as usize);
    let mut adjusted_monthly = monthly_contribution;
    let mut cumulative_invested = initial_amount;
    let mut previous_initial_interest = 0.0;
    let mut maturity_value = initial_amount;

    for year in 1..=number_of_years {
        let months_elapsed = f64::from(year) * MONTHS_PER_YEAR;
        cumulative_invested += adjusted_monthly * MONTHS_PER_YEAR;

        let fv_initial = initial_amount * annual_growth.powf(f64::from(year));
        let fv_monthly = annuity_due_future_value(adjusted_monthly, monthly_rate, months_elapsed);

        let total_interest =
            (fv_initial + fv_monthly) - (initial_amount + adjusted_monthly * months_elapsed);
        maturity_value = cumulative_invested + total_interest;

        let yearly_interest = total_interest - previous_initial_interest;
        previous_initial_interest = fv_initial - initial_amount;

        years.push(YearlyRecord {
            year,
            monthly_contribution: adjusted_monthly,
            cumulative_invested,
            yearly_interest,
            total_interest,
            maturity_value,
        });

        adjusted_monthly *= escalation;
    }

    Projection {
        years,
        maturity_value,
    }
}

fn annuity_due_future_value(payment: f64, periodic_rate: f64, periods: f64) -> f64 {
    if periodic_rate == 0.0 {
        return payment * periods;
    }
    // (1 + r)^n - 1 without cancellation for rates near zero.
    let growth_minus_one = (periods * periodic_rate.ln_1p()).exp_m1();
    payment * (growth_minus_one / periodic_rate) * (1.0 + periodic_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_inputs() -> ProjectionInputs {
        ProjectionInputs {
            initial_amount: 1_500_000.0,
            monthly_contribution: 15_000.0,
            annual_interest_rate: 15.0,
            inflation_rate: 0.0,
            number_of_years: 15,
        }
    }

    #[test]
    fn zero_years_yields_no_rows_and_keeps_initial_amount() {
        let mut inputs = sample_inputs();
        inputs.number_of_years = 0;

        let projection = run_projection(&inputs);
        assert!(projection.years.is_empty());
        assert_approx(projection.maturity_value, inputs.initial_amount);
    }

    #[test]
    fn single_year_scenario_matches_hand_computed_values() {
        let projection = project(1_500_000.0, 15_000.0, 15.0, 0.0, 1);
        assert_eq!(projection.years.len(), 1);

        let row = projection.years[0];
        assert_eq!(row.year, 1);
        assert_approx(row.monthly_contribution, 15_000.0);
        assert_approx(row.cumulative_invested, 1_680_000.0);

        let monthly_rate: f64 = 0.0125;
        let fv_monthly =
            15_000.0 * ((1.0 + monthly_rate).powi(12) - 1.0) / monthly_rate * (1.0 + monthly_rate);
        let expected_interest = 225_000.0 + (fv_monthly - 180_000.0);

        assert_approx(row.total_interest, expected_interest);
        assert_approx(row.yearly_interest, expected_interest);
        assert_approx(row.maturity_value, 1_680_000.0 + expected_interest);
        assert!(row.maturity_value > row.cumulative_invested);
        assert_approx(projection.maturity_value, row.maturity_value);
    }

    #[test]
    fn yearly_interest_nets_out_previous_lump_sum_growth() {
        let projection = project(1_500_000.0, 15_000.0, 15.0, 0.0, 2);
        let second = projection.years[1];

        let previous_initial_interest = 1_500_000.0 * 1.15 - 1_500_000.0;
        assert_approx(
            second.yearly_interest,
            second.total_interest - previous_initial_interest,
        );
    }

    #[test]
    fn zero_rate_produces_no_interest_and_finite_values() {
        let projection = project(250_000.0, 5_000.0, 0.0, 6.0, 10);

        assert_eq!(projection.years.len(), 10);
        for row in &projection.years {
            assert!(row.maturity_value.is_finite());
            assert_approx(row.yearly_interest, 0.0);
            assert_approx(row.total_interest, 0.0);
            assert_approx(row.maturity_value, row.cumulative_invested);
        }
    }

    #[test]
    fn inflation_escalates_monthly_amount_after_each_year() {
        let projection = project(0.0, 10_000.0, 12.0, 10.0, 3);

        assert_approx(projection.years[0].monthly_contribution, 10_000.0);
        assert_approx(projection.years[1].monthly_contribution, 11_000.0);
        assert_approx_tol(projection.years[2].monthly_contribution, 12_100.0, 1e-6);
        assert_approx_tol(
            projection.years[2].cumulative_invested,
            (10_000.0 + 11_000.0 + 12_100.0) * 12.0,
            1e-6,
        );
    }

    #[test]
    fn aggregate_maturity_value_is_last_row() {
        let projection = run_projection(&sample_inputs());
        let last = projection.years.last().expect("non-empty horizon");
        assert_eq!(last.year, 15);
        assert_eq!(projection.maturity_value.to_bits(), last.maturity_value.to_bits());
    }

    #[test]
    fn negative_rate_shrinks_lump_sum() {
        let projection = project(100_000.0, 0.0, -10.0, 0.0, 1);
        assert_approx(projection.years[0].maturity_value, 90_000.0);
        assert_approx(projection.years[0].yearly_interest, -10_000.0);
    }

    #[test]
    fn near_zero_rates_stay_close_to_plain_sum() {
        for rate in [1e-14, 1e-12, 1e-9, 1e-6] {
            let projection = project(0.0, 10_000.0, rate, 0.0, 1);
            let row = projection.years[0];

            assert_approx(row.cumulative_invested, 120_000.0);
            assert!(
                row.maturity_value + EPS >= row.cumulative_invested,
                "rate {rate}: maturity {} below invested {}",
                row.maturity_value,
                row.cumulative_invested
            );
            assert_approx_tol(row.maturity_value, 120_000.0, 1e-2);
            assert!(row.yearly_interest >= -EPS);
        }
    }

    #[test]
    fn annuity_handles_month_counts_beyond_i32() {
        let periods = f64::from(u32::MAX) * MONTHS_PER_YEAR;
        assert_approx(annuity_due_future_value(1.0, 0.0, periods), periods);

        let value = annuity_due_future_value(1.0, 1e-12, periods);
        assert!(value.is_finite());
        assert!(value >= periods);
    }

    #[test]
    fn large_horizon_rows_keep_their_year_numbers() {
        let projection = project(1_000.0, 0.0, 0.0, 0.0, 2_000);
        assert_eq!(projection.years.len(), 2_000);
        assert_eq!(projection.years[1_999].year, 2_000);
        assert_approx(projection.maturity_value, 1_000.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_projection_invariants_hold(
            initial in 0u32..5_000_000,
            monthly in 0u32..200_000,
            rate_bp in 0u32..3_000,
            rate_scale_exp in 0i32..16,
            inflation_bp in 0u32..1_500,
            years in 0u32..41
        ) {
            let inputs = ProjectionInputs {
                initial_amount: initial as f64,
                monthly_contribution: monthly as f64,
                annual_interest_rate: rate_bp as f64 / 100.0 * 10f64.powi(-rate_scale_exp),
                inflation_rate: inflation_bp as f64 / 100.0,
                number_of_years: years,
            };
            let projection = run_projection(&inputs);
            prop_assert_eq!(projection.years.len(), years as usize);

            let escalation = 1.0 + inputs.inflation_rate / 100.0;
            let mut expected_invested = inputs.initial_amount;
            let mut previous: Option<YearlyRecord> = None;

            for (idx, row) in projection.years.iter().enumerate() {
                prop_assert_eq!(row.year, idx as u32 + 1);
                expected_invested += row.monthly_contribution * 12.0;
                let tol = 1e-9 * expected_invested.max(1.0);
                prop_assert!((row.cumulative_invested - expected_invested).abs() <= tol);
                prop_assert!(row.maturity_value.is_finite());
                prop_assert!(row.maturity_value + tol >= row.cumulative_invested);
                prop_assert!(
                    (row.maturity_value - (row.cumulative_invested + row.total_interest)).abs()
                        <= tol
                );

                if let Some(prev) = previous {
                    prop_assert!(row.cumulative_invested >= prev.cumulative_invested);
                    let expected_monthly = prev.monthly_contribution * escalation;
                    prop_assert!(
                        (row.monthly_contribution - expected_monthly).abs()
                            <= 1e-9 * expected_monthly.max(1.0)
                    );
                }
                if inputs.inflation_rate == 0.0 {
                    prop_assert_eq!(
                        row.monthly_contribution.to_bits(),
                        inputs.monthly_contribution.to_bits()
                    );
                }
                previous = Some(*row);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_projection_is_idempotent(
            initial in 0u32..2_000_000,
            monthly in 0u32..100_000,
            rate_bp in -500i32..2_500,
            inflation_bp in 0u32..1_000,
            years in 0u32..30
        ) {
            let inputs = ProjectionInputs {
                initial_amount: initial as f64,
                monthly_contribution: monthly as f64,
                annual_interest_rate: rate_bp as f64 / 100.0,
                inflation_rate: inflation_bp as f64 / 100.0,
                number_of_years: years,
            };
            let first = run_projection(&inputs);
            let second = run_projection(&inputs);

            prop_assert_eq!(first.years.len(), second.years.len());
            prop_assert_eq!(first.maturity_value.to_bits(), second.maturity_value.to_bits());
            for (a, b) in first.years.iter().zip(&second.years) {
                prop_assert_eq!(a.maturity_value.to_bits(), b.maturity_value.to_bits());
                prop_assert_eq!(a.yearly_interest.to_bits(), b.yearly_interest.to_bits());
                prop_assert_eq!(a.cumulative_invested.to_bits(), b.cumulative_invested.to_bits());
                prop_assert_eq!(a.monthly_contribution.to_bits(), b.monthly_contribution.to_bits());
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_zero_rate_never_accrues_interest(
            initial in 0u32..2_000_000,
            monthly in 0u32..100_000,
            inflation_bp in 0u32..1_000,
            years in 1u32..40
        ) {
            let projection = project(
                initial as f64,
                monthly as f64,
                0.0,
                inflation_bp as f64 / 100.0,
                years,
            );
            for row in &projection.years {
                prop_assert!(row.yearly_interest.abs() <= 1e-6);
            }
        }
    }
}
