/// Level monthly payment for a fixed-rate loan. A zero rate falls back to
/// straight-line division of the principal.
pub fn fixed_payment(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    let periods = f64::from(term_years) * 12.0;
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return principal / periods;
    }
    let growth = (1.0 + monthly_rate).powf(periods);
    principal * (monthly_rate * growth) / (growth - 1.0)
}

pub fn future_value_lump_sum(amount: f64, annual_rate: f64, years: f64) -> f64 {
    amount * (1.0 + annual_rate).powf(years)
}

/// Future value at `horizon_periods` of end-of-period contributions; the
/// contribution at index `i` compounds for `horizon_periods - (i + 1)` periods.
pub fn future_value_of_series(contributions: &[f64], periodic_rate: f64, horizon_periods: u32) -> f64 {
    let horizon = f64::from(horizon_periods);
    contributions
        .iter()
        .enumerate()
        .map(|(idx, contribution)| {
            let periods_left = horizon - (idx as f64 + 1.0);
            contribution * (1.0 + periodic_rate).powf(periods_left)
        })
        .sum()
}

/// Monthly values that hold for each 12-month block and step up by
/// `(1 + annual_growth_rate)` at every year boundary.
pub fn project_stepped_growth(initial_value: f64, total_months: u32, annual_growth_rate: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(total_months as usize);
    let mut current = initial_value;
    for month in 1..=total_months {
        if month > 1 && (month - 1) % 12 == 0 {
            current *= 1.0 + annual_growth_rate;
        }
        values.push(current);
    }
    values
}

/// Geometric monthly equivalent of an annual growth rate.
pub fn monthly_rate_from_annual(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// Running balance of end-of-month contributions. After `n` pushes the
/// balance equals `future_value_of_series` over those `n` contributions
/// with a horizon of `n`, without revisiting earlier months.
#[derive(Debug, Clone, Copy)]
pub struct InvestmentAccumulator {
    periodic_rate: f64,
    balance: f64,
}

impl InvestmentAccumulator {
    pub fn new(periodic_rate: f64) -> Self {
        Self {
            periodic_rate,
            balance: 0.0,
        }
    }

    pub fn push(&mut self, contribution: f64) {
        self.balance = self.balance * (1.0 + self.periodic_rate) + contribution;
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

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

    #[test]
    fn fixed_payment_matches_standard_thirty_year_loan() {
        let payment = fixed_payment(720_000.0, 0.06, 30);
        assert_approx_tol(payment, 4_316.763_781, 1e-5);
    }

    #[test]
    fn fixed_payment_zero_rate_is_straight_line() {
        assert_approx(fixed_payment(120_000.0, 0.0, 10), 1_000.0);
    }

    #[test]
    fn fixed_payment_zero_term_is_not_finite() {
        assert!(!fixed_payment(100_000.0, 0.05, 0).is_finite());
        assert!(!fixed_payment(100_000.0, 0.0, 0).is_finite());
    }

    #[test]
    fn lump_sum_supports_fractional_years() {
        assert_approx(future_value_lump_sum(1_000.0, 0.10, 2.0), 1_210.0);
        assert_approx(
            future_value_lump_sum(1_000.0, 0.21, 0.5),
            1_000.0 * 1.1_f64,
        );
        assert_approx(future_value_lump_sum(500.0, 0.07, 0.0), 500.0);
    }

    #[test]
    fn series_future_value_matches_hand_calculation() {
        // 100 grows two periods, 200 one period, 300 none.
        let fv = future_value_of_series(&[100.0, 200.0, 300.0], 0.10, 3);
        assert_approx(fv, 100.0 * 1.21 + 200.0 * 1.1 + 300.0);
    }

    #[test]
    fn series_future_value_of_empty_series_is_zero() {
        assert_approx(future_value_of_series(&[], 0.05, 12), 0.0);
    }

    #[test]
    fn stepped_growth_steps_once_per_year() {
        let rents = project_stepped_growth(2_400.0, 25, 0.04);
        assert_eq!(rents.len(), 25);
        assert!(rents[..12].iter().all(|r| *r == 2_400.0));
        assert_approx(rents[12], 2_496.0);
        assert!(rents[12..24].iter().all(|r| *r == rents[12]));
        assert_approx(rents[24], 2_496.0 * 1.04);
    }

    #[test]
    fn stepped_growth_of_zero_months_is_empty() {
        assert!(project_stepped_growth(1_000.0, 0, 0.05).is_empty());
    }

    #[test]
    fn monthly_rate_compounds_back_to_annual() {
        let monthly = monthly_rate_from_annual(0.15);
        assert_approx((1.0 + monthly).powi(12), 1.15);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_stepped_growth_is_flat_within_each_year(
            initial in 1u32..10_000,
            months in 13u32..240,
            growth_bp in 0u32..2_000
        ) {
            let growth = growth_bp as f64 / 10_000.0;
            let values = project_stepped_growth(initial as f64, months, growth);
            prop_assert!(values.len() == months as usize);
            for block in values.chunks(12) {
                prop_assert!(block.iter().all(|v| *v == block[0]));
            }
            prop_assert!(values[12] == values[0] * (1.0 + growth));
        }

        #[test]
        fn prop_accumulator_agrees_with_series_revaluation(
            contributions in proptest::collection::vec(0u32..5_000, 1..120),
            rate_bp in 0u32..200
        ) {
            let rate = rate_bp as f64 / 10_000.0;
            let amounts = contributions.iter().map(|c| *c as f64).collect::<Vec<_>>();
            let mut acc = InvestmentAccumulator::new(rate);
            for (idx, amount) in amounts.iter().enumerate() {
                acc.push(*amount);
                let running = acc.balance();
                let revalued = future_value_of_series(&amounts[..=idx], rate, idx as u32 + 1);
                prop_assert!((running - revalued).abs() <= 1e-6 * revalued.max(1.0));
            }
        }
    }
}
