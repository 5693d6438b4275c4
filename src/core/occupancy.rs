use super::amortization::project_stepped_growth;
use super::error::SimulationError;
use super::property::PropertyCostProfile;
use super::types::{MAX_HORIZON_MONTHS, Phase, ScenarioParameters};

/// Live-in months followed by rent-out months on a 1-based month clock.
///
/// The comparison-rent series covers every month of the horizon. Rent
/// collected and rent paid elsewhere are projected from the first rent-out
/// month and read as zero outside that window.
#[derive(Debug, Clone)]
pub struct OccupancyTimeline {
    property: PropertyCostProfile,
    months_live_in: u32,
    months_rent_out: u32,
    comparison_rent: Vec<f64>,
    rent_collected: Vec<f64>,
    rent_paid_elsewhere: Vec<f64>,
}

impl OccupancyTimeline {
    /// Fails with `HorizonTooLong` before any series is allocated when the
    /// two phases together exceed `MAX_HORIZON_MONTHS`.
    pub fn new(
        property: PropertyCostProfile,
        months_live_in: u32,
        months_rent_out: u32,
        rent_current: f64,
        rent_while_out: f64,
        rent_collected_home: f64,
        rent_growth_annual: f64,
    ) -> Result<Self, SimulationError> {
        let months = u64::from(months_live_in) + u64::from(months_rent_out);
        let total_months = u32::try_from(months)
            .ok()
            .filter(|m| *m <= MAX_HORIZON_MONTHS)
            .ok_or(SimulationError::HorizonTooLong {
                months,
                max: MAX_HORIZON_MONTHS,
            })?;
        Ok(Self {
            property,
            months_live_in,
            months_rent_out,
            comparison_rent: project_stepped_growth(rent_current, total_months, rent_growth_annual),
            rent_collected: project_stepped_growth(
                rent_collected_home,
                months_rent_out,
                rent_growth_annual,
            ),
            rent_paid_elsewhere: project_stepped_growth(
                rent_while_out,
                months_rent_out,
                rent_growth_annual,
            ),
        })
    }

    /// Rent-out figures are zeroed when the scenario never rents the home out.
    pub fn from_parameters(
        params: &ScenarioParameters,
        property: PropertyCostProfile,
    ) -> Result<Self, SimulationError> {
        let renting_out = params.months_rent_out > 0;
        Self::new(
            property,
            params.months_live_in,
            params.months_rent_out,
            params.rent_current,
            if renting_out { params.rent_while_out } else { 0.0 },
            if renting_out { params.rent_collected_home } else { 0.0 },
            params.rent_growth_annual,
        )
    }

    pub fn total_months(&self) -> u32 {
        self.months_live_in + self.months_rent_out
    }

    pub fn months_live_in(&self) -> u32 {
        self.months_live_in
    }

    pub fn months_rent_out(&self) -> u32 {
        self.months_rent_out
    }

    pub fn phase(&self, month: u32) -> Phase {
        if month <= self.months_live_in {
            Phase::LiveIn
        } else {
            Phase::RentOut
        }
    }

    pub fn comparison_rent_series(&self) -> &[f64] {
        &self.comparison_rent
    }

    pub fn comparison_rent(&self, month: u32) -> f64 {
        month
            .checked_sub(1)
            .and_then(|idx| self.comparison_rent.get(idx as usize))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn rent_collected(&self, month: u32) -> f64 {
        self.rent_out_value(&self.rent_collected, month)
    }

    pub fn rent_paid_elsewhere(&self, month: u32) -> f64 {
        self.rent_out_value(&self.rent_paid_elsewhere, month)
    }

    /// Net cash consequence of the month's occupancy: the full carrying cost
    /// while living in, rent collected less carrying cost and rent paid
    /// elsewhere once rented out.
    pub fn monthly_cash_flow(&self, month: u32) -> f64 {
        let carrying_cost = self.property.monthly_costs();
        match self.phase(month) {
            Phase::LiveIn => -carrying_cost,
            Phase::RentOut => {
                self.rent_collected(month) - carrying_cost - self.rent_paid_elsewhere(month)
            }
        }
    }

    fn rent_out_value(&self, series: &[f64], month: u32) -> f64 {
        if month <= self.months_live_in {
            return 0.0;
        }
        let idx = (month - self.months_live_in - 1) as usize;
        series.get(idx).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn timeline(params: &ScenarioParameters) -> OccupancyTimeline {
        OccupancyTimeline::from_parameters(params, PropertyCostProfile::from_parameters(params))
            .expect("horizon within bounds")
    }

    #[test]
    fn phases_switch_after_live_in_months() {
        let params = ScenarioParameters {
            months_live_in: 3,
            months_rent_out: 2,
            ..ScenarioParameters::default()
        };
        let occupancy = timeline(&params);
        assert_eq!(occupancy.total_months(), 5);
        assert_eq!(occupancy.phase(1), Phase::LiveIn);
        assert_eq!(occupancy.phase(3), Phase::LiveIn);
        assert_eq!(occupancy.phase(4), Phase::RentOut);
        assert_eq!(occupancy.phase(5), Phase::RentOut);
    }

    #[test]
    fn comparison_rent_covers_whole_horizon_from_current_rent() {
        let params = ScenarioParameters {
            months_live_in: 12,
            months_rent_out: 13,
            ..ScenarioParameters::default()
        };
        let occupancy = timeline(&params);
        assert_eq!(occupancy.comparison_rent_series().len(), 25);
        assert_approx(occupancy.comparison_rent(1), 2_400.0);
        assert_approx(occupancy.comparison_rent(13), 2_496.0);
        assert_approx(occupancy.comparison_rent(25), 2_400.0 * 1.04 * 1.04);
        assert_approx(occupancy.comparison_rent(0), 0.0);
        assert_approx(occupancy.comparison_rent(26), 0.0);
    }

    #[test]
    fn rent_out_series_start_at_first_rent_out_month() {
        let params = ScenarioParameters {
            months_live_in: 6,
            months_rent_out: 14,
            ..ScenarioParameters::default()
        };
        let occupancy = timeline(&params);
        assert_approx(occupancy.rent_collected(6), 0.0);
        assert_approx(occupancy.rent_paid_elsewhere(6), 0.0);
        assert_approx(occupancy.rent_collected(7), 3_500.0);
        assert_approx(occupancy.rent_paid_elsewhere(7), 2_500.0);
        assert_approx(occupancy.rent_collected(18), 3_500.0);
        assert_approx(occupancy.rent_collected(19), 3_500.0 * 1.04);
        assert_approx(occupancy.rent_paid_elsewhere(20), 2_500.0 * 1.04);
    }

    #[test]
    fn cash_flow_depends_on_phase() {
        let params = ScenarioParameters {
            months_live_in: 2,
            months_rent_out: 2,
            ..ScenarioParameters::default()
        };
        let property = PropertyCostProfile::from_parameters(&params);
        let occupancy =
            OccupancyTimeline::from_parameters(&params, property).expect("horizon within bounds");
        let carrying = property.monthly_costs();
        assert_approx(occupancy.monthly_cash_flow(1), -carrying);
        assert_approx(occupancy.monthly_cash_flow(3), 3_500.0 - carrying - 2_500.0);
    }

    #[test]
    fn no_rent_out_months_zeroes_rental_figures() {
        let params = ScenarioParameters {
            months_live_in: 24,
            months_rent_out: 0,
            rent_while_out: 2_500.0,
            rent_collected_home: 3_500.0,
            ..ScenarioParameters::default()
        };
        let occupancy = timeline(&params);
        assert_eq!(occupancy.comparison_rent_series().len(), 24);
        for month in 1..=24 {
            assert_eq!(occupancy.phase(month), Phase::LiveIn);
            assert_eq!(occupancy.rent_collected(month), 0.0);
            assert_eq!(occupancy.rent_paid_elsewhere(month), 0.0);
        }
    }

    #[test]
    fn horizon_longer_than_supported_is_rejected() {
        let params = ScenarioParameters {
            months_live_in: MAX_HORIZON_MONTHS,
            months_rent_out: 1,
            ..ScenarioParameters::default()
        };
        let property = PropertyCostProfile::from_parameters(&params);
        assert_eq!(
            OccupancyTimeline::from_parameters(&params, property).err(),
            Some(SimulationError::HorizonTooLong {
                months: u64::from(MAX_HORIZON_MONTHS) + 1,
                max: MAX_HORIZON_MONTHS,
            })
        );
    }

    #[test]
    fn month_counts_that_overflow_u32_are_rejected() {
        let params = ScenarioParameters {
            months_live_in: u32::MAX,
            months_rent_out: 1,
            ..ScenarioParameters::default()
        };
        let property = PropertyCostProfile::from_parameters(&params);
        assert_eq!(
            OccupancyTimeline::from_parameters(&params, property).err(),
            Some(SimulationError::HorizonTooLong {
                months: u64::from(u32::MAX) + 1,
                max: MAX_HORIZON_MONTHS,
            })
        );
    }

    #[test]
    fn longest_supported_horizon_is_accepted() {
        let params = ScenarioParameters {
            months_live_in: MAX_HORIZON_MONTHS - 12,
            months_rent_out: 12,
            ..ScenarioParameters::default()
        };
        assert_eq!(timeline(&params).total_months(), MAX_HORIZON_MONTHS);
    }
}
