use super::amortization::fixed_payment;
use super::types::{PaymentSplit, ScenarioParameters};

/// Static carrying-cost model for the purchased home. Built once per run
/// and never mutated; a different mortgage rate produces a new profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyCostProfile {
    pub home_price: f64,
    pub down_payment: f64,
    pub loan_amount: f64,
    pub mortgage_rate_annual: f64,
    pub mortgage_term_years: u32,
    pub property_tax_annual: f64,
    pub maintenance_annual: f64,
    pub insurance_annual: f64,
    pub hoa_monthly: f64,
}

impl PropertyCostProfile {
    pub fn from_parameters(params: &ScenarioParameters) -> Self {
        Self {
            home_price: params.home_price,
            down_payment: params.home_price * params.down_payment_pct,
            loan_amount: params.home_price * (1.0 - params.down_payment_pct),
            mortgage_rate_annual: params.mortgage_rate_annual,
            mortgage_term_years: params.mortgage_term_years,
            property_tax_annual: params.home_price * params.property_tax_rate_annual,
            maintenance_annual: params.maintenance_annual,
            insurance_annual: params.insurance_annual,
            hoa_monthly: params.hoa_monthly,
        }
    }

    pub fn with_mortgage_rate(self, mortgage_rate_annual: f64) -> Self {
        Self {
            mortgage_rate_annual,
            ..self
        }
    }

    pub fn monthly_payment(&self) -> f64 {
        self.payment_at_rate(self.mortgage_rate_annual)
    }

    pub fn payment_at_rate(&self, annual_rate: f64) -> f64 {
        fixed_payment(self.loan_amount, annual_rate, self.mortgage_term_years)
    }

    pub fn monthly_property_tax(&self) -> f64 {
        self.property_tax_annual / 12.0
    }

    pub fn monthly_maintenance(&self) -> f64 {
        self.maintenance_annual / 12.0
    }

    pub fn monthly_insurance(&self) -> f64 {
        self.insurance_annual / 12.0
    }

    /// Mortgage payment plus tax, maintenance, insurance and HOA.
    pub fn monthly_costs(&self) -> f64 {
        self.monthly_payment()
            + self.monthly_property_tax()
            + self.monthly_maintenance()
            + self.monthly_insurance()
            + self.hoa_monthly
    }

    /// Splits the level payment against `outstanding_principal`. The caller
    /// owns the running balance. Interest above the payment yields a
    /// negative principal portion, which is passed through unchanged.
    pub fn split_payment(&self, outstanding_principal: f64, annual_rate: f64) -> PaymentSplit {
        let interest = outstanding_principal * (annual_rate / 12.0);
        let principal = self.payment_at_rate(annual_rate) - interest;
        PaymentSplit {
            principal,
            interest,
        }
    }
}
