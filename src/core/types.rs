use serde::Serialize;

/// Request keys accepted by the HTTP boundary, in prompt order.
pub const SCENARIO_FIELDS: [&str; 21] = [
    "home_price",
    "down_payment_pct",
    "mortgage_rate_annual",
    "mortgage_term_years",
    "property_tax_rate_annual",
    "maintenance_annual",
    "insurance_annual",
    "hoa_monthly",
    "closing_costs_buy_pct",
    "closing_costs_sell_pct",
    "rent_current",
    "rent_growth_annual",
    "alt_invest_growth_annual",
    "monthly_invest_growth_annual",
    "home_appreciation_annual",
    "tax_rate",
    "property_tax_deduction_cap",
    "months_live_in",
    "months_rent_out",
    "rent_while_out",
    "rent_collected_home",
];

/// Longest horizon a single run will simulate (100 years).
pub const MAX_HORIZON_MONTHS: u32 = 1_200;

/// Longest mortgage term accepted at the HTTP boundary.
pub const MAX_MORTGAGE_TERM_YEARS: u32 = 100;

/// Full input set for one buy-versus-rent run. Rates are fractional annual
/// rates (0.06 for 6%).
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioParameters {
    pub home_price: f64,
    pub down_payment_pct: f64,
    pub mortgage_rate_annual: f64,
    pub mortgage_term_years: u32,
    pub property_tax_rate_annual: f64,
    pub maintenance_annual: f64,
    pub insurance_annual: f64,
    pub hoa_monthly: f64,
    pub closing_costs_buy_pct: f64,
    pub closing_costs_sell_pct: f64,
    pub rent_current: f64,
    pub rent_growth_annual: f64,
    pub alt_invest_growth_annual: f64,
    pub monthly_invest_growth_annual: f64,
    pub home_appreciation_annual: f64,
    pub tax_rate: f64,
    pub property_tax_deduction_cap: f64,
    pub months_live_in: u32,
    pub months_rent_out: u32,
    pub rent_while_out: f64,
    pub rent_collected_home: f64,
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self {
            home_price: 900_000.0,
            down_payment_pct: 0.20,
            mortgage_rate_annual: 0.06,
            mortgage_term_years: 30,
            property_tax_rate_annual: 0.011,
            maintenance_annual: 5_000.0,
            insurance_annual: 3_500.0,
            hoa_monthly: 300.0,
            closing_costs_buy_pct: 0.04,
            closing_costs_sell_pct: 0.06,
            rent_current: 2_400.0,
            rent_growth_annual: 0.04,
            alt_invest_growth_annual: 0.16,
            monthly_invest_growth_annual: 0.15,
            home_appreciation_annual: 0.08,
            tax_rate: 0.30,
            property_tax_deduction_cap: 10_000.0,
            months_live_in: 36,
            months_rent_out: 36,
            rent_while_out: 2_500.0,
            rent_collected_home: 3_500.0,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    LiveIn,
    RentOut,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Rent,
}

impl Recommendation {
    /// Strict comparison; a tie favours renting.
    pub fn from_positions(owning_effective_net: f64, renting_effective_net: f64) -> Self {
        if owning_effective_net > renting_effective_net {
            Recommendation::Buy
        } else {
            Recommendation::Rent
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Recommendation::Buy => "Buying and then renting out is more favorable",
            Recommendation::Rent => "Renting the entire period is more favorable",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PaymentSplit {
    pub principal: f64,
    pub interest: f64,
}

/// One simulated month. `month` is 1-based.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LedgerMonth {
    pub month: u32,
    pub phase: Phase,
    pub principal_before: f64,
    pub principal_after: f64,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub carrying_cost: f64,
    pub deductible: f64,
    pub tax_saving: f64,
    pub comparison_rent: f64,
    pub rent_collected: f64,
    pub rent_paid_elsewhere: f64,
    pub cash_flow: f64,
    pub investment_contribution: f64,
    pub investment_balance: f64,
    pub home_value: f64,
    pub equity: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct YearlyTaxRecord {
    pub year: u32,
    pub mortgage_interest: f64,
    pub property_tax: f64,
    pub total_deductions: f64,
    pub tax_savings: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub total_months: u32,
    pub down_payment: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub closing_costs_buy: f64,
    pub home_value_after: f64,
    pub remaining_principal: f64,
    pub selling_costs: f64,
    pub final_equity: f64,
    pub total_monthly_paid: f64,
    pub total_tax_savings: f64,
    pub total_buying_cost: f64,
    pub net_cost_after_selling: f64,
    pub total_rent_no_buy: f64,
    pub total_rental_income: f64,
    pub total_rent_paid_out: f64,
    pub fv_monthly_invest: f64,
    pub fv_down_payment: f64,
    pub fv_principal_opportunity: f64,
    pub fv_invest_if_rent: f64,
    pub owning_effective_net: f64,
    pub renting_effective_net: f64,
    pub recommendation: Recommendation,
    pub ledger: Vec<LedgerMonth>,
    pub amortization: Vec<AmortizationYear>,
    pub yearly_tax: Vec<YearlyTaxRecord>,
}
