mod amortization;
mod engine;
mod error;
mod occupancy;
mod property;
mod report;
mod types;

pub use amortization::{
    InvestmentAccumulator, fixed_payment, future_value_lump_sum, future_value_of_series,
    monthly_rate_from_annual, project_stepped_growth,
};
pub use engine::{simulate, simulate_with};
pub use error::SimulationError;
pub use occupancy::OccupancyTimeline;
pub use property::PropertyCostProfile;
pub use report::{
    CostsSection, FinalComparisonSection, GraphData, InvestmentSection, MonthlyCostsSection,
    MonthlyData, RentComparisonSection, RentalAnalysisSection, ScenarioReport, SummarySection,
    TaxAnalysisSection,
};
pub use types::{
    AmortizationYear, LedgerMonth, MAX_HORIZON_MONTHS, MAX_MORTGAGE_TERM_YEARS, PaymentSplit,
    Phase, Recommendation, SCENARIO_FIELDS, ScenarioParameters, ScenarioResult, YearlyTaxRecord,
};
