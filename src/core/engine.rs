use log::debug;

use super::amortization::{
    InvestmentAccumulator, future_value_lump_sum, future_value_of_series, monthly_rate_from_annual,
};
use super::error::{SimulationError, ensure_finite};
use super::occupancy::OccupancyTimeline;
use super::property::PropertyCostProfile;
use super::types::{
    AmortizationYear, LedgerMonth, Phase, Recommendation, ScenarioParameters, ScenarioResult,
    YearlyTaxRecord,
};

const MONTHS_PER_YEAR: usize = 12;

pub fn simulate(params: &ScenarioParameters) -> Result<ScenarioResult, SimulationError> {
    let property = PropertyCostProfile::from_parameters(params);
    let occupancy = OccupancyTimeline::from_parameters(params, property)?;
    simulate_with(params, &property, &occupancy)
}

/// Runs the monthly loop against prebuilt cost and occupancy models. The
/// models must belong to this run; nothing is cached between calls. The
/// mortgage rate is always read from `property`, so a profile built with
/// `with_mortgage_rate` drives the payment, the split and the carrying cost.
pub fn simulate_with(
    params: &ScenarioParameters,
    property: &PropertyCostProfile,
    occupancy: &OccupancyTimeline,
) -> Result<ScenarioResult, SimulationError> {
    let total_months = occupancy.total_months();
    if total_months == 0 {
        return Err(SimulationError::EmptyHorizon);
    }

    let monthly_payment = ensure_finite("monthly_payment", property.monthly_payment())?;
    debug!(
        "simulating {total_months} months: loan {:.2}, payment {monthly_payment:.2}",
        property.loan_amount
    );

    let ledger = run_monthly_ledger(params, property, occupancy);
    let last = ledger[ledger.len() - 1];

    let home_value_after = last.home_value;
    let remaining_principal = last.principal_after;
    let selling_costs = home_value_after * params.closing_costs_sell_pct;
    let final_equity = home_value_after - selling_costs - remaining_principal;

    let total_monthly_paid = ledger.iter().map(|m| m.carrying_cost).sum::<f64>();
    let total_tax_savings = ledger.iter().map(|m| m.tax_saving).sum::<f64>();
    let total_rent_no_buy = occupancy.comparison_rent_series().iter().sum::<f64>();
    let total_rental_income = ledger.iter().map(|m| m.rent_collected).sum::<f64>();
    let total_rent_paid_out = ledger.iter().map(|m| m.rent_paid_elsewhere).sum::<f64>();

    let invest_rate = monthly_rate_from_annual(params.monthly_invest_growth_annual);
    let alt_rate = monthly_rate_from_annual(params.alt_invest_growth_annual);
    let contributions = ledger
        .iter()
        .map(|m| m.investment_contribution)
        .collect::<Vec<_>>();
    let principal_payments = ledger.iter().map(|m| m.principal_paid).collect::<Vec<_>>();

    let fv_monthly_invest = future_value_of_series(&contributions, invest_rate, total_months);
    let fv_down_payment = future_value_lump_sum(
        property.down_payment,
        params.alt_invest_growth_annual,
        f64::from(total_months) / 12.0,
    );
    let fv_principal_opportunity =
        future_value_of_series(&principal_payments, alt_rate, total_months);
    let fv_invest_if_rent = fv_down_payment + fv_principal_opportunity;

    let closing_costs_buy = params.closing_costs_buy_pct * params.home_price;
    let total_buying_cost =
        property.down_payment + closing_costs_buy + total_monthly_paid - total_tax_savings;
    let net_cost_after_selling = total_buying_cost - final_equity;

    let owning_effective_net =
        fv_monthly_invest - net_cost_after_selling + total_rental_income - total_rent_paid_out;
    let renting_effective_net = fv_invest_if_rent - total_rent_no_buy;
    ensure_finite("final_equity", final_equity)?;
    ensure_finite("owning_effective_net", owning_effective_net)?;
    ensure_finite("renting_effective_net", renting_effective_net)?;

    let recommendation = Recommendation::from_positions(owning_effective_net, renting_effective_net);
    debug!(
        "owning net {owning_effective_net:.2} vs renting net {renting_effective_net:.2}: {recommendation:?}"
    );

    let amortization = amortization_by_year(&ledger);
    let yearly_tax = yearly_tax_records(&ledger, property, params);

    Ok(ScenarioResult {
        total_months,
        down_payment: property.down_payment,
        loan_amount: property.loan_amount,
        monthly_payment,
        closing_costs_buy,
        home_value_after,
        remaining_principal,
        selling_costs,
        final_equity,
        total_monthly_paid,
        total_tax_savings,
        total_buying_cost,
        net_cost_after_selling,
        total_rent_no_buy,
        total_rental_income,
        total_rent_paid_out,
        fv_monthly_invest,
        fv_down_payment,
        fv_principal_opportunity,
        fv_invest_if_rent,
        owning_effective_net,
        renting_effective_net,
        recommendation,
        ledger,
        amortization,
        yearly_tax,
    })
}

fn run_monthly_ledger(
    params: &ScenarioParameters,
    property: &PropertyCostProfile,
    occupancy: &OccupancyTimeline,
) -> Vec<LedgerMonth> {
    let total_months = occupancy.total_months();
    let monthly_deduction_cap = params.property_tax_deduction_cap / 12.0;
    let mut investments =
        InvestmentAccumulator::new(monthly_rate_from_annual(params.monthly_invest_growth_annual));
    let mut remaining_principal = property.loan_amount;
    let mut ledger = Vec::with_capacity(total_months as usize);

    for month in 1..=total_months {
        let principal_before = remaining_principal;
        let split = property.split_payment(remaining_principal, property.mortgage_rate_annual);
        remaining_principal -= split.principal;

        let carrying_cost = property.monthly_costs();
        let deductible =
            (split.interest + property.monthly_property_tax()).min(monthly_deduction_cap);
        let tax_saving = deductible * params.tax_rate;

        let phase = occupancy.phase(month);
        let comparison_rent = occupancy.comparison_rent(month);
        let cash_flow = occupancy.monthly_cash_flow(month);
        // Living in: principal builds equity, so only the non-principal
        // cost competes with rent. Rented out: the full net outlay does.
        let out_of_pocket = match phase {
            Phase::LiveIn => -cash_flow - split.principal - tax_saving,
            Phase::RentOut => -cash_flow - tax_saving,
        };
        let investment_contribution = (out_of_pocket - comparison_rent).max(0.0);
        investments.push(investment_contribution);

        let home_value = params.home_price
            * (1.0 + params.home_appreciation_annual).powf(f64::from(month) / 12.0);

        ledger.push(LedgerMonth {
            month,
            phase,
            principal_before,
            principal_after: remaining_principal,
            interest_paid: split.interest,
            principal_paid: split.principal,
            carrying_cost,
            deductible,
            tax_saving,
            comparison_rent,
            rent_collected: occupancy.rent_collected(month),
            rent_paid_elsewhere: occupancy.rent_paid_elsewhere(month),
            cash_flow,
            investment_contribution,
            investment_balance: investments.balance(),
            home_value,
            equity: home_value - remaining_principal,
        });
    }

    ledger
}

fn amortization_by_year(ledger: &[LedgerMonth]) -> Vec<AmortizationYear> {
    ledger
        .chunks(MONTHS_PER_YEAR)
        .enumerate()
        .map(|(idx, months)| AmortizationYear {
            year: idx as u32 + 1,
            principal_paid: months.iter().map(|m| m.principal_paid).sum(),
            interest_paid: months.iter().map(|m| m.interest_paid).sum(),
        })
        .collect()
}

/// Annual view of the deduction: interest is deductible in full while
/// property tax is capped per year.
fn yearly_tax_records(
    ledger: &[LedgerMonth],
    property: &PropertyCostProfile,
    params: &ScenarioParameters,
) -> Vec<YearlyTaxRecord> {
    ledger
        .chunks(MONTHS_PER_YEAR)
        .enumerate()
        .map(|(idx, months)| {
            let mortgage_interest = months.iter().map(|m| m.interest_paid).sum::<f64>();
            let property_tax = months.len() as f64 * property.monthly_property_tax();
            let total_deductions =
                mortgage_interest + property_tax.min(params.property_tax_deduction_cap);
            YearlyTaxRecord {
                year: idx as u32 + 1,
                mortgage_interest,
                property_tax,
                total_deductions,
                tax_savings: total_deductions * params.tax_rate,
            }
        })
        .collect()
}
