use serde::Serialize;

use super::types::{
    AmortizationYear, Recommendation, ScenarioParameters, ScenarioResult, YearlyTaxRecord,
};

/// Wire shape of a finished run, shared by the HTTP API and `run --json`.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub summary: SummarySection,
    pub costs: CostsSection,
    pub rent_comparison: RentComparisonSection,
    pub investment_analysis: InvestmentSection,
    pub rental_analysis: RentalAnalysisSection,
    pub final_comparison: FinalComparisonSection,
    pub graph_data: GraphData,
    pub monthly_data: MonthlyData,
    pub amortization: Vec<AmortizationYear>,
    pub monthly_costs: MonthlyCostsSection,
    pub tax_analysis: TaxAnalysisSection,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummarySection {
    pub home_value_after: f64,
    pub remaining_principal: f64,
    pub selling_costs: f64,
    pub final_equity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CostsSection {
    pub down_payment: f64,
    pub closing_costs_buy: f64,
    pub total_monthly_paid: f64,
    pub total_tax_savings: f64,
    pub net_cost_after_selling: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RentComparisonSection {
    pub total_rent_no_buy: f64,
    pub monthly_payment: f64,
    pub current_monthly_rent: f64,
    pub payment_difference: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestmentSection {
    pub down_payment_investment: f64,
    pub monthly_investment_value: f64,
    pub rent_investment_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RentalAnalysisSection {
    pub monthly_rent_collected: f64,
    pub monthly_rent_paid: f64,
    pub monthly_net_income: f64,
    pub total_months_renting: u32,
    pub total_rental_income: f64,
    pub total_rent_paid_out: f64,
    pub net_rental_income: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalComparisonSection {
    pub owning_effective_net: f64,
    pub renting_effective_net: f64,
    pub buy_recommended: bool,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub months: Vec<u32>,
    pub cumulative_rent: Vec<f64>,
    pub cumulative_home_cost: Vec<f64>,
    pub cumulative_investment: Vec<f64>,
    pub cumulative_equity: Vec<f64>,
}

/// Parallel per-month arrays, index 0 being month 1.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyData {
    pub interest_paid: Vec<f64>,
    pub principal_paid: Vec<f64>,
    pub total_home_cost: Vec<f64>,
    pub tax_savings: Vec<f64>,
    pub investment_contribution: Vec<f64>,
    pub home_value: Vec<f64>,
    pub equity: Vec<f64>,
    pub rental_income: Vec<f64>,
    pub rent_paid_out: Vec<f64>,
    pub rent_if_no_buy: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyCostsSection {
    pub mortgage: f64,
    pub property_tax: f64,
    pub insurance: f64,
    pub maintenance: f64,
    pub hoa: f64,
    pub total: f64,
    pub tax_savings: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxAnalysisSection {
    pub yearly_savings: Vec<YearlyTaxRecord>,
    pub total_mortgage_interest: f64,
    pub total_property_tax: f64,
    pub total_deductions: f64,
    pub total_tax_savings: f64,
}

impl ScenarioReport {
    pub fn new(params: &ScenarioParameters, result: &ScenarioResult) -> Self {
        let ledger = &result.ledger;
        let renting_out = params.months_rent_out > 0;
        let rent_collected_base = if renting_out { params.rent_collected_home } else { 0.0 };
        let rent_paid_base = if renting_out { params.rent_while_out } else { 0.0 };

        let mut running_rent = 0.0;
        let mut running_home_cost = 0.0;
        let mut cumulative_rent = Vec::with_capacity(ledger.len());
        let mut cumulative_home_cost = Vec::with_capacity(ledger.len());
        for month in ledger {
            running_rent += month.comparison_rent;
            running_home_cost += month.carrying_cost;
            cumulative_rent.push(running_rent);
            cumulative_home_cost.push(running_home_cost);
        }

        let total_mortgage_interest = result.yearly_tax.iter().map(|y| y.mortgage_interest).sum();
        let total_property_tax = result.yearly_tax.iter().map(|y| y.property_tax).sum();
        let total_deductions = result.yearly_tax.iter().map(|y| y.total_deductions).sum();
        let yearly_tax_savings = result.yearly_tax.iter().map(|y| y.tax_savings).sum::<f64>();

        let monthly_property_tax = params.home_price * params.property_tax_rate_annual / 12.0;
        let monthly_insurance = params.insurance_annual / 12.0;
        let monthly_maintenance = params.maintenance_annual / 12.0;

        Self {
            summary: SummarySection {
                home_value_after: result.home_value_after,
                remaining_principal: result.remaining_principal,
                selling_costs: result.selling_costs,
                final_equity: result.final_equity,
            },
            costs: CostsSection {
                down_payment: result.down_payment,
                closing_costs_buy: result.closing_costs_buy,
                total_monthly_paid: result.total_monthly_paid,
                total_tax_savings: result.total_tax_savings,
                net_cost_after_selling: result.net_cost_after_selling,
            },
            rent_comparison: RentComparisonSection {
                total_rent_no_buy: result.total_rent_no_buy,
                monthly_payment: result.monthly_payment,
                current_monthly_rent: params.rent_current,
                payment_difference: result.monthly_payment - params.rent_current,
            },
            investment_analysis: InvestmentSection {
                down_payment_investment: result.fv_down_payment,
                monthly_investment_value: result.fv_monthly_invest,
                rent_investment_value: result.fv_invest_if_rent,
            },
            rental_analysis: RentalAnalysisSection {
                monthly_rent_collected: rent_collected_base,
                monthly_rent_paid: rent_paid_base,
                monthly_net_income: rent_collected_base - rent_paid_base,
                total_months_renting: params.months_rent_out,
                total_rental_income: result.total_rental_income,
                total_rent_paid_out: result.total_rent_paid_out,
                net_rental_income: result.total_rental_income - result.total_rent_paid_out,
            },
            final_comparison: FinalComparisonSection {
                owning_effective_net: result.owning_effective_net,
                renting_effective_net: result.renting_effective_net,
                buy_recommended: result.recommendation == Recommendation::Buy,
                recommendation: result.recommendation.message().to_string(),
            },
            graph_data: GraphData {
                months: ledger.iter().map(|m| m.month).collect(),
                cumulative_rent,
                cumulative_home_cost,
                cumulative_investment: ledger.iter().map(|m| m.investment_balance).collect(),
                cumulative_equity: ledger.iter().map(|m| m.equity).collect(),
            },
            monthly_data: MonthlyData {
                interest_paid: ledger.iter().map(|m| m.interest_paid).collect(),
                principal_paid: ledger.iter().map(|m| m.principal_paid).collect(),
                total_home_cost: ledger.iter().map(|m| m.carrying_cost).collect(),
                tax_savings: ledger.iter().map(|m| m.tax_saving).collect(),
                investment_contribution: ledger.iter().map(|m| m.investment_contribution).collect(),
                home_value: ledger.iter().map(|m| m.home_value).collect(),
                equity: ledger.iter().map(|m| m.equity).collect(),
                rental_income: ledger.iter().map(|m| m.rent_collected).collect(),
                rent_paid_out: ledger.iter().map(|m| m.rent_paid_elsewhere).collect(),
                rent_if_no_buy: ledger.iter().map(|m| m.comparison_rent).collect(),
            },
            amortization: result.amortization.clone(),
            monthly_costs: MonthlyCostsSection {
                mortgage: result.monthly_payment,
                property_tax: monthly_property_tax,
                insurance: monthly_insurance,
                maintenance: monthly_maintenance,
                hoa: params.hoa_monthly,
                total: result.monthly_payment
                    + monthly_property_tax
                    + monthly_maintenance
                    + monthly_insurance
                    + params.hoa_monthly,
                tax_savings: yearly_tax_savings / f64::from(result.total_months),
            },
            tax_analysis: TaxAnalysisSection {
                yearly_savings: result.yearly_tax.clone(),
                total_mortgage_interest,
                total_property_tax,
                total_deductions,
                total_tax_savings: yearly_tax_savings,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::simulate;
    use serde_json::Value;
    use std::fs;
    use std::path::Path;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn concrete_scenario() -> ScenarioParameters {
        ScenarioParameters {
            months_live_in: 36,
            months_rent_out: 0,
            rent_while_out: 0.0,
            rent_collected_home: 0.0,
            ..ScenarioParameters::default()
        }
    }

    fn assert_json_close(path: &str, actual: &Value, expected: &Value) {
        match (actual, expected) {
            (Value::Object(a), Value::Object(e)) => {
                let mut a_keys = a.keys().collect::<Vec<_>>();
                let mut e_keys = e.keys().collect::<Vec<_>>();
                a_keys.sort();
                e_keys.sort();
                assert_eq!(a_keys, e_keys, "key mismatch at {path}");
                for (key, value) in a {
                    assert_json_close(&format!("{path}.{key}"), value, &e[key]);
                }
            }
            (Value::Array(a), Value::Array(e)) => {
                assert_eq!(a.len(), e.len(), "length mismatch at {path}");
                for (idx, (left, right)) in a.iter().zip(e.iter()).enumerate() {
                    assert_json_close(&format!("{path}[{idx}]"), left, right);
                }
            }
            (Value::Number(a), Value::Number(e)) => {
                let (a, e) = (a.as_f64().unwrap_or(f64::NAN), e.as_f64().unwrap_or(f64::NAN));
                let tol = 1e-9 * e.abs().max(1.0);
                assert!(
                    (a - e).abs() <= tol,
                    "value mismatch at {path}: expected {e}, got {a}"
                );
            }
            _ => assert_eq!(actual, expected, "mismatch at {path}"),
        }
    }

    fn assert_golden_snapshot(path: &str, actual: &Value) {
        let update = matches!(
            std::env::var("UPDATE_GOLDEN").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        );
        let snapshot_path = Path::new(path);

        if update {
            if let Some(parent) = snapshot_path.parent() {
                fs::create_dir_all(parent).expect("failed to create snapshot directory");
            }
            let body = serde_json::to_string_pretty(actual).expect("snapshot should serialize");
            fs::write(snapshot_path, format!("{body}\n")).expect("failed to write golden snapshot");
            return;
        }

        let expected = fs::read_to_string(snapshot_path).unwrap_or_else(|_| {
            panic!("missing golden snapshot at {path}; run with UPDATE_GOLDEN=1 to generate")
        });
        let expected: Value = serde_json::from_str(&expected).expect("snapshot should parse");
        assert_json_close("$", actual, &expected);
    }

    #[test]
    fn report_sections_mirror_result() {
        let params = ScenarioParameters::default();
        let result = simulate(&params).expect("valid scenario");
        let report = ScenarioReport::new(&params, &result);

        assert_approx(report.summary.final_equity, result.final_equity);
        assert_approx(report.costs.down_payment, 180_000.0);
        assert_approx(
            report.rent_comparison.payment_difference,
            result.monthly_payment - 2_400.0,
        );
        assert_eq!(report.monthly_data.interest_paid.len(), 72);
        assert_eq!(report.graph_data.months.first(), Some(&1));
        assert_eq!(report.graph_data.months.last(), Some(&72));
        assert_approx(
            report.graph_data.cumulative_rent[71],
            result.total_rent_no_buy,
        );
        assert_approx(
            report.graph_data.cumulative_home_cost[71],
            result.total_monthly_paid,
        );
        assert_eq!(report.rental_analysis.total_months_renting, 36);
        assert_approx(report.rental_analysis.monthly_net_income, 1_000.0);
        assert_eq!(report.amortization.len(), 6);
        assert_eq!(report.tax_analysis.yearly_savings.len(), 6);
        assert_eq!(
            report.final_comparison.buy_recommended,
            result.owning_effective_net > result.renting_effective_net
        );
    }

    #[test]
    fn monthly_cost_breakdown_matches_carrying_cost() {
        let params = concrete_scenario();
        let result = simulate(&params).expect("valid scenario");
        let report = ScenarioReport::new(&params, &result);
        assert_approx(report.monthly_costs.total, result.ledger[0].carrying_cost);
        assert_approx(report.monthly_costs.property_tax, 825.0);
        assert_approx(
            report.monthly_costs.tax_savings * 36.0,
            report.tax_analysis.total_tax_savings,
        );
    }

    #[test]
    fn rental_section_is_zero_without_rent_out_months() {
        let mut params = concrete_scenario();
        params.rent_while_out = 2_500.0;
        params.rent_collected_home = 3_500.0;
        let result = simulate(&params).expect("valid scenario");
        let report = ScenarioReport::new(&params, &result);
        assert_eq!(report.rental_analysis.monthly_rent_collected, 0.0);
        assert_eq!(report.rental_analysis.monthly_rent_paid, 0.0);
        assert_eq!(report.rental_analysis.net_rental_income, 0.0);
        assert!(report.monthly_data.rental_income.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn report_serializes_expected_sections() {
        let params = ScenarioParameters::default();
        let result = simulate(&params).expect("valid scenario");
        let json = serde_json::to_string(&ScenarioReport::new(&params, &result))
            .expect("report should serialize");
        for key in [
            "\"summary\"",
            "\"costs\"",
            "\"rent_comparison\"",
            "\"investment_analysis\"",
            "\"final_comparison\"",
            "\"monthly_data\"",
            "\"amortization\"",
            "\"rent_if_no_buy\"",
            "\"recommendation\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
    }

    #[test]
    fn golden_snapshot_concrete_scenario_json() {
        let params = concrete_scenario();
        let result = simulate(&params).expect("valid scenario");
        let report = serde_json::to_value(ScenarioReport::new(&params, &result))
            .expect("report should serialize");

        assert_golden_snapshot("tests/golden/concrete_scenario.json", &report);
    }
}
