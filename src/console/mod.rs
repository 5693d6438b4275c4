use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use std::fmt::{self, Display, Write as _};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::{
    GraphData, OccupancyTimeline, PropertyCostProfile, ScenarioParameters, ScenarioReport,
    ScenarioResult, simulate_with,
};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, default_value_t = 900_000.0, help = "Purchase price of the home")]
    pub home_price: f64,
    #[arg(
        long,
        default_value_t = 0.20,
        help = "Down payment as a fraction of price, e.g. 0.20"
    )]
    pub down_payment_pct: f64,
    #[arg(long, default_value_t = 0.06, help = "Annual mortgage rate, e.g. 0.06")]
    pub mortgage_rate_annual: f64,
    #[arg(long, default_value_t = 30)]
    pub mortgage_term_years: u32,
    #[arg(
        long,
        default_value_t = 0.011,
        help = "Annual property tax as a fraction of price"
    )]
    pub property_tax_rate_annual: f64,
    #[arg(long, default_value_t = 5_000.0)]
    pub maintenance_annual: f64,
    #[arg(long, default_value_t = 3_500.0)]
    pub insurance_annual: f64,
    #[arg(long, default_value_t = 300.0)]
    pub hoa_monthly: f64,
    #[arg(long, default_value_t = 0.04, help = "Buyer closing costs as a fraction of price")]
    pub closing_costs_buy_pct: f64,
    #[arg(long, default_value_t = 0.06, help = "Selling costs as a fraction of sale value")]
    pub closing_costs_sell_pct: f64,
    #[arg(long, default_value_t = 2_400.0, help = "Current monthly rent")]
    pub rent_current: f64,
    #[arg(long, default_value_t = 0.04)]
    pub rent_growth_annual: f64,
    #[arg(
        long,
        default_value_t = 0.16,
        help = "Growth rate for down payment and principal had they been invested"
    )]
    pub alt_invest_growth_annual: f64,
    #[arg(
        long,
        default_value_t = 0.15,
        help = "Growth rate for the monthly cost difference once invested"
    )]
    pub monthly_invest_growth_annual: f64,
    #[arg(long, default_value_t = 0.08)]
    pub home_appreciation_annual: f64,
    #[arg(long, default_value_t = 0.30, help = "Marginal income tax rate")]
    pub tax_rate: f64,
    #[arg(long, default_value_t = 10_000.0, help = "Annual cap on the property tax deduction")]
    pub property_tax_deduction_cap: f64,
    #[arg(long, default_value_t = 36)]
    pub months_live_in: u32,
    #[arg(long, default_value_t = 36, help = "Months the home is rented out after moving out")]
    pub months_rent_out: u32,
    #[arg(long, default_value_t = 2_500.0, help = "Monthly rent paid elsewhere after moving out")]
    pub rent_while_out: f64,
    #[arg(long, default_value_t = 3_500.0, help = "Monthly rent collected from tenants")]
    pub rent_collected_home: f64,

    #[arg(long, help = "Prompt for every scenario field on stdin")]
    pub interactive: bool,
    #[arg(long, help = "Print the full report as JSON instead of text")]
    pub json: bool,
    #[arg(long, help = "Also print the monthly payment breakdown")]
    pub breakdown: bool,
    #[arg(long, value_name = "PATH", help = "Write cumulative graph series to a CSV file")]
    pub graph_csv: Option<PathBuf>,
}

impl RunArgs {
    pub fn parameters(&self) -> ScenarioParameters {
        ScenarioParameters {
            home_price: self.home_price,
            down_payment_pct: self.down_payment_pct,
            mortgage_rate_annual: self.mortgage_rate_annual,
            mortgage_term_years: self.mortgage_term_years,
            property_tax_rate_annual: self.property_tax_rate_annual,
            maintenance_annual: self.maintenance_annual,
            insurance_annual: self.insurance_annual,
            hoa_monthly: self.hoa_monthly,
            closing_costs_buy_pct: self.closing_costs_buy_pct,
            closing_costs_sell_pct: self.closing_costs_sell_pct,
            rent_current: self.rent_current,
            rent_growth_annual: self.rent_growth_annual,
            alt_invest_growth_annual: self.alt_invest_growth_annual,
            monthly_invest_growth_annual: self.monthly_invest_growth_annual,
            home_appreciation_annual: self.home_appreciation_annual,
            tax_rate: self.tax_rate,
            property_tax_deduction_cap: self.property_tax_deduction_cap,
            months_live_in: self.months_live_in,
            months_rent_out: self.months_rent_out,
            rent_while_out: self.rent_while_out,
            rent_collected_home: self.rent_collected_home,
        }
    }
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut params = args.parameters();
    if args.interactive {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        params = prompt_parameters(&mut stdin.lock(), &mut stdout, params)?;
    }

    let property = PropertyCostProfile::from_parameters(&params);
    let occupancy =
        OccupancyTimeline::from_parameters(&params, property).context("invalid scenario")?;
    let result =
        simulate_with(&params, &property, &occupancy).context("simulation failed")?;
    let report = ScenarioReport::new(&params, &result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_summary(&result)?);
        println!();
        println!("--- Amortization by Year ---");
        println!("{}", amortization_table(&result));
        if args.breakdown {
            println!();
            print!("{}", render_breakdown(&params, &property, &occupancy, &result)?);
        }
    }

    if let Some(path) = &args.graph_csv {
        write_graph_csv(path, &report.graph_data)?;
        eprintln!("Graph data written to {}", path.display());
    }
    Ok(())
}

/// Walks the scenario fields in order, keeping the current value on empty
/// or unparsable input. Rent-out amounts are only asked for when the home
/// is rented out, and are zero otherwise.
pub fn prompt_parameters<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    defaults: ScenarioParameters,
) -> Result<ScenarioParameters> {
    let mut p = defaults;
    p.home_price = prompt_value(input, out, "Enter the home price", p.home_price)?;
    p.down_payment_pct = prompt_value(
        input,
        out,
        "Enter the down payment percentage (0.20 for 20%)",
        p.down_payment_pct,
    )?;
    p.mortgage_rate_annual = prompt_value(
        input,
        out,
        "Enter the annual mortgage interest rate (0.06 for 6%)",
        p.mortgage_rate_annual,
    )?;
    p.mortgage_term_years = prompt_value(
        input,
        out,
        "Enter the mortgage term in years",
        p.mortgage_term_years,
    )?;
    p.property_tax_rate_annual = prompt_value(
        input,
        out,
        "Enter the annual property tax rate (0.011 for 1.1%)",
        p.property_tax_rate_annual,
    )?;
    p.maintenance_annual = prompt_value(
        input,
        out,
        "Enter the annual maintenance cost",
        p.maintenance_annual,
    )?;
    p.insurance_annual =
        prompt_value(input, out, "Enter the annual insurance cost", p.insurance_annual)?;
    p.hoa_monthly = prompt_value(input, out, "Enter the monthly HOA fee", p.hoa_monthly)?;
    p.closing_costs_buy_pct = prompt_value(
        input,
        out,
        "Enter the buyer closing costs percentage (0.04 for 4%)",
        p.closing_costs_buy_pct,
    )?;
    p.closing_costs_sell_pct = prompt_value(
        input,
        out,
        "Enter the selling closing costs percentage (0.06 for 6%)",
        p.closing_costs_sell_pct,
    )?;
    p.rent_current = prompt_value(input, out, "Enter your current monthly rent", p.rent_current)?;
    p.rent_growth_annual = prompt_value(
        input,
        out,
        "Enter the annual rent growth rate (0.04 for 4%)",
        p.rent_growth_annual,
    )?;
    p.alt_invest_growth_annual = prompt_value(
        input,
        out,
        "Enter the opportunity cost annual growth rate (0.16 for 16%)",
        p.alt_invest_growth_annual,
    )?;
    p.monthly_invest_growth_annual = prompt_value(
        input,
        out,
        "Enter the monthly difference investment annual growth rate (0.15 for 15%)",
        p.monthly_invest_growth_annual,
    )?;
    p.home_appreciation_annual = prompt_value(
        input,
        out,
        "Enter the home appreciation annual growth rate (0.08 for 8%)",
        p.home_appreciation_annual,
    )?;
    p.tax_rate = prompt_value(input, out, "Enter the tax rate (0.30 for 30%)", p.tax_rate)?;
    p.property_tax_deduction_cap = prompt_value(
        input,
        out,
        "Enter the property tax deduction cap",
        p.property_tax_deduction_cap,
    )?;
    p.months_live_in = prompt_value(
        input,
        out,
        "Enter the number of months you plan to live in the home",
        p.months_live_in,
    )?;
    p.months_rent_out = prompt_value(
        input,
        out,
        "Enter the number of months you plan to rent out the home after living",
        p.months_rent_out,
    )?;

    if p.months_rent_out > 0 {
        p.rent_while_out = prompt_value(
            input,
            out,
            "Enter the monthly rent you will pay elsewhere after moving out",
            p.rent_while_out,
        )?;
        p.rent_collected_home = prompt_value(
            input,
            out,
            "Enter the monthly rent you expect to collect from the home",
            p.rent_collected_home,
        )?;
    } else {
        p.rent_while_out = 0.0;
        p.rent_collected_home = 0.0;
    }
    Ok(p)
}

fn prompt_value<T, R, W>(input: &mut R, out: &mut W, prompt: &str, default: T) -> Result<T>
where
    T: FromStr + Display + Copy,
    R: BufRead,
    W: Write,
{
    write!(out, "{prompt} (default: {default}): ")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(default);
    }
    match line.parse::<T>() {
        Ok(value) => Ok(value),
        Err(_) => {
            writeln!(out, "Invalid input. Using default value: {default}")?;
            Ok(default)
        }
    }
}

pub fn render_summary(result: &ScenarioResult) -> Result<String, fmt::Error> {
    let mut s = String::new();
    let years = f64::from(result.total_months) / 12.0;
    writeln!(s, "--------------- SUMMARY AFTER PERIOD ---------------")?;
    writeln!(
        s,
        "Home value after {years:.1} years: {}",
        money(result.home_value_after)
    )?;
    writeln!(s, "Remaining loan principal: {}", money(result.remaining_principal))?;
    writeln!(s, "Selling costs: {}", money(result.selling_costs))?;
    writeln!(s, "Final equity if sold: {}", money(result.final_equity))?;

    writeln!(s, "\n--- Costs of Owning Scenario ---")?;
    writeln!(s, "Down payment: {}", money(result.down_payment))?;
    writeln!(s, "Closing costs on buying: {}", money(result.closing_costs_buy))?;
    writeln!(
        s,
        "Total monthly paid (over {} months): {}",
        result.total_months,
        money(result.total_monthly_paid)
    )?;
    writeln!(s, "Total tax savings: {}", money(result.total_tax_savings))?;
    writeln!(s, "Net cost after selling: {}", money(result.net_cost_after_selling))?;

    writeln!(s, "\n--- Rent Scenario (No Buy) ---")?;
    writeln!(s, "Total rent paid: {}", money(result.total_rent_no_buy))?;
    if result.total_rental_income != 0.0 || result.total_rent_paid_out != 0.0 {
        writeln!(s, "\n--- Rental Period ---")?;
        writeln!(s, "Rent collected: {}", money(result.total_rental_income))?;
        writeln!(s, "Rent paid elsewhere: {}", money(result.total_rent_paid_out))?;
    }

    writeln!(s, "\n--- Investment Calculations ---")?;
    writeln!(
        s,
        "Value of monthly difference investment: {}",
        money(result.fv_monthly_invest)
    )?;
    writeln!(
        s,
        "Value if renting and investing principal/down payment: {}",
        money(result.fv_invest_if_rent)
    )?;

    writeln!(s, "\n--- Final Comparison ---")?;
    writeln!(
        s,
        "Owning effective net position: {}",
        money(result.owning_effective_net)
    )?;
    writeln!(
        s,
        "Renting effective net position: {}",
        money(result.renting_effective_net)
    )?;
    writeln!(s, "Conclusion: {}.", result.recommendation.message())?;
    Ok(s)
}

pub fn amortization_table(result: &ScenarioResult) -> Table {
    pretty_table(
        &["Year", "Principal Paid", "Interest Paid"],
        result
            .amortization
            .iter()
            .map(|row| {
                vec![
                    row.year.to_string(),
                    money(row.principal_paid),
                    money(row.interest_paid),
                ]
            })
            .collect(),
    )
}

/// First-month view of what the owner pays, before and after moving out.
pub fn render_breakdown(
    params: &ScenarioParameters,
    property: &PropertyCostProfile,
    occupancy: &OccupancyTimeline,
    result: &ScenarioResult,
) -> Result<String, fmt::Error> {
    let mut s = String::new();
    let Some(first) = result.ledger.first() else {
        return Ok(s);
    };

    let tax_and_insurance = property.monthly_property_tax() + property.monthly_insurance();
    let total_monthly = first.carrying_cost - first.tax_saving;

    writeln!(s, "--------------- MONTHLY PAYMENT BREAKDOWN ---------------")?;
    writeln!(
        s,
        "WHILE LIVING IN THE HOUSE (first {} months):",
        params.months_live_in
    )?;
    writeln!(
        s,
        "{}",
        pretty_table(
            &["Item", "Amount"],
            vec![
                vec!["Principal".to_string(), money(first.principal_paid)],
                vec!["Interest".to_string(), money(first.interest_paid)],
                vec!["Property Tax + Insurance".to_string(), money(tax_and_insurance)],
                vec!["Maintenance".to_string(), money(property.monthly_maintenance())],
                vec!["HOA".to_string(), money(property.hoa_monthly)],
                vec!["Tax Savings".to_string(), format!("-{}", money(first.tax_saving))],
                vec!["Total Monthly Payment".to_string(), money(total_monthly)],
            ],
        )
    )?;

    if occupancy.months_rent_out() > 0 {
        let first_rent_out = occupancy.months_live_in() + 1;
        let collected = occupancy.rent_collected(first_rent_out);
        let paid = occupancy.rent_paid_elsewhere(first_rent_out);
        writeln!(
            s,
            "\nAFTER MOVING OUT (next {} months):",
            occupancy.months_rent_out()
        )?;
        writeln!(
            s,
            "{}",
            pretty_table(
                &["Item", "Amount"],
                vec![
                    vec!["Original Monthly Payment".to_string(), money(total_monthly)],
                    vec!["Rental Income".to_string(), format!("-{}", money(collected))],
                    vec!["Your New Rent Payment".to_string(), money(paid)],
                    vec![
                        "Net Monthly Payment".to_string(),
                        money(total_monthly - collected + paid),
                    ],
                ],
            )
        )?;
    }

    let rents = occupancy.comparison_rent_series();
    writeln!(s, "\nIF RENTING ONLY:")?;
    writeln!(
        s,
        "{}",
        pretty_table(
            &["Item", "Amount"],
            vec![
                vec![
                    "Initial Monthly Rent".to_string(),
                    money(rents.first().copied().unwrap_or(0.0)),
                ],
                vec![
                    "Final Monthly Rent".to_string(),
                    money(rents.last().copied().unwrap_or(0.0)),
                ],
            ],
        )
    )?;
    Ok(s)
}

pub fn write_graph_csv(path: &Path, graph: &GraphData) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record([
        "month",
        "cumulative_rent",
        "cumulative_home_cost",
        "cumulative_investment",
        "equity",
    ])?;
    for idx in 0..graph.months.len() {
        writer.write_record([
            graph.months[idx].to_string(),
            format!("{:.2}", graph.cumulative_rent[idx]),
            format!("{:.2}", graph.cumulative_home_cost[idx]),
            format!("{:.2}", graph.cumulative_investment[idx]),
            format!("{:.2}", graph.cumulative_equity[idx]),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// `$1,234.56`, with the sign ahead of the currency symbol.
pub fn money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((&formatted, "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
