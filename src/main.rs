//! Property Projection CLI
//!
//! Command-line interface for projecting property portfolios and loans

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand, ValueEnum};
use property_projection::assumptions::DEFAULT_PROJECTION_YEARS;
use property_projection::loan::{
    calculate_mortgage, generate_amortization_schedule, summarize_by_year, MortgageInputs,
};
use property_projection::projection::{
    current_status, find_property, write_projection_csv, ProjectionConfig, ProjectionEngine, ProjectionWindow,
    ProjectionYearRecord,
};
use property_projection::records::{load_portfolio, Portfolio, DEFAULT_PORTFOLIO_PATH};
use property_projection::{Error, LoanStructure, ScenarioParams, ScenarioRunner};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "property_projection", version, about = "Project property portfolio value, debt and cashflow")]
struct Cli {
    /// Portfolio JSON file
    #[arg(short = 'i', long = "input", global = true, default_value = DEFAULT_PORTFOLIO_PATH)]
    input: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a single property
    Project {
        /// Property id
        #[arg(short = 'p', long = "property")]
        property: String,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Project every property and the portfolio totals
    Portfolio {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Current position of a property without projection
    Status {
        #[arg(short = 'p', long = "property")]
        property: String,

        /// Defaults to the current calendar year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Final-year totals under baseline and +1/+2/+3 point rate shocks
    Stress {
        #[arg(long)]
        start_year: Option<i32>,

        #[arg(short = 'y', long, default_value_t = DEFAULT_PROJECTION_YEARS)]
        years: u32,
    },
    /// Monthly amortization schedule for a P&I loan
    Schedule {
        #[arg(long)]
        principal: Decimal,

        /// Annual rate in percent
        #[arg(long)]
        rate: Decimal,

        #[arg(long, default_value_t = 30)]
        term: i32,

        #[arg(long, default_value_t = Decimal::ZERO)]
        offset: Decimal,

        /// Print loan-year totals instead of every month
        #[arg(long)]
        yearly: bool,
    },
    /// Borrowing summary for a prospective purchase
    Mortgage {
        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        deposit: Decimal,

        /// Annual rate in percent
        #[arg(long)]
        rate: Decimal,

        #[arg(long, default_value_t = 30)]
        term: i32,

        #[arg(long, value_enum, default_value_t = StructureArg::Pi)]
        structure: StructureArg,

        /// Interest-only years before reverting to P&I
        #[arg(long, default_value_t = 0)]
        io_years: i32,

        #[arg(long, default_value_t = Decimal::ZERO)]
        offset: Decimal,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// First projected year; defaults to the current calendar year
    #[arg(long)]
    start_year: Option<i32>,

    /// Years to project, 1 to 50
    #[arg(short = 'y', long, default_value_t = DEFAULT_PROJECTION_YEARS)]
    years: u32,

    /// Percentage points added to every loan rate
    #[arg(long, default_value_t = Decimal::ZERO, allow_hyphen_values = true)]
    rate_offset: Decimal,

    /// Replace every expense growth rate (percent)
    #[arg(long, allow_hyphen_values = true)]
    expense_growth: Option<Decimal>,

    /// Write the yearly series to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn config(&self) -> Result<ProjectionConfig> {
        let window = ProjectionWindow::new(self.start_year.unwrap_or_else(current_year), self.years)?;
        let scenario = ScenarioParams {
            interest_rate_offset: self.rate_offset,
            expense_growth_override: self.expense_growth,
        };
        Ok(ProjectionConfig::for_window(window, scenario))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StructureArg {
    Io,
    Pi,
}

impl From<StructureArg> for LoanStructure {
    fn from(arg: StructureArg) -> Self {
        match arg {
            StructureArg::Io => LoanStructure::InterestOnly,
            StructureArg::Pi => LoanStructure::PrincipalAndInterest,
        }
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn load(path: &Path) -> Result<Portfolio> {
    load_portfolio(path).with_context(|| format!("Failed to load portfolio from {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Project { property, run } => {
            let portfolio = load(&cli.input)?;
            let data = find_property(&portfolio, &property)?;
            let engine = ProjectionEngine::new(run.config()?);
            let projection = engine.project_property(data);

            if run.json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                println!("{} ({})", projection.address, projection.property_id);
                print_series(&projection.projections);
                let summary = projection.summary();
                println!();
                println!("Equity growth:       {:>14}", summary.equity_growth);
                println!("Total net cashflow:  {:>14}", summary.total_net_cashflow);
            }
            if let Some(path) = &run.csv {
                write_csv(path, &projection.projections)?;
            }
        }
        Command::Portfolio { run } => {
            let portfolio = load(&cli.input)?;
            if portfolio.properties.is_empty() {
                return Err(Error::EmptyPortfolio(portfolio.name).into());
            }
            let engine = ProjectionEngine::new(run.config()?);
            let projection = engine.project_portfolio(&portfolio);

            if run.json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                println!("{} ({} properties)", projection.portfolio_name, projection.properties.len());
                print_series(&projection.totals);
            }
            if let Some(path) = &run.csv {
                write_csv(path, &projection.totals)?;
            }
        }
        Command::Status { property, year } => {
            let portfolio = load(&cli.input)?;
            let data = find_property(&portfolio, &property)?;
            let status = current_status(data, year.unwrap_or_else(current_year));

            println!("{} ({}) in {}", status.address, status.property_id, status.year);
            println!("  Value:            {:>14}", status.position.property_value);
            println!("  Debt:             {:>14}", status.position.total_debt);
            println!("  Equity:           {:>14}", status.position.equity);
            println!("  LVR:              {:>13}%", status.position.lvr);
            println!("  Rental income:    {:>14}", status.cashflow.rental_income);
            println!("  Expenses:         {:>14}", status.cashflow.expenses);
            println!("  Loan repayments:  {:>14}", status.cashflow.loan_repayments);
            println!("  Net cashflow:     {:>14}", status.cashflow.net_cashflow);
        }
        Command::Stress { start_year, years } => {
            let window = ProjectionWindow::new(start_year.unwrap_or_else(current_year), years)?;
            let portfolio = load(&cli.input)?;
            if portfolio.properties.is_empty() {
                return Err(Error::EmptyPortfolio(portfolio.name).into());
            }
            let runner = ScenarioRunner::new(portfolio);
            let outcomes = runner.stress_test(window.start_year(), window.years());

            println!("Final year {}", window.end_year());
            println!("{:<14} {:>16} {:>14} {:>8} {:>14} {:>14}",
                "Scenario", "Value", "Debt", "LVR", "Repayments", "Net CF");
            println!("{}", "-".repeat(85));
            for outcome in &outcomes {
                let t = &outcome.final_year;
                println!("{:<14} {:>16} {:>14} {:>8} {:>14} {:>14}",
                    outcome.name, t.property_value, t.total_debt, t.lvr, t.loan_repayments, t.net_cashflow);
            }
        }
        Command::Schedule { principal, rate, term, offset, yearly } => {
            let schedule = generate_amortization_schedule(principal, rate, term, offset);
            if schedule.is_empty() {
                bail!("Nothing to amortize: principal net of offset is {}", principal - offset);
            }
            if yearly {
                println!("{:>4} {:>14} {:>14} {:>14} {:>16}", "Year", "Principal", "Interest", "Total", "Closing");
                for year in summarize_by_year(&schedule) {
                    println!("{:>4} {:>14} {:>14} {:>14} {:>16}",
                        year.year, year.principal_paid, year.interest_paid, year.total_paid, year.closing_balance);
                }
            } else {
                println!("{:>5} {:>16} {:>12} {:>12} {:>16}", "Month", "Opening", "Principal", "Interest", "Closing");
                for row in &schedule {
                    println!("{:>5} {:>16} {:>12} {:>12} {:>16}",
                        row.month, row.opening_balance, row.principal_paid, row.interest_paid, row.closing_balance);
                }
            }
        }
        Command::Mortgage { price, deposit, rate, term, structure, io_years, offset } => {
            let summary = calculate_mortgage(&MortgageInputs {
                purchase_price: price,
                deposit,
                interest_rate: rate,
                loan_term_years: term,
                structure: structure.into(),
                interest_only_period_years: io_years,
                offset_balance: offset,
            });

            println!("Loan amount:        {:>14}", summary.loan_amount);
            println!("LVR:                {:>13}%", summary.lvr);
            println!("Monthly repayment:  {:>14}", summary.monthly_repayment);
            println!("Total repayments:   {:>14}", summary.total_repayments);
            println!("Total interest:     {:>14}", summary.total_interest);
            match summary.estimated_lmi {
                Some(lmi) => println!("LMI (estimated):    {:>14}", lmi),
                None => println!("LMI:                {:>14}", "not required"),
            }
        }
    }

    Ok(())
}

fn print_series(records: &[ProjectionYearRecord]) {
    println!("{:>4} {:>16} {:>14} {:>14} {:>7} {:>12} {:>11} {:>12} {:>12}",
        "Year", "Value", "Debt", "Equity", "LVR", "Rent", "Expenses", "Repayments", "Net CF");
    println!("{}", "-".repeat(110));
    for r in records {
        println!("{:>4} {:>16} {:>14} {:>14} {:>7} {:>12} {:>11} {:>12} {:>12}",
            r.year, r.property_value, r.total_debt, r.equity, r.lvr,
            r.rental_income, r.expenses, r.loan_repayments, r.net_cashflow);
    }
}

fn write_csv(path: &Path, records: &[ProjectionYearRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Unable to create {}", path.display()))?;
    write_projection_csv(records, BufWriter::new(file))?;
    println!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
