use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use property_finance_core::financing::loan::{self, LoanTerms, RepaymentPlan};

use crate::input;

/// Arguments for the annuity loan solver
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual nominal interest rate in % (e.g. 3.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Initial repayment in % of principal per year (e.g. 2)
    #[arg(long, conflicts_with_all = ["installment", "years"])]
    pub repayment_rate: Option<Decimal>,

    /// Fixed monthly installment
    #[arg(long, conflicts_with_all = ["repayment_rate", "years"])]
    pub installment: Option<Decimal>,

    /// Target payoff horizon in years
    #[arg(long, conflicts_with_all = ["repayment_rate", "installment"])]
    pub years: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(principal) = args.principal {
        terms_from_flags(principal, &args)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file>, stdin or --principal with --rate required for loan".into());
    };

    let result = loan::solve_loan(&terms);
    Ok(serde_json::to_value(result)?)
}

fn terms_from_flags(
    principal: Decimal,
    args: &LoanArgs,
) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    let repayment = match (args.repayment_rate, args.installment, args.years) {
        (Some(repayment_rate_pct), None, None) => RepaymentPlan::ByRate { repayment_rate_pct },
        (None, Some(monthly_installment), None) => RepaymentPlan::ByInstallment {
            monthly_installment,
        },
        (None, None, Some(years)) => RepaymentPlan::ByDuration { years },
        _ => return Err("exactly one of --repayment-rate, --installment or --years required".into()),
    };

    Ok(LoanTerms {
        principal,
        annual_rate_pct: args.rate.ok_or("--rate is required")?,
        repayment,
    })
}
