mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::financing::LoanArgs;
use commands::investment::{AnalyzeArgs, CarbonLevyArgs};

/// Residential property investment calculations
#[derive(Parser)]
#[command(
    name = "immo",
    version,
    about = "Residential property investment calculations",
    long_about = "A CLI for evaluating residential property purchases with decimal \
                  precision. Solves annuity loans, projects year-one and steady-state \
                  cashflow and tax, and allocates the carbon levy between landlord \
                  and tenant."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an annuity loan (installment, duration, repayment rate)
    Loan(LoanArgs),
    /// Analyse a property purchase for rental or owner-occupied use
    Analyze(AnalyzeArgs),
    /// Split the annual carbon levy between landlord and tenant
    CarbonLevy(CarbonLevyArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Loan(args) => commands::financing::run_loan(args),
        Commands::Analyze(args) => commands::investment::run_analyze(args),
        Commands::CarbonLevy(args) => commands::investment::run_carbon_levy(args),
        Commands::Version => {
            println!("immo {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
