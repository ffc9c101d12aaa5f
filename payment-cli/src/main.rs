use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use payment_cli::app::{self, DealOverrides, RateEdit};
use payment_cli::csv_loader;
use payment_cli::logging;
use payment_cli::render::{self, BatchEntry};
use payment_core::EngineConfig;
use payment_core::calculations::CashDownPolicy;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Vehicle payment calculator.
///
/// Prices a deal across a grid of cash-down amounts and loan terms, and
/// shows the breakdown behind any single payment.
#[derive(Debug, Parser)]
#[command(name = "vehicle-payments", version)]
struct Cli {
    /// TOML file with offered terms, rates, policy and default deal values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cash-down bracketing policy: `fixed` or `tiered`.
    #[arg(long, global = true, value_parser = app::parse_policy)]
    policy: Option<CashDownPolicy>,

    /// Finance rate edit, e.g. `--rate 60=4.9`. May be repeated.
    #[arg(long = "rate", value_name = "TERM=PERCENT", global = true)]
    rates: Vec<RateEdit>,

    #[command(flatten)]
    deal: DealArgs,

    /// Log filter: a level (`debug`) or any RUST_LOG directive.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Deal values that replace the configured ones.
#[derive(Debug, Args)]
struct DealArgs {
    /// Vehicle price.
    #[arg(long = "price", global = true)]
    vehicle_price: Option<f64>,

    #[arg(long = "accessories", global = true)]
    accessories_cost: Option<f64>,

    /// Include the service contract (`true` / `false`).
    #[arg(long = "service-contract", value_name = "BOOL", global = true)]
    service_contract_enabled: Option<bool>,

    #[arg(long = "service-contract-cost", global = true)]
    service_contract_cost: Option<f64>,

    /// Include GAP coverage (`true` / `false`).
    #[arg(long = "gap", value_name = "BOOL", global = true)]
    gap_enabled: Option<bool>,

    #[arg(long = "gap-cost", global = true)]
    gap_cost: Option<f64>,

    #[arg(long = "title-license", global = true)]
    title_and_license_cost: Option<f64>,

    #[arg(long = "trade-in", global = true)]
    trade_in_value: Option<f64>,

    #[arg(long = "cash-down", global = true)]
    cash_down: Option<f64>,

    /// Monthly budget used to mark affordable cells.
    #[arg(long = "budget", global = true)]
    monthly_budget: Option<f64>,

    /// State tax rate in percent, e.g. `6.875`.
    #[arg(long = "tax-rate", global = true)]
    state_tax_rate_percent: Option<f64>,
}

impl From<DealArgs> for DealOverrides {
    fn from(args: DealArgs) -> Self {
        Self {
            vehicle_price: args.vehicle_price,
            accessories_cost: args.accessories_cost,
            service_contract_enabled: args.service_contract_enabled,
            service_contract_cost: args.service_contract_cost,
            gap_enabled: args.gap_enabled,
            gap_cost: args.gap_cost,
            title_and_license_cost: args.title_and_license_cost,
            trade_in_value: args.trade_in_value,
            cash_down: args.cash_down,
            monthly_budget: args.monthly_budget,
            state_tax_rate_percent: args.state_tax_rate_percent,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the payment grid.
    Matrix,

    /// Print the breakdown for one grid cell.
    Detail {
        /// Cash-down row: 0 = lower, 1 = chosen, 2 = higher.
        #[arg(long, default_value_t = 1)]
        row: usize,

        /// Loan term in months; must be one of the offered terms.
        #[arg(long)]
        term: i32,
    },

    /// Price every deal in a CSV file and print one line per deal.
    Batch {
        #[arg(long)]
        file: PathBuf,
    },

    /// Print the effective configuration as TOML.
    PrintConfig,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let config = match &cli.config {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };

    let mut session = app::build_session(&config, cli.policy, &cli.deal.into(), &cli.rates)?;

    match cli.command {
        Command::Matrix => {
            let matrix = session.matrix();
            print!(
                "{}",
                render::render_matrix(&matrix, session.rates(), session.vehicle())
            );
        }
        Command::Detail { row, term } => {
            let detail = app::open_detail_for_term(&mut session, row, term)?;
            print!("{}", render::render_detail(detail));
        }
        Command::Batch { file } => {
            let deals = csv_loader::load_from_file(&file, session.vehicle())
                .with_context(|| format!("loading deals from {}", file.display()))?;
            let entries: Vec<BatchEntry> = app::sessions_for_deals(&session, &deals)
                .map(|(deal, deal_session)| BatchEntry {
                    label: deal.label.clone(),
                    matrix: deal_session.matrix(),
                })
                .collect();
            info!(deals = entries.len(), "batch priced");
            print!("{}", render::render_batch(&entries));
        }
        Command::PrintConfig => {
            let toml = app::effective_config(&session)
                .to_toml_string()
                .context("serializing configuration")?;
            print!("{toml}");
        }
    }

    Ok(())
}
