//! `optionpricer` command line.
//!
//! Prices one option snapshot given on the command line, or a JSON
//! `PricingRequest` read from a file or stdin, and prints the result as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use optionpricer::core::Settings;
use optionpricer::logging::{init_logging, LogFormat};
use optionpricer::pricingengines::{
    HestonParameters, MarketInputs, ModelParameters, PricingDispatcher, VarianceGammaParameters,
};
use optionpricer::PricingRequest;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "optionpricer")]
#[command(about = "Theoretical option prices under BSM, Heston and Variance-Gamma")]
#[command(version)]
struct Cli {
    /// JSON settings file; otherwise settings come from OPTIONPRICER_* variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base seed for Monte Carlo streams (overrides settings)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "compact")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Price a single snapshot
    Price(PriceArgs),

    /// Price a JSON pricing request ("-" reads stdin)
    Request {
        /// Path to the request file
        path: String,
    },
}

#[derive(clap::Args, Debug)]
struct PriceArgs {
    /// Underlying price
    #[arg(long)]
    spot: f64,

    /// Strike price
    #[arg(long)]
    strike: f64,

    /// Time to expiry in years
    #[arg(long)]
    expiry: f64,

    /// Annualized risk-free rate
    #[arg(long, default_value_t = 0.06)]
    rate: f64,

    /// Call implied volatility, percent
    #[arg(long)]
    ce_iv: f64,

    /// Put implied volatility, percent
    #[arg(long)]
    pe_iv: f64,

    /// Pricing model
    #[arg(long, value_enum, default_value = "bsm")]
    model: ModelArg,

    /// Heston mean-reversion speed
    #[arg(long, default_value_t = 2.0)]
    kappa: f64,

    /// Heston long-run variance
    #[arg(long, default_value_t = 0.04)]
    theta: f64,

    /// Heston vol-of-vol
    #[arg(long, default_value_t = 0.3)]
    vol_of_vol: f64,

    /// Heston spot/variance correlation
    #[arg(long, default_value_t = -0.7, allow_negative_numbers = true)]
    rho: f64,

    /// Heston time steps per path
    #[arg(long, default_value_t = 252)]
    steps: usize,

    /// Heston paths
    #[arg(long, default_value_t = 10_000)]
    sims: usize,

    /// Variance-Gamma diffusion volatility
    #[arg(long, default_value_t = 0.2)]
    vg_sigma: f64,

    /// Variance-Gamma clock variance rate
    #[arg(long, default_value_t = 0.5)]
    vg_nu: f64,

    /// Variance-Gamma drift
    #[arg(long, default_value_t = -0.1, allow_negative_numbers = true)]
    vg_theta: f64,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModelArg {
    Bsm,
    Heston,
    VarianceGamma,
}

impl PriceArgs {
    fn inputs(&self) -> MarketInputs {
        MarketInputs {
            spot: self.spot,
            strike: self.strike,
            time_to_expiry: self.expiry,
            risk_free_rate: self.rate,
            ce_iv: self.ce_iv,
            pe_iv: self.pe_iv,
        }
    }

    fn model(&self) -> ModelParameters {
        match self.model {
            ModelArg::Bsm => ModelParameters::Bsm,
            ModelArg::Heston => ModelParameters::Heston(HestonParameters {
                kappa: self.kappa,
                theta: self.theta,
                sigma: self.vol_of_vol,
                rho: self.rho,
                steps: self.steps,
                sims: self.sims,
            }),
            ModelArg::VarianceGamma => ModelParameters::VarianceGamma(VarianceGammaParameters {
                sigma: self.vg_sigma,
                nu: self.vg_nu,
                theta: self.vg_theta,
            }),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_format)?;
    debug!(?cli, "CLI arguments parsed");

    let settings = load_settings(cli.config.as_deref(), cli.seed)?;
    let dispatcher = PricingDispatcher::new(settings).context("invalid settings")?;

    let output = match &cli.command {
        Commands::Price(args) => {
            info!(model = ?args.model, "pricing snapshot");
            let result = dispatcher.price(&args.inputs(), &args.model())?;
            serde_json::to_string_pretty(&result)?
        }
        Commands::Request { path } => {
            let request = read_request(path)?;
            let quoted = request.price(&dispatcher)?;
            serde_json::to_string_pretty(&quoted)?
        }
    };
    println!("{output}");
    Ok(())
}

fn load_settings(config: Option<&Path>, seed: Option<u64>) -> Result<Settings> {
    let settings = match config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings file {}", path.display()))?;
            serde_json::from_str::<Settings>(&text)
                .with_context(|| format!("parsing settings file {}", path.display()))?
        }
        None => Settings::from_env()?,
    };
    Ok(match seed {
        Some(seed) => settings.with_seed(seed),
        None => settings,
    })
}

fn read_request(path: &str) -> Result<PricingRequest> {
    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading request file {path}"))?
    };
    serde_json::from_str(&text).with_context(|| format!("parsing pricing request from {path}"))
}
