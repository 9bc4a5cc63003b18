//! arbsim, a multi-venue arbitrage route simulator.
//!
//! Prices a round trip of local currency through a foreign exchange venue
//! and back, against live order book snapshots, with the full wire and
//! venue fee schedule applied.

mod catalog;
mod config;
mod sim;

use arbsim_core::{Coin, FixedPoint, Venue};
use clap::{Parser, Subcommand};
use config::AppConfig;
use sim::Simulator;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Arbitrage route simulator CLI
#[derive(Parser, Debug)]
#[command(name = "arbsim")]
#[command(about = "Simulate multi-venue arbitrage routes against live order books", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate deploying an amount through a route and print the breakdown
    Simulate {
        /// Local-currency amount to deploy
        amount: String,

        /// Coin to route through: bitcoin, litecoin, ethereum
        #[arg(short = 'n', long, default_value = "bitcoin")]
        coin: String,

        /// Local venue to sell on: luno, ice3x
        #[arg(short, long, default_value = "luno")]
        venue: String,

        /// Skip the wire fee and deposit/withdrawal charges
        #[arg(long, default_value_t = false)]
        no_transfer_fees: bool,

        /// Skip proportional trading fees
        #[arg(long, default_value_t = false)]
        no_trade_fees: bool,
    },
    /// Sweep an amount grid and report the smallest near-optimal investment
    Optimal {
        /// Largest amount to evaluate (default from config)
        #[arg(short, long)]
        max_invest: Option<String>,

        /// Grid spacing (default from config)
        #[arg(short, long)]
        step: Option<String>,

        /// Coin to route through: bitcoin, litecoin, ethereum
        #[arg(short = 'n', long, default_value = "bitcoin")]
        coin: String,

        /// Local venue to sell on: luno, ice3x
        #[arg(short, long, default_value = "luno")]
        venue: String,
    },
    /// Price the reverse direction: buy locally, sell abroad
    Reverse {
        /// Local-currency amount to deploy
        amount: String,

        /// Coin to route through: bitcoin, litecoin, ethereum
        #[arg(short = 'n', long, default_value = "litecoin")]
        coin: String,

        /// Local venue to buy on: luno, ice3x
        #[arg(short, long, default_value = "ice3x")]
        venue: String,
    },
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn parse_pair(venue: &str, coin: &str) -> Result<(Venue, Coin), String> {
    Ok((venue.parse()?, coin.parse()?))
}

fn parse_opt_amount(raw: Option<&str>) -> Result<Option<FixedPoint>, String> {
    raw.map(|s| s.parse::<FixedPoint>().map_err(|e| e.to_string()))
        .transpose()
}

async fn run(command: Command, config: &AppConfig) -> Result<(), String> {
    let client = reqwest::Client::new();
    let sim = Simulator::new(config, client).map_err(|e| e.to_string())?;

    match command {
        Command::Simulate {
            amount,
            coin,
            venue,
            no_transfer_fees,
            no_trade_fees,
        } => {
            let (venue, coin) = parse_pair(&venue, &coin)?;
            let result = sim
                .simulate(venue, coin, &amount, !no_transfer_fees, !no_trade_fees)
                .await
                .map_err(|e| e.to_string())?;
            println!("{}", result.summary());
        }
        Command::Optimal {
            max_invest,
            step,
            coin,
            venue,
        } => {
            let (venue, coin) = parse_pair(&venue, &coin)?;
            let max_invest = parse_opt_amount(max_invest.as_deref())?;
            let step = parse_opt_amount(step.as_deref())?;
            let curve = sim
                .optimal(venue, coin, max_invest, step)
                .await
                .map_err(|e| e.to_string())?;
            match curve.near_optimal() {
                Some(point) => println!(
                    "Ideal invest amount: {} with ROI of {}",
                    point.amount.format_dp(0),
                    point.roi.format_dp(2)
                ),
                None => println!("No grid point could be evaluated; the books have no usable depth."),
            }
            if curve.stopped_early {
                println!(
                    "(sweep stopped early after {} points: no further liquidity)",
                    curve.points.len()
                );
            }
        }
        Command::Reverse { amount, coin, venue } => {
            let (venue, coin) = parse_pair(&venue, &coin)?;
            let result = sim
                .reverse(venue, coin, &amount)
                .await
                .map_err(|e| e.to_string())?;
            println!(
                "R{}, R{}, {}%",
                result.capital_in.format_dp(0),
                result.proceeds_out.format_dp(0),
                result.roi.format_dp(2)
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(&args.log_level);

    let config = AppConfig::load(&args.config);
    if let Err(message) = run(args.command, &config).await {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_venue_and_coin_pairs() {
        assert_eq!(
            parse_pair("luno", "bitcoin").unwrap(),
            (Venue::Luno, Coin::Bitcoin)
        );
        assert_eq!(
            parse_pair("ice3x", "ltc").unwrap(),
            (Venue::Ice3x, Coin::Litecoin)
        );
        assert!(parse_pair("mtgox", "bitcoin").is_err());
        assert!(parse_pair("luno", "dogecoin").is_err());
    }

    #[test]
    fn optional_amounts_parse_or_pass_through() {
        assert_eq!(parse_opt_amount(None).unwrap(), None);
        assert_eq!(
            parse_opt_amount(Some("20000")).unwrap(),
            Some("20000".parse().unwrap())
        );
        assert!(parse_opt_amount(Some("lots")).is_err());
    }
}
