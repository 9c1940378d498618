use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use taxi_core::aggregate::{DISTANCE_BIN_LABELS, FARE_BUCKET_LABELS, PAYMENT_LABELS};
use taxi_core::filters::{default_filter_time, parse_filter_time};
use taxi_core::{FilterState, PaymentFilter, ResultBundle};
use taxi_fetch::logging::init_tracing;
use taxi_fetch::{FetchConfig, FetchOrchestrator, FetchState, HttpTripSource, Outcome};

#[derive(Parser)]
#[command(
    name = "taxi_query",
    about = "Query 2014 NYC yellow taxi trips and summarize the matches",
    long_about = "Fetches trips picked up within two hours of --time that match the fare,\n\
                  distance and payment filters, then prints the chart summaries.\n\
                  TAXI_QUERY_* environment variables provide defaults for the connection flags."
)]
struct Cli {
    /// Pickup time (YYYY-MM-DDTHH:MM[:SS]); clamped to 2014
    #[arg(long)]
    time: Option<String>,
    #[arg(long, default_value_t = 0.0)]
    fare_min: f64,
    #[arg(long, default_value_t = 100.0)]
    fare_max: f64,
    #[arg(long, default_value_t = 0.0)]
    distance_min: f64,
    #[arg(long, default_value_t = 30.0)]
    distance_max: f64,
    #[arg(long, value_enum, default_value_t = PaymentArg::All)]
    payment: PaymentArg,
    /// Trip endpoint URL
    #[arg(long)]
    endpoint: Option<String>,
    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Seed for the display sample
    #[arg(long)]
    seed: Option<u64>,
    /// Print the whole result bundle as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaymentArg {
    All,
    Cash,
    Card,
}

impl From<PaymentArg> for PaymentFilter {
    fn from(arg: PaymentArg) -> Self {
        match arg {
            PaymentArg::All => PaymentFilter::All,
            PaymentArg::Cash => PaymentFilter::Cash,
            PaymentArg::Card => PaymentFilter::Card,
        }
    }
}

impl Cli {
    fn filters(&self) -> anyhow::Result<FilterState> {
        let time = match &self.time {
            Some(text) => parse_filter_time(text)?,
            None => default_filter_time(),
        };
        Ok(FilterState::default()
            .with_time(time)
            .with_fare(self.fare_min, self.fare_max)
            .with_distance(self.distance_min, self.distance_max)
            .with_payment(self.payment.into()))
    }

    fn config(&self) -> anyhow::Result<FetchConfig> {
        let mut config = FetchConfig::from_env().context("invalid TAXI_QUERY_* environment")?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if self.seed.is_some() {
            config.sample_seed = self.seed;
        }
        Ok(config)
    }
}

fn print_summary(bundle: &ResultBundle) {
    println!(
        "Trips: {} valid ({} dropped), showing {}",
        bundle.total_valid_count, bundle.dropped_count, bundle.sampled_count
    );
    if let Some(note) = bundle.sampling_note() {
        println!("{note}");
    }

    println!("\nAverage fare by time of day:");
    for (label, fare) in FARE_BUCKET_LABELS.iter().zip(bundle.fare_by_time_bucket) {
        println!("  {label:<6} ${fare:.2}");
    }
    println!("\nTrip distance (miles):");
    for (label, count) in DISTANCE_BIN_LABELS.iter().zip(bundle.distance_histogram) {
        println!("  {label:<6} {count}");
    }
    println!("\nPayment type:");
    for (label, count) in PAYMENT_LABELS.iter().zip(bundle.payment_histogram) {
        println!("  {label:<6} {count}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let filters = cli.filters()?;
    let config = cli.config()?;
    let source = HttpTripSource::new(&config.endpoint)?;
    let orchestrator = FetchOrchestrator::new(source, config);

    match orchestrator.fetch(filters).await {
        Outcome::Applied(FetchState::Success(bundle)) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(bundle.as_ref())?);
            } else {
                print_summary(&bundle);
            }
            Ok(())
        }
        Outcome::Applied(state) => {
            let message = state
                .user_message()
                .unwrap_or_else(|| "Fetch did not complete.".to_string());
            bail!(message)
        }
        Outcome::Superseded => bail!("Fetch was superseded by a newer request."),
    }
}
