mod reading;

use chrono::{FixedOffset, Utc};
use clap::Parser;
use rand::Rng;
use reading::ReadingPayload;
use std::time::Duration;
use tracing::{info, warn};

/// Posts synthetic temperature readings to the ingestion API.
#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the running API.
    #[arg(long, env = "API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Number of simulated devices.
    #[arg(long, env = "DEVICES", default_value_t = 10)]
    devices: u64,

    /// Readings per second across all devices.
    #[arg(long, env = "RATE", default_value_t = 10)]
    rate: u64,

    /// Stop after this many requests (0 = run forever).
    #[arg(long, env = "COUNT", default_value_t = 0)]
    count: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting device simulator");
    info!(
        "Target: {}, Devices: {}, Rate: {} readings/s",
        args.api_url, args.devices, args.rate
    );

    let client = reqwest::Client::new();
    let endpoint = format!("{}/api/temperatura", args.api_url.trim_end_matches('/'));

    let mut rng = rand::thread_rng();
    let mut ticker = tokio::time::interval(tick_period(args.rate));
    let mut sent = 0u64;
    let mut failed = 0u64;

    loop {
        ticker.tick().await;

        let device_id = format!("sim-{}", (sent + failed) % args.devices.max(1));
        let payload = generate_reading(&mut rng, device_id);

        match client.post(&endpoint).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                sent += 1;
            }
            Ok(resp) => {
                failed += 1;
                let status = resp.status();
                let body: serde_json::Value = resp.json().await.unwrap_or_default();
                warn!("Rejected ({}): {}", status, body["msg"]);
            }
            Err(e) => {
                failed += 1;
                warn!("Request failed: {}", e);
            }
        }

        // Log progress periodically
        if (sent + failed) % 100 == 0 {
            info!("Posted {} readings ({} failed)", sent + failed, failed);
        }

        if args.count > 0 && sent + failed >= args.count {
            break;
        }
    }

    info!("Done: {} posted, {} failed", sent, failed);
    if failed > 0 {
        std::process::exit(1);
    }
}

/// Interval between posts for the requested rate. Floored at 1µs on both
/// ends of the division: tokio's interval panics on a zero period.
fn tick_period(rate: u64) -> Duration {
    Duration::from_micros((1_000_000 / rate.max(1)).max(1))
}

fn generate_reading(rng: &mut impl Rng, device_id: String) -> ReadingPayload {
    let temperature_c = if rng.gen_bool(0.05) {
        rng.gen_range(-50.0..100.0) // 5% outliers
    } else {
        rng.gen_range(15.0..35.0) // Normal range
    };

    // Mirror the field fleet: most loggers stamp Brazil wall-clock time,
    // some send an explicit offset, a few have no clock fix at all.
    let now_br = Utc::now().with_timezone(&FixedOffset::west_opt(3 * 3600).unwrap());
    let timestamp = match rng.gen_range(0..10) {
        0 => None,
        1..=3 => Some(now_br.to_rfc3339()),
        _ => Some(now_br.naive_local().format("%Y-%m-%dT%H:%M:%S").to_string()),
    };

    ReadingPayload {
        device_id,
        temperature_c,
        timestamp,
    }
}
