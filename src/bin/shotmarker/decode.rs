//! Decode command - inspect individual shot strings

use anyhow::{Result, bail};
use clap::Args;
use shotmarker::ReportConfig;
use shotmarker::codec;
use shotmarker::decode::verify_round_trip;

/// Arguments for the decode command
#[derive(Args)]
pub struct DecodeArgs {
    /// Transcoded shot records
    #[arg(required = true)]
    pub encoded: Vec<String>,
}

/// Execute the decode command
pub fn execute(args: DecodeArgs, config: &ReportConfig) -> Result<()> {
    let mut failures = 0;

    for (index, text) in args.encoded.iter().enumerate() {
        let shot = match codec::decode_with(text, config.decode_mode) {
            Ok(shot) => shot,
            Err(e) => {
                println!("Shot {}: Error decoding - {}", index + 1, e);
                for suggestion in e.recovery_suggestions() {
                    println!("    - {}", suggestion);
                }
                failures += 1;
                continue;
            }
        };

        let timestamp = shot.datetime().map(|ts| ts.to_rfc3339()).unwrap_or_default();
        println!("Shot {}:", index + 1);
        println!("  timestamp:    {} ({})", shot.timestamp, timestamp);
        println!("  x:            {:.3}", shot.x);
        println!("  y:            {:.3}", shot.y);
        println!("  velocity:     {:.2}", shot.velocity);
        println!("  temperature:  {}", shot.temperature);
        println!("  multi_assign: {}", shot.multi_assign);
        println!("  error:        {}", shot.error);
        println!("  re-encoded:   {}", codec::encode(&shot));
        println!("  round trip:   {}", if verify_round_trip(&shot)? { "ok" } else { "MISMATCH" });
    }

    if failures > 0 {
        bail!("{} of {} shot string(s) failed to decode", failures, args.encoded.len());
    }
    Ok(())
}
