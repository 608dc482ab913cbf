use std::collections::BTreeMap;

use serde::Serialize;

use crate::cmd::version::{message_layouts, MessageLayout};
use crate::cmd::EnvinfoArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::OutputFormat;

const MAX_BODY_VAR: &str = "TENSORWIRE_MAX_BODY";

#[derive(Serialize)]
struct EnvInfoOutput {
    version: &'static str,
    wire_version: u8,
    envelope_size: usize,
    default_max_body: usize,
    /// What `inspect` will enforce, after `TENSORWIRE_MAX_BODY`.
    effective_max_body: usize,
    messages: [MessageLayout; 3],
    features: BTreeMap<&'static str, bool>,
    environment: BTreeMap<&'static str, Option<String>>,
}

pub fn run(_args: EnvinfoArgs, format: OutputFormat) -> CliResult<i32> {
    let max_body_env = std::env::var(MAX_BODY_VAR).ok();
    let output = EnvInfoOutput {
        version: env!("CARGO_PKG_VERSION"),
        wire_version: tensorwire_frame::VERSION,
        envelope_size: tensorwire_frame::ENVELOPE_SIZE,
        default_max_body: tensorwire_frame::DEFAULT_MAX_BODY,
        effective_max_body: effective_max_body(max_body_env.as_deref()),
        messages: message_layouts(),
        features: BTreeMap::from([("async", cfg!(feature = "async")), ("cli", true)]),
        environment: ["RUST_LOG", "TENSORWIRE_LOG_LEVEL", MAX_BODY_VAR]
            .into_iter()
            .map(|var| (var, std::env::var(var).ok()))
            .collect(),
    };

    print_envinfo(&output, format);
    Ok(SUCCESS)
}

/// Unparseable values are left for clap to reject when `inspect` runs.
fn effective_max_body(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(tensorwire_frame::DEFAULT_MAX_BODY)
}

fn print_envinfo(output: &EnvInfoOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
        ),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("tensorwire {} (wire v{})\n", output.version, output.wire_version);
            println!("  Envelope:   {} bytes", output.envelope_size);
            println!(
                "  Max body:   {} bytes (default {})",
                output.effective_max_body, output.default_max_body
            );
            let features: Vec<_> = output
                .features
                .iter()
                .map(|(name, on)| format!("{name}={on}"))
                .collect();
            println!("  Features:   {}", features.join(", "));
            println!("\n  Headers:");
            for layout in &output.messages {
                println!(
                    "    {:<10} {:>2} bytes, {} byte tag",
                    layout.name, layout.header_len, layout.tag_len
                );
            }
            println!("\n  Environment:");
            for (k, v) in &output.environment {
                println!("    {:<20} {}", k, v.as_deref().unwrap_or("(not set)"));
            }
        }
        OutputFormat::Raw => println!("{}", output.effective_max_body),
    }
}
