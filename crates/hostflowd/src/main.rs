//! hostflowd - host telemetry agent daemon.
//!
//! Samples CPU and memory counters from /proc every five seconds and ships
//! them to an sFlow collector over UDP.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use hostflow_core::DEFAULT_COLLECTOR;
use hostflow_core::collector::{Collector, RealFs};
use hostflow_core::host::{SystemInterfaces, resolve_host_address};
use hostflow_core::sampler::{SAMPLE_PERIOD, Sampler};
use hostflow_core::sink::{JsonLinesSink, SflowSink, UdpTransport};

/// Host telemetry agent daemon.
#[derive(Parser)]
#[command(name = "hostflowd", about = "Host telemetry agent daemon", version)]
struct Args {
    /// Address of the collector (host:port).
    #[arg(short, long, default_value = DEFAULT_COLLECTOR)]
    outbound: String,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Print each batch as a JSON line on stdout instead of sending it.
    #[arg(long)]
    dump: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["hostflowd", "hostflow_core"] {
        match format!("{}={}", target, level).parse::<Directive>() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("invalid log directive for {}: {}", target, e),
        }
    }

    // Logs go to stderr so --dump output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    info!(
        "hostflowd {} ({}) starting",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_SHA")
    );
    info!(
        "Config: outbound={}, proc={}, period={:?}",
        args.outbound, args.proc_path, SAMPLE_PERIOD
    );

    let host = resolve_host_address(&SystemInterfaces);
    if host.is_fallback() {
        warn!("No usable interface address, reporting as {}", host);
    } else {
        info!("Reporting as {}", host);
    }

    let collector = Collector::new(RealFs::new(), &args.proc_path);

    if args.dump {
        info!("Dump mode: writing batches to stdout");
        Sampler::new(collector, JsonLinesSink::new(io::stdout()), host).run(SAMPLE_PERIOD);
    }

    let transport = match UdpTransport::connect(&args.outbound) {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to set up transport: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Sending to {}", transport.target());

    Sampler::new(collector, SflowSink::new(transport), host).run(SAMPLE_PERIOD)
}
