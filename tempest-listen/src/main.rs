//! Listens for WeatherFlow hub broadcasts and prints each decoded message.

mod output;

use std::{
    io::{self, Write},
    net::IpAddr,
    process::ExitCode,
};

use clap::Parser;
use tempest_udp::{
    listener::{ListenerConfig, ListenerError, UdpListener},
    Kind, Store, WeatherFlow,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::output::{render, Format};

/// Print WeatherFlow Tempest UDP broadcasts as they arrive.
///
/// TEMPEST_BIND_ADDR and TEMPEST_PORT set the defaults for --bind and --port.
#[derive(Debug, Parser)]
#[command(name = "tempest-listen", version, about)]
struct Args {
    /// Address to bind
    #[arg(long)]
    bind: Option<IpAddr>,

    /// UDP port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Only print these kinds (discriminator or name, repeatable)
    #[arg(long = "kind", value_name = "KIND")]
    kinds: Vec<Kind>,

    /// Print JSON lines instead of key=value text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> ListenerConfig {
        let mut config = ListenerConfig::from_env();
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }

    fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else {
            Format::Text
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match listen(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "listener stopped");
            ExitCode::FAILURE
        }
    }
}

async fn listen(args: Args) -> Result<(), ListenerError> {
    let config = args.config();
    let format = args.format();
    let kinds = args.kinds;

    let mut listener = UdpListener::bind(&config).await?;
    let mut decoder = WeatherFlow::new();
    decoder.register_callback(move |kind: Kind, store: &Store| {
        if !kinds.is_empty() && !kinds.contains(&kind) {
            return;
        }
        let line = render(format, kind, store);
        if let Err(err) = writeln!(io::stdout().lock(), "{}", line) {
            warn!(error = %err, "failed to write observation");
        }
    });

    let outcome = tokio::select! {
        result = listener.run(&mut decoder) => result,
        _ = tokio::signal::ctrl_c() => Ok(()),
    };

    let stats = listener.stats();
    info!(
        received = stats.received,
        decoded = stats.decoded,
        malformed = stats.malformed,
        unknown = stats.unknown,
        "shutting down"
    );
    outcome
}
