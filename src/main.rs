//! vbus-read - print one DeltaSol CS4 reading from a Resol KM2
//!
//! Usage:
//!   vbus-read [-v] <IP_ADDRESS> <PASSWORD>
//!   vbus-read --config km2.toml --format json

use anyhow::{bail, Result};
use clap::Parser;
use std::net::Shutdown;
use vbus_km2::cli::Cli;
use vbus_km2::logging::{self, LogSink, TracingSink};
use vbus_km2::report::{self, OutputFormat};
use vbus_km2::transport::tcp;
use vbus_km2::{config, Session};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let mut cfg = config::load_or_default(cli.config.as_deref())?;
    cli.apply(&mut cfg);
    cfg.validate()?;

    if cfg.connection.host.is_empty() {
        bail!("No KM2 address given (argument or [connection] host)");
    }
    if cfg.connection.password.is_empty() {
        bail!("No KM2 password given (argument or [connection] password)");
    }

    let mut log = TracingSink;
    log.log(&format!(
        "Connecting to {}:{}",
        cfg.connection.host, cfg.connection.port
    ));
    let stream = tcp::connect(&cfg.connection.host, cfg.connection.port, &cfg.tcp_options())?;

    let mut session = Session::new(stream);
    session.authenticate(&cfg.connection.password, &mut log)?;
    let reading = session.read_reading(&cfg.read_options(), &mut log)?;

    if let Err(e) = session.into_inner().shutdown(Shutdown::Both) {
        tracing::debug!("Socket shutdown failed: {}", e);
    }

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&reading)),
        OutputFormat::Json => println!("{}", report::render_json(&reading)?),
    }
    Ok(())
}
