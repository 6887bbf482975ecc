//! tdlink probe - drives a native TDLib client end to end.
//!
//! Starts a client over `libtdjson`, forwards startup parameters, issues a
//! few requests that need no account, and then logs updates until the
//! session closes or Ctrl-C is pressed.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tdlink_core::types::{AuthorizationState, Update};
use tdlink_core::{Client, ClientOptions, NativeTransport, Polymorphic, TdlibParameters};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "tdlink-probe")]
#[command(about = "Exercise a native TDLib client through tdlink")]
struct Args {
    /// Application identifier from my.telegram.org
    #[arg(long, env = "TDLINK_API_ID")]
    api_id: i32,

    /// Application hash from my.telegram.org
    #[arg(long, env = "TDLINK_API_HASH")]
    api_hash: String,

    /// Directory for the native client's database
    #[arg(long, default_value = "tdlib-db")]
    database_directory: PathBuf,

    /// Connect to the test data centers
    #[arg(long)]
    test_dc: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Verbosity of the native library's own log (0-5)
    #[arg(long, default_value = "1")]
    native_verbosity: i32,

    /// Write the native library's log to this file instead of stderr
    #[arg(long)]
    native_log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    NativeTransport::set_log_verbosity_level(args.native_verbosity);
    if let Some(path) = &args.native_log_file {
        NativeTransport::set_log_file_path(path)?;
    }

    let parameters = TdlibParameters {
        use_test_dc: args.test_dc,
        database_directory: args.database_directory.clone(),
        api_id: args.api_id,
        api_hash: args.api_hash.clone(),
        ..TdlibParameters::default()
    };

    let transport = Arc::new(NativeTransport::create()?);
    let client = Client::builder(transport)
        .options(ClientOptions::new().with_request_timeout(Duration::from_secs(args.timeout)))
        .tdlib_parameters(parameters)
        .build()
        .await
        .context("failed to start client")?;

    probe(&client).await?;

    info!("Listening for updates, press Ctrl-C to stop");
    let updates = client.updates();
    loop {
        tokio::select! {
            update = updates.recv() => {
                let Some(update) = update else { break };
                if log_update(&update) {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown signal received, closing session");
                if let Err(e) = client.close().await {
                    warn!("close request failed: {}", e);
                }
                break;
            }
        }
    }

    client.shutdown().await;
    if updates.dropped() > 0 {
        warn!("{} updates were dropped while the queue was full", updates.dropped());
    }
    Ok(())
}

/// Requests that work before authorization.
async fn probe(client: &Client) -> Result<()> {
    let version = client.get_option("version").await?;
    info!("TDLib version: {:?}", version);

    let state = client.get_authorization_state().await?;
    info!("Authorization state: {}", state.kind());

    client.test_call_empty().await?;
    let echo = client.test_call_string("tdlink").await?;
    let square = client.test_square_int(12).await?;
    info!("Echo: {:?}, 12^2 = {}", echo.text, square.value);

    let level = client.get_log_verbosity_level()?;
    debug!("Native log verbosity: {}", level.verbosity_level);
    Ok(())
}

/// Log one update. Returns `true` once the session is closed for good.
fn log_update(update: &tdlink_core::Message) -> bool {
    match Update::from_message(update) {
        Ok(Update::AuthorizationState(change)) => {
            info!("Authorization state: {}", change.authorization_state.kind());
            matches!(change.authorization_state, AuthorizationState::Closed(_))
        }
        Ok(Update::ConnectionState(change)) => {
            info!("Connection state: {}", change.state.kind());
            false
        }
        Ok(Update::Option(option)) => {
            debug!("Option {} = {:?}", option.name, option.value);
            false
        }
        Err(_) => {
            debug!("Update: {}", update.kind().unwrap_or("?"));
            false
        }
    }
}
