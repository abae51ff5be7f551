//! IDS Monitor - terminal dashboard for a local intrusion detection backend
//!
//! Binary entry point. The interactive UI lives in `idsmon-tui`; the
//! NDJSON stream for scripts lives in [`headless`].

mod headless;

use std::path::PathBuf;

use clap::Parser;
use idsmon_app::EngineOptions;
use idsmon_core::logging;
use idsmon_core::prelude::*;

/// IDS Monitor - live flow classification dashboard
#[derive(Parser, Debug)]
#[command(name = "idsmon")]
#[command(about = "Terminal dashboard for a local intrusion detection backend", long_about = None)]
struct Args {
    /// WebSocket endpoint of the backend (overrides config.toml)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Backend executable to launch and supervise
    #[arg(long, value_name = "PATH")]
    backend: Option<PathBuf>,

    /// Directory for the monitor log and the backend's own logs
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Directory holding config.toml and settings.toml
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Replay a labelled CSV (path on the backend host) instead of capturing live
    #[arg(long, value_name = "CSV")]
    replay: Option<PathBuf>,

    /// Run without the terminal UI, printing NDJSON events to stdout
    #[arg(long)]
    headless: bool,

    /// Start a scan as soon as the backend is connected
    #[arg(long, requires = "headless")]
    start: bool,
}

impl Args {
    fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            config_dir: self.config_dir.clone(),
            endpoint: self.endpoint.clone(),
            backend: self.backend.clone(),
            log_dir: self.log_dir.clone(),
            replay: self.replay.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Logs go to a file; stdout belongs to the TUI or the NDJSON stream
    logging::init(args.log_dir.as_deref())?;
    info!("Mode: {}", if args.headless { "headless" } else { "tui" });

    let options = args.engine_options();
    let result = if args.headless {
        headless::runner::run_headless(options, args.start).await
    } else {
        idsmon_tui::run(options).await
    };

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("IDS Monitor exiting");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_map_to_engine_options() {
        let args = Args::parse_from([
            "idsmon",
            "--endpoint",
            "ws://10.0.0.2:9000",
            "--backend",
            "bin/ids-backend",
        ]);
        let options = args.engine_options();
        assert_eq!(options.endpoint.as_deref(), Some("ws://10.0.0.2:9000"));
        assert_eq!(options.backend, Some(PathBuf::from("bin/ids-backend")));
        assert!(options.config_dir.is_none());
        assert!(options.replay.is_none());
        assert!(!args.headless);
    }

    #[test]
    fn test_replay_flag_reaches_engine_options() {
        let args = Args::parse_from(["idsmon", "--headless", "--start", "--replay", "flows.csv"]);
        assert_eq!(args.engine_options().replay, Some(PathBuf::from("flows.csv")));
    }

    #[test]
    fn test_start_requires_headless() {
        assert!(Args::try_parse_from(["idsmon", "--start"]).is_err());
        let args = Args::try_parse_from(["idsmon", "--headless", "--start"]).expect("valid args");
        assert!(args.headless && args.start);
    }

    #[test]
    fn test_clap_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
