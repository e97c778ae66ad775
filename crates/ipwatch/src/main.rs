// # ipwatch - External IP Change Notifier
//
// This binary is a THIN integration layer:
// - All monitoring logic lives in ipwatch-core
// - Configuration comes from environment variables (and an optional `.env`)
// - Run modes come from command-line flags
//
// Each invocation performs exactly one pass and exits. Scheduling (cron,
// systemd timers) is external; runs must not overlap.
//
// The binary is responsible for:
// 1. Loading `.env` and reading configuration from the environment
// 2. Initializing logging
// 3. Creating the logs directory
// 4. Wiring the HTTP resolver and the ntfy notifier into the monitor
// 5. Mapping the result to an exit code
//
// ## Configuration
//
// ### Notifications
// - `NTFY_TOPIC`: Topic to publish to (required)
// - `NTFY_SERVER`: Server base URL (default: https://ntfy.sh)
// - `NTFY_TOKEN`: Access token (takes precedence over basic auth)
// - `NTFY_USERNAME` / `NTFY_PASSWORD`: Basic auth credentials
//
// ### Monitor
// - `HEALTH_CHECK_INTERVAL_HOURS`: Hours between health notifications (default: 24)
// - `IPWATCH_LOGS_DIR`: Directory for history and checkpoint files (default: logs)
// - `IPWATCH_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export NTFY_TOPIC=home-ip-alerts
// export NTFY_TOKEN=tk_yourtoken
//
// ipwatch                          # normal run
// ipwatch --test --ip 5.6.7.8      # simulate an address
// ipwatch --health-check-only      # liveness ping only
// ```

use anyhow::{Context, Result};
use clap::Parser;
use ipwatch_core::config::DEFAULT_HEALTH_CHECK_INTERVAL_HOURS;
use ipwatch_core::{
    HealthConfig, Monitor, MonitorConfig, NotifyAuth, NotifyConfig, PathsConfig, RunMode,
};
use ipwatch_notify_ntfy::NtfyNotifier;
use ipwatch_resolver_http::HttpAddressResolver;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: Run completed (including a health check that was not due)
/// - 1: Configuration, validation or runtime error
#[derive(Debug, Clone, Copy)]
enum IpwatchExitCode {
    Success = 0,
    Failure = 1,
}

impl From<IpwatchExitCode> for ExitCode {
    fn from(code: IpwatchExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Monitor external IP address changes and send ntfy notifications
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run in test mode with a simulated address
    #[arg(long)]
    test: bool,

    /// IP address to use in test mode
    #[arg(long, value_name = "ADDR")]
    ip: Option<String>,

    /// Only send the health notification if it is due
    #[arg(long)]
    health_check_only: bool,
}

/// Settings read from the environment
#[derive(Debug)]
struct Settings {
    ntfy_server: Option<String>,
    ntfy_topic: String,
    ntfy_auth: NotifyAuth,
    health_interval_hours: u64,
    logs_dir: PathBuf,
    log_level: String,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`; empty values count as unset
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let health_interval_hours = match var("HEALTH_CHECK_INTERVAL_HOURS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!(
                    "HEALTH_CHECK_INTERVAL_HOURS must be a positive integer. Got: {}",
                    raw
                )
            })?,
            None => DEFAULT_HEALTH_CHECK_INTERVAL_HOURS,
        };

        Ok(Self {
            ntfy_server: var("NTFY_SERVER"),
            ntfy_topic: var("NTFY_TOPIC").unwrap_or_default(),
            ntfy_auth: NotifyAuth::from_parts(
                var("NTFY_TOKEN"),
                var("NTFY_USERNAME"),
                var("NTFY_PASSWORD"),
            ),
            health_interval_hours,
            logs_dir: var("IPWATCH_LOGS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(ipwatch_core::config::DEFAULT_LOGS_DIR)),
            log_level: var("IPWATCH_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Build the monitor configuration
    fn monitor_config(&self) -> MonitorConfig {
        let mut notify =
            NotifyConfig::new(self.ntfy_topic.trim()).with_auth(self.ntfy_auth.clone());
        if let Some(ref server) = self.ntfy_server {
            notify = notify.with_server(server.trim());
        }

        MonitorConfig {
            notify,
            health: HealthConfig {
                interval_hours: self.health_interval_hours,
            },
            paths: PathsConfig::in_dir(&self.logs_dir),
        }
    }

    /// Validate the settings
    fn validate(&self) -> Result<()> {
        if self.ntfy_topic.trim().is_empty() {
            anyhow::bail!(
                "NTFY_TOPIC is required. \
                Set it via: export NTFY_TOPIC=your-topic"
            );
        }

        self.monitor_config().validate()?;
        self.log_level()?;

        Ok(())
    }

    fn log_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "IPWATCH_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    // Real environment variables win over .env entries
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return IpwatchExitCode::Failure.into();
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return IpwatchExitCode::Failure.into();
    }

    let log_level = settings.log_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IpwatchExitCode::Failure.into();
    }

    if !settings.ntfy_auth.is_configured() {
        warn!(
            "No ntfy authentication configured. This is fine for public topics, \
            but protected topics need NTFY_TOKEN or NTFY_USERNAME/NTFY_PASSWORD"
        );
    }

    let mode = match RunMode::from_flags(cli.test, cli.ip.as_deref(), cli.health_check_only) {
        Ok(mode) => mode,
        Err(e) => {
            error!("{}", e);
            return IpwatchExitCode::Failure.into();
        }
    };

    if let RunMode::Test { ref address } = mode {
        info!("Running in TEST MODE with IP: {}", address);
    }

    // Single pass, no parallelism
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IpwatchExitCode::Failure.into();
        }
    };

    rt.block_on(async {
        match run_once(&settings, &mode).await {
            Ok(()) => IpwatchExitCode::Success,
            Err(e) => {
                error!("Run failed: {:#}", e);
                IpwatchExitCode::Failure
            }
        }
    })
    .into()
}

/// Wire the components and run one pass
async fn run_once(settings: &Settings, mode: &RunMode) -> Result<()> {
    tokio::fs::create_dir_all(&settings.logs_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create logs directory {}",
                settings.logs_dir.display()
            )
        })?;

    let config = settings.monitor_config();
    info!("Publishing to {}", config.notify.endpoint());

    let resolver = HttpAddressResolver::new()?;
    let notifier = NtfyNotifier::new(&config.notify)?;
    let monitor = Monitor::new(Box::new(resolver), Box::new(notifier), config)?;

    let report = monitor.run(mode).await?;

    match (&report.address, report.status) {
        (Some(address), Some(status)) => {
            info!(
                "Run complete: {} ({}), {} notification(s) delivered",
                address,
                status,
                report.delivered.len()
            );
        }
        _ => info!(
            "Run complete: {} notification(s) delivered",
            report.delivered.len()
        ),
    }

    Ok(())
}
