//! gravity - Municipal complaint alerts dashboard

mod cli;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use gravity_core::models::DateRange;
use gravity_core::panels;
use gravity_core::watcher::WatcherConfig;
use gravity_core::{
    AlertsSource, AlertsStore, AlertsUpdate, FileWatcher, JsonFileSource, LoadReport, Preferences,
    Refresher,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "gravity",
    version,
    about = "Municipal complaint alerts dashboard",
    long_about = "Explore complaint volume and flagged anomalies per ward or complaint type.\n\
                  \n\
                  The interactive Alerts tab offers category and date range filters, a chart\n\
                  with anomaly markers and hover tooltips, and a list of anomalies. The data\n\
                  file is watched and reloaded when it changes.\n\
                  \n\
                  Examples:\n\
                    gravity                                  # Run TUI (default)\n\
                    gravity --data ./alerts.json             # Use a specific data file\n\
                    gravity alerts --range last_month        # List anomalies of the last 30 days\n\
                    gravity alerts --ward 14 --json          # Ward 14, last week, as JSON\n\
                    gravity alerts --start 2026-01-01 --end 2026-03-31\n\
                    gravity catalog                          # List wards and complaint types\n\
                  \n\
                  Environment Variables:\n\
                    GRAVITY_DATA                             # Alerts data file\n\
                    GRAVITY_NO_COLOR                         # Disable ANSI colors (log-friendly)\n\
                    GRAVITY_LOG                              # Log file for TUI mode\n\
                    RUST_LOG                                 # Log filter (default: info)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Alerts data file (default: <data_dir>/gravity/alerts.json)
    #[arg(long, env = "GRAVITY_DATA", global = true)]
    data: Option<PathBuf>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "GRAVITY_NO_COLOR", global = true)]
    no_color: bool,

    /// Log file used in TUI mode (default: <cache_dir>/gravity/gravity.log)
    #[arg(long, env = "GRAVITY_LOG", global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Mode {
    /// Run TUI interface (default)
    Tui,
    /// Print anomalies for a filter and date range, then exit
    Alerts {
        /// Relative range: last_day, last_week, last_month, last_year
        #[arg(long, short = 'r')]
        range: Option<DateRange>,
        /// Custom range start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Custom range end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Filter by ward number
        #[arg(long, conflicts_with = "complaint")]
        ward: Option<String>,
        /// Filter by complaint type
        #[arg(long)]
        complaint: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List wards and complaint types
    Catalog {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let tui = matches!(cli.mode, None | Some(Mode::Tui));
    init_tracing(cli.log_file.as_deref(), tui, cli.no_color);

    let data_path = cli
        .data
        .or_else(|| dirs::data_dir().map(|d| d.join("gravity").join("alerts.json")))
        .context("Could not determine alerts data file")?;

    let prefs_dir = Preferences::default_dir();
    let prefs = prefs_dir
        .as_deref()
        .map(Preferences::load)
        .unwrap_or_default();

    let no_color = cli.no_color;

    match cli.mode.unwrap_or(Mode::Tui) {
        Mode::Tui => {
            run_tui(data_path, prefs, prefs_dir).await?;
        }
        Mode::Alerts {
            range,
            start,
            end,
            ward,
            complaint,
            json,
        } => {
            let range = range.unwrap_or(prefs.default_date_range);
            run_alerts(
                data_path,
                &prefs,
                AlertsArgs {
                    range,
                    start,
                    end,
                    ward,
                    complaint,
                },
                json,
                no_color,
            )
            .await?;
        }
        Mode::Catalog { json } => {
            run_catalog(data_path, json, no_color).await?;
        }
    }

    Ok(())
}

/// TUI mode logs to a file since stdout is the terminal; CLI modes log to stderr
fn init_tracing(log_file: Option<&Path>, tui: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let file_layer = if tui {
        let path = log_file.map(Path::to_path_buf).or_else(|| {
            dirs::cache_dir().map(|d| d.join("gravity").join("gravity.log"))
        });
        path.and_then(|path| {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).ok()?;
            }
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .ok()
        })
        .map(|file| fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
    } else {
        None
    };

    let stderr_layer = (!tui).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(!no_color)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

async fn run_tui(data_path: PathBuf, prefs: Preferences, prefs_dir: Option<PathBuf>) -> Result<()> {
    info!(path = %data_path.display(), "Starting TUI");

    let store = Arc::new(AlertsStore::from_config(&prefs.store_config(), Utc::now()));
    let source = Arc::new(JsonFileSource::new(data_path.clone()));
    let refresher = Refresher::start(Arc::clone(&store), source);

    // Live reload is best effort: the data directory may not exist yet
    let watcher =
        match FileWatcher::start(data_path, Arc::clone(&store), WatcherConfig::default()).await {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!(error = %e, "File watcher unavailable, live reload disabled");
                None
            }
        };

    let result = gravity_tui::run(Arc::clone(&store), prefs.color_scheme).await;

    if let Some(watcher) = &watcher {
        watcher.stop().await;
    }
    refresher.stop().await;

    let color_scheme = result?;
    if color_scheme != prefs.color_scheme {
        if let Some(dir) = prefs_dir {
            let updated = Preferences {
                color_scheme,
                ..prefs
            };
            if let Err(e) = updated.save(&dir) {
                warn!(error = %e, "Failed to save preferences");
            }
        }
    }

    Ok(())
}

struct AlertsArgs {
    range: DateRange,
    start: Option<String>,
    end: Option<String>,
    ward: Option<String>,
    complaint: Option<String>,
}

fn spinner(no_color: bool) -> ProgressBar {
    let template = if no_color {
        "{spinner} {msg}"
    } else {
        "{spinner:.cyan} {msg}"
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

async fn run_alerts(
    data_path: PathBuf,
    prefs: &Preferences,
    args: AlertsArgs,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let spinner = spinner(no_color);
    let now = Utc::now();
    let store = AlertsStore::from_config(&prefs.store_config(), now);
    let source = JsonFileSource::new(data_path.clone());

    for update in cli::range_updates(args.range, args.start.as_deref(), args.end.as_deref(), now)? {
        store.dispatch(update);
    }

    spinner.set_message("Reading catalog...");
    let catalog = match source.catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).with_context(|| {
                format!("Failed to read alerts data from {}", data_path.display())
            });
        }
    };

    store.dispatch(
        AlertsUpdate::new().catalog(catalog.wards.clone(), catalog.complaint_types.clone()),
    );
    let selection = cli::category_update(&catalog, args.ward.as_deref(), args.complaint.as_deref());
    let selection = match selection {
        Ok(update) => update,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    store.dispatch(selection);

    let query = store.read(|s| s.query());
    let mut report = LoadReport::new();
    if panels::validate_range(query.start, query.end).is_ok() {
        spinner.set_message(format!("Loading alerts for {}...", query.filter));
        if let Some((_, payload)) = source.load_graceful(&query, &mut report).await {
            store.dispatch(AlertsUpdate::new().payload(payload, Utc::now()));
        }
    }
    spinner.finish_and_clear();

    for error in report.errors.iter() {
        eprintln!(
            "  - {} ({}): {}",
            error.source,
            error.severity.label(),
            error.message
        );
        if let Some(suggestion) = &error.suggestion {
            eprintln!("    {}", suggestion);
        }
    }

    let output = cli::format_alerts(&store.snapshot(), json, no_color)?;
    println!("{}", output);

    Ok(())
}

async fn run_catalog(data_path: PathBuf, json: bool, no_color: bool) -> Result<()> {
    let spinner = spinner(no_color);
    spinner.set_message("Reading catalog...");

    let source = JsonFileSource::new(data_path.clone());
    let catalog = source.catalog().await;
    spinner.finish_and_clear();

    let catalog = catalog
        .with_context(|| format!("Failed to read alerts data from {}", data_path.display()))?;
    println!("{}", cli::format_catalog(&catalog, json, no_color));

    Ok(())
}
