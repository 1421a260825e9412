use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use prism_dr::config::{Config, Overrides};
use prism_dr::datasource::{self, ProtectionRulesState};
use prism_dr::prism::{format_upstream_error, PrismClient};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Read Nutanix protection rules as flat data-source records
#[derive(Parser, Debug)]
#[command(name = "prism-dr", version = prism_dr::VERSION, about, long_about = None)]
struct Args {
    /// Prism Central host or URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Prism Central port
    #[arg(short, long)]
    port: Option<u16>,

    /// Prism user name
    #[arg(short, long)]
    username: Option<String>,

    /// Prism password (prefer NUTANIX_PASSWORD)
    #[arg(long)]
    password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read protection rules and print the data-source state
    Read {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        output: OutputFormat,

        /// Save endpoint and user name to the config file after a successful read
        #[arg(long)]
        save: bool,
    },
    /// Print the data-source schema
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("prism-dr started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("prism-dr").join("prism-dr.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".prism-dr").join("prism-dr.log");
    }
    PathBuf::from("prism-dr.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    match args.command {
        Command::Schema => {
            print!(
                "{}",
                datasource::render_schema(datasource::protection_rules_schema())
            );
            Ok(())
        }
        Command::Read { output, save } => {
            let overrides = Overrides {
                endpoint: args.endpoint,
                port: args.port,
                username: args.username,
                password: args.password,
                insecure: args.insecure,
            };
            run_read(&overrides, output, save).await
        }
    }
}

async fn run_read(overrides: &Overrides, output: OutputFormat, save: bool) -> Result<()> {
    let mut config = Config::load();
    let connection = config.resolve(overrides)?;

    tracing::info!(
        "Reading protection rules from {}:{}",
        connection.endpoint,
        connection.port
    );

    let state = match read_state(&connection).await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!("Read failed: {}", err);
            return Err(anyhow::anyhow!(format_upstream_error(&err)));
        }
    };

    for violation in datasource::schema_violations(&state) {
        tracing::warn!("Schema violation: {}", violation);
    }

    println!("{}", render_state(&state, output)?);

    if save {
        config
            .remember(&connection)
            .context("Failed to save configuration")?;
    }

    Ok(())
}

async fn read_state(
    connection: &prism_dr::config::ConnectionConfig,
) -> Result<ProtectionRulesState, prism_dr::prism::UpstreamError> {
    let client = PrismClient::new(connection)?;
    datasource::read(&client).await
}

fn render_state(state: &ProtectionRulesState, output: OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Json => {
            serde_json::to_string_pretty(state).context("Failed to serialize state as JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(state).context("Failed to serialize state as YAML")
        }
    }
}
