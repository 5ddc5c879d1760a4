//! CLI entry point for the scanconf appliance reconciler.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use secrecy::SecretString;
use tracing_subscriber::{fmt, EnvFilter};

use scanconf_api::{ApiClient, ApiConfig};

use scanconf_reconcile::changes::{load_route_changes, load_vlan_changes};
use scanconf_reconcile::config::{load_settings, Settings};
use scanconf_reconcile::run::{run, ApiSink, RunOptions};

#[derive(Parser)]
#[command(name = "scanconf-reconcile")]
#[command(about = "Reconcile scanner appliance VLANs and static routes")]
struct Cli {
    /// CSV file of VLAN changes.
    #[arg(long, value_name = "FILE")]
    vlans: Option<PathBuf>,

    /// CSV file of static route changes.
    #[arg(long, value_name = "FILE")]
    routes: Option<PathBuf>,

    /// API base URL (overrides api.url).
    #[arg(long)]
    api_url: Option<String>,

    /// API username (overrides api.username).
    #[arg(short, long)]
    username: Option<String>,

    /// API password; `-` prompts on the terminal.
    #[arg(short, long)]
    password: Option<String>,

    /// HTTPS proxy URL (overrides api.proxy_url).
    #[arg(long)]
    proxy_url: Option<String>,

    /// Config file prefix (default: scanconf).
    #[arg(short, long, default_value = "scanconf")]
    config: String,

    /// Print the planned updates as JSON instead of sending them.
    #[arg(long)]
    dry_run: bool,

    /// Log at debug level, including each update URL.
    #[arg(long)]
    debug: bool,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.log_format);

    if cli.vlans.is_none() && cli.routes.is_none() {
        anyhow::bail!("Nothing to do: specify --vlans and/or --routes");
    }

    let settings = load_settings(&cli.config)?;

    // Read every change list before touching the API.
    let mut changes = Vec::new();
    if let Some(path) = &cli.vlans {
        changes.extend(load_vlan_changes(path)?);
    }
    if let Some(path) = &cli.routes {
        changes.extend(load_route_changes(path)?);
    }

    let api_config = build_api_config(&cli, &settings)?;
    let client = ApiClient::connect(&api_config)?;
    tracing::info!(url = %client.base_url(), user = %api_config.username, "API client ready");

    let sink = ApiSink::new(&client, settings.reconcile.appliance_kind);
    let options = RunOptions {
        empty_category: settings.reconcile.empty_category,
        on_update_failure: settings.reconcile.on_update_failure,
        dry_run: cli.dry_run,
    };

    let report = run(&client, &sink, changes, options).await?;

    if cli.dry_run {
        println!("{}", serde_json::to_string_pretty(&report.planned)?);
    }

    Ok(())
}

fn init_logging(debug: bool, format: LogFormat) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so dry-run JSON on stdout stays machine-readable.
    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn build_api_config(cli: &Cli, settings: &Settings) -> anyhow::Result<ApiConfig> {
    let url = cli.api_url.as_deref().unwrap_or(&settings.api.url);
    if url.is_empty() {
        anyhow::bail!("API URL required: set --api-url or api.url in config");
    }

    let username = cli.username.as_deref().unwrap_or(&settings.api.username);
    if username.is_empty() {
        anyhow::bail!("API username required: set --username or api.username in config");
    }

    let password = match cli.password.as_deref().or(settings.api.password.as_deref()) {
        Some(p) if p != "-" => p.to_string(),
        _ => rpassword::prompt_password(format!("Password for {username}: "))?,
    };

    let mut config = ApiConfig::new(url, username, SecretString::from(password));
    config.proxy_url = cli
        .proxy_url
        .clone()
        .or_else(|| settings.api.proxy_url.clone());
    config.timeout = settings.api.timeout();
    Ok(config)
}
