// # dnsc - DNS record client
//
// Thin command-line layer over dnsc-core. It is responsible for:
// 1. Parsing the command line
// 2. Reading provider credentials from environment variables
// 3. Registering providers and selecting one by name
// 4. Running a single Get, Set or Delete through the record engine
// 5. Printing the result and mapping failures to exit codes
//
// Reconciliation logic lives in dnsc-core; nothing here decides whether a
// provider call is needed.
//
// ## Configuration
//
// ### Azure
// - `AZURE_SUBSCRIPTION_ID`, `AZURE_RESOURCE_GROUP`, `AZURE_TENANT_ID`,
//   `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET` (required)
// - `AZURE_CLOUD`: `AzureCloud` (default), `AzureChinaCloud` or `AzureUSGovernment`
//
// ### Namecheap
// - `NAMECHEAP_API_USER`, `NAMECHEAP_API_KEY` (required)
// - `NAMECHEAP_USER_NAME`: account to act on (defaults to the API user)
// - `NAMECHEAP_CLIENT_IP`: whitelisted client IP (looked up when unset)
//
// ### Logging
// - `DNSC_LOG_LEVEL`: trace, debug, info, warn (default) or error. Logs go to
//   stderr; stdout only carries command output.
//
// ## Example
//
// ```bash
// export NAMECHEAP_API_USER=alice
// export NAMECHEAP_API_KEY=your_key
//
// dnsc --set -p namecheap -d example.com -r TXT -n _acme -v token -t 300
// dnsc --get -p namecheap -d example.com -r TXT -n _acme -f json
// ```

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Parser, ValueEnum};
use dnsc_core::{
    AzureCloud, AzureConfig, DesiredState, DnscConfig, NamecheapConfig, ProviderConfig,
    ProviderRegistry, RecordEngine,
};
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error};
use tracing_subscriber::FmtSubscriber;

/// Exit codes
///
/// - 0: The action completed
/// - 1: Usage, configuration or provider error
#[derive(Debug, Clone, Copy)]
enum DnscExitCode {
    Success = 0,
    Failure = 1,
}

impl From<DnscExitCode> for ExitCode {
    fn from(code: DnscExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Get,
    Set,
    Delete,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Set => "set",
            Action::Delete => "delete",
        }
    }
}

/// Manage a single DNS record set at a DNS provider
#[derive(Debug, Parser)]
#[command(name = "dnsc", version, about)]
#[command(group(ArgGroup::new("action").required(true).args(["get", "set", "delete"])))]
struct Cli {
    /// Print the current record set
    #[arg(long)]
    get: bool,

    /// Make the record set contain the value
    #[arg(long)]
    set: bool,

    /// Remove the value, or the whole record set when no value is given
    #[arg(long)]
    delete: bool,

    /// DNS provider (azure, namecheap), case-insensitive
    #[arg(short, long)]
    provider: String,

    /// DNS zone, e.g. example.com
    #[arg(short, long)]
    domain: Option<String>,

    /// Record type (A, AAAA, CAA, CNAME, MX, NS, PTR, SOA, SRV, TXT)
    #[arg(short = 'r', long = "type", alias = "recordtype", value_name = "TYPE")]
    record_type: Option<String>,

    /// Record name relative to the zone, e.g. www or @
    #[arg(short, long)]
    name: Option<String>,

    /// Record value
    #[arg(short, long)]
    value: Option<String>,

    /// TTL in seconds
    #[arg(short, long)]
    ttl: Option<u32>,

    /// MX preference or SRV priority
    #[arg(long)]
    priority: Option<u16>,

    /// SRV weight
    #[arg(long)]
    weight: Option<u16>,

    /// SRV port
    #[arg(long)]
    port: Option<u16>,

    /// Output format for --get
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Use the provider's sandbox environment where one exists
    #[arg(short, long)]
    sandbox: bool,
}

impl Cli {
    /// Registered provider name for `--provider`
    fn provider_name(&self) -> String {
        self.provider.trim().to_ascii_lowercase()
    }

    fn action(&self) -> Action {
        if self.get {
            Action::Get
        } else if self.set {
            Action::Set
        } else {
            Action::Delete
        }
    }

    /// The desired state for the selected action
    fn desired_state(&self) -> Result<DesiredState> {
        let action = self.action().as_str();
        let (Some(domain), Some(record_type), Some(name)) =
            (&self.domain, &self.record_type, &self.name)
        else {
            bail!("--{action} requires --domain, --type and --name");
        };

        Ok(DesiredState {
            domain: domain.clone(),
            name: name.clone(),
            record_type: record_type.clone(),
            value: self.value.clone(),
            ttl: self.ttl,
            priority: self.priority,
            weight: self.weight,
            port: self.port,
        })
    }
}

/// Application configuration
struct Config {
    dnsc: DnscConfig,
}

impl Config {
    /// Load the provider's configuration from environment variables
    fn from_env(provider: &str, sandbox: bool) -> Result<Self> {
        Self::from_lookup(provider, sandbox, |key| env::var(key).ok())
    }

    /// Load the provider's configuration through a variable lookup
    fn from_lookup<F>(provider: &str, sandbox: bool, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).with_context(|| format!("Missing required environment variable {key}"))
        };

        let provider = match provider {
            "azure" => {
                let cloud = match optional("AZURE_CLOUD") {
                    Some(name) => name.parse::<AzureCloud>()?,
                    None => AzureCloud::default(),
                };
                ProviderConfig::Azure(AzureConfig {
                    subscription_id: required("AZURE_SUBSCRIPTION_ID")?,
                    resource_group: required("AZURE_RESOURCE_GROUP")?,
                    tenant_id: required("AZURE_TENANT_ID")?,
                    client_id: required("AZURE_CLIENT_ID")?,
                    client_secret: required("AZURE_CLIENT_SECRET")?,
                    cloud,
                })
            }
            "namecheap" => ProviderConfig::Namecheap(NamecheapConfig {
                username: optional("NAMECHEAP_USER_NAME"),
                api_user: required("NAMECHEAP_API_USER")?,
                api_key: required("NAMECHEAP_API_KEY")?,
                client_ip: optional("NAMECHEAP_CLIENT_IP"),
                sandbox,
            }),
            other => bail!("No environment configuration for provider: {other}"),
        };

        if sandbox && !matches!(provider, ProviderConfig::Namecheap(_)) {
            tracing::warn!("Provider {} has no sandbox, ignoring --sandbox", provider.type_name());
        }

        Ok(Self {
            dnsc: DnscConfig::new(provider),
        })
    }

    fn validate(&self) -> Result<()> {
        self.dnsc.validate()?;
        Ok(())
    }
}

/// Log level from `DNSC_LOG_LEVEL`
fn log_level(value: Option<&str>) -> Level {
    match value.map(str::to_lowercase).as_deref() {
        Some("trace") => Level::TRACE,
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("error") => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Registry with every provider compiled into this binary
fn build_registry() -> ProviderRegistry {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "azure")]
    dnsc_provider_azure::register(&registry);

    #[cfg(feature = "namecheap")]
    dnsc_provider_namecheap::register(&registry);

    registry
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                DnscExitCode::Failure.into()
            } else {
                DnscExitCode::Success.into()
            };
        }
    };

    let log_level = log_level(env::var("DNSC_LOG_LEVEL").ok().as_deref());
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DnscExitCode::Failure.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DnscExitCode::Failure.into();
        }
    };

    match rt.block_on(run(&cli)) {
        Ok(output) => {
            println!("{output}");
            DnscExitCode::Success.into()
        }
        Err(e) => {
            eprintln!(
                "Failed to {} record with provider {}: {:#}",
                cli.action().as_str(),
                cli.provider,
                e
            );
            DnscExitCode::Failure.into()
        }
    }
}

/// Run the selected action and render its output
async fn run(cli: &Cli) -> Result<String> {
    let provider = cli.provider_name();
    let registry = build_registry();
    if !registry.has_provider(&provider) {
        bail!(
            "Unknown provider: {} (registered: {})",
            cli.provider,
            registry.list_providers().join(", ")
        );
    }

    let config = Config::from_env(&provider, cli.sandbox)?;
    config.validate()?;

    let adapter = registry.create_provider(&config.dnsc.provider)?;
    let engine = RecordEngine::new(adapter, config.dnsc.engine.clone());

    let desired = cli.desired_state()?;
    debug!("Running {} for {}", cli.action().as_str(), desired.name);

    execute(cli.action(), cli.format, &engine, &desired).await
}

async fn execute(
    action: Action,
    format: OutputFormat,
    engine: &RecordEngine,
    desired: &DesiredState,
) -> Result<String> {
    match action {
        Action::Get => {
            let record = engine
                .get(&desired.domain, &desired.name, &desired.record_type)
                .await?;
            Ok(match format {
                OutputFormat::Text => record.to_string(),
                OutputFormat::Json => record.to_json()?,
            })
        }
        Action::Set => Ok(engine.set(desired).await?.set_operation.to_string()),
        Action::Delete => Ok(engine.delete(desired).await?.to_string()),
    }
}
