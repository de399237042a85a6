// # scalebridge - ObjectScale state bridge
//
// Thin command-line front end over `scalebridge-core`. It reads one
// management API response (or one resource plan), converts it with the
// transcoder, records the result in the configured state store, and prints
// the result as JSON on stdout.
//
// All conversion logic lives in the library crates. This binary only wires
// configuration, logging, and I/O together.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Input
// - `SCALEBRIDGE_INPUT`: Path to the input JSON, `-` for stdin (default `-`)
// - `SCALEBRIDGE_RESOURCE`: What the input holds:
//   - `namespace`: one namespace API object, stored as resource state
//   - `namespace_plan`: resource plan attributes, printed as a create request
//   - `namespaces`: array of namespace API objects, stored as data source state
//   - `accounts`: array of account API objects, stored as data source state
//
// ### State Store
// - `SCALEBRIDGE_STATE_STORE_TYPE`: Type of state store (file, memory)
// - `SCALEBRIDGE_STATE_STORE_PATH`: Path to state file (for file store)
//
// ### Conversion
// - `SCALEBRIDGE_FLOAT_PRECISION`: Fractional digits kept on decode (default 4)
// - `SCALEBRIDGE_ABSENT_POLICY`: Encoding of absent optionals (null, zero)
// - `SCALEBRIDGE_NARROWING`: Integer narrowing on decode (checked, wrapping)
//
// ### Logging
// - `SCALEBRIDGE_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export SCALEBRIDGE_RESOURCE=namespace
// export SCALEBRIDGE_STATE_STORE_TYPE=file
// export SCALEBRIDGE_STATE_STORE_PATH=/var/lib/scalebridge/state.json
//
// curl -s https://objectscale/object/namespaces/namespace/ns1 | scalebridge
// ```

use anyhow::{Context, Result};
use scalebridge_core::{
    AbsentPolicy, Attributes, BindingRegistry, BridgeConfig, NarrowingPolicy, StateRecord,
    StateStore, StateStoreConfig, TranscodeConfig, Transcoder, Value,
};
use scalebridge_objectscale::{
    ACCOUNT_DATASOURCE_ID, ACCOUNT_TYPE, Account, NAMESPACE_DATASOURCE_ID, NAMESPACE_TYPE,
    Namespace, NamespaceResourceModel,
};
use std::env;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Attributes never written to stdout in the clear
const SECRET_ATTRIBUTES: &[&str] = &["root_user_password"];

const REDACTED: &str = "<redacted>";

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum BridgeExitCode {
    /// Conversion completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Input, conversion, or storage failure
    RuntimeError = 2,
}

impl From<BridgeExitCode> for ExitCode {
    fn from(code: BridgeExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// What the input document holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    Namespace,
    NamespacePlan,
    Namespaces,
    Accounts,
}

impl ResourceKind {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "namespace" => Ok(ResourceKind::Namespace),
            "namespace_plan" => Ok(ResourceKind::NamespacePlan),
            "namespaces" => Ok(ResourceKind::Namespaces),
            "accounts" => Ok(ResourceKind::Accounts),
            other => anyhow::bail!(
                "SCALEBRIDGE_RESOURCE '{}' is not supported. \
                Supported kinds: namespace, namespace_plan, namespaces, accounts",
                other
            ),
        }
    }
}

/// Application configuration
struct Config {
    input: String,
    resource: String,
    state_store_type: String,
    state_store_path: Option<String>,
    float_precision: Option<String>,
    absent_policy: String,
    narrowing: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            input: env::var("SCALEBRIDGE_INPUT").unwrap_or_else(|_| "-".to_string()),
            resource: env::var("SCALEBRIDGE_RESOURCE").unwrap_or_else(|_| "namespace".to_string()),
            state_store_type: env::var("SCALEBRIDGE_STATE_STORE_TYPE")
                .unwrap_or_else(|_| "memory".to_string()),
            state_store_path: env::var("SCALEBRIDGE_STATE_STORE_PATH").ok(),
            float_precision: env::var("SCALEBRIDGE_FLOAT_PRECISION").ok(),
            absent_policy: env::var("SCALEBRIDGE_ABSENT_POLICY")
                .unwrap_or_else(|_| "null".to_string()),
            narrowing: env::var("SCALEBRIDGE_NARROWING").unwrap_or_else(|_| "checked".to_string()),
            log_level: env::var("SCALEBRIDGE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate the configuration and build the library configuration
    fn validate(&self) -> Result<(ResourceKind, BridgeConfig)> {
        let kind = ResourceKind::parse(&self.resource)?;

        if self.input.is_empty() {
            anyhow::bail!("SCALEBRIDGE_INPUT cannot be empty. Use '-' to read stdin");
        }

        let state_store = match self.state_store_type.as_str() {
            "memory" => StateStoreConfig::Memory,
            "file" => {
                let Some(path) = self.state_store_path.clone() else {
                    anyhow::bail!(
                        "SCALEBRIDGE_STATE_STORE_PATH is required when \
                        SCALEBRIDGE_STATE_STORE_TYPE=file"
                    );
                };
                if let Some(parent) = std::path::Path::new(&path).parent()
                    && !parent.as_os_str().is_empty()
                    && !parent.exists()
                {
                    anyhow::bail!(
                        "SCALEBRIDGE_STATE_STORE_PATH parent directory does not exist: {}",
                        parent.display()
                    );
                }
                StateStoreConfig::File { path }
            }
            other => anyhow::bail!(
                "SCALEBRIDGE_STATE_STORE_TYPE '{}' is not supported. \
                Supported types: file, memory",
                other
            ),
        };

        let absent = match self.absent_policy.to_lowercase().as_str() {
            "null" => AbsentPolicy::Null,
            "zero" => AbsentPolicy::Zero,
            other => anyhow::bail!(
                "SCALEBRIDGE_ABSENT_POLICY '{}' is not valid. Valid policies: null, zero",
                other
            ),
        };

        let narrowing = match self.narrowing.to_lowercase().as_str() {
            "checked" => NarrowingPolicy::Checked,
            "wrapping" => NarrowingPolicy::Wrapping,
            other => anyhow::bail!(
                "SCALEBRIDGE_NARROWING '{}' is not valid. Valid policies: checked, wrapping",
                other
            ),
        };

        let mut transcode = TranscodeConfig::new()
            .with_absent(absent)
            .with_narrowing(narrowing);
        if let Some(ref digits) = self.float_precision {
            let digits: u32 = digits.parse().with_context(|| {
                format!("SCALEBRIDGE_FLOAT_PRECISION must be a number. Got: {}", digits)
            })?;
            transcode = transcode.with_float_precision(digits);
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "SCALEBRIDGE_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        let bridge = BridgeConfig {
            transcode,
            state_store,
        };
        bridge.validate()?;
        Ok((kind, bridge))
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    let (kind, bridge) = match config.validate() {
        Ok(validated) => validated,
        Err(e) => {
            eprintln!("Configuration validation error: {:#}", e);
            return BridgeExitCode::ConfigError.into();
        }
    };

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr so stdout carries only the converted document
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return BridgeExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return BridgeExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run(&config.input, kind, bridge).await {
            Ok(()) => BridgeExitCode::Success,
            Err(e) => {
                error!("Conversion failed: {:#}", e);
                BridgeExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Convert the input document and record the result
async fn run(input: &str, kind: ResourceKind, bridge: BridgeConfig) -> Result<()> {
    let registry = BindingRegistry::shared();
    scalebridge_objectscale::register(&registry).context("Invalid ObjectScale bindings")?;
    let transcoder = Transcoder::new(registry, bridge.transcode)?;

    let document = read_input(input).await?;
    info!(?kind, input, "Converting input document");

    let (address, record) = match kind {
        ResourceKind::Namespace => {
            let namespace: Namespace =
                serde_json::from_str(&document).context("Input is not a namespace object")?;
            let state = scalebridge_objectscale::namespace_state(&transcoder, &namespace)?;
            let record = StateRecord::capture(&state, transcoder.registry())?;
            (scalebridge_objectscale::namespace_address(&namespace.name), record)
        }
        ResourceKind::NamespacePlan => {
            let attributes: Attributes =
                serde_json::from_str(&document).context("Input is not a plan attribute map")?;
            let registry = transcoder.registry();
            let plan = registry
                .model::<NamespaceResourceModel>()?
                .from_attributes(attributes, registry)?;
            let mut namespace = scalebridge_objectscale::namespace_from_plan(&transcoder, &plan)?;
            if !namespace.root_user_password.is_empty() {
                namespace.root_user_password = REDACTED.to_string();
            }

            // A plan is not state; print the request body and stop
            println!("{}", serde_json::to_string_pretty(&namespace)?);
            return Ok(());
        }
        ResourceKind::Namespaces => {
            let namespaces: Vec<Namespace> =
                serde_json::from_str(&document).context("Input is not a namespace array")?;
            let state = scalebridge_objectscale::namespace_datasource(&transcoder, &namespaces)?;
            let record = StateRecord::capture(&state, transcoder.registry())?;
            (
                format!("data.{}.{}", NAMESPACE_TYPE, NAMESPACE_DATASOURCE_ID),
                record,
            )
        }
        ResourceKind::Accounts => {
            let accounts: Vec<Account> =
                serde_json::from_str(&document).context("Input is not an account array")?;
            let state = scalebridge_objectscale::account_datasource(&transcoder, &accounts)?;
            let record = StateRecord::capture(&state, transcoder.registry())?;
            (format!("data.{}.{}", ACCOUNT_TYPE, ACCOUNT_DATASOURCE_ID), record)
        }
    };

    let store = bridge.state_store.open().await?;
    store.put(&address, &record).await?;
    store.flush().await?;
    debug!(
        %address,
        store = bridge.state_store.type_name(),
        attributes = record.attributes.len(),
        "Stored state record"
    );

    println!("{}", serde_json::to_string_pretty(&redacted(record))?);
    info!(%address, "Conversion complete");
    Ok(())
}

/// Copy of `record` fit for stdout, with non-empty secrets masked
///
/// The stored record keeps the real values.
fn redacted(mut record: StateRecord) -> StateRecord {
    for key in SECRET_ATTRIBUTES {
        if let Some(value) = record.attributes.get_mut(*key)
            && value.as_str().is_some_and(|secret| !secret.is_empty())
        {
            *value = Value::from(REDACTED);
        }
    }
    record
}

/// Read the whole input document from a file or stdin
async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut document = String::new();
        tokio::io::stdin()
            .read_to_string(&mut document)
            .await
            .context("Failed to read stdin")?;
        return Ok(document);
    }

    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input))
}
