// crates/acless-cli/src/main.rs
// ============================================================================
// Module: Acless CLI Entry Point
// Description: Command dispatcher for gated call resolution and config checks.
// Purpose: Resolve calls through the gate from a config file for ops and tests.
// Dependencies: acless-config, acless-core, acless-sanitize, clap, serde, thiserror
// ============================================================================

//! ## Overview
//! The Acless CLI loads a gate configuration, builds the member registry,
//! sanitizer, and audit sink from it, and resolves a single call through the
//! dispatch gate. The resolved call is printed as JSON; the target is never
//! executed. Security posture: argument input is untrusted and size-limited.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use acless_config::AclessConfig;
use acless_core::DispatchGate;
use acless_core::GateError;
use acless_core::MemberKind;
use acless_core::ModelTypeId;
use acless_core::PolicyProvider;
use acless_sanitize::SchemaSanitizer;
use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of call argument input in bytes.
const MAX_ARGS_INPUT_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "acless", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a call through the dispatch gate.
    Resolve(ResolveCommand),
    /// List declared members and their gate classification.
    Members(MembersCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration for the `resolve` command.
#[derive(Args, Debug)]
struct ResolveCommand {
    /// Optional config file path (defaults to acless.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Model type identifier.
    #[arg(long, value_name = "NAME")]
    model: String,
    /// Method or property name.
    #[arg(long, value_name = "NAME")]
    member: String,
    /// Call arguments as a JSON array.
    #[arg(long, value_name = "JSON", conflicts_with = "args_file")]
    args: Option<String>,
    /// File containing the call arguments as a JSON array.
    #[arg(long, value_name = "PATH")]
    args_file: Option<PathBuf>,
}

/// Configuration for the `members` command.
#[derive(Args, Debug)]
struct MembersCommand {
    /// Optional config file path (defaults to acless.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Restrict the listing to one model.
    #[arg(long, value_name = "NAME")]
    model: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate an Acless configuration file.
    Validate(ConfigValidateCommand),
}

/// Configuration for the `config validate` command.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to acless.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Member classification entry for the `members` command.
#[derive(Debug, Serialize)]
struct MemberListing {
    /// Model type identifier.
    model: String,
    /// Member name.
    name: String,
    /// Member kind.
    kind: MemberKind,
    /// True when the member carries the authorization tag.
    accessible: bool,
    /// True when calls collapse to a single structured argument.
    plain_args: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("acless {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        let help = Cli::command().render_help().to_string();
        write_stdout_line(help.trim_end())
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Resolve(command) => command_resolve(command),
        Commands::Members(command) => command_members(command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Resolve Command
// ============================================================================

/// Executes the `resolve` command.
fn command_resolve(command: ResolveCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let args = read_call_args(command.args.as_deref(), command.args_file.as_deref())?;
    let registry = config
        .build_registry()
        .map_err(|err| CliError::new(format!("failed to build member registry: {err}")))?;
    let sanitizer = SchemaSanitizer::from_config(&config)
        .map_err(|err| CliError::new(format!("failed to build sanitizer: {err}")))?;
    let audit = config
        .audit
        .build_sink()
        .map_err(|err| CliError::new(format!("failed to open audit sink: {err}")))?;
    let gate = DispatchGate::new(registry, config.policy.clone(), sanitizer).with_audit(audit);

    let surface = gate.surface(ModelTypeId::new(command.model));
    match surface.call(&command.member, args) {
        Ok(result) => {
            let rendered = serde_json::to_string(&result)
                .map_err(|err| CliError::new(format!("failed to render result: {err}")))?;
            write_stdout_line(&rendered)
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(emit_gate_error(&err)),
    }
}

/// Reads call arguments from inline JSON or a file, defaulting to `[]`.
fn read_call_args(inline: Option<&str>, file: Option<&Path>) -> CliResult<Vec<Value>> {
    let bytes = match (inline, file) {
        (Some(text), _) => {
            if text.len() > MAX_ARGS_INPUT_BYTES {
                return Err(CliError::new(format!(
                    "arguments exceed size limit ({} > {MAX_ARGS_INPUT_BYTES})",
                    text.len()
                )));
            }
            text.as_bytes().to_vec()
        }
        (None, Some(path)) => read_bytes_with_limit(path, MAX_ARGS_INPUT_BYTES)?,
        (None, None) => return Ok(Vec::new()),
    };
    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("arguments must be valid JSON: {err}")))?;
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(CliError::new("arguments must be a JSON array".to_string())),
    }
}

// ============================================================================
// SECTION: Members Command
// ============================================================================

/// Executes the `members` command.
fn command_members(command: MembersCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let registry = config
        .build_registry()
        .map_err(|err| CliError::new(format!("failed to build member registry: {err}")))?;
    let policy = &config.policy;

    let models: Vec<ModelTypeId> = match command.model {
        Some(name) => {
            let model = ModelTypeId::new(name);
            if !registry.contains_model(&model) {
                return Err(CliError::new(format!("unknown model: {model}")));
            }
            vec![model]
        }
        None => registry.models().cloned().collect(),
    };

    let mut listings = Vec::new();
    for model in &models {
        for member in registry.members(model) {
            let plain_args = member.kind == MemberKind::Method
                && !member.tags.has(policy.array_argument_tag());
            listings.push(MemberListing {
                model: model.to_string(),
                name: member.name.to_string(),
                kind: member.kind,
                accessible: member.tags.has(policy.authorization_tag()),
                plain_args,
            });
        }
    }
    let rendered = serde_json::to_string_pretty(&listings)
        .map_err(|err| CliError::new(format!("failed to render members: {err}")))?;
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => {
            let config = load_config(command.config.as_deref())?;
            SchemaSanitizer::from_config(&config)
                .map_err(|err| CliError::new(format!("invalid config: {err}")))?;
            write_stdout_line("ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates the gate configuration.
fn load_config(path: Option<&Path>) -> CliResult<AclessConfig> {
    AclessConfig::load(path).map_err(|err| CliError::new(format!("failed to load config: {err}")))
}

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> CliResult<Vec<u8>> {
    let read_error =
        |err: std::io::Error| CliError::new(format!("failed to read {}: {err}", path.display()));
    let too_large = |size: u64| {
        CliError::new(format!(
            "{} exceeds size limit ({size} > {max_bytes})",
            path.display()
        ))
    };
    let file = File::open(path).map_err(read_error)?;
    let size = file.metadata().map_err(read_error)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| too_large(size))?;
    if size > limit {
        return Err(too_large(size));
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(read_error)?;
    if bytes.len() > max_bytes {
        return Err(too_large(u64::try_from(bytes.len()).unwrap_or(u64::MAX)));
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits a structured gate error to stderr and returns a failure exit code.
fn emit_gate_error(error: &GateError) -> ExitCode {
    let payload = json!({
        "error": {
            "code": error.code(),
            "message": error.to_string(),
        }
    });
    let _ = write_stderr_line(&payload.to_string());
    ExitCode::FAILURE
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
