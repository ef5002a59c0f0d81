use directories::ProjectDirs;
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::cli::{ConvertArgs, ListModelsArgs};
use crate::dialect::{ConversionType, SourceDialect, TargetDialect};
use crate::error::CodeswitchError;

pub const DEFAULT_API_HOST: &str = "api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub source: SourceDialect,
    pub target: TargetDialect,
    pub kind: ConversionType,
    pub verbose: bool,
    pub show_secrets: bool,
    pub output_file: Option<PathBuf>,
}

/// Everything needed to talk to the Messages API.
#[derive(Debug)]
pub struct ApiConfig {
    pub host: String,
    pub api_key: SecretString,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

// --- TOML config file structs ---

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    #[serde(default)]
    defaults: TomlDefaults,
    #[serde(default)]
    profiles: HashMap<String, TomlProfile>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlDefaults {
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    timeout: Option<u64>,
    verbose: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
struct TomlProfile {
    api_key: Option<String>,
    api_key_env: Option<String>,
    api_host: Option<String>,
    model: Option<String>,
    source: Option<String>,
    target: Option<String>,
}

/// Config path resolution result — distinguishes explicit vs auto-resolved paths.
struct ResolvedConfigPath {
    path: PathBuf,
    /// true if user explicitly specified via --config or CODESWITCH_CONFIG
    explicit: bool,
}

/// Resolve the config file path: --config flag > env var > platform default.
fn resolve_config_path(cli_config: Option<&PathBuf>) -> Option<ResolvedConfigPath> {
    if let Some(path) = cli_config {
        return Some(ResolvedConfigPath {
            path: path.clone(),
            explicit: true,
        });
    }
    if let Ok(path) = std::env::var("CODESWITCH_CONFIG") {
        return Some(ResolvedConfigPath {
            path: PathBuf::from(path),
            explicit: true,
        });
    }
    ProjectDirs::from("", "", "codeswitch").map(|dirs| ResolvedConfigPath {
        path: dirs.config_dir().join("config.toml"),
        explicit: false,
    })
}

/// Load and parse the TOML config file (if it exists).
fn load_toml_config(resolved: Option<&ResolvedConfigPath>) -> Result<TomlConfig, CodeswitchError> {
    let resolved = match resolved {
        Some(r) => r,
        None => return Ok(TomlConfig::default()),
    };

    if !resolved.path.exists() {
        if resolved.explicit {
            return Err(CodeswitchError::Config {
                message: format!("config file not found: {}", resolved.path.display()),
            });
        }
        // Auto-resolved path doesn't exist — that's fine
        return Ok(TomlConfig::default());
    }

    let content =
        std::fs::read_to_string(&resolved.path).map_err(|e| CodeswitchError::Config {
            message: format!("cannot read config file {}: {}", resolved.path.display(), e),
        })?;

    toml::from_str(&content).map_err(|e| CodeswitchError::Config {
        message: format!("invalid config file {}: {}", resolved.path.display(), e),
    })
}

/// Resolve the API key from direct value, env indirection, or a fallback env var.
pub fn resolve_secret(
    direct: Option<&str>,
    env_key: Option<&str>,
    fallback_env: &str,
) -> Option<SecretString> {
    // Direct value first
    if let Some(val) = direct
        && !val.is_empty()
    {
        return Some(SecretString::from(val.to_string()));
    }
    // Env indirection (e.g., api_key_env = "MY_SECRET")
    if let Some(key) = env_key
        && let Ok(val) = std::env::var(key)
        && !val.is_empty()
    {
        return Some(SecretString::from(val));
    }
    // Fallback env var (e.g., ANTHROPIC_API_KEY)
    if let Ok(val) = std::env::var(fallback_env)
        && !val.is_empty()
    {
        return Some(SecretString::from(val));
    }
    None
}

fn lookup_profile(
    toml_config: &TomlConfig,
    name: Option<&String>,
) -> Result<TomlProfile, CodeswitchError> {
    let profile = name
        .map(|name| {
            toml_config
                .profiles
                .get(name)
                .cloned()
                .ok_or_else(|| CodeswitchError::Config {
                    message: format!("profile '{}' not found in config file", name),
                })
        })
        .transpose()?;
    Ok(profile.unwrap_or_default())
}

fn resolve_api_key(
    direct: Option<&str>,
    profile: &TomlProfile,
) -> Result<SecretString, CodeswitchError> {
    resolve_secret(direct, profile.api_key_env.as_deref(), "ANTHROPIC_API_KEY")
        .or_else(|| {
            profile
                .api_key
                .as_ref()
                .map(|k| SecretString::from(k.clone()))
        })
        .ok_or_else(|| CodeswitchError::Config {
            message: "no API key specified — use --api-key, ANTHROPIC_API_KEY, or a config profile"
                .to_string(),
        })
}

/// Build AppConfig from convert CLI args.
pub fn load_from_convert_args(
    args: &ConvertArgs,
    verbose: bool,
    show_secrets: bool,
    config_path: Option<&PathBuf>,
) -> Result<AppConfig, CodeswitchError> {
    let resolved_path = resolve_config_path(config_path);
    let toml_config = load_toml_config(resolved_path.as_ref())?;
    let profile = lookup_profile(&toml_config, args.profile.as_ref())?;

    // Source/target dialect: CLI/env > profile > error
    let source = match args.source {
        Some(s) => s,
        None => match profile.source.as_deref() {
            Some(s) => SourceDialect::from_config_str(s)?,
            None => {
                return Err(CodeswitchError::Config {
                    message: "no source dialect specified — use --source or configure a profile"
                        .to_string(),
                });
            }
        },
    };

    let target = match args.target {
        Some(t) => t,
        None => match profile.target.as_deref() {
            Some(t) => TargetDialect::from_config_str(t)?,
            None => {
                return Err(CodeswitchError::Config {
                    message: "no target dialect specified — use --target or configure a profile"
                        .to_string(),
                });
            }
        },
    };

    let kind = args.kind.unwrap_or(ConversionType::StoredProcedure);

    let api_key = resolve_api_key(args.api_key.as_deref(), &profile)?;

    let host = args
        .api_host
        .as_deref()
        .or(profile.api_host.as_deref())
        .unwrap_or(DEFAULT_API_HOST)
        .to_string();

    // model: CLI/ENV > profile > TOML defaults > built-in
    let model = args
        .model
        .as_deref()
        .or(profile.model.as_deref())
        .or(toml_config.defaults.model.as_deref())
        .unwrap_or(DEFAULT_MODEL)
        .to_string();

    let max_tokens = args
        .max_tokens
        .unwrap_or_else(|| toml_config.defaults.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS));

    let temperature = args.temperature.unwrap_or_else(|| {
        toml_config
            .defaults
            .temperature
            .unwrap_or(DEFAULT_TEMPERATURE)
    });

    let timeout_secs = args
        .timeout
        .unwrap_or_else(|| toml_config.defaults.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));

    // verbose: CLI/ENV OR TOML default
    let verbose = verbose || toml_config.defaults.verbose.unwrap_or(false);

    Ok(AppConfig {
        api: ApiConfig {
            host,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout_secs,
        },
        source,
        target,
        kind,
        verbose,
        show_secrets,
        output_file: args.output.clone(),
    })
}

/// Build the API configuration for the list-models subcommand.
pub fn load_from_list_models_args(
    args: &ListModelsArgs,
    config_path: Option<&PathBuf>,
) -> Result<(String, SecretString), CodeswitchError> {
    let resolved_path = resolve_config_path(config_path);
    let toml_config = load_toml_config(resolved_path.as_ref())?;
    let profile = lookup_profile(&toml_config, args.profile.as_ref())?;

    let api_key = resolve_api_key(args.api_key.as_deref(), &profile)?;

    let host = args
        .api_host
        .as_deref()
        .or(profile.api_host.as_deref())
        .unwrap_or(DEFAULT_API_HOST)
        .to_string();

    Ok((host, api_key))
}
