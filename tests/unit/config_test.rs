use codeswitch::cli::{ConvertArgs, ListModelsArgs};
use codeswitch::config::{
    load_from_convert_args, load_from_list_models_args, resolve_secret, DEFAULT_API_HOST,
    DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use codeswitch::dialect::{ConversionType, SourceDialect, TargetDialect};
use codeswitch::error::CodeswitchError;
use codeswitch::masking::format_secret;
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::sync::Mutex;

// --- Env var test infrastructure ---

/// Static mutex to serialize tests that touch process env vars.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// RAII guard that sets env vars on creation and removes them on Drop.
/// Holds the ENV_MUTEX lock for its lifetime.
struct EnvGuard {
    keys: Vec<String>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Create a guard that sets the given env vars and holds the mutex.
    fn new(vars: &[(&str, &str)]) -> Self {
        let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        for (key, val) in vars {
            // SAFETY: env var access is serialized by ENV_MUTEX
            unsafe {
                std::env::set_var(key, val);
            }
        }
        EnvGuard {
            keys: vars.iter().map(|(k, _)| k.to_string()).collect(),
            _lock: lock,
        }
    }

    /// Remove a var for the guard's lifetime (and after; tests never rely on
    /// ambient values for these keys).
    fn remove(&self, key: &str) {
        // SAFETY: env var access is serialized by ENV_MUTEX
        unsafe {
            std::env::remove_var(key);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            // SAFETY: env var access is serialized by ENV_MUTEX
            unsafe {
                std::env::remove_var(key);
            }
        }
    }
}

fn make_convert_args(overrides: impl FnOnce(&mut ConvertArgs)) -> ConvertArgs {
    let mut args = ConvertArgs {
        files: vec![PathBuf::from("query.sql")],
        source: Some(SourceDialect::Mssql),
        target: Some(TargetDialect::Snowflake),
        kind: None,
        api_key: Some("sk-test-key".to_string()),
        api_host: None,
        model: None,
        max_tokens: None,
        temperature: None,
        timeout: None,
        output: None,
        profile: None,
    };
    overrides(&mut args);
    args
}

/// Write a throwaway config file and return its path.
fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("codeswitch_test_{}_{}.toml", name, std::process::id()));
    std::fs::write(&path, contents).expect("write test config");
    path
}

// --- Defaults and precedence ---

#[test]
fn built_in_defaults_apply() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let args = make_convert_args(|_| {});
    let config = load_from_convert_args(&args, false, false, None).unwrap();

    assert_eq!(config.api.host, DEFAULT_API_HOST);
    assert_eq!(config.api.model, DEFAULT_MODEL);
    assert_eq!(config.api.max_tokens, DEFAULT_MAX_TOKENS);
    assert_eq!(config.api.temperature, DEFAULT_TEMPERATURE);
    assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.source, SourceDialect::Mssql);
    assert_eq!(config.target, TargetDialect::Snowflake);
    assert_eq!(config.kind, ConversionType::StoredProcedure);
    assert_eq!(config.api.api_key.expose_secret(), "sk-test-key");
}

#[test]
fn cli_values_override_defaults() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let args = make_convert_args(|a| {
        a.model = Some("claude-test".to_string());
        a.max_tokens = Some(1024);
        a.temperature = Some(0.5);
        a.timeout = Some(30);
        a.kind = Some(ConversionType::Ddl);
        a.api_host = Some("gateway.example.com".to_string());
    });
    let config = load_from_convert_args(&args, false, false, None).unwrap();

    assert_eq!(config.api.model, "claude-test");
    assert_eq!(config.api.max_tokens, 1024);
    assert_eq!(config.api.temperature, 0.5);
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.kind, ConversionType::Ddl);
    assert_eq!(config.api.host, "gateway.example.com");
}

#[test]
fn missing_source_is_config_error() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let args = make_convert_args(|a| a.source = None);
    let err = load_from_convert_args(&args, false, false, None).unwrap_err();
    assert!(matches!(err, CodeswitchError::Config { .. }));
}

#[test]
fn missing_api_key_is_config_error() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let args = make_convert_args(|a| a.api_key = None);
    let err = load_from_convert_args(&args, false, false, None).unwrap_err();
    assert!(matches!(err, CodeswitchError::Config { .. }));
}

#[test]
fn api_key_falls_back_to_env() {
    let guard = EnvGuard::new(&[("ANTHROPIC_API_KEY", "sk-from-env")]);
    guard.remove("CODESWITCH_CONFIG");

    let args = make_convert_args(|a| a.api_key = None);
    let config = load_from_convert_args(&args, false, false, None).unwrap();
    assert_eq!(config.api.api_key.expose_secret(), "sk-from-env");
}

// --- Config file and profiles ---

#[test]
fn explicit_missing_config_file_is_an_error() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let args = make_convert_args(|_| {});
    let missing = PathBuf::from("/nonexistent/codeswitch-config.toml");
    let err = load_from_convert_args(&args, false, false, Some(&missing)).unwrap_err();
    assert!(matches!(err, CodeswitchError::Config { .. }));
}

#[test]
fn profile_supplies_key_host_and_dialects() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let path = write_config(
        "profile_full",
        r#"
[defaults]
max_tokens = 4096

[profiles.prod]
api_key = "sk-from-profile"
api_host = "proxy.internal"
model = "claude-profile"
source = "oracle"
target = "databricks"
"#,
    );

    let args = make_convert_args(|a| {
        a.api_key = None;
        a.source = None;
        a.target = None;
        a.profile = Some("prod".to_string());
    });
    let config = load_from_convert_args(&args, false, false, Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.api.api_key.expose_secret(), "sk-from-profile");
    assert_eq!(config.api.host, "proxy.internal");
    assert_eq!(config.api.model, "claude-profile");
    assert_eq!(config.api.max_tokens, 4096);
    assert_eq!(config.source, SourceDialect::Oracle);
    assert_eq!(config.target, TargetDialect::Databricks);
}

#[test]
fn unknown_profile_is_config_error() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let path = write_config("no_profile", "[defaults]\n");
    let args = make_convert_args(|a| a.profile = Some("missing".to_string()));
    let err = load_from_convert_args(&args, false, false, Some(&path)).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, CodeswitchError::Config { .. }));
}

#[test]
fn unknown_profile_dialect_is_config_error() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let path = write_config(
        "bad_dialect",
        r#"
[profiles.bad]
api_key = "sk-x"
source = "db2"
target = "snowflake"
"#,
    );
    let args = make_convert_args(|a| {
        a.source = None;
        a.profile = Some("bad".to_string());
    });
    let err = load_from_convert_args(&args, false, false, Some(&path)).unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(matches!(err, CodeswitchError::Config { .. }));
}

#[test]
fn profile_api_key_env_indirection() {
    let _guard = EnvGuard::new(&[("MY_CUSTOM_KEY", "sk-indirect")]);

    let path = write_config(
        "indirection",
        r#"
[profiles.indirect]
api_key_env = "MY_CUSTOM_KEY"
"#,
    );
    let args = make_convert_args(|a| {
        a.api_key = None;
        a.profile = Some("indirect".to_string());
    });
    let config = load_from_convert_args(&args, false, false, Some(&path)).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(config.api.api_key.expose_secret(), "sk-indirect");
}

// --- resolve_secret ---

#[test]
fn resolve_secret_prefers_direct_value() {
    let _guard = EnvGuard::new(&[("ANTHROPIC_API_KEY", "sk-env")]);
    let secret = resolve_secret(Some("sk-direct"), None, "ANTHROPIC_API_KEY").unwrap();
    assert_eq!(secret.expose_secret(), "sk-direct");
}

#[test]
fn resolve_secret_ignores_empty_direct_value() {
    let _guard = EnvGuard::new(&[("ANTHROPIC_API_KEY", "sk-env")]);
    let secret = resolve_secret(Some(""), None, "ANTHROPIC_API_KEY").unwrap();
    assert_eq!(secret.expose_secret(), "sk-env");
}

// --- list-models config ---

#[test]
fn list_models_config_uses_default_host() {
    let guard = EnvGuard::new(&[]);
    guard.remove("ANTHROPIC_API_KEY");
    guard.remove("CODESWITCH_CONFIG");

    let args = ListModelsArgs {
        api_key: Some("sk-test".to_string()),
        api_host: None,
        profile: None,
    };
    let (host, key) = load_from_list_models_args(&args, None).unwrap();
    assert_eq!(host, DEFAULT_API_HOST);
    assert_eq!(key.expose_secret(), "sk-test");
}

// --- Masking ---

#[test]
fn secrets_are_masked_by_default() {
    let secret = SecretString::from("sk-very-secret".to_string());
    assert_eq!(format_secret(&secret, false), "[REDACTED]");
    assert_eq!(format_secret(&secret, true), "sk-very-secret");
}
