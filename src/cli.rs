use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dialect::{ConversionType, SourceDialect, TargetDialect};

#[derive(Parser, Debug)]
#[command(
    name = "codeswitch",
    about = "Batch SQL dialect conversion via the Anthropic API"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short = 'c', long, global = true, env = "CODESWITCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit diagnostics to stderr
    #[arg(short = 'v', long, global = true, env = "CODESWITCH_VERBOSE")]
    pub verbose: bool,

    /// Disable credential masking
    #[arg(long, global = true, env = "CODESWITCH_SHOW_SECRETS")]
    pub show_secrets: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert SQL files and package the results as a zip archive
    Convert(ConvertArgs),

    /// List models available to the configured API key
    #[command(name = "list-models")]
    ListModels(ListModelsArgs),
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// SQL files to convert
    pub files: Vec<PathBuf>,

    /// Source dialect: mssql, oracle, or postgresql
    #[arg(short = 's', long, value_enum, env = "CODESWITCH_SOURCE")]
    pub source: Option<SourceDialect>,

    /// Target dialect: snowflake, redshift, or databricks
    #[arg(short = 't', long, value_enum, env = "CODESWITCH_TARGET")]
    pub target: Option<TargetDialect>,

    /// What is being converted: stored-procedure or ddl (default: stored-procedure)
    #[arg(short = 'k', long, value_enum, env = "CODESWITCH_KIND")]
    pub kind: Option<ConversionType>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API host (for proxies or compatible gateways)
    #[arg(long, env = "CODESWITCH_API_HOST")]
    pub api_host: Option<String>,

    /// Model to use for conversion
    #[arg(short = 'm', long, env = "CODESWITCH_MODEL")]
    pub model: Option<String>,

    /// Max tokens in the model reply (default: 8192)
    #[arg(long, env = "CODESWITCH_MAX_TOKENS")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (default: 0.1)
    #[arg(long, env = "CODESWITCH_TEMPERATURE")]
    pub temperature: Option<f32>,

    /// Request timeout in seconds (default: 120)
    #[arg(short = 'T', long, env = "CODESWITCH_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Archive output path (default: converted_sql.zip)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Config file profile name
    #[arg(short = 'P', long, env = "CODESWITCH_PROFILE")]
    pub profile: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ListModelsArgs {
    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API host (for proxies or compatible gateways)
    #[arg(long, env = "CODESWITCH_API_HOST")]
    pub api_host: Option<String>,

    /// Config file profile name
    #[arg(short = 'P', long, env = "CODESWITCH_PROFILE")]
    pub profile: Option<String>,
}
