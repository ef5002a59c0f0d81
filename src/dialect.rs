use clap::ValueEnum;

use crate::error::CodeswitchError;

/// Source database dialect — selects the hint extraction patterns and the
/// prompt wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceDialect {
    Mssql,
    Oracle,
    Postgresql,
}

/// Target database dialect — only affects the prompt wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetDialect {
    Snowflake,
    Redshift,
    Databricks,
}

/// What kind of object is being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConversionType {
    StoredProcedure,
    Ddl,
}

impl SourceDialect {
    /// Full product name used in prompt text.
    pub fn display_name(self) -> &'static str {
        match self {
            SourceDialect::Mssql => "Microsoft SQL Server",
            SourceDialect::Oracle => "Oracle",
            SourceDialect::Postgresql => "PostgreSQL",
        }
    }

    /// Parse a config-file value ("mssql", "oracle", "postgresql").
    pub fn from_config_str(s: &str) -> Result<Self, CodeswitchError> {
        match s {
            "mssql" => Ok(SourceDialect::Mssql),
            "oracle" => Ok(SourceDialect::Oracle),
            "postgresql" => Ok(SourceDialect::Postgresql),
            other => Err(CodeswitchError::Config {
                message: format!(
                    "unknown source dialect: '{other}' (expected 'mssql', 'oracle', or 'postgresql')"
                ),
            }),
        }
    }
}

impl TargetDialect {
    pub fn display_name(self) -> &'static str {
        match self {
            TargetDialect::Snowflake => "Snowflake",
            TargetDialect::Redshift => "AWS Redshift",
            TargetDialect::Databricks => "Azure Databricks",
        }
    }

    /// Parse a config-file value ("snowflake", "redshift", "databricks").
    pub fn from_config_str(s: &str) -> Result<Self, CodeswitchError> {
        match s {
            "snowflake" => Ok(TargetDialect::Snowflake),
            "redshift" => Ok(TargetDialect::Redshift),
            "databricks" => Ok(TargetDialect::Databricks),
            other => Err(CodeswitchError::Config {
                message: format!(
                    "unknown target dialect: '{other}' (expected 'snowflake', 'redshift', or 'databricks')"
                ),
            }),
        }
    }
}

impl ConversionType {
    /// Label used in prompt text.
    pub fn display_name(self) -> &'static str {
        match self {
            ConversionType::StoredProcedure => "stored procedure",
            ConversionType::Ddl => "DDL",
        }
    }
}
