use regex::Regex;

use crate::dialect::SourceDialect;
use crate::output;

/// Database and schema names heuristically pulled out of SQL source text.
///
/// Used for diagnostics only — neither value feeds back into the conversion,
/// and a failed extraction never blocks a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaHints {
    pub database: Option<String>,
    pub schema: Option<String>,
}

/// Extract database/schema hints from SQL text for the given source dialect.
///
/// Never fails past this boundary: an internal matching error produces an
/// empty `SchemaHints` and a stderr warning.
pub fn extract_hints(sql: &str, source: SourceDialect) -> SchemaHints {
    match try_extract(sql, source) {
        Ok(hints) => hints,
        Err(e) => {
            output::print_warning(&format!("failed to extract schema hints: {e}"));
            SchemaHints::default()
        }
    }
}

fn try_extract(sql: &str, source: SourceDialect) -> Result<SchemaHints, regex::Error> {
    match source {
        SourceDialect::Mssql => mssql_hints(sql),
        SourceDialect::Oracle => oracle_hints(sql),
        SourceDialect::Postgresql => postgres_hints(sql),
    }
}

/// First capture group that matched, as an owned trimmed string.
fn group(caps: &regex::Captures<'_>, names: &[&str]) -> Option<String> {
    names
        .iter()
        .copied()
        .find_map(|n| caps.name(n))
        .map(|m| m.as_str().trim().to_string())
}

fn mssql_hints(sql: &str) -> Result<SchemaHints, regex::Error> {
    let use_db = Regex::new(r"(?i)USE\s+\[?(?P<database>[^\]\s;]+)\]?\s*;")?;
    let database = use_db
        .captures(sql)
        .and_then(|caps| group(&caps, &["database"]));

    // Bracket-optional CREATE PROCEDURE|TABLE schema.object; "dbo" when the
    // statement carries no qualifier.
    let create = Regex::new(
        r"(?i)CREATE\s+(?:PROCEDURE|TABLE)\s+(?:\[(?P<schema>[^\]\.;]+)\]|(?P<schema2>[^\.\s;\[]+))\.(?:\[[^\]\s;]+\]|[^\s;(\[]+)\s*(?:[(\[]|$)",
    )?;
    let schema = create
        .captures(sql)
        .and_then(|caps| group(&caps, &["schema", "schema2"]))
        .or_else(|| Some("dbo".to_string()));

    Ok(SchemaHints { database, schema })
}

fn oracle_hints(sql: &str) -> Result<SchemaHints, regex::Error> {
    let create = Regex::new(
        r#"(?i)CREATE\s+(?:TABLE|PROCEDURE|FUNCTION)\s+(?:"(?P<schema>[^"\.;]+)"|(?P<schema2>[^\.\s;"]+))\.(?:"[^"\s;]+"|[^\s;(\[]+)\s*(?:[(\[]|$)"#,
    )?;
    let schema = create
        .captures(sql)
        .and_then(|caps| group(&caps, &["schema", "schema2"]));

    // Oracle has no separate catalog concept; the database mirrors the schema.
    Ok(SchemaHints {
        database: schema.clone(),
        schema,
    })
}

fn postgres_hints(sql: &str) -> Result<SchemaHints, regex::Error> {
    let search_path = Regex::new(r"(?i)SET\s+search_path\s+TO\s+(?P<schema>[^,;]+)\s*[,;]")?;
    let mut schema = search_path
        .captures(sql)
        .and_then(|caps| group(&caps, &["schema"]));

    if schema.is_none() {
        let create = Regex::new(
            r"(?i)CREATE\s+(?:TABLE|FUNCTION|PROCEDURE)\s+(?:(?P<schema>[^\.\s;]+)\.)?[^\s;(\[]+\s*(?:[(\[]|$)",
        )?;
        schema = create
            .captures(sql)
            .and_then(|caps| group(&caps, &["schema"]))
            .or_else(|| Some("public".to_string()));
    }

    Ok(SchemaHints {
        database: None,
        schema,
    })
}
