use regex::Regex;

use crate::output;

/// Strip database/schema qualifiers from SQL text before conversion.
///
/// Three passes: drop `USE <db>;` statements, drop the `schema.` qualifier
/// after `CREATE TABLE|PROCEDURE|FUNCTION` (the object name and everything
/// after it are preserved), then remove leftover `[` / `]` identifier quoting.
/// A matching error degrades to returning the input unchanged with a warning.
pub fn strip_qualifiers(sql: &str) -> String {
    match try_strip(sql) {
        Ok(cleaned) => cleaned,
        Err(e) => {
            output::print_warning(&format!("failed to strip qualifiers: {e}"));
            sql.to_string()
        }
    }
}

fn try_strip(sql: &str) -> Result<String, regex::Error> {
    let use_stmt = Regex::new(r"(?i)USE\s+\[?[^\]\s;]+\]?\s*;")?;
    let cleaned = use_stmt.replace_all(sql, "");

    let create_qualifier = Regex::new(
        r"(?i)\bCREATE\s+(?P<kind>TABLE|PROCEDURE|FUNCTION)\s+(?:\[[^\]\.;]+\]|[^\.\s;\[]+)\.",
    )?;
    let cleaned = create_qualifier.replace_all(&cleaned, "CREATE $kind ");

    Ok(cleaned.replace(['[', ']'], ""))
}
