use crate::api::Translator;
use crate::cleanup;
use crate::dialect::{ConversionType, SourceDialect, TargetDialect};
use crate::error::CodeswitchError;
use crate::hints;
use crate::output::{self, Timer};

/// Fence tokens delimiting the SQL block expected in the model reply.
pub const CODE_FENCE_OPEN: &str = "```sql";
pub const CODE_FENCE_CLOSE: &str = "```";

/// Phrases in a converted block that signal the model gave up partway.
const INCOMPLETE_MARKERS: [&str; 3] = ["continue with", "incomplete", "not supported"];

/// One input file: base name plus raw SQL text.
#[derive(Debug, Clone)]
pub struct SqlFile {
    pub name: String,
    pub sql: String,
}

/// One successfully converted file, keyed by its original base name.
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub name: String,
    pub sql: String,
}

/// Result of running the whole batch. Per-file failures are recorded here,
/// never returned as errors.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub converted: Vec<ConvertedFile>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

/// Build the conversion prompt sent to the model.
pub fn build_prompt(
    sql: &str,
    source: SourceDialect,
    target: TargetDialect,
    kind: ConversionType,
) -> String {
    let source_db = source.display_name();
    let target_db = target.display_name();
    let kind = kind.display_name();

    format!(
        "You are an expert SQL developer specializing in {source_db} and {target_db}.\n\
         Your task is to convert a {source_db} {kind} into a {target_db}-compatible SQL {kind}.\n\
         Use only SQL, avoiding JavaScript or other languages. Ensure the output is syntactically correct,\n\
         functionally equivalent, and optimized for {target_db}.\n\
         Do not include database or schema qualifiers (e.g., USE DATABASE, schema.table) in the output.\n\
         \n\
         Here is the {source_db} code:\n\
         <task>\n\
         {sql}\n\
         </task>\n\
         \n\
         Provide the converted {target_db} code in a single SQL block:\n\
         ```sql\n\
         -- Converted {target_db} code\n\
         <converted_code>\n\
         ```"
    )
}

/// Extract the first fenced SQL block from a model reply.
///
/// The block runs from the first "```sql" to the next "```"; the result is
/// trimmed. Returns `None` when either fence token is absent.
pub fn extract_sql_block(reply: &str) -> Option<String> {
    let open = reply.find(CODE_FENCE_OPEN)?;
    let body_start = open + CODE_FENCE_OPEN.len();
    let close = reply[body_start..].find(CODE_FENCE_CLOSE)? + body_start;
    Some(reply[body_start..close].trim().to_string())
}

/// Return the first incomplete-conversion marker found in the block, if any.
pub fn find_incomplete_marker(block: &str) -> Option<&'static str> {
    let lowered = block.to_lowercase();
    INCOMPLETE_MARKERS
        .into_iter()
        .find(|marker| lowered.contains(marker))
}

/// Convert a single file: hint extraction, qualifier cleanup, model call,
/// fence extraction, incomplete-marker check.
pub async fn convert_file<T: Translator>(
    translator: &T,
    file: &SqlFile,
    source: SourceDialect,
    target: TargetDialect,
    kind: ConversionType,
    verbose: bool,
) -> Result<String, CodeswitchError> {
    let hints = hints::extract_hints(&file.sql, source);
    output::emit(
        verbose,
        &format!(
            "{}: extracted database: {}, schema: {}",
            file.name,
            hints.database.as_deref().unwrap_or("(none)"),
            hints.schema.as_deref().unwrap_or("(none)"),
        ),
    );

    let cleaned = cleanup::strip_qualifiers(&file.sql);
    let prompt = build_prompt(&cleaned, source, target, kind);

    let reply = translator.complete(&prompt).await?;

    let block = extract_sql_block(&reply).ok_or_else(|| CodeswitchError::Response {
        message: "reply contained no fenced SQL block".to_string(),
    })?;

    if let Some(marker) = find_incomplete_marker(&block) {
        return Err(CodeswitchError::Response {
            message: format!("conversion looks incomplete (reply contains '{marker}')"),
        });
    }

    Ok(block)
}

/// Convert a batch of files sequentially. Per-file failures are warned about
/// and recorded as skipped; the batch itself never fails.
pub async fn convert_batch<T: Translator>(
    translator: &T,
    files: &[SqlFile],
    source: SourceDialect,
    target: TargetDialect,
    kind: ConversionType,
    verbose: bool,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (i, file) in files.iter().enumerate() {
        output::emit(
            verbose,
            &format!("processing file {}/{}: {}", i + 1, files.len(), file.name),
        );
        let timer = Timer::start();

        match convert_file(translator, file, source, target, kind, verbose).await {
            Ok(sql) => {
                output::emit(
                    verbose,
                    &format!("{}: conversion complete ({}ms)", file.name, timer.elapsed_ms()),
                );
                outcome.converted.push(ConvertedFile {
                    name: file.name.clone(),
                    sql,
                });
            }
            Err(err) => {
                output::print_warning(&format!("{}: skipped — {}", file.name, err));
                outcome.skipped.push(SkippedFile {
                    name: file.name.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    outcome
}
