use std::path::Path;
use std::time::Instant;

use crate::api::anthropic::ModelInfo;
use crate::error::CodeswitchError;

/// Print error to stderr in the contract format: error: <category>: <message>
pub fn print_error(err: &CodeswitchError) {
    eprintln!("error: {}", err);
}

/// Print a per-file (non-fatal) problem to stderr.
/// Format: "warning: {message}"
pub fn print_warning(message: &str) {
    eprintln!("warning: {}", message);
}

/// Emit a verbose diagnostic message to stderr.
pub fn emit(verbose: bool, msg: &str) {
    if verbose {
        eprintln!("[codeswitch] {}", msg);
    }
}

/// Print the batch summary to stdout.
pub fn print_summary(converted: usize, skipped: usize, archive: &Path) {
    println!("converted: {}", converted);
    println!("skipped: {}", skipped);
    println!("archive: {}", archive.display());
}

/// Print the available-models listing to stdout, one model per line.
pub fn print_models(models: &[ModelInfo]) {
    for model in models {
        println!("{}\t{}", model.id, model.display_name);
    }
}

/// A timer for measuring durations in verbose mode.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}
