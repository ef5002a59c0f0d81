use clap::Parser;
use codeswitch::api::anthropic::{self, AnthropicClient};
use codeswitch::cli::{self, Cli, Command};
use codeswitch::convert::{self, SqlFile};
use codeswitch::error::CodeswitchError;
use codeswitch::output::{self, Timer};
use codeswitch::{archive, config, masking};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Load .env file (optional, ignore if missing)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Convert(ref args) => {
            run_convert(args, cli.verbose, cli.show_secrets, cli.config.as_ref()).await
        }
        Command::ListModels(ref args) => {
            list_models(args, cli.verbose, cli.config.as_ref()).await
        }
    };

    if let Err(err) = result {
        output::print_error(&err);
        process::exit(1);
    }
}

async fn run_convert(
    args: &cli::ConvertArgs,
    verbose: bool,
    show_secrets: bool,
    config_path: Option<&std::path::PathBuf>,
) -> Result<(), CodeswitchError> {
    let app_config = config::load_from_convert_args(args, verbose, show_secrets, config_path)?;
    let verbose = app_config.verbose;

    if args.files.is_empty() {
        return Err(CodeswitchError::Config {
            message: "no input files — pass at least one .sql file".to_string(),
        });
    }

    // Resolve the archive path before any API call (fail-fast on bad extension)
    let archive_path = match &app_config.output_file {
        Some(path) => archive::resolve_archive_path(path)?,
        None => archive::resolve_archive_path(Path::new(archive::DEFAULT_ARCHIVE_NAME))?,
    };

    output::emit(
        verbose,
        &format!(
            "converting {} to {} ({}) with model {} via {}",
            app_config.source.display_name(),
            app_config.target.display_name(),
            app_config.kind.display_name(),
            app_config.api.model,
            app_config.api.host,
        ),
    );
    output::emit(
        verbose,
        &format!(
            "using API key {}",
            masking::format_secret(&app_config.api.api_key, app_config.show_secrets)
        ),
    );

    let files = read_input_files(&args.files);
    if files.is_empty() {
        output::print_warning("no readable input files — archive not written");
        return Ok(());
    }

    let client = AnthropicClient::new(
        app_config.api.host.clone(),
        app_config.api.api_key,
        app_config.api.model.clone(),
        app_config.api.max_tokens,
        app_config.api.temperature,
        app_config.api.timeout_secs,
    );

    let timer = Timer::start();
    let outcome = convert::convert_batch(
        &client,
        &files,
        app_config.source,
        app_config.target,
        app_config.kind,
        verbose,
    )
    .await;
    output::emit(
        verbose,
        &format!(
            "batch complete ({}ms, {} converted, {} skipped)",
            timer.elapsed_ms(),
            outcome.converted.len(),
            outcome.skipped.len()
        ),
    );

    if outcome.converted.is_empty() {
        output::print_warning("no files converted — archive not written");
        return Ok(());
    }

    archive::write_archive(&outcome.converted, &archive_path)?;
    output::print_summary(
        outcome.converted.len(),
        outcome.skipped.len(),
        &archive_path,
    );

    Ok(())
}

async fn list_models(
    args: &cli::ListModelsArgs,
    verbose: bool,
    config_path: Option<&std::path::PathBuf>,
) -> Result<(), CodeswitchError> {
    let (host, api_key) = config::load_from_list_models_args(args, config_path)?;

    output::emit(verbose, &format!("listing models on {}...", host));
    let timer = Timer::start();
    let models = anthropic::list_models(&host, &api_key).await?;
    output::emit(
        verbose,
        &format!(
            "model list retrieved ({}ms, {} models)",
            timer.elapsed_ms(),
            models.len()
        ),
    );

    output::print_models(&models);

    Ok(())
}

// --- Helpers ---

/// Read input files, skipping unreadable ones with a warning. Entry names are
/// the base file names, matching how they appear in the output archive.
fn read_input_files(paths: &[std::path::PathBuf]) -> Vec<SqlFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(sql) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                files.push(SqlFile { name, sql });
            }
            Err(e) => {
                output::print_warning(&format!("cannot read {}: {} — skipped", path.display(), e));
            }
        }
    }
    files
}
