//! doccat - Concatenate documents into a single PDF or DOCX file.

mod cli;

use clap::Parser;
use std::process;

use crate::cli::Cli;
use doccat::config::{Config, OverwriteMode};
use doccat::error::DocCatError;
use doccat::logging::{LogConfig, init_logging};
use doccat::merge::{MergeReport, MergeTask, Merger};
use doccat::output::{OutputFormatter, ProgressBar, display_merge_report, display_validation_summary};
use doccat::session::InputList;
use doccat::validation::Validator;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig::from_flags(cli.verbose, cli.quiet));

    if let Err(err) = run(cli).await {
        tracing::debug!(error = ?err, "run failed");
        OutputFormatter::quiet().error(&format!("Error: {err}"));
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), DocCatError> {
    let inputs = cli.get_all_inputs().await?;
    let config = cli.to_config(inputs)?;
    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", doccat::NAME, doccat::VERSION));
        formatter.blank_line();
    }

    formatter.info("Validating input files...");
    let validator = Validator::new();
    let summary = validator.validate_config(&config).await?;
    display_validation_summary(&formatter, &summary);

    if config.dry_run {
        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!(
            "  Output would be: {} ({})",
            config.output.display(),
            config.options.target
        ));
        formatter.info("  Run without --dry-run to create the merged document");
        if config.json {
            print_json(&summary)?;
        }
        return Ok(());
    }

    handle_output_overwrite(&config, &formatter).await?;

    formatter.info(&format!(
        "Merging {} file(s) into {}...",
        config.inputs().len(),
        config.options.target
    ));

    let report = run_merge(&config, &formatter).await?;

    if config.json {
        print_json(&report)?;
    } else {
        display_merge_report(&formatter, &report);
    }

    Ok(())
}

/// Run the merge on a background worker, drawing progress as it arrives.
///
/// Ctrl-C requests cancellation; the worker stops before its next input.
async fn run_merge(config: &Config, formatter: &OutputFormatter) -> Result<MergeReport, DocCatError> {
    let mut list = InputList::new();
    list.add_all(config.inputs())?;
    let snapshot = list.begin_merge()?;

    let mut bar = if formatter.should_print() {
        ProgressBar::new(snapshot.len())
    } else {
        ProgressBar::disabled(snapshot.len())
    };
    bar.set_message("Merging");

    let merger = Merger::new(config.options.clone());
    let mut task = MergeTask::spawn(merger, snapshot, config.output.clone());

    let mut interrupted = false;
    loop {
        tokio::select! {
            update = task.next_progress() => match update {
                Some(progress) => {
                    formatter.debug(&format!("{}/{} inputs merged", progress.completed, progress.total));
                    bar.update(progress);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                task.cancel();
            }
        }
    }

    let result = task.wait().await;
    match result {
        Ok(_) => bar.finish(),
        Err(_) => bar.clear(),
    }
    list.finish_merge(result.is_ok());
    result
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), DocCatError> {
    if !config.output.exists() {
        return Ok(());
    }

    match config.overwrite_mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(DocCatError::output_exists(&config.output)),
        OverwriteMode::Prompt => {
            // Nobody to ask in quiet or JSON mode.
            if formatter.is_quiet() {
                return Err(DocCatError::output_exists(&config.output));
            }

            formatter.warning(&format!(
                "Output file already exists: {}",
                config.output.display()
            ));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| DocCatError::other(format!("Failed to read input: {err}")))?;

            match response.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(()),
                _ => Err(DocCatError::Cancelled),
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), DocCatError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DocCatError::other(format!("Failed to encode report: {e}")))?;
    println!("{json}");
    Ok(())
}
