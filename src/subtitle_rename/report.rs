//! Console output for a rename run.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::subtitle_rename::{MediaFile, OperationStatus, RunResult, TransferMode};

/// Print every operation, unmatched files and a summary.
pub fn print_run_result(result: &RunResult, verbose: bool) {
    let root = &result.subtitle_dir;

    if verbose && !result.pairs.is_empty() {
        println!("{}", "Matched episodes:".bold());
        for pair in &result.pairs {
            println!(
                "  {:>4}  {}  <->  {}",
                pair.episode_key.to_string().cyan(),
                crate::get_relative_path_or_filename(&pair.video.path, &result.video_dir),
                crate::get_relative_path_or_filename(&pair.subtitle.path, root),
            );
        }
    }

    for key in &result.ambiguous_keys {
        crate::print_warning!(
            "Multiple files share episode {key}: paired the first video and subtitle by path, the rest are unmatched"
        );
    }

    let max_items = result.outcomes.len();
    let max_chars = max_items.checked_ilog10().map_or(1, |d| d as usize + 1);
    for (index, outcome) in result.outcomes.iter().enumerate() {
        let operation = &outcome.operation;
        let old_str = crate::get_relative_path_or_filename(&operation.source, root);
        let new_str = crate::get_relative_path_or_filename(&operation.destination, root);
        let number = format!("{:>max_chars$} / {max_items}", index + 1);

        match &outcome.status {
            OperationStatus::Previewed => {
                println!("{}", format!("Dryrun {number}:").bold().cyan());
                crate::show_diff(&old_str, &new_str);
                if operation.destination_exists {
                    println!("{}", "Destination already exists".yellow());
                }
            }
            OperationStatus::Renamed => {
                println!("{}", format!("Rename {number}:").bold().magenta());
                crate::show_diff(&old_str, &new_str);
                if verbose && operation.transfer == TransferMode::CopyThenRemove {
                    println!("Copied and removed original");
                }
                if operation.destination_exists {
                    println!("{}", "Overwrote existing file".yellow());
                }
            }
            OperationStatus::Skipped => {
                println!("{}", format!("Skipping rename to already existing file: {new_str}").yellow());
            }
            OperationStatus::Unchanged => {
                if verbose {
                    println!("Already named correctly: {old_str}");
                }
            }
            OperationStatus::Failed(error) => {
                crate::print_error!("{error}");
            }
        }
    }

    print_unmatched("Unmatched videos", &result.unmatched_videos, &result.video_dir);
    print_unmatched("Unmatched subtitles", &result.unmatched_subtitles, root);
    print_summary(result);
}

/// Print the run result as JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn print_json(result: &RunResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result).context("Failed to serialize run result")?;
    println!("{json}");
    Ok(())
}

fn print_unmatched(heading: &str, files: &[MediaFile], root: &Path) {
    if files.is_empty() {
        return;
    }
    println!("{}", format!("{heading} ({}):", files.len()).bold());
    for file in files {
        let name = crate::get_relative_path_or_filename(&file.path, root);
        match &file.episode_key {
            Some(key) => println!("  {name}  (episode {key})"),
            None => println!("  {name}  {}", "(no episode number)".dimmed()),
        }
    }
}

fn print_summary(result: &RunResult) {
    let plural = |count: usize| if count == 1 { "subtitle" } else { "subtitles" };
    if result.dryrun {
        let previewed = result.count(&OperationStatus::Previewed);
        println!(
            "{}",
            format!(
                "Dryrun: would rename {previewed} of {} matched {}",
                result.total_matched_count,
                plural(result.total_matched_count)
            )
            .cyan()
        );
        return;
    }

    println!(
        "{}",
        format!(
            "Renamed {} of {} matched {}",
            result.renamed_count,
            result.total_matched_count,
            plural(result.total_matched_count)
        )
        .green()
    );

    let overwritten = result.overwritten_count();
    if overwritten > 0 {
        println!("{}", format!("Overwrote {overwritten} existing {}", plural(overwritten)).yellow());
    }
    let skipped = result.count(&OperationStatus::Skipped);
    if skipped > 0 {
        println!("{}", format!("Skipped {skipped} existing {}", plural(skipped)).yellow());
    }
    let failed = result.failed_count();
    if failed > 0 {
        println!("{}", format!("Failed to rename {failed} {}", plural(failed)).red());
    }
}
