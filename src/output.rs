//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! output, progress tracking, and the end-of-run report. This module only
//! renders; all decisions about what happened live in [`RunResults`].

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::results::RunResults;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates and returns a progress bar for file operations.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use downsort::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_with_message("Completed!");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the full end-of-run report for one organization run.
    ///
    /// Long lists are truncated: a category with more than five moved files
    /// shows the first three plus a count, and only the first five skipped
    /// and errored files are listed.
    pub fn print_report(results: &RunResults) {
        let divider = "=".repeat(60);
        println!("\n{}", divider);
        if results.cancelled {
            println!("{}", "DOWNLOADS ORGANIZATION INTERRUPTED".bold().yellow());
        } else {
            println!("{}", "DOWNLOADS ORGANIZATION COMPLETE".bold());
        }
        println!("{}", divider);

        let stats = &results.stats;
        Self::header("SUMMARY:");
        println!("   Total files processed: {}", stats.total_files);
        println!(
            "   {} Successfully moved: {}",
            "✓".green(),
            stats.moved.to_string().green()
        );
        println!(
            "   {} Skipped: {}",
            "⚠".yellow(),
            stats.skipped.to_string().yellow()
        );
        println!(
            "   {} Errors: {}",
            "✗".red(),
            stats.errors.to_string().red()
        );
        println!(
            "   Started: {}",
            results
                .started_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        );
        println!(
            "   Execution time: {:.2} seconds",
            stats.elapsed.as_secs_f64()
        );

        if results.cancelled {
            Self::warning(&format!(
                "Run was interrupted: {} of {} files processed",
                results.processed(),
                stats.total_files
            ));
        }

        if !results.moved.is_empty() {
            Self::header("FILES ORGANIZED BY CATEGORY:");
            for (category, files) in &results.moved {
                let file_word = if files.len() == 1 { "file" } else { "files" };
                println!(
                    "   {}: {} {}",
                    category.to_uppercase().bold(),
                    files.len().to_string().green(),
                    file_word
                );
                if files.len() <= 5 {
                    for file in files {
                        println!("      • {}", file);
                    }
                } else {
                    for file in &files[..3] {
                        println!("      • {}", file);
                    }
                    println!("      ... and {} more", files.len() - 3);
                }
            }
        }

        if !results.skipped.is_empty() {
            Self::header("SKIPPED FILES:");
            for (file_name, reason) in results.skipped.iter().take(5) {
                println!("   • {}: {}", file_name, reason.to_string().yellow());
            }
            if results.skipped.len() > 5 {
                println!("   ... and {} more", results.skipped.len() - 5);
            }
        }

        if !results.errors.is_empty() {
            Self::header("ERRORS:");
            for (file_name, message) in results.errors.iter().take(5) {
                println!("   • {}: {}", file_name, message.red());
            }
            if results.errors.len() > 5 {
                println!("   ... and {} more", results.errors.len() - 5);
            }
        }

        println!(
            "\nOrganized files location: {}",
            results.base_path.display().to_string().cyan()
        );
        println!("{}", divider);
    }
}
