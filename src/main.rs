use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use lumi_report::{report, utils::config::ReportConfig, ReportConverter};

#[derive(Parser)]
#[command(name = "lumi-report")]
#[command(author = "NL Team")]
#[command(version = "0.1.3")]
#[command(about = "Convert JSON test results into an Excel report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a folder of JSON result files into an .xlsx report
    Convert {
        /// Folder containing *.json result files
        input: PathBuf,

        /// Output workbook path
        #[arg(short, long)]
        output: PathBuf,

        /// Embed screenshots ("Yes" to enable)
        #[arg(short, long, default_value = "No")]
        screenshots: String,

        /// Also write test-summary.txt into this directory
        #[arg(long)]
        summary_dir: Option<PathBuf>,

        /// Keep only the first line of error messages, without ANSI colours
        #[arg(long, default_value = "false")]
        sanitize_errors: bool,
    },

    /// Write only the one-line test-summary.txt
    Summary {
        /// Folder containing *.json result files
        input: PathBuf,

        /// Directory to write test-summary.txt into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            screenshots,
            summary_dir,
            sanitize_errors,
        } => {
            let config =
                ReportConfig::new(&output, &screenshots).with_sanitized_errors(sanitize_errors);

            println!(
                "{} Converting results from: {}",
                "📊".to_string().blue(),
                input.display()
            );
            println!("  Output: {}", output.display().to_string().cyan());
            if config.bind_screenshots {
                println!("  Screenshots: {}", "Enabled".green());
            }

            let converter = ReportConverter::new(config);
            let outcome = converter.convert_folder(&input).await;

            println!("  Records: {}", outcome.records.len().to_string().cyan());
            if !outcome.diagnostics.is_empty() {
                println!(
                    "  {} {} problem(s) reported",
                    "⚠".yellow(),
                    outcome.diagnostics.len()
                );
            }

            match &outcome.written_to {
                Some(path) => println!("{} Report saved to: {}", "✓".green(), path.display()),
                None => println!("{} Report was not written", "✗".red()),
            }

            if let Some(dir) = summary_dir {
                match report::summary::write_summary_if_ready(&outcome.stats, &dir) {
                    Ok(Some(path)) => {
                        println!("{} Summary saved to: {}", "✓".green(), path.display())
                    }
                    Ok(None) => println!(
                        "  {} Skipped {}: conversion produced no statistics",
                        "⚠".yellow(),
                        report::summary::SUMMARY_TEXT_FILE
                    ),
                    Err(e) => log::error!("{:#}", e),
                }
            }
        }

        Commands::Summary { input, dir } => {
            let path = report::summarize_folder(&input, &dir).await?;
            println!("{} Summary saved to: {}", "✓".green(), path.display());
        }
    }

    Ok(())
}
