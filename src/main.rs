//! Chrome to Firefox Extension Converter CLI

use anyhow::{Context, Result};
use chrome2fox::packager::{DirectoryRepacker, DirectoryUnpacker};
use chrome2fox::report::{generate_report, ReportFormat};
use chrome2fox::utils::helpers::{crx_download_url, extension_id_from_store_url, safe_folder_name};
use chrome2fox::{convert_directory, convert_package, extension_name, ConversionOptions, ConversionReport};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chrome2fox")]
#[command(about = "Convert unpacked Chrome extensions into Firefox-loadable extensions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an unpacked Chrome extension for Firefox
    Convert {
        /// Directory containing the unpacked extension
        #[arg(short, long)]
        input: PathBuf,

        /// Write the converted extension here instead of patching the input in place
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a conversion report to this file
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Write the report as JSON instead of Markdown
        #[arg(long)]
        json: bool,

        /// Add-on id used when the manifest has no browser_specific_settings
        #[arg(long)]
        gecko_id: Option<String>,

        /// Leave chrome-extension:// URLs untouched
        #[arg(long)]
        skip_url_rewrite: bool,

        /// Leave string method calls unguarded
        #[arg(long)]
        skip_string_guards: bool,
    },

    /// Print the extension name from a manifest
    Name {
        /// Path to manifest.json
        #[arg(short, long)]
        manifest: PathBuf,
    },

    /// Print the extension id and package download URL for a Chrome Web Store link
    StoreId {
        /// Chrome Web Store detail page URL
        url: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Convert {
            input,
            output,
            report,
            json,
            gecko_id,
            skip_url_rewrite,
            skip_string_guards,
        } => {
            let mut options = ConversionOptions {
                rewrite_extension_urls: !skip_url_rewrite,
                guard_string_methods: !skip_string_guards,
                ..ConversionOptions::default()
            };
            if let Some(id) = gecko_id {
                options.gecko_id = id;
            }
            let format = if json { ReportFormat::Json } else { ReportFormat::Markdown };
            run_convert(&input, output.as_deref(), report.as_deref(), format, &options)
        }
        Commands::Name { manifest } => run_name(&manifest),
        Commands::StoreId { url } => run_store_id(&url),
    };

    if let Err(e) = outcome {
        eprintln!("{}", format!("ERROR: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run_convert(
    input: &Path,
    output: Option<&Path>,
    report_path: Option<&Path>,
    format: ReportFormat,
    options: &ConversionOptions,
) -> Result<()> {
    println!("{}", "Chrome to Firefox Extension Converter".bold().blue());
    println!("{}", "=".repeat(50).blue());
    println!();

    let mut show_warning = |message: &str| {
        println!("{}", format!("WARNING: {}", message).yellow());
    };

    let report = match output {
        Some(output) => {
            let workdir = std::env::temp_dir().join(format!("chrome2fox-{}", std::process::id()));
            let result = convert_package(
                &DirectoryUnpacker::new(input),
                &DirectoryRepacker::new(output),
                &workdir,
                options,
                &mut show_warning,
            );
            if let Err(e) = std::fs::remove_dir_all(&workdir) {
                if workdir.exists() {
                    println!("{}", format!("WARNING: Failed to clean up {}: {}", workdir.display(), e).yellow());
                }
            }
            result?
        }
        None => convert_directory(input, options, &mut show_warning)?,
    };

    print_summary(&report, output.unwrap_or(input));

    if let Some(path) = report_path {
        let content = generate_report(&report, format)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("  - Report: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &ConversionReport, location: &Path) {
    println!();
    println!("{}", "✅ Conversion completed successfully!".green().bold());
    println!();
    println!("📊 Summary:");
    println!("  - Extension: {} (MV{})", report.extension_name, report.manifest_version);
    println!("  - Files modified: {}", report.modified_files.len());
    println!("  - Warnings: {}", report.warnings.len());
    println!("  - Output: {}", location.display());
    println!("  - Suggested package folder: {}", safe_folder_name(&report.extension_name));
}

fn run_name(manifest: &Path) -> Result<()> {
    let name = extension_name(manifest)?;
    println!("{}", name);
    println!("{}", format!("folder: {}", safe_folder_name(&name)).dimmed());
    Ok(())
}

fn run_store_id(url: &str) -> Result<()> {
    let id = extension_id_from_store_url(url)?;
    println!("{}", id);
    println!("{}", crx_download_url(&id).dimmed());
    Ok(())
}
