// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod translate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Aksara Lontara OCR and translation CLI
#[derive(Parser, Debug)]
#[command(name = "lontara-cli")]
#[command(version)]
#[command(about = "Read, transliterate and translate Aksara Lontara", long_about = None)]
pub struct Cli {
    /// TOML configuration file (environment variables are used otherwise)
    #[arg(long, global = true, env = "LONTARA_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transliterate and translate Lontara text
    Text(translate::TextArgs),

    /// OCR an image of Lontara, then translate it
    Image(translate::ImageArgs),

    /// OCR every page of a PDF, then translate the combined text
    Pdf(translate::PdfArgs),

    /// OCR an image only, printing the recognized Lontara
    Recognize(translate::RecognizeArgs),
}

/// Log filter from a `RUST_LOG` value; `info` when unset or unparsable
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let config = translate::load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Text(args) => translate::translate_text(&config, args).await,
        Commands::Image(args) => translate::translate_image(&config, args).await,
        Commands::Pdf(args) => translate::translate_pdf(&config, args).await,
        Commands::Recognize(args) => translate::recognize(&config, args),
    }
}
