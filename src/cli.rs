use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::config::load_config;

/// Archive helpdesk ticket receipts into single merged PDFs.
#[derive(Parser)]
#[command(name = "helpdesk-archiver", version, about)]
struct Cli {
    /// Path to the configuration file. Defaults to
    /// ARCHIVER_CONFIG_PATH or ~/.config/helpdesk-archiver/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate merged PDF receipts for already-downloaded tickets.
    Receipt {
        /// Ticket ids to archive, each expecting an inbox folder.
        #[arg(required = true)]
        ticket_ids: Vec<String>,

        /// Overwrite an existing receipt.
        #[arg(long)]
        force: bool,

        /// Write the receipt here instead of <inbox>/<id>.pdf.
        /// Only valid with a single ticket id.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Maximum image width in pixels before downscaling.
        #[arg(long, value_name = "PX")]
        max_width: Option<u32>,

        /// JPEG re-encode quality (1-100).
        #[arg(long, value_name = "Q")]
        jpeg_quality: Option<u8>,
    },

    /// Print the long-term archive filename for a downloaded ticket.
    ArchiveName {
        ticket_id: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Receipt {
            ticket_ids,
            force,
            output,
            max_width,
            jpeg_quality,
        } => commands::receipt::run(
            &config,
            &commands::receipt::ReceiptArgs {
                ticket_ids,
                output,
                force,
                max_width,
                jpeg_quality,
            },
        ),
        Command::ArchiveName { ticket_id } => commands::archive_name::run(&config, &ticket_id),
    }
}
