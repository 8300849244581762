use anyhow::{Result, bail};
use std::path::PathBuf;

use crate::archive::receipt::{ReceiptOptions, generate_receipt};
use crate::config::AppConfig;

#[derive(Debug)]
pub struct ReceiptArgs {
    pub ticket_ids: Vec<String>,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub max_width: Option<u32>,
    pub jpeg_quality: Option<u8>,
}

/// Archive each requested ticket in turn.
///
/// One failing ticket does not abort its siblings; its error goes to
/// stderr and the run continues. The command exits nonzero when any
/// ticket failed.
pub fn run(config: &AppConfig, args: &ReceiptArgs) -> Result<()> {
    if args.output.is_some() && args.ticket_ids.len() > 1 {
        bail!("--output can only be used with a single ticket id");
    }

    let options = ReceiptOptions {
        output_path: args.output.clone(),
        force: args.force,
        max_width: args.max_width.unwrap_or(config.archive.max_width),
        jpeg_quality: args.jpeg_quality.unwrap_or(config.archive.jpeg_quality),
    };

    let mut failed = 0usize;
    for ticket_id in &args.ticket_ids {
        match generate_receipt(ticket_id, config, &options) {
            Ok(report) => println!("{report}"),
            Err(err) => {
                failed += 1;
                eprintln!(
                    "{}: {} {ticket_id}: {err:#}",
                    config.strings.cli.generation_failed,
                    config.strings.formatter.ticket,
                );
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} receipts failed", args.ticket_ids.len());
    }
    Ok(())
}
