use anyhow::Result;

use crate::archive::dates::{
    find_existing_archive, infer_label, next_sequential_number, parse_ticket_date,
};
use crate::config::AppConfig;
use crate::error::ArchiveError;
use crate::source::TicketRecord;

/// Compute the long-term archive filename for one ticket:
/// `<YYYYMMDD>_<NN>_<label>_<ticket_id>.pdf`, where the date comes from
/// the ticket's creation timestamp, `NN` continues the day's sequence in
/// the archive directory, and the label is inferred from the subject.
///
/// A ticket already archived reports the existing filename instead of
/// suggesting a second one.
pub fn suggest_name(config: &AppConfig, ticket_id: &str) -> Result<String> {
    let settings = &config.archive;
    let strings = &config.strings;

    let inbox_dir = settings.inbox_dir.join(ticket_id);
    let metadata_path = inbox_dir.join("ticket.json");
    if !inbox_dir.exists() {
        return Err(ArchiveError::InboxNotFound(inbox_dir).into());
    }
    if !metadata_path.exists() {
        return Err(ArchiveError::MissingMetadata {
            ticket_id: ticket_id.to_string(),
            path: metadata_path,
        }
        .into());
    }
    let ticket = TicketRecord::load(&metadata_path)?;

    if let Some(existing) = find_existing_archive(&settings.receipts_dir, ticket_id) {
        let name = existing
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| existing.display().to_string());
        return Ok(format!(
            "{} {ticket_id}: {}: {name}",
            strings.formatter.ticket, strings.archiver.already_exists,
        ));
    }

    let date = parse_ticket_date(&ticket.created)?;
    let prefix = date.format("%Y%m%d").to_string();
    let seq = next_sequential_number(&settings.receipts_dir, &prefix);
    let label = infer_label(Some(&ticket.subject), &settings.default_label);

    Ok(format!("{prefix}_{seq:02}_{label}_{ticket_id}.pdf"))
}

pub fn run(config: &AppConfig, ticket_id: &str) -> Result<()> {
    println!("{}", suggest_name(config, ticket_id)?);
    Ok(())
}
