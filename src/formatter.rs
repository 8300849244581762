//! Markdown rendering of ticket listings, details, and resolution results.
//!
//! Every label comes from [`FormatterStrings`], so the whole surface can
//! be re-localized from the config file without touching code.

use crate::source::{Ticket, TicketSummary};
use crate::strings::FormatterStrings;
use std::collections::BTreeMap;

/// Render a ticket listing, optionally grouped by sender name.
///
/// Grouped output sorts senders alphabetically; ungrouped output keeps
/// the helpdesk's order and appends the sender to each line.
pub fn format_ticket_list(
    tickets: &[TicketSummary],
    strings: &FormatterStrings,
    group_by_user: bool,
) -> String {
    if tickets.is_empty() {
        return strings.no_open_tickets.clone();
    }

    let mut lines = vec![format!("## {}", strings.open_tickets_header), String::new()];

    if group_by_user {
        let mut by_user: BTreeMap<&str, Vec<&TicketSummary>> = BTreeMap::new();
        for ticket in tickets {
            by_user.entry(&ticket.user_name).or_default().push(ticket);
        }
        for (user_name, user_tickets) in by_user {
            lines.push(format!("### {user_name}"));
            for ticket in user_tickets {
                lines.push(format!("- [id={}] {}", ticket.id, ticket.subject));
                lines.push(format!("  URL: {}", ticket.url));
            }
            lines.push(String::new());
        }
    } else {
        for ticket in tickets {
            lines.push(format!(
                "- [id={}] {} ({})",
                ticket.id, ticket.subject, ticket.user_name
            ));
            lines.push(format!("  URL: {}", ticket.url));
        }
    }

    lines.push(strings.total.replace("{count}", &tickets.len().to_string()));
    lines.join("\n")
}

/// Render one ticket in full.
///
/// When `downloaded_files` is given the attachment section lists those
/// local paths; otherwise it lists the helpdesk's name/type pairs.
pub fn format_ticket_detail(
    ticket: &Ticket,
    strings: &FormatterStrings,
    downloaded_files: Option<&[String]>,
) -> String {
    let mut lines = vec![
        format!("## {} {}", strings.ticket, ticket.id),
        String::new(),
        format!("**{}:** {}", strings.subject, ticket.subject),
        format!("**{}:** {}", strings.sender, ticket.user_name),
        format!("**{}:** {}", strings.email, ticket.user_email),
        format!("**{}:** {}", strings.created, ticket.created),
        format!("**{}:** {}", strings.status, ticket.status),
        format!("**URL:** {}", ticket.url),
        String::new(),
        format!("### {}:", strings.message),
        String::new(),
        ticket.message.clone(),
        String::new(),
    ];

    if ticket.attachments.is_empty() {
        lines.push(format!("*{}*", strings.no_attachments));
    } else {
        lines.push(format!(
            "### {} ({}):",
            strings.attachments,
            ticket.attachments.len()
        ));
        lines.push(String::new());
        match downloaded_files {
            Some(paths) if !paths.is_empty() => {
                for path in paths {
                    lines.push(format!("- {path}"));
                }
            }
            _ => {
                for att in &ticket.attachments {
                    lines.push(format!("- {} ({})", att.name, att.kind));
                }
            }
        }
    }

    lines.join("\n")
}

/// Render the outcome of a batch resolve: one ✓/✗ line per ticket and a
/// closing summary line.
pub fn format_resolve_result(
    ticket_ids: &[String],
    success: &[bool],
    message: &str,
    strings: &FormatterStrings,
) -> String {
    let mut lines = vec![
        format!("## {}", strings.resolve_header),
        String::new(),
        format!("**{}:** {message}", strings.message),
        String::new(),
    ];

    let succeeded = success.iter().filter(|ok| **ok).count();
    let failed = success.len() - succeeded;

    for (tid, ok) in ticket_ids.iter().zip(success) {
        let mark = if *ok { "✓" } else { "✗" };
        lines.push(format!("- {} {tid}: {mark}", strings.ticket));
    }

    lines.push(String::new());
    if failed == 0 {
        lines.push(
            strings
                .all_resolved
                .replace("{count}", &succeeded.to_string()),
        );
    } else {
        lines.push(
            strings
                .resolve_summary
                .replace("{succeeded}", &succeeded.to_string())
                .replace("{failed}", &failed.to_string()),
        );
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Attachment;

    fn summary(id: &str, subject: &str, user_name: &str) -> TicketSummary {
        TicketSummary {
            id: id.to_string(),
            number: "100".to_string(),
            url: format!("https://helpdesk.example.com/tickets?id={id}"),
            subject: subject.to_string(),
            user_name: user_name.to_string(),
            date: "2026-01-15".to_string(),
        }
    }

    fn ticket(attachments: Vec<Attachment>) -> Ticket {
        Ticket {
            id: "5".to_string(),
            number: "200".to_string(),
            url: "https://helpdesk.example.com/tickets?id=5".to_string(),
            subject: "Expense claim January".to_string(),
            user_name: "Matti Meikäläinen".to_string(),
            user_email: "matti@example.com".to_string(),
            created: "2026-01-10".to_string(),
            status: "Open".to_string(),
            message: "Here is my expense claim.".to_string(),
            attachments,
        }
    }

    #[test]
    fn empty_list_uses_placeholder() {
        let strings = FormatterStrings::default();
        assert_eq!(format_ticket_list(&[], &strings, true), "No open tickets.");
    }

    #[test]
    fn grouped_list_sorts_users_alphabetically() {
        let strings = FormatterStrings::default();
        let tickets = vec![
            summary("1", "Coffee", "Bertta"),
            summary("2", "Travel", "Antti"),
            summary("3", "Supplies", "Bertta"),
        ];
        let result = format_ticket_list(&tickets, &strings, true);

        let antti = result.find("### Antti").unwrap();
        let bertta = result.find("### Bertta").unwrap();
        assert!(antti < bertta);
        assert!(result.contains("[id=1] Coffee"));
        assert!(result.contains("[id=3] Supplies"));
        assert!(result.contains("Total: 3 tickets"));
    }

    #[test]
    fn ungrouped_list_appends_sender_per_line() {
        let strings = FormatterStrings::default();
        let tickets = vec![summary("10", "Travel costs", "Matti")];
        let result = format_ticket_list(&tickets, &strings, false);

        assert!(!result.contains("### Matti"));
        assert!(result.contains("[id=10] Travel costs (Matti)"));
        assert!(result.contains("https://helpdesk.example.com/tickets?id=10"));
    }

    #[test]
    fn localized_strings_flow_through() {
        let strings = FormatterStrings {
            open_tickets_header: "Avoimet kululaskutiketit".to_string(),
            total: "Yhteensä: {count} tikettiä".to_string(),
            ..FormatterStrings::default()
        };
        let result = format_ticket_list(&[summary("10", "Test", "A")], &strings, true);
        assert!(result.contains("## Avoimet kululaskutiketit"));
        assert!(result.contains("Yhteensä: 1 tikettiä"));
    }

    #[test]
    fn detail_carries_all_header_fields() {
        let strings = FormatterStrings::default();
        let result = format_ticket_detail(&ticket(vec![]), &strings, None);

        assert!(result.contains("## Ticket 5"));
        assert!(result.contains("**Subject:** Expense claim January"));
        assert!(result.contains("**Sender:** Matti Meikäläinen"));
        assert!(result.contains("**Email:** matti@example.com"));
        assert!(result.contains("**Status:** Open"));
        assert!(result.contains("Here is my expense claim."));
        assert!(result.contains("*No attachments*"));
    }

    #[test]
    fn detail_lists_attachment_types_without_downloads() {
        let strings = FormatterStrings::default();
        let attachments = vec![
            Attachment {
                name: "receipt.pdf".to_string(),
                kind: "attachment".to_string(),
            },
            Attachment {
                name: "photo.jpg".to_string(),
                kind: "inline".to_string(),
            },
        ];
        let result = format_ticket_detail(&ticket(attachments), &strings, None);

        assert!(result.contains("### Attachments (2):"));
        assert!(result.contains("receipt.pdf (attachment)"));
        assert!(result.contains("photo.jpg (inline)"));
    }

    #[test]
    fn detail_prefers_downloaded_paths() {
        let strings = FormatterStrings::default();
        let attachments = vec![Attachment {
            name: "receipt.pdf".to_string(),
            kind: "attachment".to_string(),
        }];
        let downloaded = vec!["/home/user/inbox/5/receipt.pdf".to_string()];
        let result = format_ticket_detail(&ticket(attachments), &strings, Some(&downloaded));

        assert!(result.contains("### Attachments (1):"));
        assert!(result.contains("/home/user/inbox/5/receipt.pdf"));
        assert!(!result.contains("receipt.pdf (attachment)"));
    }

    #[test]
    fn resolve_result_all_success() {
        let strings = FormatterStrings::default();
        let ids = vec!["10".to_string(), "11".to_string()];
        let result = format_resolve_result(&ids, &[true, true], "Paid 1.2.2026", &strings);

        assert!(result.contains("## Ticket resolution"));
        assert!(result.contains("**Message:** Paid 1.2.2026"));
        assert!(result.contains("Ticket 10: ✓"));
        assert!(result.contains("Ticket 11: ✓"));
        assert!(result.contains("All 2 tickets resolved successfully."));
    }

    #[test]
    fn resolve_result_partial_failure() {
        let strings = FormatterStrings::default();
        let ids = vec!["10".to_string(), "11".to_string()];
        let result = format_resolve_result(&ids, &[true, false], "Processed", &strings);

        assert!(result.contains("Ticket 10: ✓"));
        assert!(result.contains("Ticket 11: ✗"));
        assert!(result.contains("Resolved: 1, failed: 1"));
    }

    #[test]
    fn resolve_result_all_failed() {
        let strings = FormatterStrings::default();
        let ids = vec!["10".to_string(), "11".to_string()];
        let result = format_resolve_result(&ids, &[false, false], "Processed", &strings);
        assert!(result.contains("Resolved: 0, failed: 2"));
    }
}
