//! Single-line structured warnings on stderr.
//!
//! Non-fatal pipeline conditions (skipped attachments, a logo that failed
//! to copy) are emitted as one greppable `ARCHIVER_WARN` line each, so a
//! batch run's oddities can be audited after the fact.

fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if !ch.is_control() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn emit(code: &str, ticket: &str, file: &str, reason: &str) {
    eprintln!(
        "ARCHIVER_WARN code={} ticket={} file={} reason={}",
        sanitize_value(code),
        sanitize_value(ticket),
        sanitize_value(file),
        sanitize_value(reason),
    );
}
