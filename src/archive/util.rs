/// Render a byte count the way the receipt report expects it: whole bytes
/// below 1 KiB, whole KB below 1 MiB, otherwise MB with one decimal.
///
/// The exact strings are part of the report contract, so this is not a
/// general-purpose formatter.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
