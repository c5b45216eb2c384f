//! Display helpers for checklist text.

/// Format a large dollar amount with a T/B/M/K suffix
pub fn format_abbrev(n: f64) -> String {
    let abs = n.abs();
    if abs >= 1e12 {
        format!("{:.1}T", n / 1e12)
    } else if abs >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if abs >= 1e6 {
        format!("{:.0}M", n / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}K", n / 1e3)
    } else {
        format!("{:.0}", n)
    }
}
