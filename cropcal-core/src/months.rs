//! Month-name resolution for freeform schedule text.

use tracing::warn;

/// Generated schedules are anchored to a fixed reference year; month ranges
/// carry no year of their own.
pub const REFERENCE_YEAR: i32 = 2025;

/// Header labels for timeline rendering, indexed by month number - 1.
pub const MONTH_SHORT_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Resolve a month name or 3-letter abbreviation to its 1-based number.
///
/// Matching is case-sensitive against the fixed table the generation prompt
/// asks for. An unknown name resolves to January instead of failing, so one
/// odd label cannot sink the rest of a schedule; the fallback can silently
/// misplace an activity, so it is logged loudly.
pub fn month_number(name: &str) -> u32 {
    match resolve(name) {
        Some(n) => n,
        None => {
            warn!(month = name, "unknown month name, falling back to January");
            1
        }
    }
}

fn resolve(name: &str) -> Option<u32> {
    let n = match name {
        "January" | "Jan" => 1,
        "February" | "Feb" => 2,
        "March" | "Mar" => 3,
        "April" | "Apr" => 4,
        "May" => 5,
        "June" | "Jun" => 6,
        "July" | "Jul" => 7,
        "August" | "Aug" => 8,
        "September" | "Sep" => 9,
        "October" | "Oct" => 10,
        "November" | "Nov" => 11,
        "December" | "Dec" => 12,
        _ => return None,
    };
    Some(n)
}
