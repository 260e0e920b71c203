//! Byte count formatting.

use humansize::{FormatSizeOptions, WINDOWS};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * 1024 * 1024;

/// Default number of decimal places for [`format_size`].
pub const DEFAULT_DECIMAL_PLACES: usize = 2;

/// Format a byte count with two decimal places ("1.50KB", "1023B").
pub fn format_size(bytes: u64) -> String {
    format_size_with(bytes, DEFAULT_DECIMAL_PLACES)
}

/// Format a byte count with the given precision.
///
/// Thresholds are 1024-based while labels read KB/MB/GB, and there is no
/// space between value and unit. Zero is rendered as "0 B".
pub fn format_size_with(bytes: u64, decimal_places: usize) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let (divisor, unit) = if bytes >= GIB {
        (GIB, "GB")
    } else if bytes >= MIB {
        (MIB, "MB")
    } else if bytes >= KIB {
        (KIB, "KB")
    } else {
        return format!("{bytes}B");
    };

    format!(
        "{:.*}{}",
        decimal_places,
        bytes as f64 / divisor as f64,
        unit
    )
}

/// Format a byte count for file-detail subtitles ("0 B", "1.5 kB", "12 MB").
pub fn human_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let options = FormatSizeOptions::from(WINDOWS).decimal_places(1);
    humansize::format_size(bytes, options)
}
