//! Conversion between seconds and `MM:SS` / `HH:MM:SS` timestamp text.
//!
//! Every saved bookmark carries its position as formatted text, so both
//! directions must agree: `parse(format(s)) == s` for any non-negative
//! number of seconds.

use thiserror::Error;

/// Errors produced when timestamp text cannot be decoded.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Invalid timestamp shape: {text:?} (expected MM:SS or HH:MM:SS)")]
    BadShape { text: String },

    #[error("Invalid timestamp field in {text:?}")]
    BadField {
        text: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Timestamp out of range: {text:?}")]
    OutOfRange { text: String },
}

/// Parse `MM:SS` or `HH:MM:SS` text into a number of seconds.
///
/// Two colon-separated fields decode as minutes:seconds, three as
/// hours:minutes:seconds. Any other shape, a non-numeric field, or a
/// total past `u32::MAX` seconds is a `FormatError`.
pub fn parse(text: &str) -> Result<u32, FormatError> {
    let fields: Vec<&str> = text.split(':').collect();

    let parse_field = |field: &str| -> Result<u32, FormatError> {
        field.parse::<u32>().map_err(|source| FormatError::BadField {
            text: text.to_string(),
            source,
        })
    };

    match fields.as_slice() {
        [m, s] => total_seconds(text, 0, parse_field(m)?, parse_field(s)?),
        [h, m, s] => total_seconds(text, parse_field(h)?, parse_field(m)?, parse_field(s)?),
        _ => Err(FormatError::BadShape {
            text: text.to_string(),
        }),
    }
}

/// Combine parsed fields without overflowing; timestamps come from user
/// input and stored records, so oversized fields must fail, not wrap.
fn total_seconds(text: &str, hours: u32, minutes: u32, secs: u32) -> Result<u32, FormatError> {
    hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).map(|m| (h, m)))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(secs))
        .ok_or_else(|| FormatError::OutOfRange {
            text: text.to_string(),
        })
}

/// Format a number of seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
///
/// Fields are zero-padded to two digits; the hour field is omitted below
/// 3600 seconds.
pub fn format(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format a fractional playback position, truncating to whole seconds.
pub fn format_position(seconds: f64) -> String {
    format(seconds.max(0.0) as u32)
}
