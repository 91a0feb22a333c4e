//! Marker layout for the progress-bar overlay.
//!
//! The overlay consumes the store's per-video query, mapped through the
//! time codec, and places one marker per record at
//! `position% = time / duration`. Refreshes are full clear-then-redraw;
//! with user-authored bookmark counts there is nothing to diff.

use tracing::warn;

use crate::record::TimestampRecord;
use crate::timecode;

/// One visual tick on the progress bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Decoded position in seconds.
    pub seconds: u32,
    /// Position along the bar, 0.0..=100.0.
    pub position_pct: f64,
    /// Tooltip label.
    pub label: String,
}

/// Compute marker positions for one video's records.
///
/// Records with malformed timestamp text are skipped with a warning.
/// A non-positive duration (metadata not loaded) yields no markers.
pub fn layout(records: &[TimestampRecord], duration: f64) -> Vec<Marker> {
    if duration <= 0.0 {
        return Vec::new();
    }

    records
        .iter()
        .filter_map(|record| {
            let seconds = match timecode::parse(&record.timestamp) {
                Ok(seconds) => seconds,
                Err(e) => {
                    warn!("skipping marker for record {}: {e}", record.id);
                    return None;
                }
            };
            Some(Marker {
                seconds,
                position_pct: (seconds as f64 / duration) * 100.0,
                label: format!("Saved: {}", record.timestamp),
            })
        })
        .collect()
}

/// Render a fixed-width text track with `◆` ticks at marker positions.
/// This is the CLI/TUI rendering of the overlay.
pub fn render_track(width: usize, markers: &[Marker]) -> String {
    let mut track: Vec<char> = vec!['─'; width];

    for marker in markers {
        let pos = ((marker.position_pct / 100.0) * width as f64) as usize;
        if pos < width {
            track[pos] = '◆';
        }
    }

    track.into_iter().collect()
}
