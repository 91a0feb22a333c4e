//! Marker track rendering for the CLI.

use anyhow::{Context, Result};

use crate::markers;
use crate::store::SharedStore;
use crate::timecode;
use crate::tui::current_theme;

/// Render the marker track for one video as a text progress bar plus a
/// per-marker legend.
pub fn handle_markers(store: SharedStore, video: &str, duration: &str, width: usize) -> Result<()> {
    let theme = current_theme();

    let duration_seconds = parse_duration(duration)?;
    let records = store.borrow().query_by_video(video);
    let layout = markers::layout(&records, duration_seconds as f64);

    if layout.is_empty() {
        println!(
            "{}",
            theme.secondary_text(&format!("No markers for video {video}."))
        );
        return Ok(());
    }

    let track = markers::render_track(width, &layout);
    println!("{}", theme.accent_text(&track));
    println!(
        "{}",
        theme.secondary_text(&format!(
            "0:00{:>width$}",
            timecode::format(duration_seconds),
            width = width.saturating_sub(4)
        ))
    );
    for marker in &layout {
        println!(
            "  {} {}",
            theme.accent_text("◆"),
            theme.primary_text(&format!("{} ({:.1}%)", marker.label, marker.position_pct)),
        );
    }
    Ok(())
}

fn parse_duration(text: &str) -> Result<u32> {
    if let Ok(seconds) = text.parse::<u32>() {
        return Ok(seconds);
    }
    timecode::parse(text).with_context(|| format!("Invalid duration: {text}"))
}
