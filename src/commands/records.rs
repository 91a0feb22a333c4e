//! Record subcommands: save, list, delete, open.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::content::ContentScript;
use crate::controller::{ContentTab, Controller, SyncError};
use crate::page::ScriptedPage;
use crate::record::{deep_link, extract_video_id, TimestampRecord};
use crate::store::SharedStore;
use crate::timecode;
use crate::tui::current_theme;

/// Accept either formatted `MM:SS`/`HH:MM:SS` text or a bare number of
/// seconds.
fn parse_position(text: &str) -> Result<u32> {
    if let Ok(seconds) = text.parse::<u32>() {
        return Ok(seconds);
    }
    timecode::parse(text).with_context(|| format!("Invalid position: {text}"))
}

/// Save a bookmark for the given URL at the given position.
///
/// Runs the full save flow - page info extraction, controller, store -
/// over a scripted page built from the arguments.
pub fn handle_save(
    store: SharedStore,
    config: &Config,
    url: &str,
    title: &str,
    at: &str,
) -> Result<()> {
    let theme = current_theme();

    if extract_video_id(url).is_none() {
        bail!("URL carries no video id (missing v= parameter): {url}");
    }
    let seconds = parse_position(at)?;

    let page = ScriptedPage::watching(url, title, seconds as f64, 0.0);
    let content = ContentScript::new(page, store.clone());
    let mut controller = Controller::new(
        store,
        Some(ContentTab::new(content)),
        config.sync_options(),
    );

    match controller.save_current() {
        Ok(timestamp) => {
            println!(
                "{}",
                theme.success_text(&format!("Timestamp saved: {timestamp} - {title}"))
            );
            Ok(())
        }
        Err(SyncError::NoActiveVideo) => bail!("No video found for {url}"),
        Err(e) => bail!("Could not save timestamp: {e}"),
    }
}

/// List saved bookmarks, optionally filtered to one video.
pub fn handle_list(store: SharedStore, video: Option<&str>) -> Result<()> {
    let theme = current_theme();
    let records = match video {
        Some(video_id) => store.borrow().query_by_video(video_id),
        None => store.borrow().records().to_vec(),
    };

    if records.is_empty() {
        println!("{}", theme.secondary_text("No saved timestamps."));
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {}  {}  {}",
            theme.secondary_text(&record.id),
            theme.accent_text(&format!("{:>9}", record.timestamp)),
            theme.primary_text(&record.video_title),
            theme.secondary_text(&format!("({})", record.saved_at)),
        );
    }
    Ok(())
}

/// Delete a bookmark by id, prompting unless `--yes` was given.
pub fn handle_delete(store: SharedStore, id: &str, yes: bool) -> Result<()> {
    let theme = current_theme();

    let record = store.borrow().records().iter().find(|r| r.id == id).cloned();
    let Some(record) = record else {
        // Deleting a nonexistent id is a no-op, not an error
        println!("{}", theme.secondary_text(&format!("No timestamp with id {id}.")));
        return Ok(());
    };

    if !yes
        && !prompt_confirmation(&format!(
            "Delete {} ({})?",
            record.timestamp, record.video_title
        ))?
    {
        println!("{}", theme.primary_text("Nothing deleted."));
        return Ok(());
    }

    store.borrow_mut().delete(id);
    println!(
        "{}",
        theme.success_text(&format!("Deleted {} ({})", record.timestamp, record.video_title))
    );
    Ok(())
}

/// Open a bookmark's deep link in the configured browser.
pub fn handle_open(store: SharedStore, config: &Config, id: &str) -> Result<()> {
    let theme = current_theme();

    let record = store.borrow().records().iter().find(|r| r.id == id).cloned();
    let Some(record) = record else {
        bail!("No timestamp with id {id}");
    };

    let url = link_for(&record)?;
    let command = config.browser_command();
    println!(
        "{}",
        theme.primary_text(&format!("Opening {url} with {command}"))
    );
    super::open_in_browser(&command, &url)
}

fn link_for(record: &TimestampRecord) -> Result<String> {
    deep_link(record).with_context(|| {
        format!(
            "Record {} has a malformed timestamp: {}",
            record.id, record.timestamp
        )
    })
}

/// Prompt user for yes/no confirmation.
///
/// Returns true if user confirms (y/yes), false otherwise.
/// If stdin is not a TTY (non-interactive), returns false.
fn prompt_confirmation(message: &str) -> Result<bool> {
    let theme = current_theme();

    if !atty::is(atty::Stream::Stdin) {
        println!(
            "{}",
            theme.secondary_text("Non-interactive mode: use --yes to delete without a prompt")
        );
        return Ok(false);
    }

    print!("{} [y/N] ", theme.primary_text(message));
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
