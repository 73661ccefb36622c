//! Plain-text rendering of session state.

use chrono::{Local, TimeZone};
use std::io::{self, Write};
use tma_notes_core::{
    Appearance, AvailabilityTransition, LaunchParams, MessageSeverity, Note, SyncMessage,
    UiPlatform,
};

pub fn transition(out: &mut impl Write, transition: AvailabilityTransition) -> io::Result<()> {
    match transition {
        AvailabilityTransition::WentOffline => writeln!(
            out,
            "Working in offline mode: the backend is unavailable. \
             Notes are saved on this device only."
        ),
        AvailabilityTransition::CameBackOnline => writeln!(
            out,
            "Connected to the backend: notes are being saved to the server again."
        ),
    }
}

pub fn message(out: &mut impl Write, message: SyncMessage) -> io::Result<()> {
    let prefix = match message.severity() {
        MessageSeverity::Advisory => "note",
        MessageSeverity::Error => "error",
    };
    writeln!(out, "{prefix}: {message}")
}

pub fn notes(out: &mut impl Write, notes: &[Note]) -> io::Result<()> {
    writeln!(out, "My Notes ({})", notes.len())?;
    if notes.is_empty() {
        return writeln!(out, "No notes yet.");
    }
    for note in notes {
        writeln!(out, "{}  {}", format_timestamp(note.timestamp), note.id)?;
        for line in note.text.lines() {
            writeln!(out, "    {line}")?;
        }
    }
    Ok(())
}

pub fn launch_params(out: &mut impl Write, params: &LaunchParams) -> io::Result<()> {
    let platform = if params.platform.is_empty() {
        "unknown"
    } else {
        params.platform.as_str()
    };
    let style = match params.ui_platform() {
        UiPlatform::Ios => "ios",
        UiPlatform::Base => "base",
    };
    let appearance = match params.appearance() {
        Appearance::Dark => "dark",
        Appearance::Light => "light",
    };
    writeln!(out, "platform:    {platform} (style: {style})")?;
    writeln!(out, "appearance:  {appearance}")?;
    writeln!(
        out,
        "init data:   {} bytes",
        params.init_data_raw.len()
    )
}

/// Local wall-clock time, or the raw milliseconds when out of range.
fn format_timestamp(epoch_ms: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_ms)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}
