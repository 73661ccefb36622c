//! Command-line front-end for the TMA notes client.
//!
//! # Responsibility
//! - Resolve configuration, build the HTTP client and mirror store once.
//! - Run one intent per invocation and render the settled session state.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use tma_notes_core::{
    init_logging, validate_note_id, ClientConfig, HttpNotesRemote, NoteMirror, NotesSync,
    SqliteKvStore, SyncReport,
};

/// Personal notes backed by the TMA notes API, with an on-device fallback.
#[derive(Parser)]
#[command(name = "tma-notes", version, about)]
struct Cli {
    /// Notes API base url (overrides TMA_NOTES_API_BASE_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Local mirror database path (overrides TMA_NOTES_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Raw launch init data sent for authentication.
    #[arg(long, global = true)]
    init_data: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Load and print all notes.
    List,
    /// Add a note.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete one note by id.
    Delete { id: String },
    /// Delete all notes.
    Clear,
    /// Reload notes from the backend, falling back to this device.
    Refresh,
    /// Show configuration and probe the backend.
    Status,
    /// Show launch parameters used for auth and presentation.
    LaunchParams,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let command = cli.command.unwrap_or(Command::List);
    check_arguments(&command)?;
    info!("event=cli_command module=cli command={command:?}");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if command == Command::LaunchParams {
        render::launch_params(&mut out, &config.launch)?;
        return Ok(());
    }

    let remote =
        HttpNotesRemote::new(config.remote_config()).context("failed to build notes client")?;
    let store = SqliteKvStore::open(&config.db_path).with_context(|| {
        format!("failed to open local mirror at {}", config.db_path.display())
    })?;
    let mirror = NoteMirror::new(store);

    if command == Command::Status {
        return status(&mut out, &config, &remote, mirror);
    }

    let mut session = if command == Command::Refresh {
        NotesSync::new(&remote, mirror)
    } else {
        let (session, report) = NotesSync::connect(&remote, mirror);
        report_outcome(&report)?;
        session
    };

    let report = match command {
        Command::Add { text } => session.add(&text.join(" ")),
        Command::Delete { id } => Some(session.delete(&id)),
        Command::Clear => Some(session.delete_all()),
        Command::Refresh => Some(session.refresh()),
        Command::List | Command::Status | Command::LaunchParams => None,
    };
    if let Some(report) = report {
        report_outcome(&report)?;
    }

    render::notes(&mut out, session.notes())?;
    out.flush()?;
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env().context("invalid TMA_NOTES_* environment")?;
    if let Some(api_url) = cli.api_url.as_deref() {
        config = config.with_api_base_url(api_url)?;
    }
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Some(init_data) = cli.init_data.clone() {
        config.launch.init_data_raw = init_data;
    }
    if let Some(log_dir) = cli.log_dir.clone() {
        config.log_dir = Some(log_dir);
    }
    if let Some(log_level) = cli.log_level.clone() {
        config.log_level = log_level;
    }
    Ok(config)
}

fn check_arguments(command: &Command) -> Result<()> {
    if let Command::Delete { id } = command {
        validate_note_id(id).with_context(|| format!("cannot delete note {id:?}"))?;
    }
    Ok(())
}

/// Prints connectivity notices and the message slot to stderr.
fn report_outcome(report: &SyncReport) -> Result<()> {
    let stderr = std::io::stderr();
    let mut err = stderr.lock();
    if let Some(transition) = report.transition {
        render::transition(&mut err, transition)?;
    }
    if let Some(message) = report.message {
        render::message(&mut err, message)?;
    }
    Ok(())
}

fn status(
    out: &mut impl Write,
    config: &ClientConfig,
    remote: &HttpNotesRemote,
    mirror: NoteMirror<SqliteKvStore>,
) -> Result<()> {
    writeln!(out, "core version:  {}", tma_notes_core::core_version())?;
    writeln!(out, "api base url:  {}", config.api_base_url)?;
    writeln!(out, "mirror db:     {}", config.db_path.display())?;
    writeln!(
        out,
        "init data:     {}",
        if config.launch.has_init_data() {
            "present"
        } else {
            "absent"
        }
    )?;
    match remote.health() {
        Ok(health) => writeln!(
            out,
            "backend:       {} ({} {})",
            health.status, health.service, health.version
        )?,
        Err(err) => writeln!(out, "backend:       unreachable ({err})")?,
    }

    let (session, report) = NotesSync::connect(remote, mirror);
    report_outcome(&report)?;
    writeln!(out, "availability:  {:?}", session.availability())?;
    writeln!(out, "notes:         {}", session.notes().len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_arguments, Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_joins_words_and_accepts_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tma-notes",
            "add",
            "buy",
            "milk",
            "--api-url",
            "http://127.0.0.1:3000/api",
        ])
        .expect("arguments should parse");
        assert_eq!(
            cli.command,
            Some(Command::Add {
                text: vec!["buy".to_string(), "milk".to_string()]
            })
        );
        assert_eq!(cli.api_url.as_deref(), Some("http://127.0.0.1:3000/api"));
    }

    #[test]
    fn add_requires_text() {
        assert!(Cli::try_parse_from(["tma-notes", "add"]).is_err());
    }

    #[test]
    fn dot_segment_delete_is_refused_before_any_request() {
        for id in ["", ".", ".."] {
            let command = Command::Delete { id: id.to_string() };
            assert!(check_arguments(&command).is_err(), "id={id:?}");
        }
        assert!(check_arguments(&Command::Delete {
            id: "srv-1".to_string()
        })
        .is_ok());
    }

    #[test]
    fn no_subcommand_defaults_to_list() {
        let cli = Cli::try_parse_from(["tma-notes"]).expect("empty invocation parses");
        assert!(cli.command.is_none());
    }
}
