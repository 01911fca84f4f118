//! `notedeck` command-line front end.
//!
//! # Responsibility
//! - Resolve configuration, logging and the notebook database.
//! - Forward each subcommand to one notebook operation and print the result.
//!
//! Business rules live in `notedeck_core`; this binary only renders.

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use notedeck_core::db::open_db;
use notedeck_core::{
    core_version, init_logging, KeyValueStore, Notebook, NotebookConfig, SortOption,
    SqliteKvStore,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "notedeck: tagged notes in a local store", long_about = None)]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Notebook database file (overrides config).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides config).
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (overrides config).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Notebook(NotebookCommand),
    /// Print the core version.
    Version,
}

/// Subcommands that operate on an opened notebook.
#[derive(Subcommand, Debug)]
enum NotebookCommand {
    /// List notes, pinned first.
    List {
        /// Only notes carrying this tag id.
        #[arg(long)]
        tag: Option<String>,
        /// Case-insensitive substring of title or content.
        #[arg(long)]
        search: Option<String>,
        /// created-newest|created-oldest|updated-newest|updated-oldest|alphabetical
        #[arg(long)]
        sort: Option<SortOption>,
    },
    /// Show one note in full.
    Show { id: String },
    /// Create a note, optionally with a title and content.
    New {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Edit the title and/or content of a note.
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note.
    Delete { id: String },
    /// Toggle the pin flag of a note.
    Pin { id: String },
    /// List tags.
    Tags,
    /// Manage tags and note tagging.
    #[command(subcommand)]
    Tag(TagCommand),
}

#[derive(Subcommand, Debug)]
enum TagCommand {
    /// Create a tag.
    Create { name: String, color: String },
    /// Delete a tag and strip it from every note.
    Delete { id: String },
    /// Attach a tag to a note.
    Add { note: String, tag: String },
    /// Detach a tag from a note.
    Remove { note: String, tag: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = match cli.command {
        Commands::Version => {
            println!("notedeck_core version={}", core_version());
            return Ok(());
        }
        Commands::Notebook(command) => command,
    };

    let config = NotebookConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some((level, log_dir)) =
        log_settings(cli.log_dir.as_deref(), cli.log_level.as_deref(), &config)?
    {
        init_logging(level, log_dir).context("failed to start logging")?;
    }

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config.resolve_db_path(&default_data_dir()));
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open notebook `{}`", db_path.display()))?;
    let kv = SqliteKvStore::try_new(&conn).context("notebook database is not usable")?;
    let mut notebook = Notebook::open(kv).context("failed to load notebook")?;
    notebook.set_sort_option(config.view.default_sort);

    run(&mut notebook, command)?;

    for notice in notebook.take_notices() {
        println!("{}", render::notice_line(&notice));
    }
    Ok(())
}

fn run<S: KeyValueStore>(notebook: &mut Notebook<S>, command: NotebookCommand) -> Result<()> {
    match command {
        NotebookCommand::List { tag, search, sort } => {
            notebook.set_active_tag(tag);
            notebook.set_search_query(search.unwrap_or_default());
            if let Some(sort) = sort {
                notebook.set_sort_option(sort);
            }
            info!(
                "event=cli_list module=cli status=ok count={}",
                notebook.view().len()
            );
            for note in notebook.view() {
                println!("{}", render::note_line(note));
            }
        }
        NotebookCommand::Show { id } => match notebook.note(&id) {
            Some(note) => print!("{}", render::note_detail(note)),
            None => println!("no note with id `{id}`"),
        },
        NotebookCommand::New { title, content } => {
            let mut note = notebook.create_note()?;
            if title.is_some() || content.is_some() {
                if let Some(title) = title {
                    note.title = title;
                }
                if let Some(content) = content {
                    note.content = content;
                }
                if let Some(stored) = notebook.update_note(note.clone())? {
                    note = stored;
                }
            }
            println!("{}", render::note_line(&note));
        }
        NotebookCommand::Edit { id, title, content } => {
            let Some(mut note) = notebook.note(&id).cloned() else {
                println!("no note with id `{id}`");
                return Ok(());
            };
            if let Some(title) = title {
                note.title = title;
            }
            if let Some(content) = content {
                note.content = content;
            }
            if let Some(stored) = notebook.update_note(note)? {
                println!("{}", render::note_line(&stored));
            }
        }
        NotebookCommand::Delete { id } => {
            if !notebook.delete_note(&id)? {
                println!("no note with id `{id}`");
            }
        }
        NotebookCommand::Pin { id } => {
            if notebook.toggle_pin(&id)? {
                if let Some(note) = notebook.note(&id) {
                    println!("{}", render::note_line(note));
                }
            } else {
                println!("no note with id `{id}`");
            }
        }
        NotebookCommand::Tags => {
            for tag in notebook.tags() {
                println!("{}", render::tag_line(tag));
            }
        }
        NotebookCommand::Tag(TagCommand::Create { name, color }) => {
            let tag = notebook.create_tag(name, color)?;
            println!("{}", render::tag_line(&tag));
        }
        NotebookCommand::Tag(TagCommand::Delete { id }) => {
            if !notebook.delete_tag(&id)? {
                println!("no tag with id `{id}`");
            }
        }
        NotebookCommand::Tag(TagCommand::Add { note, tag }) => {
            if !notebook.add_tag_to_note(&note, &tag)? {
                println!("nothing to do: unknown note/tag or tag already attached");
            }
        }
        NotebookCommand::Tag(TagCommand::Remove { note, tag }) => {
            if !notebook.remove_tag_from_note(&note, &tag)? {
                println!("no note with id `{note}`");
            }
        }
    }
    Ok(())
}

/// Picks the log level and directory; `None` leaves file logging off.
///
/// An explicit `--log-level` without any log directory is an error.
fn log_settings<'a>(
    cli_dir: Option<&'a Path>,
    cli_level: Option<&'a str>,
    config: &'a NotebookConfig,
) -> Result<Option<(&'a str, &'a Path)>> {
    let level = cli_level.unwrap_or(config.logging.level.as_str());
    match cli_dir.or(config.logging.dir.as_deref()) {
        Some(log_dir) => Ok(Some((level, log_dir))),
        None if cli_level.is_some() => {
            bail!("--log-level needs a log directory: pass --log-dir or set [logging] dir")
        }
        None => Ok(None),
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("notedeck"))
        .unwrap_or_else(|| PathBuf::from("."))
}
