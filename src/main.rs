//! scrbl: daily notes in a single markdown file.
#![allow(clippy::multiple_crate_versions)]

use chrono::{DateTime, Duration, Local};
use clap::{ArgGroup, Parser, Subcommand};
use scrbl::config::{self, Config};
use scrbl::template::Template;
use scrbl::{store, ui, Entry, EntryPlacement, Error, NotesDocument, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command as Process, ExitCode};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "SCRBL_LOG";

#[derive(Parser)]
#[command(name = "scrbl")]
#[command(about = "Daily notes in one markdown file", long_about = None)]
struct Args {
    /// Notes file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    notes: Option<PathBuf>,

    /// Log index activity to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the notes file in a directory and remember it
    Setup {
        /// Directory to keep notes in
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Add an entry under today's heading
    #[command(aliases = ["write", "append", "a"])]
    Add {
        /// The note text
        text: String,
        /// Section under today's heading to file the entry in
        #[arg(long, short = 's')]
        section: Option<String>,
        /// Format the entry as a task item
        #[arg(long, short = 't')]
        task: bool,
    },
    /// Append a template such as today's heading
    #[command(group(ArgGroup::new("which").required(true).args(["daily", "template"])))]
    Create {
        /// Use the daily template
        #[arg(long, short = 'd')]
        daily: bool,
        /// Template to append by name
        #[arg(long, short = 't', value_name = "TEMPLATE")]
        template: Option<String>,
    },
    /// Show the last lines of the notes
    Show {
        /// Number of lines to show
        #[arg(long, short = 'n')]
        lines: Option<usize>,
    },
    /// List the lines that contain a word
    Search {
        /// Word to look up
        word: String,
    },
    /// Print the heading tree
    Outline,
    /// Show file information and note statistics
    Status,
    /// Open the notes in an editor
    Edit {
        /// Editor command, overriding the configured one
        #[arg(long, short = 'e')]
        editor: Option<String>,
    },
    /// Print the active configuration
    Config,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut cfg = Config::load();

    // Override config with command line args
    if let Some(notes) = &args.notes {
        cfg.notes_file = notes.to_string_lossy().into_owned();
    }

    match run(args.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[allow(clippy::too_many_lines)]
fn run(command: Command, cfg: &Config) -> Result<()> {
    let today = Local::now().date_naive();

    match command {
        Command::Setup { path } => {
            let config_path = Config::path()
                .ok_or_else(|| Error::Config("could not determine config directory".into()))?;
            let notes = config::setup(&path, &config_path)?;
            println!("Notes configured: {}", notes.display());
            println!("Config written to {}", config_path.display());
        }
        Command::Add {
            text,
            section,
            task,
        } => {
            let mut doc = NotesDocument::open(cfg.notes_path()?)?;
            let entry = Entry {
                text,
                section,
                task,
            };
            let message = match doc.add_entry(&entry, today)? {
                EntryPlacement::TodaySection => "Entry added to today's section.".to_string(),
                EntryPlacement::NamedSection => format!(
                    "Entry added to section '{}'.",
                    entry.section.as_deref().unwrap_or_default()
                ),
                EntryPlacement::CreatedSection => format!(
                    "Created section '{}' and added the entry.",
                    entry.section.as_deref().unwrap_or_default()
                ),
                EntryPlacement::EndOfDocument => {
                    "No section for today found. Entry added to end of file.".to_string()
                }
            };
            println!("{message}");
        }
        Command::Create { daily, template } => {
            let name = if daily {
                "daily".to_string()
            } else {
                template.unwrap_or_default()
            };
            let template = Template::named(&name)?;
            let path = cfg.notes_path()?;
            let mut doc = NotesDocument::open(&path)?;
            doc.append_template(&template.render(today))?;
            if let Some(dir) = path.parent() {
                store::cleanup_stale_sidecars(dir, Duration::days(store::DEFAULT_MAX_AGE_DAYS));
            }
            println!("Template '{}' added.", template.name);
        }
        Command::Show { lines } => {
            let doc = NotesDocument::open(cfg.notes_path()?)?;
            let recent = doc.last_lines(lines.unwrap_or(cfg.show_lines));
            if recent.is_empty() {
                println!(
                    "{}",
                    ui::render_panel("No Content", &["Your notes file is empty"], cfg.render_width)
                );
            } else {
                let title = format!("Recent Notes (last {} lines)", recent.len());
                println!("{}", ui::render_panel(&title, recent, cfg.render_width));
            }
        }
        Command::Search { word } => {
            let mut doc = NotesDocument::open(cfg.notes_path()?)?;
            let hits: Vec<String> = doc
                .search(&word)?
                .into_iter()
                .map(|(i, line)| format!("{:>5}  {line}", i + 1))
                .collect();
            if hits.is_empty() {
                println!("No lines contain '{word}'.");
            } else {
                let title = format!("'{word}' ({} lines)", hits.len());
                println!("{}", ui::render_panel(&title, &hits, cfg.render_width));
            }
        }
        Command::Outline => {
            let mut doc = NotesDocument::open(cfg.notes_path()?)?;
            let lines = ui::outline_lines(doc.index()?.tree());
            if lines.is_empty() {
                println!("No headings yet.");
            } else {
                println!("{}", ui::render_panel("Outline", &lines, cfg.render_width));
            }
        }
        Command::Status => status(cfg, today)?,
        Command::Edit { editor } => {
            let path = cfg.notes_path()?;
            let editor = editor.unwrap_or_else(|| cfg.editor.clone());
            NotesDocument::forget_index(&path);
            launch_editor(&editor, &path)?;
        }
        Command::Config => {
            let location = Config::path()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string());
            let notes = if cfg.notes_file.is_empty() {
                "(not configured)".to_string()
            } else {
                cfg.notes_file.clone()
            };
            let rows = vec![
                ("Config File".to_string(), location),
                ("Notes File".to_string(), notes),
                ("Editor".to_string(), cfg.editor.clone()),
                ("Show Lines".to_string(), cfg.show_lines.to_string()),
                ("Render Width".to_string(), cfg.render_width.to_string()),
            ];
            println!(
                "{}",
                ui::render_table("Scrbl Configuration", ["Setting", "Value"], &rows, cfg.render_width)
            );
        }
    }

    Ok(())
}

fn status(cfg: &Config, today: chrono::NaiveDate) -> Result<()> {
    let path = cfg.notes_path()?;
    let mut file_rows = vec![("Notes File".to_string(), path.display().to_string())];

    let Ok(metadata) = fs::metadata(&path) else {
        file_rows.push(("File Exists".to_string(), "No".to_string()));
        println!(
            "{}",
            ui::render_table("File Information", ["Property", "Value"], &file_rows, cfg.render_width)
        );
        return Ok(());
    };

    file_rows.push(("File Exists".to_string(), "Yes".to_string()));
    file_rows.push(("File Size".to_string(), format!("{} bytes", metadata.len())));
    if let Ok(modified) = metadata.modified() {
        let modified = DateTime::<Local>::from(modified);
        file_rows.push((
            "Last Modified".to_string(),
            modified.format("%Y-%m-%d %H:%M:%S").to_string(),
        ));
    }
    file_rows.push(("Index".to_string(), index_status(&path)));
    println!(
        "{}",
        ui::render_table("File Information", ["Property", "Value"], &file_rows, cfg.render_width)
    );

    let stats = NotesDocument::open(&path)?.statistics(today)?;
    let content_rows = vec![
        ("Total Lines".to_string(), stats.total_lines.to_string()),
        ("Total Words".to_string(), stats.total_words.to_string()),
        ("Total Characters".to_string(), stats.total_characters.to_string()),
    ];
    println!(
        "{}",
        ui::render_table("Content Statistics", ["Metric", "Value"], &content_rows, cfg.render_width)
    );

    let activity_rows = vec![
        ("Today".to_string(), stats.notes_today.to_string()),
        ("This Week".to_string(), stats.notes_this_week.to_string()),
        ("This Month".to_string(), stats.notes_this_month.to_string()),
    ];
    println!(
        "{}",
        ui::render_table("Recent Activity", ["Period", "Day Headings"], &activity_rows, cfg.render_width)
    );
    Ok(())
}

fn index_status(document: &Path) -> String {
    let Some(persisted) = store::load(&store::sidecar_path(document)) else {
        return "Not built".to_string();
    };
    match store::document_mtime(document) {
        Ok(mtime) if store::is_fresh(&persisted, mtime) => format!(
            "Fresh ({} headings, {} words)",
            persisted.headings.len(),
            persisted.word_index.len()
        ),
        _ => "Stale".to_string(),
    }
}

fn launch_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::Config("editor command is empty".into()))?;

    println!("Opening {}...", path.display());
    let status = Process::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| Error::io(program, e))?;

    if status.success() {
        println!("Notes saved.");
    } else {
        println!("Editor exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/cli.rs"]
mod tests;
