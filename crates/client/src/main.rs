use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use formscan_client::{display, ExtractionClient, HttpRecordStore, SystemClipboard};
use formscan_core::document::view::{render, ViewMode};
use formscan_core::export::{self, Artifact, CopyOutcome};
use formscan_core::{Document, EditSession, EditState, RecordId, RecordManager};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formscan", version, about = "Review, store and export extracted handwritten forms")]
struct Cli {
    /// Base URL of the formscan record store.
    #[arg(long, env = "FORMSCAN_API_URL", default_value = "http://localhost:5000")]
    api_url: String,

    /// Extraction endpoint accepting a multipart `file` upload.
    #[arg(long, env = "FORMSCAN_EXTRACT_URL", default_value = "http://localhost:5000/extract")]
    extract_url: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Upload an image, show the extraction and optionally export or save it.
    Extract {
        image: PathBuf,
        #[arg(long, value_enum, default_value_t = View::Json)]
        view: View,
        /// Save the extraction as a new record.
        #[arg(long)]
        save: bool,
        /// Write extracted.json into this directory.
        #[arg(long, value_name = "DIR")]
        json: Option<PathBuf>,
        /// Write extracted.csv into this directory.
        #[arg(long, value_name = "DIR")]
        csv: Option<PathBuf>,
        /// Copy the JSON to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// List stored records, newest first.
    List,
    /// Find records by filename.
    Search { query: String },
    /// Show one record.
    Show {
        id: RecordId,
        #[arg(long, value_enum, default_value_t = View::Json)]
        view: View,
    },
    /// Edit a record's JSON in $EDITOR, or replace it from a file.
    Edit {
        id: RecordId,
        /// Take the new JSON from this file instead of opening an editor.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Delete a record.
    Delete { id: RecordId },
    /// Export a record as a file.
    Export {
        id: RecordId,
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
        #[arg(long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },
    /// Copy a record's JSON to the clipboard.
    Copy { id: RecordId },
    /// Show the number of stored records.
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    Json,
    Table,
}

impl From<View> for ViewMode {
    fn from(view: View) -> Self {
        match view {
            View::Json => ViewMode::Text,
            View::Table => ViewMode::Table,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut manager = RecordManager::new(HttpRecordStore::new(cli.api_url));

    match cli.command {
        Cmd::Extract {
            image,
            view,
            save,
            json,
            csv,
            copy,
        } => {
            let document = ExtractionClient::new(cli.extract_url)
                .extract_file(&image)
                .await?;
            println!("{}", display::rendered(&render(&document, view.into())));

            if let Some(dir) = json {
                write_artifact(&export::to_json_file(&document, None), &dir)?;
            }
            if let Some(dir) = csv {
                write_artifact(&export::to_csv_file(&document), &dir)?;
            }
            if copy {
                copy_document(&document, None)?;
            }
            if save {
                let record = manager.save_extraction(&document).await?;
                println!("Saved to database. Record ID: {}", record.id);
            }
        }
        Cmd::List => {
            let entries = manager.refresh().await?;
            println!("{}", display::entries(entries));
        }
        Cmd::Search { query } => {
            let entries = manager.search(query.trim()).await?;
            println!("{}", display::entries(&entries));
        }
        Cmd::Show { id, view } => {
            let record = manager.get(id).await?;
            println!("{}\n", display::record_header(&record));
            println!("{}", display::rendered(&render(&record.extracted_json, view.into())));
        }
        Cmd::Edit { id, file } => {
            let session = manager.edit(id).await?;
            match file {
                Some(path) => edit_from_file(session, &path).await?,
                None => edit_interactively(session).await?,
            }
        }
        Cmd::Delete { id } => {
            manager.delete(id).await?;
            println!("Record {id} deleted");
        }
        Cmd::Export { id, format, out } => {
            let record = manager.get(id).await?;
            let artifact = match format {
                Format::Json => export::to_json_file(&record.extracted_json, Some(record.id)),
                Format::Csv => export::to_csv_file(&record.extracted_json),
            };
            write_artifact(&artifact, &out)?;
        }
        Cmd::Copy { id } => {
            let record = manager.get(id).await?;
            copy_document(&record.extracted_json, Some(record.id))?;
        }
        Cmd::Stats => {
            let stats = manager.stats().await?;
            println!("Total Records: {}", stats.total_forms);
        }
    }
    Ok(())
}

fn write_artifact(artifact: &Artifact, dir: &Path) -> anyhow::Result<PathBuf> {
    let path = dir.join(&artifact.filename);
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(path)
}

fn copy_document(document: &Document, record_id: Option<RecordId>) -> anyhow::Result<()> {
    let mut clipboard = SystemClipboard::open();
    match export::copy_or_download(document, record_id, clipboard.as_mut()) {
        CopyOutcome::Copied => println!("JSON copied to clipboard"),
        CopyOutcome::Download(artifact) => {
            println!("Clipboard unavailable, saving a file instead");
            write_artifact(&artifact, Path::new("."))?;
        }
    }
    Ok(())
}

async fn edit_from_file(mut session: EditSession<'_, HttpRecordStore>, path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    session.set_buffer(text);
    if session.state() == EditState::Loaded {
        session.cancel();
        println!("No changes");
        return Ok(());
    }
    eprint!("{}", session.diff());
    let record = session.save().await?;
    println!("Record {} updated", record.id);
    Ok(())
}

/// Editor loop: a rejected save reopens the editor on the user's own text.
/// Saving an empty file abandons the session.
async fn edit_interactively(mut session: EditSession<'_, HttpRecordStore>) -> anyhow::Result<()> {
    loop {
        let text = open_in_editor(session.buffer(), session.error())?;
        if text.trim().is_empty() {
            session.cancel();
            println!("Edit cancelled");
            return Ok(());
        }
        session.set_buffer(text);
        if session.state() == EditState::Loaded {
            session.cancel();
            println!("No changes");
            return Ok(());
        }

        eprint!("{}", session.diff());
        if !confirm("Save these changes?")? {
            session.cancel();
            println!("Edit cancelled");
            return Ok(());
        }
        match session.save().await {
            Ok(record) => {
                println!("Record {} updated", record.id);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error: {e}");
                if !confirm("Re-open the editor?")? {
                    session.cancel();
                    bail!("edit abandoned, record left unchanged");
                }
            }
        }
    }
}

fn open_in_editor(text: &str, error: Option<&str>) -> anyhow::Result<String> {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string());
    if let Some(error) = error {
        eprintln!("Last save failed: {error}");
    }

    let mut file = tempfile::Builder::new()
        .prefix("formscan-")
        .suffix(".json")
        .tempfile()
        .context("failed to create a temporary file")?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    let status = Command::new(&editor)
        .arg(file.path())
        .status()
        .with_context(|| format!("failed to launch editor {editor:?}"))?;
    if !status.success() {
        bail!("editor {editor:?} exited with {status}");
    }
    Ok(std::fs::read_to_string(file.path())?)
}

fn confirm(prompt: &str) -> io::Result<bool> {
    eprint!("{prompt} [Y/n] ");
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}
