use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use folio::document::load_document;
use folio::progress::READ_TOPICS_KEY;
use folio::storage::{FileStore, KeyValueStore};
use folio::{App, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Markdown document to open, optionally with a #fragment naming the
    /// chapter or section to start at
    document: String,

    /// Key-value store file (defaults to the data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Forget which topics have been read
    #[arg(long)]
    reset_progress: bool,
}

/// Split `path#fragment` into its parts.
///
/// The fragment follows the last `#`; an argument naming an existing file
/// is taken whole, so paths containing `#` still open.
fn split_fragment(arg: &str, exists: impl Fn(&str) -> bool) -> (&str, Option<&str>) {
    if exists(arg) {
        return (arg, None);
    }
    match arg.rsplit_once('#') {
        Some((path, fragment)) if !fragment.is_empty() => (path, Some(fragment)),
        Some((path, _)) => (path, None),
        None => (arg, None),
    }
}

/// Log to a file; the terminal belongs to the UI
fn init_logging() -> Result<()> {
    let log_path = Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let log_file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {:?}", log_path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let (path, fragment) = split_fragment(&cli.document, |p| Path::new(p).is_file());
    let document = load_document(Path::new(path))
        .with_context(|| format!("Failed to open document {}", path))?;

    let config = Config::load()?;

    let store_path = match cli.store {
        Some(path) => path,
        None => Config::store_path()?,
    };
    let mut store = FileStore::open(store_path);

    if cli.reset_progress {
        store.remove(READ_TOPICS_KEY).context("Failed to reset reading progress")?;
        tracing::info!("Reset reading progress in {:?}", store.path());
    }

    let mut app = App::new(config, document, Box::new(store), fragment)?;
    app.run()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_is_split_off() {
        let missing = |_: &str| false;
        assert_eq!(split_fragment("guide.md#ch2", missing), ("guide.md", Some("ch2")));
        assert_eq!(split_fragment("guide.md#", missing), ("guide.md", None));
        assert_eq!(split_fragment("guide.md", missing), ("guide.md", None));
    }

    #[test]
    fn hash_in_file_name_survives() {
        let missing = |_: &str| false;
        assert_eq!(split_fragment("C#-notes.md#ch2", missing), ("C#-notes.md", Some("ch2")));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("C#-notes.md");
        std::fs::write(&path, "# One\n").unwrap();
        let arg = path.to_string_lossy().into_owned();
        let on_disk = |p: &str| Path::new(p).is_file();
        assert_eq!(split_fragment(&arg, on_disk), (arg.as_str(), None));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["folio", "--store", "/tmp/s.json", "--reset-progress", "a.md#x"]);
        assert_eq!(cli.document, "a.md#x");
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.json")));
        assert!(cli.reset_progress);
    }
}
