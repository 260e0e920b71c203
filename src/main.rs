//! filemate - file listing, classification and bulk tree operations.
//!
//! Usage:
//!   fm ls [PATH]                 List a directory with the saved sort order
//!   fm cp SOURCE... DEST         Copy files and folders
//!   fm mv SOURCE... DEST         Move files and folders
//!   fm rm PATH...                Delete files and folders
//!   fm find PATH PATTERN         Glob search below PATH
//!   fm grep PATH QUERY           Name and content search below PATH
//!   fm volume                    Show removable storage
//!   fm prefs show                Show saved preferences
//!   fm --help                    Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail, eyre};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use filemate_core::{
    Category, PathEntry, Preferences, SortMethod, SortSpec, classify, format_size, mime_type,
};
use filemate_ops::{FileOperation, OperationComplete, OperationExecutor, OperationResult, TreeOps};
use filemate_scan::{
    ListingOptions, SearchConfig, SearchHit, details, entry_counts, files_with_extension, find,
    list_directory_with, search, total_size,
};
use filemate_volume::{VolumeLocator, storage_usage};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "FILEMATE_LOG";

#[derive(Parser)]
#[command(
    name = "filemate",
    version,
    about = "File listing, classification and bulk tree operations",
    long_about = "filemate lists, sorts, classifies, copies, moves and deletes files.\n\n\
                  Listing and search honor the preferences saved with `fm prefs set`."
)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory
    Ls {
        /// Directory to list (defaults to the removable volume or home)
        path: Option<PathBuf>,

        /// Sort method (name-asc, name-desc, size-asc, size-desc, date-asc, date-desc)
        #[arg(short, long)]
        sort: Option<SortMethod>,

        /// Include hidden entries regardless of preferences
        #[arg(short, long)]
        all: bool,
    },

    /// Show the total size of a file or folder
    Size {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Count the files and folders directly inside a folder
    Count {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show the category and MIME type of file names
    Classify {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Copy files and folders into a destination folder
    Cp {
        #[arg(required = true, num_args = 2..)]
        paths: Vec<PathBuf>,

        /// Replace existing files
        #[arg(short, long)]
        overwrite: bool,
    },

    /// Move files and folders into a destination folder
    Mv {
        #[arg(required = true, num_args = 2..)]
        paths: Vec<PathBuf>,
    },

    /// Delete files and folders recursively
    Rm {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rename a file or folder within its parent
    Rename { path: PathBuf, new_name: String },

    /// Create an empty folder
    Mkdir { path: PathBuf },

    /// Create an empty file
    Touch { path: PathBuf },

    /// Find entries by glob pattern, or files by extension
    Find {
        path: PathBuf,
        pattern: String,

        /// Treat the pattern as a file extension
        #[arg(short, long)]
        extension: bool,

        /// Maximum depth to descend
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Search names and, for small files, contents
    Grep {
        path: PathBuf,
        query: String,

        /// Match names only
        #[arg(short, long)]
        names_only: bool,
    },

    /// Zip files and folders into an archive
    Zip {
        output: PathBuf,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Extract archives
    Unzip {
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Directory to extract into
        #[arg(short = 'C', long, default_value = ".")]
        directory: PathBuf,
    },

    /// Show the removable storage volume
    Volume,

    /// Show space on the disk holding a path
    Df {
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show or change saved preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the saved preferences
    Show,
    /// Change saved preferences
    Set {
        #[arg(long)]
        sort: Option<SortMethod>,
        #[arg(long)]
        folders_first: Option<bool>,
        #[arg(long)]
        show_hidden: Option<bool>,
        #[arg(long)]
        toolbar_labels: Option<bool>,
        /// Largest file searched by content, in bytes
        #[arg(long)]
        deep_search_limit: Option<u64>,
        #[arg(long)]
        add_bookmark: Option<PathBuf>,
        #[arg(long)]
        remove_bookmark: Option<PathBuf>,
    },
    /// Restore the defaults
    Reset,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let format = cli.format;

    match cli.command {
        Command::Ls { path, sort, all } => run_ls(path, sort, all, format)?,
        Command::Size { path } => run_size(&path, format)?,
        Command::Count { path } => run_count(&path, format)?,
        Command::Classify { names } => run_classify(&names, format)?,
        Command::Cp { mut paths, overwrite } => {
            let destination = split_destination(&mut paths)?;
            run_batch(FileOperation::copy(paths, destination, overwrite), format)?;
        }
        Command::Mv { mut paths } => {
            let destination = split_destination(&mut paths)?;
            run_batch(FileOperation::move_to(paths, destination), format)?;
        }
        Command::Rm { paths } => run_batch(FileOperation::delete(paths), format)?,
        Command::Rename { path, new_name } => {
            if !TreeOps::new().rename(&path, &new_name) {
                bail!("Could not rename {} to {:?}", path.display(), new_name);
            }
        }
        Command::Mkdir { path } => {
            let (parent, name) = parent_and_name(&path)?;
            TreeOps::new()
                .create_folder(parent, &name)
                .context("Failed to create folder")?;
        }
        Command::Touch { path } => {
            let (parent, name) = parent_and_name(&path)?;
            TreeOps::new()
                .create_file(parent, &name)
                .context("Failed to create file")?;
        }
        Command::Find {
            path,
            pattern,
            extension,
            depth,
        } => run_find(path, &pattern, extension, depth, format)?,
        Command::Grep {
            path,
            query,
            names_only,
        } => run_grep(path, &query, !names_only, format)?,
        Command::Zip { output, inputs } => {
            TreeOps::new()
                .archive(&inputs, &output)
                .context("Failed to write archive")?;
            eprintln!("Wrote {}", output.display());
        }
        Command::Unzip {
            archives,
            directory,
        } => {
            TreeOps::new()
                .extract(&archives, &directory)
                .context("Failed to extract")?;
        }
        Command::Volume => run_volume(format)?,
        Command::Df { path } => run_df(&path, format)?,
        Command::Prefs { action } => run_prefs(action, format)?,
    }

    Ok(())
}

/// Log to stderr, filtered by `FILEMATE_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// List a directory using saved preferences, overridden by flags.
fn run_ls(
    path: Option<PathBuf>,
    sort: Option<SortMethod>,
    all: bool,
    format: OutputFormat,
) -> Result<()> {
    let prefs = Preferences::load();
    let path = path.unwrap_or_else(|| VolumeLocator::detect().default_root());

    let spec = match sort {
        Some(method) => SortSpec::from_method(method, prefs.list_folders_first),
        None => SortSpec::from_preferences(&prefs),
    };
    let mut options = ListingOptions::from_preferences(&prefs);
    options.include_hidden |= all;

    let entries = list_directory_with(&path, &spec, &options)
        .with_context(|| format!("Failed to list {}", path.display()))?;

    match format {
        OutputFormat::Text => {
            for entry in &entries {
                let marker = if entry.is_dir() { "/" } else { "" };
                println!("{:<40} {}", format!("{}{}", entry.name, marker), details(entry));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(())
}

#[derive(Serialize)]
struct SizeReport<'a> {
    path: &'a Path,
    bytes: u64,
    formatted: String,
}

fn run_size(path: &Path, format: OutputFormat) -> Result<()> {
    let entry = PathEntry::from_path(path).context("Invalid path")?;
    let bytes = total_size(&entry);
    let report = SizeReport {
        path,
        bytes,
        formatted: format_size(bytes),
    };

    match format {
        OutputFormat::Text => println!("{}\t{}", report.formatted, path.display()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_count(path: &Path, format: OutputFormat) -> Result<()> {
    let entry = PathEntry::from_path(path).context("Invalid path")?;
    if !entry.is_dir() {
        bail!("{} is not a folder", path.display());
    }
    let counts = entry_counts(path);

    match format {
        OutputFormat::Text => println!("{counts}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&counts)?),
    }
    Ok(())
}

#[derive(Serialize)]
struct Classification<'a> {
    name: &'a str,
    category: Category,
    family: String,
    mime: &'static str,
}

fn run_classify(names: &[String], format: OutputFormat) -> Result<()> {
    let results: Vec<Classification<'_>> = names
        .iter()
        .map(|name| {
            let path = Path::new(name);
            let extension = path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            let category = classify(&extension, path.is_dir());
            Classification {
                name,
                category,
                family: category.family().to_string(),
                mime: mime_type(&extension),
            }
        })
        .collect();

    match format {
        OutputFormat::Text => {
            for c in &results {
                println!("{:<30} {:<14} {}", c.name, c.category, c.mime);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
    }
    Ok(())
}

/// Run a batch on the executor, printing progress to stderr.
fn run_batch(operation: FileOperation, format: OutputFormat) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    let executor = OperationExecutor::new();

    let complete = runtime.block_on(async {
        let mut rx = executor.execute(operation);
        let mut complete: Option<OperationComplete> = None;
        while let Some(result) = rx.recv().await {
            match result {
                OperationResult::Progress(progress) => {
                    if let Some(item) = &progress.current_item {
                        eprintln!(
                            "[{}/{}] {} {}",
                            progress.items_completed + 1,
                            progress.items_total,
                            progress.operation_type,
                            item.display()
                        );
                    }
                }
                OperationResult::Complete(c) => complete = Some(c),
            }
        }
        complete
    });

    let complete = complete.ok_or_else(|| eyre!("Operation ended without a result"))?;
    debug!(summary = %complete.summary(), "batch done");

    match format {
        OutputFormat::Text => {
            for error in &complete.errors {
                eprintln!("  {error}");
            }
            println!("{}", complete.summary());
        }
        OutputFormat::Json => {
            let errors: Vec<String> = complete.errors.iter().map(ToString::to_string).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "operation": complete.operation_type,
                    "succeeded": complete.succeeded,
                    "failed": complete.failed,
                    "bytes_processed": complete.bytes_processed,
                    "cancelled": complete.cancelled,
                    "errors": errors,
                }))?
            );
        }
    }

    if !complete.is_success() {
        bail!("{}", complete.summary());
    }
    Ok(())
}

fn run_find(
    path: PathBuf,
    pattern: &str,
    extension: bool,
    depth: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    if extension {
        let files = files_with_extension(&path, pattern.trim_start_matches('.'));
        match format {
            OutputFormat::Text => files.iter().for_each(|f| println!("{}", f.display())),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&files)?),
        }
        return Ok(());
    }

    let prefs = Preferences::load();
    let mut config = SearchConfig::from_preferences(path, &prefs);
    config.max_depth = depth;
    let hits = find(&config, pattern).context("Search failed")?;
    print_hits(&hits, format)
}

fn run_grep(path: PathBuf, query: &str, deep: bool, format: OutputFormat) -> Result<()> {
    let prefs = Preferences::load();
    let mut config = SearchConfig::from_preferences(path, &prefs);
    config.deep = deep;
    let hits = search(&config, query).context("Search failed")?;
    print_hits(&hits, format)
}

fn print_hits(hits: &[SearchHit], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for hit in hits {
                let marker = if hit.is_dir { "/" } else { "" };
                println!("{}{}", hit.path.display(), marker);
            }
            eprintln!("{} match(es)", hits.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(hits)?),
    }
    Ok(())
}

#[derive(Serialize)]
struct VolumeReport {
    tier: String,
    removable: Option<PathBuf>,
    default_root: PathBuf,
}

fn run_volume(format: OutputFormat) -> Result<()> {
    let locator = VolumeLocator::detect();
    let report = VolumeReport {
        tier: locator.tier().to_string(),
        removable: locator.locate_removable_volume(),
        default_root: locator.default_root(),
    };

    match format {
        OutputFormat::Text => {
            println!("Source:       {}", report.tier);
            match &report.removable {
                Some(root) => println!("Removable:    {}", root.display()),
                None => println!("Removable:    none"),
            }
            println!("Default root: {}", report.default_root.display());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn run_df(path: &Path, format: OutputFormat) -> Result<()> {
    let usage = storage_usage(path)
        .ok_or_else(|| eyre!("No disk found for {}", path.display()))?;

    match format {
        OutputFormat::Text => println!(
            "{} used of {} ({} free, {:.1}%)",
            format_size(usage.used()),
            format_size(usage.total),
            format_size(usage.available),
            usage.used_percentage()
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&usage)?),
    }
    Ok(())
}

fn run_prefs(action: PrefsAction, format: OutputFormat) -> Result<()> {
    let prefs = match action {
        PrefsAction::Show => Preferences::load(),
        PrefsAction::Reset => {
            let prefs = Preferences::default();
            prefs.save().context("Failed to save preferences")?;
            prefs
        }
        PrefsAction::Set {
            sort,
            folders_first,
            show_hidden,
            toolbar_labels,
            deep_search_limit,
            add_bookmark,
            remove_bookmark,
        } => {
            let mut prefs = Preferences::load();
            if let Some(sort) = sort {
                prefs.sort_method = sort;
            }
            if let Some(value) = folders_first {
                prefs.list_folders_first = value;
            }
            if let Some(value) = show_hidden {
                prefs.show_hidden = value;
            }
            if let Some(value) = toolbar_labels {
                prefs.show_bottom_toolbar_labels = value;
            }
            if let Some(value) = deep_search_limit {
                prefs.deep_search_size_limit = value;
            }
            if let Some(path) = add_bookmark {
                prefs.add_bookmark(path);
            }
            if let Some(path) = remove_bookmark {
                prefs.remove_bookmark(&path);
            }
            prefs.save().context("Failed to save preferences")?;
            prefs
        }
    };

    match format {
        OutputFormat::Text => {
            if let Some(path) = Preferences::config_path() {
                println!("# {}", path.display());
            }
            print!("{}", toml::to_string_pretty(&prefs)?);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&prefs)?),
    }
    Ok(())
}

/// Pop the last path as the destination folder.
fn split_destination(paths: &mut Vec<PathBuf>) -> Result<PathBuf> {
    match paths.pop() {
        Some(destination) if !paths.is_empty() => Ok(destination),
        _ => bail!("Expected at least one source and a destination"),
    }
}

fn parent_and_name(path: &Path) -> Result<(&Path, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| eyre!("{} has no file name", path.display()))?
        .to_string_lossy()
        .into_owned();
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((parent, name))
}
