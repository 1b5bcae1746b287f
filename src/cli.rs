use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use plugincat_core::catalog::export::export_csv;
use plugincat_core::catalog::store::DEFAULT_CATALOG_FILE;
use plugincat_core::catalog::{CatalogFilter, CatalogStore, RecordEdit};
use plugincat_core::config::ScanConfig;
use plugincat_core::platform::default_plugin_folders;
use plugincat_core::scanner::progress::ScanProgress;
use plugincat_core::scanner::{start_scan, Scanner};
use plugincat_core::{Bitness, PluginFormat, PluginRecord};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "plugincat")]
#[command(about = "Catalog installed VST2, VST3 and AU plugins")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Catalog file
    #[arg(long = "catalog", global = true, default_value = DEFAULT_CATALOG_FILE)]
    pub catalog: PathBuf,

    /// Log debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan plugin folders and merge new plugins into the catalog
    Scan {
        /// Extra folder to scan (repeatable)
        #[arg(short = 'r', long = "root", value_name = "DIR")]
        roots: Vec<PathBuf>,
        /// Skip the default plugin folders
        #[arg(long = "no-defaults")]
        no_defaults: bool,
        /// JSON scan configuration
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Scan a single folder and merge new plugins into the catalog
    AddDir {
        dir: PathBuf,
    },

    /// List catalog entries
    List {
        /// Case-insensitive name search
        #[arg(short = 's', long = "search")]
        search: Option<String>,
        /// VST2, VST3, AU or Unknown
        #[arg(short = 'f', long = "format", value_parser = parse_format)]
        format: Option<PluginFormat>,
        /// 32-bit, 64-bit or Unknown
        #[arg(short = 'b', long = "bitness", value_parser = parse_bitness)]
        bitness: Option<Bitness>,
        /// Only favorites
        #[arg(long = "favorites")]
        favorites: bool,
    },

    /// Toggle the favorite flag of an entry
    Favorite {
        path: PathBuf,
    },

    /// Set the notes of an entry
    Note {
        path: PathBuf,
        text: String,
    },

    /// Edit display fields of an entry
    Edit {
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        vendor: Option<String>,
        #[arg(long, value_parser = parse_format)]
        format: Option<PluginFormat>,
        #[arg(long, value_parser = parse_bitness)]
        bitness: Option<Bitness>,
    },

    /// Add an entry by hand
    Add {
        path: PathBuf,
        #[arg(long, value_parser = parse_format, default_value = "Unknown")]
        format: PluginFormat,
    },

    /// Remove an entry
    Remove {
        path: PathBuf,
    },

    /// Export the catalog to CSV
    Export {
        /// Output file (default: plugins-YYYYMMDD.csv)
        out: Option<PathBuf>,
    },

    /// Show the default plugin folders
    Roots,
}

fn parse_format(s: &str) -> Result<PluginFormat, String> {
    PluginFormat::from_label(s).ok_or_else(|| format!("unknown format '{s}'"))
}

fn parse_bitness(s: &str) -> Result<Bitness, String> {
    Bitness::from_label(s).ok_or_else(|| format!("unknown bitness '{s}'"))
}

pub fn run(cli: Cli) -> Result<()> {
    let store = CatalogStore::new(&cli.catalog);

    match cli.command {
        Commands::Scan {
            roots,
            no_defaults,
            config,
        } => {
            let mut cfg = match config {
                Some(path) => ScanConfig::load(&path)?,
                None => ScanConfig::default(),
            };
            cfg.roots.extend(roots);
            if no_defaults {
                cfg.use_default_roots = false;
            }
            scan_and_merge(&store, Scanner::from_config(&cfg), cfg.resolved_roots())
        }
        Commands::AddDir { dir } => {
            if !dir.is_dir() {
                bail!("{} is not a directory", dir.display());
            }
            scan_and_merge(&store, Scanner::new(), vec![dir])
        }
        Commands::List {
            search,
            format,
            bitness,
            favorites,
        } => {
            let filter = CatalogFilter {
                search,
                format,
                bitness,
                favorites_only: favorites,
            };
            let catalog = store.load();
            let mut count = 0;
            for record in catalog.filter(&filter) {
                print_row(record);
                count += 1;
            }
            println!("Total plugins: {count}");
            Ok(())
        }
        Commands::Favorite { path } => {
            let path = resolve(&path)?;
            let now = store.try_update(|c| c.toggle_favorite(&path))?;
            println!(
                "{} is {}a favorite",
                path.display(),
                if now { "now " } else { "no longer " }
            );
            Ok(())
        }
        Commands::Note { path, text } => {
            let path = resolve(&path)?;
            store.try_update(|c| c.set_notes(&path, text))?;
            Ok(())
        }
        Commands::Edit {
            path,
            name,
            vendor,
            format,
            bitness,
        } => {
            let path = resolve(&path)?;
            let edit = RecordEdit {
                name,
                vendor,
                format,
                bitness,
            };
            store.try_update(|c| c.edit(&path, edit))?;
            Ok(())
        }
        Commands::Add { path, format } => {
            let path = resolve(&path)?;
            store.try_update(|c| c.add_manual(PluginRecord::manual(path, format)))?;
            Ok(())
        }
        Commands::Remove { path } => {
            let path = resolve(&path)?;
            let removed = store.try_update(|c| c.remove(&path))?;
            println!("Removed {}", removed.name);
            Ok(())
        }
        Commands::Export { out } => {
            let out = out.unwrap_or_else(default_export_path);
            let catalog = store.load();
            export_csv(catalog.records(), &out)
                .with_context(|| format!("exporting to {}", out.display()))?;
            println!("Plugin list exported to {}", out.display());
            Ok(())
        }
        Commands::Roots => {
            for root in default_plugin_folders() {
                let mark = if root.is_dir() { "found" } else { "missing" };
                println!("{mark:>7}  {}", root.display());
            }
            Ok(())
        }
    }
}

/// Run a background scan, report progress, then merge and save.
fn scan_and_merge(store: &CatalogStore, scanner: Scanner, roots: Vec<PathBuf>) -> Result<()> {
    let handle = start_scan(scanner, roots);
    let mut scanned = Vec::new();
    let mut errors = 0u64;

    for msg in handle.progress_rx.iter() {
        match msg {
            ScanProgress::Found(record) => scanned.push(record),
            ScanProgress::RootSkipped(root) => {
                tracing::debug!("Folder not present: {}", root.display())
            }
            ScanProgress::Update {
                files_seen,
                plugins_found,
                current_path,
            } => tracing::info!("{files_seen} files, {plugins_found} plugins ({current_path})"),
            ScanProgress::Error { path, message } => {
                errors += 1;
                tracing::warn!("{path}: {message}");
            }
            ScanProgress::Complete { .. } | ScanProgress::Cancelled => break,
        }
    }

    if scanned.is_empty() {
        println!("No plugins found.");
        return Ok(());
    }

    let found = scanned.len();
    let added = store
        .update(|c| c.merge(scanned))
        .with_context(|| format!("saving catalog {}", store.path().display()))?;
    println!("Found {found} plugins, added {added} new ({errors} unreadable entries).");
    Ok(())
}

/// Catalog entries are keyed by absolute path.
fn resolve(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("cannot resolve {}", path.display()))
}

fn print_row(record: &PluginRecord) {
    println!(
        "{:<32} {:<20} {:<7} {:<7} {:<3} {:<24} {}",
        record.name,
        record.vendor,
        record.format,
        record.bitness,
        if record.favorite { "Yes" } else { "No" },
        record.notes,
        record.path.display()
    );
}

fn default_export_path() -> PathBuf {
    let date = chrono::Local::now().format("%Y%m%d");
    Path::new(".").join(format!("plugins-{date}.csv"))
}
