use clap::{Parser, Subcommand};
use notes_manifest::types::NoteManifest;
use notes_manifest::{config, export, logging, output, routes, scan, slug_map::SlugMap};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "notes-manifest")]
#[command(about = "Route manifest builder for an Obsidian notes vault")]
#[command(long_about = "\
Route manifest builder for an Obsidian notes vault

Every Markdown file under the notes root becomes a page. Its route comes from
its folder path and its slug; notes promoted to the notes surface also get a
short alias that redirects to the canonical route.

Vault structure:

  notes/
  ├── index.md                 # Section root → (root)
  ├── hello-world.md           # → hello-world
  ├── DDIA/
  │   ├── index.md             # Folder landing page → ddia
  │   └── Concurrency.md       # → ddia/concurrency (alias: concurrency)
  ├── assets/                  # Skipped
  ├── _templates/              # Skipped
  └── .obsidian/               # Skipped

Front matter keys used for routing:
  slug:      overrides the filename as the last route segment
  id:        stable identifier, and the alias of promoted notes
  surfaces:  [notes] promotes a note to the notes listing

Run 'notes-manifest gen-config' to generate a documented notes.toml.")]
#[command(version)]
struct Cli {
    /// Project directory holding notes.toml
    #[arg(long, default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Notes root (overrides `root` in notes.toml)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Directory for generated JSON artifacts
    #[arg(long, default_value = ".notes-manifest", global = true)]
    output: PathBuf,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the vault into manifest.json and report conflicts
    Scan,
    /// Scan the vault and fail on any route conflict
    Check,
    /// Scan, validate and write manifest, routes and listing artifacts
    Build,
    /// Print canonical pages and redirects
    Routes,
    /// Print the note listing for a surface
    Listing {
        /// Surface to list (defaults to listing.surface in notes.toml)
        #[arg(long)]
        surface: Option<String>,
    },
    /// Resolve a wiki-link target to its canonical route
    Resolve {
        /// Link target as written, e.g. "My Note#Section|label"
        target: String,
    },
    /// Print a stock notes.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match &cli.command {
        Command::Scan => {
            let (_, source, manifest) = scan_project(&cli)?;
            write_json(&cli.output, "manifest.json", &manifest)?;
            output::print_scan_output(&manifest, &source);
        }
        Command::Check => {
            let (_, source, manifest) = scan_project(&cli)?;
            output::print_scan_output(&manifest, &source);
            exit_if_invalid(&manifest);
            println!("==> Notes are valid");
        }
        Command::Build => {
            let (notes_config, source, manifest) = scan_project(&cli)?;
            output::print_scan_output(&manifest, &source);
            exit_if_invalid(&manifest);

            write_json(&cli.output, "manifest.json", &manifest)?;
            let routes_file = export::build_routes(&manifest, &notes_config);
            write_json(&cli.output, "routes.json", &routes_file)?;
            let listing = export::build_listing(&manifest, &notes_config);
            write_json(&cli.output, "listing.json", &listing)?;

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Routes => {
            let (notes_config, _, manifest) = scan_project(&cli)?;
            let routes_file = export::build_routes(&manifest, &notes_config);
            output::print_routes_output(&routes_file);
        }
        Command::Listing { surface } => {
            let (mut notes_config, _, manifest) = scan_project(&cli)?;
            if let Some(surface) = surface {
                notes_config.listing.surface = surface.clone();
            }
            let listing = export::build_listing(&manifest, &notes_config);
            output::print_listing_output(&notes_config.listing.surface, &listing);
        }
        Command::Resolve { target } => {
            let (_, _, manifest) = scan_project(&cli)?;
            let slug_map = SlugMap::from_manifest(&manifest);
            println!(
                "{}",
                output::format_resolve_output(target, slug_map.resolve(target))
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load `notes.toml`, size the thread pool and build the manifest.
///
/// Returns the config, the absolute notes root and the manifest.
fn scan_project(
    cli: &Cli,
) -> Result<(config::NotesConfig, PathBuf, NoteManifest), Box<dyn std::error::Error>> {
    let notes_config = config::load_config(&cli.project_dir)?;
    let source = match &cli.source {
        Some(source) => source.clone(),
        None => notes_config.notes_root(&cli.project_dir),
    };
    init_thread_pool(&notes_config.processing);

    tracing::info!(root = %source.display(), "scanning notes");
    let manifest = scan::build_note_manifest(&source)?;
    let source = std::path::absolute(&source)?;
    Ok((notes_config, source, manifest))
}

/// Report every conflict on stderr and exit non-zero.
fn exit_if_invalid(manifest: &NoteManifest) {
    if let Err(err) = routes::validate_manifest(manifest) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn write_json<T: Serialize>(
    dir: &Path,
    name: &str,
    value: &T,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(name);
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json)?;
    tracing::debug!(path = %path.display(), "wrote artifact");
    Ok(path)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
