use clap::{Parser, Subcommand};
use hanare_site::naming::parse_entry_name;
use hanare_site::render::SystemClock;
use hanare_site::{config, generate, output, scan};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hanare-site")]
#[command(about = "Static site generator for the Hanare bakery and inn")]
#[command(long_about = "\
Static site generator for the Hanare bakery and inn

Markdown pages with YAML frontmatter become HTML pages, rendered once per
locale and once per viewport profile (desktop, and mobile under m/).

Content structure:

  content/
  ├── config.toml                  # Site config (optional, merged over defaults)
  ├── assets/                      # Favicons, web manifest → copied to output root
  ├── locales/
  │   ├── ja.toml                  # Default-locale catalog
  │   └── en.toml
  ├── img/                         # Images referenced from frontmatter
  └── pages/
      ├── index.md                 # templateKey: index-page → site root
      ├── index.en.md              # English override
      ├── 010-bread.md             # templateKey: cards-page (numbered = in nav)
      ├── 010-bread.en.md
      └── wip-notes.md             # No number prefix = hidden from nav

Run 'hanare-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".hanare-temp", global = true)]
    temp_dir: PathBuf,

    /// Log debug output to stderr (otherwise RUST_LOG applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Run the full pipeline: scan → resolve → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Render one page file to stdout, markdown rendered on the fly
    Preview {
        /// Markdown file under the content pages directory
        file: PathBuf,
        /// Viewport width in pixels
        #[arg(long, default_value_t = 1280)]
        width: u32,
        /// Locale to render (defaults to the file's locale suffix, then the default locale)
        #[arg(long)]
        locale: Option<String>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            let manifest_path = write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            let report =
                generate::generate(&manifest_path, &cli.source, &cli.output, &SystemClock)?;
            output::print_generate_output(&report, &manifest);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Preview {
            file,
            width,
            locale,
        } => {
            let manifest = scan::scan(&cli.source)?;
            let source = scan::read_page_source(&cli.source, &file)?;
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let entry = parse_entry_name(&stem);
            let locale = locale
                .or(entry.locale)
                .unwrap_or_else(|| manifest.config.i18n.default_locale.clone());
            let html =
                generate::preview_page(&manifest, &source, &entry.slug, &locale, width, &SystemClock);
            println!("{}", html.into_string());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; stdout carries command output.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hanare_site=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(temp_dir)?;
    let manifest_path = temp_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(manifest).map_err(std::io::Error::other)?;
    std::fs::write(&manifest_path, json)?;
    Ok(manifest_path)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
