use clap::{Parser, Subcommand};
use social_cover::cover::{BatchSummary, CoverGenerator, CoverOutcome};
use social_cover::fonts::FontRegistry;
use social_cover::paths::MEDIA_DIR;
use social_cover::types::PageMetadata;
use social_cover::{config, output, scan, writer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "social-cover")]
#[command(about = "Social preview cover images for blog posts")]
#[command(long_about = "\
Social preview cover images for blog posts

Every post gets a PNG with its title and abstract inside a dashed border,
signed with the site name. Covers are written to the output's media directory
and named after the post's source file:

  src/posts/moving-to-rust.md  →  docs/media/moving-to-rust-cover.png
                                  (referenced as /media/moving-to-rust-cover.png)

Post metadata (first available wins):
  Title:    front matter `title` → first `# heading` → file name
  Abstract: front matter `abstract` → `description` → empty

Pages without a source file (tag listings, archives) get no cover.

Run 'social-cover gen-config' to generate a documented cover.toml.")]
#[command(version)]
struct Cli {
    /// Site source directory
    #[arg(long, default_value = "src", global = true)]
    source: PathBuf,

    /// Output directory; covers go to its media/ subdirectory
    #[arg(long, default_value = "docs", global = true)]
    output: PathBuf,

    /// Cover config file (stock defaults when absent)
    #[arg(long, default_value = "cover.toml", global = true)]
    config: PathBuf,

    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List posts and the covers they would get, without rendering
    Check,
    /// Scan posts and render every cover
    Build,
    /// Render covers for pages listed in a JSON file
    Render {
        /// JSON array of {"title", "abstract", "inputPath"} records
        pages: PathBuf,
    },
    /// Print a stock cover.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Check => {
            let (cover_config, base_dir) = config::load_config(&cli.config)?;
            println!("==> Checking {}", cli.source.display());
            let posts = scan::scan(&cli.source)?;
            output::print_scan_output(&posts, &cli.source, &cover_config.font_files(&base_dir));
        }
        Command::Build => {
            let (cover_config, base_dir) = config::load_config(&cli.config)?;

            println!("==> Scanning {}", cli.source.display());
            let posts = scan::scan(&cli.source)?;
            let pages: Vec<PageMetadata> = posts.into_iter().map(|p| p.page).collect();

            println!("==> Rendering covers → {}", cli.output.join(MEDIA_DIR).display());
            let outcomes = render_pages(&cover_config, &base_dir, &cli.output, &pages)?;
            write_cover_index(&cli.output, &outcomes)?;
            finish(&outcomes)?;
        }
        Command::Render { pages } => {
            let (cover_config, base_dir) = config::load_config(&cli.config)?;
            let content = std::fs::read_to_string(&pages)?;
            let pages: Vec<PageMetadata> = serde_json::from_str(&content)?;
            let outcomes = render_pages(&cover_config, &base_dir, &cli.output, &pages)?;
            finish(&outcomes)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Send log records to stderr so they never interleave with stdout listings.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Load fonts, then render `pages` in parallel while a printer thread reports
/// each page as it finishes.
fn render_pages(
    cover_config: &config::CoverConfig,
    base_dir: &Path,
    output_root: &Path,
    pages: &[PageMetadata],
) -> Result<Vec<CoverOutcome>, Box<dyn std::error::Error>> {
    let fonts = FontRegistry::load(&cover_config.font_files(base_dir))?;
    let generator = CoverGenerator::new(Arc::new(fonts), cover_config.layout(), output_root)?;
    init_thread_pool(&cover_config.processing);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_cover_event(&event) {
                println!("{}", line);
            }
        }
    });
    let outcomes = generator.generate_all(pages, Some(tx));
    printer.join().ok();
    Ok(outcomes)
}

/// Write `media/covers.json`, mapping each post's input path to its cover.
fn write_cover_index(
    output_root: &Path,
    outcomes: &[CoverOutcome],
) -> Result<(), Box<dyn std::error::Error>> {
    let index: BTreeMap<&str, &str> = outcomes
        .iter()
        .filter_map(|o| match (&o.page.input_path, &o.result) {
            (Some(input), Ok(Some(site_path))) => Some((input.as_str(), site_path.as_str())),
            _ => None,
        })
        .collect();
    let json = serde_json::to_string_pretty(&index)?;
    writer::write_atomic(&output_root.join(MEDIA_DIR).join("covers.json"), json.as_bytes())?;
    Ok(())
}

/// Print totals; any failed page makes the run fail.
fn finish(outcomes: &[CoverOutcome]) -> Result<(), Box<dyn std::error::Error>> {
    let summary = BatchSummary::from_outcomes(outcomes);
    output::print_summary(&summary);
    if summary.failed > 0 {
        return Err(format!("{} cover(s) failed", summary.failed).into());
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
