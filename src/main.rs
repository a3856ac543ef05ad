use clap::{Parser, Subcommand};
use rayon::prelude::*;
use rich_picture::collaborators::{BaseUrlResolver, ContextMode, FixedMode};
use rich_picture::config::{self, Config};
use rich_picture::render::HtmlPictureRenderer;
use rich_picture::transform::{RichTextTransformer, TransformError, Transformed};
use rich_picture::{output, picture};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "rich-picture")]
#[command(about = "Rewrite <img> tags in rich-text HTML as responsive <picture> elements")]
#[command(long_about = "\
Rewrite <img> tags in rich-text HTML as responsive <picture> elements

Each <img> becomes a <picture> sized from its own attributes:

  width=\"50%\"              → 50% of picture.max_image_width
  width=\"300\"              → 300px (capped at picture.max_image_width)
  no width                 → picture.max_image_width
  width + height           → aspect ratio enforced on the rendered image

Everything around the images is copied through byte-for-byte.

Config resolution (first found wins):
  --config <FILE>
  config.toml next to the input (render, inspect) or at the source root (build)
  stock defaults

Run 'rich-picture gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Config file (overrides config.toml discovery)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL for relative image references (overrides urls.base_url)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite one HTML file and print the result
    Render {
        /// Input HTML file
        file: PathBuf,
        /// Write the result here and print a report instead of the HTML
        #[arg(long)]
        out: Option<PathBuf>,
        /// Behave as an authoring context: output is left unchanged
        #[arg(long)]
        edit_mode: bool,
    },
    /// Rewrite every .html/.htm file under a directory
    Build {
        /// Source directory
        source: PathBuf,
        /// Output directory (mirrors the source tree)
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Show the sizing decisions for each <img> without rendering
    Inspect {
        /// Input HTML file
        file: PathBuf,
        /// Print the decisions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Debug, thiserror::Error)]
enum FileError {
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: {}", .path.display(), .source)]
    Transform {
        path: PathBuf,
        source: TransformError,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Render {
            file,
            out,
            edit_mode,
        } => {
            let config = resolve_config(&cli, parent_dir(file))?;
            let mode = if *edit_mode {
                ContextMode::Edit
            } else {
                ContextMode::Other
            };
            let transformed = transform_file(&config, FixedMode(mode), file)?;
            match out {
                Some(out_path) => {
                    write_output(out_path, &transformed.html)?;
                    output::print_transform_output(Some(file.as_path()), &transformed);
                }
                None => print!("{}", transformed.html),
            }
        }
        Command::Build { source, output: out_dir } => {
            let config = resolve_config(&cli, source)?;
            let files = find_html_files(source, out_dir);
            tracing::debug!(count = files.len(), "found html files");

            let results = files
                .par_iter()
                .map(|path| -> Result<_, FileError> {
                    let transformed = transform_file(&config, FixedMode(ContextMode::Other), path)?;
                    let relative = path.strip_prefix(source).unwrap_or(path.as_path());
                    write_output(&out_dir.join(relative), &transformed.html)?;
                    Ok((relative.to_path_buf(), transformed))
                })
                .collect::<Result<Vec<_>, FileError>>()?;

            let mut images = 0;
            for (relative, transformed) in &results {
                output::print_transform_output(Some(relative.as_path()), transformed);
                images += transformed.rewrites.len();
            }
            println!();
            println!("{}", output::format_build_summary(results.len(), images));
        }
        Command::Inspect { file, json } => {
            let config = resolve_config(&cli, parent_dir(file))?;
            let html = read_input(file)?;
            let plans: Vec<_> = rich_picture::locate::find_img_tags(&html)
                .map(|tag| picture::plan(tag.as_str(), &config.picture))
                .collect();
            if *json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                output::print_inspect_output(&plans);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config per the `--config` / discovery / defaults order and apply
/// command-line overrides.
fn resolve_config(cli: &Cli, dir: &Path) -> Result<Config, config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(dir)?,
    };
    if let Some(base) = &cli.base_url {
        config.urls.base_url = base.clone();
    }
    Ok(config)
}

fn parent_dir(file: &Path) -> &Path {
    file.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

fn read_input(path: &Path) -> Result<String, FileError> {
    std::fs::read_to_string(path).map_err(|source| FileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, html: &str) -> Result<(), FileError> {
    let io_err = |source| FileError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_err)?;
    }
    std::fs::write(path, html).map_err(io_err)
}

fn transform_file(config: &Config, mode: FixedMode, path: &Path) -> Result<Transformed, FileError> {
    let html = read_input(path)?;
    let urls = BaseUrlResolver::new(config.urls.base_url.clone());
    let renderer = HtmlPictureRenderer::new();
    RichTextTransformer::new(&mode, &urls, &renderer)
        .transform_with_report(&html, Some(&config.picture))
        .map_err(|source| FileError::Transform {
            path: path.to_path_buf(),
            source,
        })
}

/// All `.html`/`.htm` files under `source`, sorted, excluding anything inside
/// `output` when it is nested in the source tree.
fn find_html_files(source: &Path, output: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(source)
        .into_iter()
        .filter_entry(|e| e.path() != output)
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        })
        .collect();
    files.sort();
    files
}
