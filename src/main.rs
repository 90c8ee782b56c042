use clap::{Parser, Subcommand};
use std::path::PathBuf;
use webp_batch::{config, logging, output, process};

#[derive(Parser)]
#[command(name = "webp-batch")]
#[command(about = "Convert a directory of PNG/JPEG images to WebP with thumbnails")]
#[command(long_about = "\
Convert a directory of PNG/JPEG images to WebP with thumbnails

Every .png, .jpg and .jpeg file directly inside the source directory is
re-encoded twice: a full-size lossy WebP and a thumbnail that fits inside
a bounding box. Outputs keep the source file name with a .webp extension.

  images/
  ├── config.toml        # Optional settings (see 'webp-batch gen-config')
  ├── dawn.jpg
  ├── map.png
  ├── images/            # Full-size output (created)
  │   ├── dawn.webp
  │   └── map.webp
  └── thumbnails/        # Thumbnails (created)
      ├── dawn.webp
      └── map.webp

Every run reprocesses all files and overwrites previous outputs. A file
that fails to convert is reported and skipped; the rest of the batch
continues.")]
#[command(version)]
struct Cli {
    /// Directory containing the source images
    #[arg(default_value = "images")]
    source: PathBuf,

    /// Full-size WebP quality (0-100) [default: 85]
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    quality: Option<u32>,

    /// Thumbnail WebP quality (0-100) [default: 80]
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    thumbnail_quality: Option<u32>,

    /// Thumbnail bounding box edge in pixels [default: 400]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    thumbnail_size: Option<u32>,

    /// libwebp effort for both outputs, 0 (fast) to 6 (smallest) [default: 6]
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=6))]
    method: Option<u8>,

    /// Print the run report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock config.toml with all options documented
    GenConfig,
}

impl Cli {
    fn overrides(&self) -> config::ConfigOverrides {
        config::ConfigOverrides {
            quality: self.quality,
            method: self.method,
            thumbnail_quality: self.thumbnail_quality,
            thumbnail_size: self.thumbnail_size,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
        }
        None => run(&cli)?,
    }

    Ok(())
}

/// Convert everything in `cli.source` and report.
///
/// A missing source directory is reported (as JSON under `--json`) and ends
/// the run without an error exit; per-file failures are part of the report.
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = config::load_config(&cli.source)?.with_overrides(&cli.overrides())?;
    let process_config = process::ProcessConfig::from_config(&settings);

    let json = cli.json;
    let result = match process::process(&cli.source, &process_config, |event| {
        if !json {
            output::print_process_event(event);
        }
    }) {
        Ok(result) => result,
        Err(e @ process::ProcessError::SourceNotFound(_)) => {
            println!("{}", output::format_run_error(&e, json));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output::print_summary(&result);
    }
    Ok(())
}
