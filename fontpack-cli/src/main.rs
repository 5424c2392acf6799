use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fontpack::{
    convert_batch, ConvertOptions, FontConverter, RemoteConverter, SubprocessConverter,
    TargetFormat, UploadBatch, UploadedFont,
};

#[derive(Parser)]
#[command(
    name = "fontpack",
    about = "Batch font format converter: runs an external converter per file and bundles the results into a ZIP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert font files and write the outputs to a single ZIP archive
    Convert {
        /// Input font files
        files: Vec<PathBuf>,

        /// Target format (woff2, woff, ttf, otf)
        #[arg(short, long)]
        format: String,

        /// Output archive path
        #[arg(short, long, default_value = "converted_fonts.zip")]
        output: PathBuf,

        /// Converter command line, e.g. "python3 convert_font.py"
        #[arg(long, default_value = "fontconvert")]
        converter: String,

        /// Remote converter endpoint URL; overrides --converter
        #[arg(long)]
        remote: Option<String>,

        /// Per-file conversion timeout in seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Conversions allowed in flight at once
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,
    },

    /// List supported target formats
    Formats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fontpack=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            files,
            format,
            output,
            converter,
            remote,
            timeout,
            jobs,
        } => {
            let target: TargetFormat = format.parse()?;

            if files.is_empty() {
                bail!("no input files given");
            }

            let mut fonts = Vec::with_capacity(files.len());
            for path in &files {
                let data = std::fs::read(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "font".to_string());
                fonts.push(UploadedFont::new(name, data));
            }

            let timeout = Duration::from_secs(timeout);
            let backend: Box<dyn FontConverter> = match remote {
                Some(url) => Box::new(RemoteConverter::with_timeout(url, timeout)?),
                None => Box::new(
                    SubprocessConverter::from_command_line(&converter)?.with_timeout(timeout),
                ),
            };

            let batch = UploadBatch::new(fonts, target);
            let options = ConvertOptions::default().with_parallelism(jobs);
            let archive = convert_batch(backend.as_ref(), batch, &options).await?;

            let count = archive.len();
            std::fs::write(&output, archive.into_zip_bytes()?)
                .with_context(|| format!("writing {}", output.display()))?;

            println!("Converted {count} font(s) into {}", output.display());
        }

        Commands::Formats => {
            for format in TargetFormat::ALL {
                println!("{format}");
            }
        }
    }

    Ok(())
}
