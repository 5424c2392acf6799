//! # fontpack
//!
//! Batch font conversion pipeline. Uploaded font files are handed one by one
//! to an external converter (a local executable or a remote HTTP service),
//! and the converted outputs are bundled into a single ZIP archive.
//!
//! The actual byte-level format transformation is owned entirely by the
//! external converter; this crate only orchestrates it: temp file lifecycle,
//! process/HTTP invocation with error capture, ordering, and archive
//! assembly.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use fontpack::{
//!     convert_batch, ConvertOptions, SubprocessConverter, TargetFormat,
//!     UploadBatch, UploadedFont,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = SubprocessConverter::new("fontconvert");
//!
//! let batch = UploadBatch::new(
//!     vec![UploadedFont::new("Arial.ttf", std::fs::read("Arial.ttf")?)],
//!     TargetFormat::Woff2,
//! );
//!
//! let archive = convert_batch(&converter, batch, &ConvertOptions::default()).await?;
//! std::fs::write("converted_fonts.zip", archive.into_zip_bytes()?)?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod batch;
pub mod converter;
pub mod error;
pub mod format;
pub mod pipeline;

pub use archive::{ArchiveEntry, OutputArchive};
pub use batch::{ConversionJob, UploadBatch, UploadedFont};
pub use converter::{FontConverter, RemoteConverter, SubprocessConverter};
pub use error::{ConvertError, Result};
pub use format::TargetFormat;
pub use pipeline::{convert_batch, ConvertOptions};
