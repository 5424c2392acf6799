//! Batch orchestration: fan jobs out to the converter, collect outputs into
//! an archive in upload order, abort everything on the first failure.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::archive::OutputArchive;
use crate::batch::UploadBatch;
use crate::converter::FontConverter;
use crate::error::{ConvertError, Result};

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Number of conversions allowed in flight at once. 1 means strictly
    /// sequential. Archive entry order equals upload order either way.
    pub parallelism: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions { parallelism: 1 }
    }
}

impl ConvertOptions {
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism;
        self
    }
}

/// Convert every file in the batch and collect the outputs.
///
/// Jobs run through an ordered buffered stream, so even with
/// `parallelism > 1` results are yielded by upload index, not completion
/// order. The first failing job aborts the batch; outputs already produced
/// are discarded and no archive is returned.
pub async fn convert_batch(
    converter: &dyn FontConverter,
    batch: UploadBatch,
    options: &ConvertOptions,
) -> Result<OutputArchive> {
    if batch.is_empty() {
        return Err(ConvertError::EmptyBatch);
    }

    let total = batch.len();
    let target = batch.target;
    debug!(files = total, %target, "starting batch conversion");

    let mut results = stream::iter(batch.into_jobs())
        .map(|job| async move {
            let name = job.output_name();
            debug!(index = job.index, input = %job.font.name, output = %name, "converting");
            let data = converter.convert(&job.font, job.target).await?;
            Ok::<_, ConvertError>((name, data))
        })
        .buffered(options.parallelism.max(1));

    let mut archive = OutputArchive::with_capacity(total);
    while let Some(result) = results.next().await {
        let (name, data) = result?;
        archive.push(name, data);
    }

    info!(files = total, %target, "batch conversion complete");
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::UploadedFont;
    use crate::format::TargetFormat;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    /// Prefixes the input bytes with the target label, so tests can tell
    /// outputs apart without a real converter.
    struct TaggingConverter;

    #[async_trait]
    impl FontConverter for TaggingConverter {
        async fn convert(&self, font: &UploadedFont, target: TargetFormat) -> Result<Vec<u8>> {
            let mut out = format!("{target}:").into_bytes();
            out.extend_from_slice(&font.data);
            Ok(out)
        }
    }

    /// Fails for one named file, succeeds for the rest.
    struct FailOn(&'static str);

    #[async_trait]
    impl FontConverter for FailOn {
        async fn convert(&self, font: &UploadedFont, _target: TargetFormat) -> Result<Vec<u8>> {
            if font.name == self.0 {
                Err(ConvertError::Conversion {
                    file: font.name.clone(),
                    message: "corrupt glyph table".to_string(),
                })
            } else {
                Ok(font.data.clone())
            }
        }
    }

    /// Finishes earlier-indexed jobs later, to exercise order restoration
    /// under parallelism.
    struct SlowFirst;

    #[async_trait]
    impl FontConverter for SlowFirst {
        async fn convert(&self, font: &UploadedFont, _target: TargetFormat) -> Result<Vec<u8>> {
            if font.name.starts_with('a') {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            Ok(font.data.clone())
        }
    }

    fn batch(names: &[&str]) -> UploadBatch {
        UploadBatch::new(
            names
                .iter()
                .map(|n| UploadedFont::new(*n, n.as_bytes().to_vec()))
                .collect(),
            TargetFormat::Woff2,
        )
    }

    #[tokio::test]
    async fn test_archive_has_one_entry_per_file_in_upload_order() {
        let archive = convert_batch(
            &TaggingConverter,
            batch(&["Arial.ttf", "Times.otf", "Georgia.woff"]),
            &ConvertOptions::default(),
        )
        .await
        .unwrap();

        let names: Vec<_> = archive.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Arial.woff2", "Times.woff2", "Georgia.woff2"]);
        assert_eq!(archive.entries()[0].data, b"woff2:Arial.ttf".to_vec());
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let error = convert_batch(&TaggingConverter, batch(&[]), &ConvertOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(error, ConvertError::EmptyBatch));
    }

    #[tokio::test]
    async fn test_single_failure_aborts_whole_batch() {
        let error = convert_batch(
            &FailOn("Times.otf"),
            batch(&["Arial.ttf", "Times.otf", "Georgia.woff"]),
            &ConvertOptions::default(),
        )
        .await
        .unwrap_err();

        match error {
            ConvertError::Conversion { file, message } => {
                assert_eq!(file, "Times.otf");
                assert_eq!(message, "corrupt glyph table");
            }
            other => panic!("expected Conversion error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_parallel_runs_preserve_upload_order() {
        let archive = convert_batch(
            &SlowFirst,
            batch(&["aaa.ttf", "bbb.ttf", "ccc.ttf"]),
            &ConvertOptions::default().with_parallelism(3),
        )
        .await
        .unwrap();

        let names: Vec<_> = archive.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["aaa.woff2", "bbb.woff2", "ccc.woff2"]);
    }

    #[tokio::test]
    async fn test_zero_parallelism_is_clamped() {
        let archive = convert_batch(
            &TaggingConverter,
            batch(&["Arial.ttf"]),
            &ConvertOptions::default().with_parallelism(0),
        )
        .await
        .unwrap();
        assert_eq!(archive.len(), 1);
    }
}
