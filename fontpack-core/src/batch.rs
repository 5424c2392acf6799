//! Batch and job definitions.

use crate::format::TargetFormat;

/// One uploaded font file: original filename plus raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFont {
    pub name: String,
    pub data: Vec<u8>,
}

impl UploadedFont {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        UploadedFont {
            name: name.into(),
            data,
        }
    }

    /// Final path component of the uploaded name. Browsers normally send a
    /// bare filename, but a hostile client could smuggle separators in, and
    /// those must never reach an archive entry name.
    fn file_name(&self) -> &str {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str())
    }

    /// Filename without its last extension. Empty names fall back to
    /// `font` so the derived archive entry is still usable.
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        let stem = match name.rsplit_once('.') {
            Some(("", _)) | None => name,
            Some((stem, _)) => stem,
        };
        if stem.is_empty() {
            "font"
        } else {
            stem
        }
    }

    /// Extension of the uploaded name, as sent; `None` when the name has no
    /// dot suffix.
    pub fn extension(&self) -> Option<&str> {
        match self.file_name().rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
            _ => None,
        }
    }
}

/// All files submitted in one request, plus the single target format shared
/// by the whole batch.
#[derive(Debug)]
pub struct UploadBatch {
    pub files: Vec<UploadedFont>,
    pub target: TargetFormat,
}

impl UploadBatch {
    pub fn new(files: Vec<UploadedFont>, target: TargetFormat) -> Self {
        UploadBatch { files, target }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consume the batch into per-file jobs, preserving upload order.
    pub fn into_jobs(self) -> impl Iterator<Item = ConversionJob> {
        let target = self.target;
        self.files
            .into_iter()
            .enumerate()
            .map(move |(index, font)| ConversionJob {
                index,
                font,
                target,
            })
    }
}

/// One unit of work: convert one uploaded font to the batch's target format.
#[derive(Debug)]
pub struct ConversionJob {
    /// Position in the upload order; archive entries are emitted in this
    /// order regardless of completion order.
    pub index: usize,
    pub font: UploadedFont,
    pub target: TargetFormat,
}

impl ConversionJob {
    /// Archive entry name: original stem with the extension replaced by the
    /// target format's.
    pub fn output_name(&self) -> String {
        format!("{}.{}", self.font.stem(), self.target.extension())
    }
}
