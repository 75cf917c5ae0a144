//! Image batch screening for the leaf-analysis page.
//!
//! A batch of user-chosen files is checked against count, type and size
//! policy as a whole: the first failure rejects every file in the batch.
//! Accepted files get a locally-unique id and a revocable preview handle.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::epoch_millis;

pub const MAX_FILES: usize = 5;
pub const MAX_SIZE_MB: u64 = 8;
pub const MAX_FILE_BYTES: u64 = MAX_SIZE_MB * 1024 * 1024;

static UPLOAD_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("You can upload up to {max} images.")]
    TooMany { max: usize },

    #[error("Only images are allowed.")]
    NotAnImage { name: String },

    #[error("Each file must be smaller than {max_mb}MB.")]
    TooLarge { name: String, max_mb: u64 },

    #[error("Please add at least one image to analyse.")]
    NoFiles,
}

/// A file as picked by the user, before screening.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Builds a file whose content type is guessed from its extension, for
    /// pickers that only hand over a name and bytes.
    pub fn from_name(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = guess_content_type(&name).to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        is_image_type(&self.content_type)
    }
}

fn is_image_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

fn guess_content_type(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    id: u64,
    url: String,
}

impl PreviewHandle {
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Owns the preview URLs handed out for selected images. A handle stays live
/// until it is revoked.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: u64,
    live: HashSet<u64>,
}

impl PreviewRegistry {
    pub fn allocate(&mut self, file: &SelectedFile) -> PreviewHandle {
        self.next_id += 1;
        let url = format!(
            "data:{};base64,{}",
            file.content_type,
            STANDARD.encode(&file.bytes)
        );
        self.live.insert(self.next_id);
        PreviewHandle {
            id: self.next_id,
            url,
        }
    }

    pub fn revoke(&mut self, handle: &PreviewHandle) {
        self.live.remove(&handle.id);
    }

    pub fn is_live(&self, handle: &PreviewHandle) -> bool {
        self.live.contains(&handle.id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UploadCandidate {
    pub id: String,
    pub file: SelectedFile,
    pub preview: PreviewHandle,
}

fn next_upload_id(name: &str) -> String {
    let n = UPLOAD_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", name, epoch_millis(), n)
}

fn check_entry(name: &str, content_type: &str, size: u64) -> Result<(), UploadError> {
    if !is_image_type(content_type) {
        return Err(UploadError::NotAnImage {
            name: name.to_string(),
        });
    }
    if size > MAX_FILE_BYTES {
        return Err(UploadError::TooLarge {
            name: name.to_string(),
            max_mb: MAX_SIZE_MB,
        });
    }
    Ok(())
}

fn screen(incoming: &[SelectedFile], existing: usize) -> Result<(), UploadError> {
    if existing + incoming.len() > MAX_FILES {
        return Err(UploadError::TooMany { max: MAX_FILES });
    }
    for file in incoming {
        check_entry(&file.name, &file.content_type, file.size())?;
    }
    Ok(())
}

/// A picker's view of the chosen files: names and sizes are known up front,
/// bytes are read on demand.
#[async_trait(?Send)]
pub trait FileSource {
    fn names(&self) -> Vec<String>;

    /// `None` when the picker cannot report a size without reading.
    async fn size(&self, name: &str) -> Option<u64>;

    async fn read(&self, name: &str) -> Option<Vec<u8>>;
}

/// Screens a selection on count, type and reported size, then reads the bytes
/// of a batch that passed. Nothing is read for a rejected batch. Files whose
/// size is unknown are screened again by [`validate_and_add`] once read.
pub async fn read_screened(
    source: &dyn FileSource,
    existing: usize,
) -> Result<Vec<SelectedFile>, UploadError> {
    let names = source.names();
    if existing + names.len() > MAX_FILES {
        return Err(UploadError::TooMany { max: MAX_FILES });
    }
    for name in &names {
        let size = source.size(name).await.unwrap_or(0);
        check_entry(name, guess_content_type(name), size)?;
    }

    let mut selected = Vec::with_capacity(names.len());
    for name in names {
        match source.read(&name).await {
            Some(bytes) => selected.push(SelectedFile::from_name(name, bytes)),
            None => tracing::warn!(file = %name, "could not read selected file"),
        }
    }
    Ok(selected)
}

/// Screens `incoming` against the files already accepted. On success every
/// incoming file is returned with an id and a live preview; on failure nothing
/// is accepted and no preview stays allocated.
pub fn validate_and_add(
    incoming: Vec<SelectedFile>,
    existing: &[UploadCandidate],
    previews: &mut PreviewRegistry,
) -> Result<Vec<UploadCandidate>, UploadError> {
    screen(&incoming, existing.len())?;
    Ok(incoming
        .into_iter()
        .map(|file| UploadCandidate {
            id: next_upload_id(&file.name),
            preview: previews.allocate(&file),
            file,
        })
        .collect())
}

/// The accepted files of the analysis page.
#[derive(Debug, Default)]
pub struct UploadBatch {
    files: Vec<UploadCandidate>,
    previews: PreviewRegistry,
}

impl UploadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a picked batch, returning how many files were accepted.
    pub fn add(&mut self, incoming: Vec<SelectedFile>) -> Result<usize, UploadError> {
        if incoming.is_empty() {
            return Ok(0);
        }
        let accepted = validate_and_add(incoming, &self.files, &mut self.previews)?;
        let count = accepted.len();
        self.files.extend(accepted);
        Ok(count)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.files.iter().position(|f| f.id == id) else {
            return false;
        };
        let removed = self.files.remove(pos);
        self.previews.revoke(&removed.preview);
        true
    }

    pub fn clear(&mut self) {
        for file in self.files.drain(..) {
            self.previews.revoke(&file.preview);
        }
    }

    /// Only the first image is sent for analysis.
    pub fn analysis_target(&self) -> Result<&UploadCandidate, UploadError> {
        self.files.first().ok_or(UploadError::NoFiles)
    }

    pub fn files(&self) -> &[UploadCandidate] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_types_from_extension() {
        assert_eq!(SelectedFile::from_name("leaf.JPG", vec![]).content_type, "image/jpeg");
        assert!(SelectedFile::from_name("leaf.JPG", vec![]).is_image());
        assert_eq!(SelectedFile::from_name("notes.txt", vec![]).content_type, "application/octet-stream");
        assert_eq!(SelectedFile::from_name("noext", vec![]).content_type, "application/octet-stream");
    }

    #[test]
    fn preview_urls_are_data_urls() {
        let mut registry = PreviewRegistry::default();
        let handle = registry.allocate(&SelectedFile::new("a.png", "image/png", vec![1, 2, 3]));
        assert_eq!(handle.url(), "data:image/png;base64,AQID");
        assert!(registry.is_live(&handle));
        registry.revoke(&handle);
        assert!(!registry.is_live(&handle));
    }

    #[test]
    fn first_failing_file_decides_the_reason() {
        let big = SelectedFile::new("big.png", "image/png", vec![0; (MAX_FILE_BYTES + 1) as usize]);
        let text = SelectedFile::new("a.txt", "text/plain", vec![1]);
        let err = screen(&[big, text], 0).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let mut batch = UploadBatch::new();
        assert_eq!(batch.add(Vec::new()), Ok(0));
        assert!(batch.is_empty());
    }
}
