//! Integration tests for the analysis upload policy
//!
//! Covers count, type and size screening plus preview bookkeeping.

use async_trait::async_trait;
use freshair::upload::{
    FileSource, MAX_FILE_BYTES, PreviewRegistry, SelectedFile, UploadBatch, UploadError,
    read_screened, validate_and_add,
};
use std::sync::Mutex;

fn image(name: &str, size: u64) -> SelectedFile {
    SelectedFile::new(name, "image/jpeg", vec![0; size as usize])
}

fn images(count: usize) -> Vec<SelectedFile> {
    (0..count).map(|i| image(&format!("leaf-{i}.jpg"), 16)).collect()
}

/// Reports sizes without holding any bytes and logs every read.
struct FakePicker {
    files: Vec<(String, Option<u64>)>,
    reads: Mutex<Vec<String>>,
}

impl FakePicker {
    fn new(files: &[(&str, Option<u64>)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(name, size)| (name.to_string(), *size))
                .collect(),
            reads: Mutex::new(Vec::new()),
        }
    }

    fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait(?Send)]
impl FileSource for FakePicker {
    fn names(&self) -> Vec<String> {
        self.files.iter().map(|(name, _)| name.clone()).collect()
    }

    async fn size(&self, name: &str) -> Option<u64> {
        self.files
            .iter()
            .find(|(candidate, _)| candidate == name)
            .and_then(|(_, size)| *size)
    }

    async fn read(&self, name: &str) -> Option<Vec<u8>> {
        self.reads.lock().unwrap().push(name.to_string());
        Some(vec![7; 4])
    }
}

mod policy_tests {
    use super::*;

    #[test]
    fn test_accepts_up_to_five_across_batches() {
        let mut batch = UploadBatch::new();
        assert_eq!(batch.add(images(3)), Ok(3));
        assert_eq!(batch.add(images(2)), Ok(2));
        assert_eq!(batch.len(), 5);
        assert_eq!(batch.previews().live_count(), 5);
    }

    #[test]
    fn test_sixth_file_rejects_whole_batch() {
        let mut batch = UploadBatch::new();
        batch.add(images(4)).expect("four fit");

        let err = batch.add(images(2)).unwrap_err();

        assert_eq!(err, UploadError::TooMany { max: 5 });
        assert_eq!(err.to_string(), "You can upload up to 5 images.");
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.previews().live_count(), 4);
    }

    #[test]
    fn test_non_image_leaves_no_live_previews() {
        let mut registry = PreviewRegistry::default();
        let incoming = vec![
            image("leaf.jpg", 10),
            SelectedFile::new("notes.pdf", "application/pdf", vec![1, 2]),
        ];

        let err = validate_and_add(incoming, &[], &mut registry).unwrap_err();

        assert_eq!(err.to_string(), "Only images are allowed.");
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        let mut batch = UploadBatch::new();
        assert_eq!(batch.add(vec![image("exact.jpg", MAX_FILE_BYTES)]), Ok(1));

        let err = batch
            .add(vec![image("over.jpg", MAX_FILE_BYTES + 1)])
            .unwrap_err();
        assert_eq!(err.to_string(), "Each file must be smaller than 8MB.");
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_extension_decides_type_for_picked_files() {
        let mut batch = UploadBatch::new();
        assert_eq!(
            batch.add(vec![SelectedFile::from_name("leaf.png", vec![1])]),
            Ok(1)
        );
        assert!(matches!(
            batch.add(vec![SelectedFile::from_name("leaf.csv", vec![1])]),
            Err(UploadError::NotAnImage { .. })
        ));
    }
}

mod batch_tests {
    use super::*;

    #[test]
    fn test_remove_revokes_preview() {
        let mut batch = UploadBatch::new();
        batch.add(images(2)).expect("two fit");
        let first = batch.files()[0].clone();

        assert!(batch.remove(&first.id));

        assert_eq!(batch.len(), 1);
        assert!(!batch.previews().is_live(&first.preview));
        assert!(!batch.remove(&first.id));
    }

    #[test]
    fn test_ids_are_unique_for_same_name() {
        let mut batch = UploadBatch::new();
        batch
            .add(vec![image("leaf.jpg", 1), image("leaf.jpg", 1)])
            .expect("two fit");
        let files = batch.files();
        assert_ne!(files[0].id, files[1].id);
        assert!(files[0].id.starts_with("leaf.jpg-"));
    }

    #[test]
    fn test_analysis_uses_first_file() {
        let mut batch = UploadBatch::new();
        assert_eq!(
            batch.analysis_target().unwrap_err().to_string(),
            "Please add at least one image to analyse."
        );

        batch
            .add(vec![image("first.jpg", 1), image("second.jpg", 1)])
            .expect("two fit");
        assert_eq!(batch.analysis_target().unwrap().file.name, "first.jpg");
    }

    #[test]
    fn test_clear_revokes_everything() {
        let mut batch = UploadBatch::new();
        batch.add(images(3)).expect("three fit");
        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.previews().live_count(), 0);
    }
}

mod selection_tests {
    use super::*;

    #[tokio::test]
    async fn test_too_many_files_are_rejected_before_reading() {
        let names: Vec<String> = (0..100).map(|i| format!("leaf-{i}.jpg")).collect();
        let files: Vec<(&str, Option<u64>)> = names.iter().map(|n| (n.as_str(), Some(16))).collect();
        let picker = FakePicker::new(&files);

        let err = read_screened(&picker, 0).await.unwrap_err();

        assert_eq!(err, UploadError::TooMany { max: 5 });
        assert!(picker.reads().is_empty());
    }

    #[tokio::test]
    async fn test_existing_files_count_towards_the_limit() {
        let picker = FakePicker::new(&[("a.jpg", Some(1)), ("b.jpg", Some(1))]);

        let err = read_screened(&picker, 4).await.unwrap_err();

        assert_eq!(err, UploadError::TooMany { max: 5 });
        assert!(picker.reads().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected_from_reported_size() {
        let picker = FakePicker::new(&[
            ("small.jpg", Some(10)),
            ("huge.jpg", Some(2 * 1024 * 1024 * 1024)),
        ]);

        let err = read_screened(&picker, 0).await.unwrap_err();

        assert_eq!(err.to_string(), "Each file must be smaller than 8MB.");
        assert!(picker.reads().is_empty());
    }

    #[tokio::test]
    async fn test_non_image_is_rejected_before_reading() {
        let picker = FakePicker::new(&[("leaf.jpg", Some(10)), ("notes.pdf", Some(10))]);

        let err = read_screened(&picker, 0).await.unwrap_err();

        assert!(matches!(err, UploadError::NotAnImage { .. }));
        assert!(picker.reads().is_empty());
    }

    #[tokio::test]
    async fn test_passing_batch_is_read_in_order() {
        let picker = FakePicker::new(&[("a.jpg", Some(MAX_FILE_BYTES)), ("b.png", None)]);

        let files = read_screened(&picker, 3).await.expect("batch fits");

        assert_eq!(picker.reads(), vec!["a.jpg".to_string(), "b.png".to_string()]);
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].content_type, "image/png");
        let mut batch = UploadBatch::new();
        assert_eq!(batch.add(files), Ok(2));
    }
}
