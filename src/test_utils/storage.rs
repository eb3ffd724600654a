use std::sync::atomic::{AtomicU32, Ordering};

use crate::storage::{FileStore, UploadedFile};

/// Create a file store rooted in a fresh directory under the system temp dir.
///
/// Each call gets its own directory so tests do not interfere with each
/// other. The directories are left for the OS to clean up.
pub(crate) fn temp_file_store() -> FileStore {
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
    let root = std::env::temp_dir().join(format!(
        "tajoki-admin-test-{}-{unique}",
        std::process::id()
    ));

    FileStore::new(root)
}

pub(crate) fn sample_png(file_name: &str) -> UploadedFile {
    // A valid 8-byte PNG signature followed by filler; the app validates
    // extension and size, not content.
    let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(file_name.as_bytes());

    UploadedFile {
        file_name: file_name.to_owned(),
        bytes,
    }
}

pub(crate) fn sample_pdf(file_name: &str) -> UploadedFile {
    let mut bytes = b"%PDF-1.4\n".to_vec();
    bytes.extend_from_slice(file_name.as_bytes());

    UploadedFile {
        file_name: file_name.to_owned(),
        bytes,
    }
}
