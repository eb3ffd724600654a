//! Durable storage for uploaded files.
//!
//! Uploads are written under logical buckets named by the owning entity
//! (`category_services/`, `payment_proofs/`, `projects/`). Records keep the
//! bucket-relative path; the router serves the storage root so the path
//! becomes a retrievable URL when prefixed with `/storage/`.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{Error, forms::FieldErrors};

/// The largest upload accepted by any form, 2 MiB.
pub const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// The bucket for service category images.
pub const CATEGORY_SERVICES_BUCKET: &str = "category_services";
/// The bucket for payment proof images, shared with transaction proofs.
pub const PAYMENT_PROOFS_BUCKET: &str = "payment_proofs";
/// The bucket for project poster images.
pub const PROJECTS_BUCKET: &str = "projects";

/// A file received in a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// The filename the client supplied.
    pub file_name: String,
    /// The file content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// The lowercased filename extension, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|extension| extension.to_string_lossy().to_lowercase())
    }
}

/// Validate an upload against an extension whitelist and the global size cap,
/// recording failures against `field`.
pub fn check_upload(
    errors: &mut FieldErrors,
    field: &'static str,
    file: &UploadedFile,
    allowed_extensions: &[&str],
) {
    match file.extension() {
        Some(extension) if allowed_extensions.contains(&extension.as_str()) => {}
        _ => {
            errors.push(
                field,
                format!("must be a file of type: {}", allowed_extensions.join(", ")),
            );
        }
    }

    if file.bytes.len() > MAX_UPLOAD_BYTES {
        errors.push(field, "must not be larger than 2 MB");
    }
}

/// Writes and deletes uploaded files below a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a file store rooted at `root`. The directory is created lazily
    /// on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory under which all buckets live.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `file` into `bucket` and return its bucket-relative path.
    ///
    /// The stored name is the md5 digest of the content plus the original
    /// extension, so re-uploading identical content is idempotent.
    ///
    /// # Errors
    /// Returns [Error::Storage] if the directory or file cannot be written.
    pub fn save(&self, bucket: &str, file: &UploadedFile) -> Result<String, Error> {
        let extension = file.extension().unwrap_or_else(|| "bin".to_owned());
        let digest = md5::compute(&file.bytes);
        let relative_path = format!("{bucket}/{digest:x}.{extension}");

        let bucket_dir = self.root.join(bucket);
        std::fs::create_dir_all(&bucket_dir).map_err(|error| {
            Error::Storage(format!("could not create {}: {error}", bucket_dir.display()))
        })?;

        let full_path = self.root.join(&relative_path);
        std::fs::write(&full_path, &file.bytes).map_err(|error| {
            Error::Storage(format!("could not write {}: {error}", full_path.display()))
        })?;

        Ok(relative_path)
    }

    /// Best-effort removal of a previously stored file.
    ///
    /// A missing file is not an error; other failures are logged and ignored
    /// so a stale file never blocks deleting or updating its record.
    pub fn delete(&self, relative_path: &str) {
        let full_path = self.root.join(relative_path);

        match std::fs::remove_file(&full_path) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!("could not delete stored file {}: {error}", full_path.display());
            }
        }
    }

    /// Whether a stored file exists at `relative_path`.
    pub fn contains(&self, relative_path: &str) -> bool {
        self.root.join(relative_path).is_file()
    }
}
