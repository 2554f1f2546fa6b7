//! Uploaded media. Files live under `<uploads_dir>/<folder>/<timestamp>_<name>` and are
//! served back under the public prefix.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use failure::{Error as FailureError, Fail, ResultExt};
use mime::Mime;
use mime_guess;

use errors::Error;
use models::UploadedFile;

pub const DEFAULT_FOLDER: &str = "general";

pub trait FileStorage: Send + Sync {
    /// Stores `bytes` and returns where the file can be fetched from
    fn save(&self, folder: &str, filename: &str, bytes: &[u8]) -> Result<UploadedFile, FailureError>;
    /// Reads a file back by its path relative to the public prefix, e.g. `sketches/1_a.png`
    fn load(&self, relative_path: &str) -> Result<(Mime, Vec<u8>), FailureError>;
    fn public_prefix(&self) -> &str;
}

/// Replaces everything outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Folders may nest (`samples/<id>/packshots`). Each segment gets the same treatment as
/// names; empty, `.` or `..` segments are refused. A blank folder falls back to `general`.
pub fn sanitize_folder(folder: &str) -> Result<String, FailureError> {
    let folder = folder.trim().trim_matches('/');
    if folder.is_empty() {
        return Ok(DEFAULT_FOLDER.to_string());
    }
    let segments = folder
        .split('/')
        .map(|segment| {
            let segment = sanitize_name(segment.trim());
            if segment.chars().all(|c| c == '.') {
                Err(format_err!("Invalid upload folder {}", folder)
                    .context(Error::BadRequest)
                    .into())
            } else {
                Ok(segment)
            }
        }).collect::<Result<Vec<_>, FailureError>>()?;
    Ok(segments.join("/"))
}

pub fn stored_name(timestamp_millis: i64, filename: &str) -> String {
    let name = sanitize_name(filename.trim());
    let name = if name.chars().all(|c| c == '.') { "file".to_string() } else { name };
    format!("{}_{}", timestamp_millis, name)
}

pub struct LocalFileStorage {
    root: PathBuf,
    public_prefix: String,
}

impl LocalFileStorage {
    pub fn new<P: AsRef<Path>>(root: P, public_prefix: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Resolves a public relative path inside the root, refusing anything that walks out of it
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, FailureError> {
        let relative = Path::new(relative_path.trim_start_matches('/'));
        let is_plain = relative.components().count() > 0 && relative.components().all(|component| match component {
            Component::Normal(_) => true,
            _ => false,
        });
        if !is_plain || relative_path.contains('\\') {
            return Err(format_err!("Invalid upload path {}", relative_path).context(Error::BadRequest).into());
        }
        Ok(self.root.join(relative))
    }
}

impl FileStorage for LocalFileStorage {
    fn save(&self, folder: &str, filename: &str, bytes: &[u8]) -> Result<UploadedFile, FailureError> {
        let folder = sanitize_folder(folder)?;
        let filename = stored_name(Utc::now().timestamp_millis(), filename);

        let dir = self.root.join(&folder);
        fs::create_dir_all(&dir)
            .with_context(|_| format!("Creating upload folder {} failed", dir.display()))
            .context(Error::Storage)?;
        let path = dir.join(&filename);
        fs::write(&path, bytes)
            .with_context(|_| format!("Writing upload {} failed", path.display()))
            .context(Error::Storage)?;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(UploadedFile {
            path: format!("{}/{}/{}", self.public_prefix, folder, filename),
            filename,
        })
    }

    fn load(&self, relative_path: &str) -> Result<(Mime, Vec<u8>), FailureError> {
        let path = self.resolve(relative_path)?;
        let bytes = fs::read(&path).map_err(|e| {
            let kind = if e.kind() == io::ErrorKind::NotFound {
                Error::NotFound
            } else {
                Error::Storage
            };
            FailureError::from(e.context(format!("Upload {} not found", relative_path)).context(kind))
        })?;
        let media_type = mime_guess::from_path(&path).first_or_octet_stream();
        Ok((media_type, bytes))
    }

    fn public_prefix(&self) -> &str {
        &self.public_prefix
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use http::errors::status_of;
    use hyper::StatusCode;

    #[test]
    fn names_are_sanitized() {
        assert_eq!(sanitize_name("robe d'été (1).png"), "robe_d__t___1_.png");
        assert_eq!(stored_name(1767225600000, "tech pack.pdf"), "1767225600000_tech_pack.pdf");
        assert_eq!(stored_name(1, ".."), "1_file");
    }

    #[test]
    fn folders_fall_back_to_general() {
        assert_eq!(sanitize_folder("").unwrap(), "general");
        assert_eq!(sanitize_folder(" / ").unwrap(), "general");
        assert_eq!(sanitize_folder("sketches").unwrap(), "sketches");
        assert_eq!(sanitize_folder("tech packs").unwrap(), "tech_packs");
    }

    #[test]
    fn nested_folders_keep_their_segments() {
        assert_eq!(
            sanitize_folder("samples/6c1b8a5e/packshots").unwrap(),
            "samples/6c1b8a5e/packshots"
        );
        assert_eq!(sanitize_folder("/samples/a b/review/").unwrap(), "samples/a_b/review");
        assert_eq!(sanitize_folder("samples\\..\\etc").unwrap(), "samples_.._etc");
    }

    #[test]
    fn dot_and_empty_segments_are_refused() {
        for folder in &["..", "../etc", "samples/../etc", "samples//review", "samples/./review", "a/..."] {
            let e = sanitize_folder(folder).unwrap_err();
            assert_eq!(status_of(&e), StatusCode::BadRequest, "folder {}", folder);
        }
    }

    #[test]
    fn saved_files_load_back() {
        let dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/uploads/");
        let uploaded = storage.save("sketches", "front view.png", b"png-bytes").unwrap();

        assert!(uploaded.path.starts_with("/uploads/sketches/"));
        assert!(uploaded.filename.ends_with("_front_view.png"));

        let relative = uploaded.path.trim_start_matches("/uploads/");
        let (media_type, bytes) = storage.load(relative).unwrap();
        assert_eq!(media_type, mime::IMAGE_PNG);
        assert_eq!(bytes, b"png-bytes".to_vec());
    }

    #[test]
    fn escaping_the_root_is_refused() {
        let dir = TempDir::new().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/uploads");
        let e = storage.load("../secret.txt").unwrap_err();
        assert_eq!(status_of(&e), StatusCode::BadRequest);
        let e = storage.load("general/missing.png").unwrap_err();
        assert_eq!(status_of(&e), StatusCode::NotFound);
    }
}
