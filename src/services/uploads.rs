use std::io::{Cursor, Read};

use failure::{Error as FailureError, Fail};
use mime::Mime;
use multipart::server::Multipart;

use super::types::ServiceFuture;
use super::Service;
use errors::Error;
use models::UploadedFile;
use storage::DEFAULT_FOLDER;

/// Fields of an upload form
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UploadForm {
    /// Original file name and content
    pub file: Option<(String, Vec<u8>)>,
    pub folder: Option<String>,
}

fn bad_multipart(e: ::std::io::Error) -> FailureError {
    e.context("Malformed multipart body").context(Error::BadRequest).into()
}

/// Reads the `file` and `folder` fields out of a `multipart/form-data` body; other fields are
/// skipped.
pub fn parse_upload_form(boundary: &str, body: Vec<u8>) -> Result<UploadForm, FailureError> {
    let mut multipart = Multipart::with_body(Cursor::new(body), boundary);
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.read_entry().map_err(bad_multipart)? {
        match &*field.headers.name {
            "file" => {
                let mut bytes = Vec::new();
                field.data.read_to_end(&mut bytes).map_err(bad_multipart)?;
                let filename = field.headers.filename.clone().unwrap_or_else(|| "file".to_string());
                form.file = Some((filename, bytes));
            }
            "folder" => {
                let mut folder = String::new();
                field.data.read_to_string(&mut folder).map_err(bad_multipart)?;
                form.folder = Some(folder);
            }
            other => debug!("Skipping upload form field {}", other),
        }
    }
    Ok(form)
}

pub trait UploadsService {
    /// Stores the file of a multipart upload form
    fn upload_file(&self, boundary: String, body: Vec<u8>) -> ServiceFuture<UploadedFile>;
    /// Reads back an uploaded file by its path below the public prefix
    fn get_upload(&self, relative_path: String) -> ServiceFuture<(Mime, Vec<u8>)>;
}

impl UploadsService for Service {
    fn upload_file(&self, boundary: String, body: Vec<u8>) -> ServiceFuture<UploadedFile> {
        debug!("Receiving upload of {} bytes", body.len());
        let storage = self.storage.clone();
        Box::new(self.cpu_pool.spawn_fn(move || {
            let form = parse_upload_form(&boundary, body)?;
            let (filename, bytes) = form
                .file
                .ok_or_else(|| FailureError::from(format_err!("No file provided").context(Error::BadRequest)))?;
            let folder = form.folder.unwrap_or_else(|| DEFAULT_FOLDER.to_string());
            let uploaded = storage.save(&folder, &filename, &bytes)?;
            info!("Stored upload {}", uploaded.path);
            Ok(uploaded)
        }))
    }

    fn get_upload(&self, relative_path: String) -> ServiceFuture<(Mime, Vec<u8>)> {
        debug!("Reading upload {}", relative_path);
        let storage = self.storage.clone();
        Box::new(self.cpu_pool.spawn_fn(move || storage.load(&relative_path)))
    }
}
