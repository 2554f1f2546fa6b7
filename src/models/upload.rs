/// Answer of `POST /upload`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UploadedFile {
    /// Public path the file is served back from, e.g. `/uploads/sketches/1767225600000-front.png`
    pub path: String,
    pub filename: String,
}
