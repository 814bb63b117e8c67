use std::fmt;
use std::path::Path;

use anyhow::Context as _;

use crate::assets::data_url::DataUrl;
use crate::foundation::error::StudioResult;

/// Largest accepted upload: 5 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// A user-selected file, as handed over by a file picker.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Why an upload was refused. Shown to the user; never an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadRejection {
    NotAnImage { mime: String },
    TooLarge { size: u64, limit: u64 },
}

impl UploadRejection {
    pub fn message(&self) -> &'static str {
        match self {
            UploadRejection::NotAnImage { .. } => {
                "Por favor selecciona un archivo de imagen válido"
            }
            UploadRejection::TooLarge { .. } => "El archivo es demasiado grande. Máximo 5MB.",
        }
    }
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Gate on MIME type and size. The limit is inclusive.
pub fn check_upload(mime: &str, size: u64, limit: u64) -> Result<(), UploadRejection> {
    if !mime.starts_with("image/") {
        return Err(UploadRejection::NotAnImage {
            mime: mime.to_owned(),
        });
    }
    if size > limit {
        return Err(UploadRejection::TooLarge { size, limit });
    }
    Ok(())
}

/// Gate a file on MIME type and size, then embed it as a data URL.
pub fn accept_upload(file: UploadedFile, limit: u64) -> Result<DataUrl, UploadRejection> {
    if let Err(rejection) = check_upload(&file.mime, file.bytes.len() as u64, limit) {
        tracing::warn!(name = %file.name, %rejection, "upload rejected");
        return Err(rejection);
    }
    let len = file.bytes.len();
    tracing::debug!(name = %file.name, mime = %file.mime, len, "upload accepted");
    Ok(DataUrl::new(file.mime, file.bytes))
}

/// Best-effort MIME type from a file extension.
pub fn guess_mime(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Read a file from disk as an upload.
///
/// The size limit is enforced from metadata before any bytes are read.
pub async fn load_upload(
    path: &Path,
    limit: u64,
) -> StudioResult<Result<DataUrl, UploadRejection>> {
    let mime = guess_mime(path);
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("stat upload '{}'", path.display()))?;
    if let Err(rejection) = check_upload(mime, meta.len(), limit) {
        tracing::warn!(path = %path.display(), %rejection, "upload rejected");
        return Ok(Err(rejection));
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("read upload '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(accept_upload(
        UploadedFile {
            name,
            mime: mime.to_owned(),
            bytes,
        },
        limit,
    ))
}
