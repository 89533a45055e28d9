use axum::{
    async_trait,
    extract::{
        multipart::{Field, MultipartError},
        FromRef, FromRequest, Multipart, Request,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::{fs, io::AsyncWriteExt};

use crate::services::{AssetStorage, StorageError};
use crate::utils::ResponseBuilder;

/// The only multipart field allowed to carry a file.
pub const PICTURE_FIELD: &str = "picture";

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub original_name: String,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Invalid multipart data: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadError::Multipart(e) => e.status(),
            UploadError::UnexpectedField(_) => StatusCode::BAD_REQUEST,
            UploadError::Storage(StorageError::InvalidFileName(_)) => StatusCode::BAD_REQUEST,
            UploadError::Storage(StorageError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ResponseBuilder::error(status, self.to_string()).into_response()
    }
}

/// A multipart form whose `picture` file has already been written to the
/// asset directory.
///
/// Extraction consumes the whole body: by the time a handler receives an
/// `UploadForm`, the picture (if any) is on disk under its original file name.
/// Text fields are kept in memory.
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    picture: Option<StoredFile>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn picture(&self) -> Option<&StoredFile> {
        self.picture.as_ref()
    }

    async fn read(mut multipart: Multipart, storage: &AssetStorage) -> Result<Self, UploadError> {
        let mut form = UploadForm::default();

        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            let Some(file_name) = field.file_name().map(str::to_owned) else {
                let value = field.text().await?;
                form.fields.insert(name, value);
                continue;
            };

            // An empty file input still sends a part, with no file name
            if file_name.is_empty() {
                while field.chunk().await?.is_some() {}
                continue;
            }

            if name != PICTURE_FIELD || form.picture.is_some() {
                return Err(UploadError::UnexpectedField(name));
            }

            form.picture = Some(store_field(field, &file_name, storage).await?);
        }

        Ok(form)
    }
}

async fn store_field(
    mut field: Field<'_>,
    file_name: &str,
    storage: &AssetStorage,
) -> Result<StoredFile, UploadError> {
    let (mut file, path) = storage.create(file_name).await?;
    let mut size = 0u64;

    let written: Result<(), UploadError> = async {
        while let Some(chunk) = field.chunk().await? {
            file.write_all(&chunk).await.map_err(StorageError::from)?;
            size += chunk.len() as u64;
        }
        file.flush().await.map_err(StorageError::from)?;
        Ok(())
    }
    .await;

    if let Err(e) = written {
        drop(file);
        if let Err(remove_err) = fs::remove_file(&path).await {
            tracing::warn!("Failed to remove partial upload {}: {}", path.display(), remove_err);
        }
        return Err(e);
    }

    tracing::info!("Stored upload {} ({} bytes)", path.display(), size);

    Ok(StoredFile {
        original_name: file_name.to_string(),
        path,
        size,
    })
}

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    Arc<AssetStorage>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let storage = Arc::<AssetStorage>::from_ref(state);

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        UploadForm::read(multipart, &storage).await.map_err(|e| {
            tracing::warn!("Upload rejected: {}", e);
            e.into_response()
        })
    }
}
