//! Two-phase file upload.
//!
//! Phase A asks the service for an upload slot and gets back an
//! `UploadTicket`. Phase B posts the file bytes, plus the ticket's extra
//! form fields, to the ticket's one-time `upload_url` without any service
//! credentials. The ticket is what a later file push refers to.

use std::path::Path;

use serde_json::Map;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info};

use pb_core::constants::{self, paths};
use pb_core::error::{PbError, PbResult};

use crate::client::PushClient;
use crate::mime::{guess_mime_type, DEFAULT_MIME_TYPE};
use crate::request::{ApiRequest, FilePart};
use crate::response::UploadTicket;

impl PushClient {
    /// Upload the file at `path`.
    ///
    /// `file_name` defaults to the path's file name and `file_type` to a
    /// guess from the name. The file is opened here and closed on every
    /// exit path.
    pub async fn upload_file(
        &self,
        path: impl AsRef<Path>,
        file_name: Option<&str>,
        file_type: Option<&str>,
    ) -> PbResult<UploadTicket> {
        let path = path.as_ref();
        let name = match file_name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    PbError::Usage(format!("cannot derive a file name from {}", path.display()))
                })?,
        };

        let mut file = tokio::fs::File::open(path).await?;
        self.upload_reader(&mut file, &name, file_type).await
    }

    /// Upload from a caller-owned stream. The stream is not closed and is
    /// only read once an upload slot has been granted.
    pub async fn upload_reader<R>(
        &self,
        reader: &mut R,
        file_name: &str,
        file_type: Option<&str>,
    ) -> PbResult<UploadTicket>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        if file_name.trim().is_empty() {
            return Err(PbError::Usage("upload file name must not be empty".into()));
        }
        let mime_type = file_type.unwrap_or_else(|| guess_mime_type(file_name));

        let ticket = self.request_upload(file_name, mime_type).await?;

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        self.submit_upload(ticket, bytes).await
    }

    /// Phase A: request an upload slot.
    pub async fn request_upload(&self, file_name: &str, file_type: &str) -> PbResult<UploadTicket> {
        let mut fields = Map::new();
        fields.insert("file_name".into(), file_name.into());
        fields.insert("file_type".into(), file_type.into());

        let resp = self
            .send(ApiRequest::post(self.url(paths::UPLOAD_REQUEST)).form(fields))
            .await?;
        let ticket: UploadTicket = serde_json::from_value(resp)
            .map_err(|e| PbError::Serialization(format!("invalid upload ticket: {e}")))?;
        debug!(file_name = %ticket.file_name, "upload slot granted");
        Ok(ticket)
    }

    /// Phase B: submit the bytes to the ticket's one-time URL.
    ///
    /// Consumes the ticket; on failure a new one must be requested.
    pub async fn submit_upload(&self, ticket: UploadTicket, bytes: Vec<u8>) -> PbResult<UploadTicket> {
        let size = bytes.len();
        let part = FilePart {
            field: constants::UPLOAD_FILE_FIELD.to_string(),
            file_name: ticket.file_name.clone(),
            mime_type: if ticket.file_type.is_empty() {
                DEFAULT_MIME_TYPE.to_string()
            } else {
                ticket.file_type.clone()
            },
            bytes,
        };
        let request = ApiRequest::post(ticket.upload_url.as_str())
            .form(ticket.data.clone())
            .file(part)
            .skip_auth();

        self.send(request).await?;
        info!(file_name = %ticket.file_name, bytes = size, "file uploaded");
        Ok(ticket)
    }
}
