use crate::error::ClientError;
use crate::gateway::Client;
use crate::gateway::status_error_message;
use bytes::Bytes;
use dossier_protocol::frame::ImportProgress;
use dossier_protocol::frame::ImportTaskDone;
use dossier_protocol::frame::StreamFrame;
use dossier_protocol::frame::parse_frame;
use dossier_protocol::line_buffer::LineBuffer;
use futures::Stream;
use futures::StreamExt;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;

/// One document in an import batch.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl ImportFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: None,
        }
    }

    /// Reads a file from disk, guessing its content type from the
    /// extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", path.display()),
                )
            })?;
        let bytes = std::fs::read(path)?;
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Ok(Self {
            file_name,
            bytes,
            content_type,
        })
    }
}

/// Per-call knobs for [`Client::import_stream`].
///
/// `idle_timeout` bounds the wait for each chunk of the response body and
/// defaults to waiting forever. A cancelled `cancel` token aborts the
/// session at its next suspension point.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub task_name: Option<String>,
    pub source_department: Option<String>,
    pub idle_timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl Client {
    /// Uploads a batch of files and follows the server's progress stream
    /// until it reports a terminal outcome.
    ///
    /// `on_event` fires once per well-formed progress frame, in arrival
    /// order, and never after this call returns; the terminal record is the
    /// return value, not an event. Lines the server sends that do not parse
    /// are skipped, an explicit error frame aborts at once, and a stream
    /// that closes without a terminal record fails with
    /// [`ClientError::IncompleteStream`]. No retries happen here and
    /// nothing is shown to the user; presentation belongs to the caller.
    pub async fn import_stream<F>(
        &self,
        files: Vec<ImportFile>,
        options: ImportOptions,
        mut on_event: F,
    ) -> Result<ImportTaskDone, ClientError>
    where
        F: FnMut(ImportProgress),
    {
        if files.is_empty() {
            return Err(ClientError::EmptyImport);
        }

        let url = self.config.endpoint("case-file/import")?;
        debug!("POST {url} ({} files)", files.len());

        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let mut part =
                reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type)?;
            }
            form = form.part("files", part);
        }

        let mut request = self.http.post(url).multipart(form);
        if let Some(task_name) = &options.task_name
            && !task_name.is_empty()
        {
            request = request.query(&[("task_name", task_name)]);
        }
        if let Some(department) = &options.source_department
            && !department.is_empty()
        {
            request = request.query(&[("source_department", department)]);
        }

        let cancel = options.cancel.unwrap_or_default();
        let response = tokio::select! {
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            response = self.authorize(request).send() => response?,
        };
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::UnexpectedStatus {
                status,
                message: status_error_message(&body, status),
            });
        }
        let mut stream = response.bytes_stream();
        let mut lines = LineBuffer::new();
        let mut task_done: Option<ImportTaskDone> = None;

        loop {
            let chunk = tokio::select! {
                () = cancel.cancelled() => return Err(ClientError::Cancelled),
                read = read_chunk(&mut stream, options.idle_timeout) => read?,
            };
            let Some(chunk) = chunk else {
                break;
            };
            lines.push(&chunk);
            while let Some(line) = lines.next_line() {
                match parse_frame(&line) {
                    Some(StreamFrame::Progress(event)) => on_event(event),
                    Some(StreamFrame::TaskDone(done)) => task_done = Some(done),
                    Some(StreamFrame::Error { message }) => {
                        return Err(ClientError::Stream {
                            message: message
                                .unwrap_or_else(|| "import failed".to_string()),
                        });
                    }
                    None => trace!("skipping unparseable line ({} bytes)", line.len()),
                }
            }
        }

        if lines.pending() > 0 {
            trace!(
                "{} bytes left without a terminating newline at end of stream",
                lines.pending()
            );
        }
        task_done.ok_or(ClientError::IncompleteStream)
    }
}

/// Waits for the next body chunk, bounding the wait when an idle timeout is
/// configured. `Ok(None)` is a graceful end of stream.
async fn read_chunk<S>(
    stream: &mut S,
    idle_timeout: Option<Duration>,
) -> Result<Option<Bytes>, ClientError>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin,
{
    let next = match idle_timeout {
        Some(limit) => match timeout(limit, stream.next()).await {
            Ok(next) => next,
            Err(_) => return Err(ClientError::IdleTimeout { elapsed: limit }),
        },
        None => stream.next().await,
    };
    match next {
        Some(Ok(chunk)) => Ok(Some(chunk)),
        Some(Err(err)) => Err(err.into()),
        None => Ok(None),
    }
}
