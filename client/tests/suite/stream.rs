#![allow(clippy::unwrap_used)]
//! Scenarios wiremock cannot express: a server that stalls mid-stream,
//! hands out chunks at hostile boundaries, or never finishes. Served from a
//! raw socket speaking just enough HTTP/1.1.

use dossier_client::Client;
use dossier_client::ClientConfig;
use dossier_client::ClientError;
use dossier_client::ImportFile;
use dossier_client::ImportOptions;
use pretty_assertions::assert_eq;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

enum Step {
    Send(Vec<u8>),
    Pause(Duration),
    Hang,
}

fn chunk(payload: &[u8]) -> Vec<u8> {
    let mut piece = format!("{:x}\r\n", payload.len()).into_bytes();
    piece.extend_from_slice(payload);
    piece.extend_from_slice(b"\r\n");
    piece
}

/// Accepts one connection, drains the request in the background, then plays
/// the scripted response body as separate flushed chunks.
async fn serve_script(listener: TcpListener, script: Vec<Step>) {
    let (socket, _) = listener.accept().await.unwrap();
    let (mut reader, mut writer) = socket.into_split();
    tokio::spawn(async move {
        let mut sink = [0u8; 8192];
        loop {
            match reader.read(&mut sink).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
    });

    writer
        .write_all(
            b"HTTP/1.1 200 OK\r\n\
              content-type: text/event-stream\r\n\
              transfer-encoding: chunked\r\n\
              \r\n",
        )
        .await
        .unwrap();
    for step in script {
        match step {
            Step::Send(payload) => {
                writer.write_all(&chunk(&payload)).await.unwrap();
                writer.flush().await.unwrap();
            }
            Step::Pause(delay) => tokio::time::sleep(delay).await,
            Step::Hang => std::future::pending::<()>().await,
        }
    }
    writer.write_all(b"0\r\n\r\n").await.unwrap();
}

async fn start_server(script: Vec<Step>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_script(listener, script));
    addr
}

fn client_for(addr: SocketAddr) -> Client {
    let config = ClientConfig::new(&format!("http://{addr}/api")).unwrap();
    Client::new(config).unwrap()
}

fn one_file() -> Vec<ImportFile> {
    vec![ImportFile::new("a.txt", b"x".to_vec())]
}

#[tokio::test]
async fn idle_timeout_fires_when_the_stream_stalls() {
    let addr = start_server(vec![
        Step::Send(b"data: {\"stage\":\"upload\",\"fileIndex\":0,\"progress\":50}\n".to_vec()),
        Step::Hang,
    ])
    .await;

    let client = client_for(addr);
    let options = ImportOptions {
        idle_timeout: Some(Duration::from_millis(250)),
        ..ImportOptions::default()
    };
    let mut events = Vec::new();
    let result = client
        .import_stream(one_file(), options, |event| events.push(event))
        .await;

    assert!(matches!(result, Err(ClientError::IdleTimeout { .. })));
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn cancellation_aborts_a_waiting_call() {
    let addr = start_server(vec![Step::Hang]).await;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let client = client_for(addr);
    let options = ImportOptions {
        cancel: Some(cancel),
        ..ImportOptions::default()
    };
    let result = client.import_stream(one_file(), options, |_| {}).await;

    assert!(matches!(result, Err(ClientError::Cancelled)));
}

#[tokio::test]
async fn frames_split_at_hostile_chunk_boundaries_decode_intact() {
    let line =
        "data: {\"stage\":\"parse\",\"fileName\":\"案件档案.pdf\",\"progress\":42}\n".as_bytes();
    // Cut inside the first multi-byte character of the file name so neither
    // piece is valid UTF-8 on its own.
    let cut = line.iter().position(|&b| b >= 0x80).unwrap() + 1;
    let addr = start_server(vec![
        Step::Send(line[..cut].to_vec()),
        Step::Pause(Duration::from_millis(30)),
        Step::Send(line[cut..].to_vec()),
        Step::Pause(Duration::from_millis(30)),
        Step::Send(
            b"data: {\"event\":\"task_done\",\"task_id\":\"b-3\",\"total_files\":1,\"success_files\":1,\"failed_files\":0,\"status\":\"done\"}\n"
                .to_vec(),
        ),
    ])
    .await;

    let client = client_for(addr);
    let mut names = Vec::new();
    let done = client
        .import_stream(one_file(), ImportOptions::default(), |event| {
            names.push(event.file_name);
        })
        .await
        .unwrap();

    assert_eq!(names, vec![Some("案件档案.pdf".to_string())]);
    assert_eq!(done.status, "done");
}

#[tokio::test]
async fn unterminated_final_line_is_not_processed() {
    // The terminal record arrives without its newline and the stream ends;
    // a partial line must never be parsed, so this import is incomplete.
    let line = "data: {\"event\":\"task_done\",\"task_id\":1,\"total_files\":1,\"success_files\":1,\"failed_files\":0,\"status\":\"done\"}";
    let addr = start_server(vec![Step::Send(line.as_bytes().to_vec())]).await;

    let client = client_for(addr);
    let result = client
        .import_stream(one_file(), ImportOptions::default(), |_| {})
        .await;

    assert!(matches!(result, Err(ClientError::IncompleteStream)));
}
