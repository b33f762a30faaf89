use crate::cli::ImportArgs;
use crate::format::stage_label;
use anyhow::Context;
use dossier_client::Client;
use dossier_client::ImportFile;
use dossier_client::ImportOptions;
use dossier_protocol::frame::ImportProgress;
use dossier_protocol::frame::ImportTaskDone;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

pub async fn run(client: &Client, args: ImportArgs, json: bool) -> anyhow::Result<()> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let file = ImportFile::from_path(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        files.push(file);
    }

    // Ctrl-C tears the upload down instead of killing the process mid-frame.
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let options = ImportOptions {
        task_name: args.task_name,
        source_department: args.department,
        idle_timeout: args.idle_timeout.map(Duration::from_secs),
        cancel: Some(cancel),
    };

    let done = client
        .import_stream(files, options, |event| {
            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(err) => warn!("skipping unencodable progress event: {err}"),
                }
            } else {
                println!("{}", progress_line(&event));
            }
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string(&done)?);
    } else {
        print_summary(&done);
    }
    Ok(())
}

/// One human-readable line per progress frame, using whichever fields the
/// frame carried.
fn progress_line(event: &ImportProgress) -> String {
    let mut line = String::new();
    // Widen before the one-based shift: the index comes off the wire and may
    // already sit at u32::MAX.
    match (event.file_index.map(u64::from), event.total) {
        (Some(index), Some(total)) => line.push_str(&format!("[{}/{total}] ", index + 1)),
        (Some(index), None) => line.push_str(&format!("[{}] ", index + 1)),
        _ => {}
    }
    if let Some(name) = &event.file_name {
        line.push_str(name);
        line.push(' ');
    }
    match event.stage {
        Some(stage) => line.push_str(stage_label(stage)),
        None => line.push_str("working"),
    }
    if let Some(progress) = event.progress {
        line.push_str(&format!(" {progress:.0}%"));
    }
    match (event.success, event.reason.as_deref()) {
        (Some(false), Some(reason)) => line.push_str(&format!(", failed: {reason}")),
        (Some(false), None) => line.push_str(", failed"),
        (Some(true), _) => line.push_str(", ok"),
        _ => {}
    }
    line
}

fn print_summary(done: &ImportTaskDone) {
    println!(
        "Import finished: task {} is {}.",
        done.task_id, done.status
    );
    println!(
        "  {} file(s): {} succeeded, {} failed",
        done.total_files, done.success_files, done.failed_files
    );
}
