use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Fixed per-file processing phases reported by progress frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStage {
    Upload,
    Parse,
    Analyze,
    Complete,
}

impl ImportStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportStage::Upload => "upload",
            ImportStage::Parse => "parse",
            ImportStage::Analyze => "analyze",
            ImportStage::Complete => "complete",
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One progress notification from the import stream.
///
/// Every field is optional on the wire; each stage only reports what it
/// knows. `success` and `reason` show up on terminal per-file outcomes.
/// A stage label this client does not recognize decodes as `None` rather
/// than poisoning the whole frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProgress {
    #[serde(
        default,
        deserialize_with = "lenient_stage",
        skip_serializing_if = "Option::is_none"
    )]
    pub stage: Option<ImportStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

fn lenient_stage<'de, D>(deserializer: D) -> Result<Option<ImportStage>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|stage| match stage {
        "upload" => Some(ImportStage::Upload),
        "parse" => Some(ImportStage::Parse),
        "analyze" => Some(ImportStage::Analyze),
        "complete" => Some(ImportStage::Complete),
        _ => None,
    }))
}

/// Server-assigned batch identifier. The backend has emitted both numeric
/// and string ids over time, so both decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Int(u64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Int(id) => write!(f, "{id}"),
            TaskId::Text(id) => f.write_str(id),
        }
    }
}

/// Terminal record for a whole import batch. Exactly one is expected per
/// stream; its absence at end of stream is an error in its own right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportTaskDone {
    pub task_id: TaskId,
    pub total_files: u32,
    pub success_files: u32,
    pub failed_files: u32,
    pub status: String,
}

/// One parsed unit from the import stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    Progress(ImportProgress),
    TaskDone(ImportTaskDone),
    Error { message: Option<String> },
}

const DATA_PREFIX: &[u8] = b"data: ";

/// Parses one complete line from the import stream.
///
/// Lines without the `data: ` prefix are keep-alive or comment noise and
/// yield `None`. A prefixed payload that is not valid JSON, or that claims
/// to be a `task_done` record but does not decode as one, also yields
/// `None`; a reader recovers by skipping the line. Payloads whose `event`
/// value is unrecognized are still delivered as progress so new server-side
/// event kinds degrade gracefully.
pub fn parse_frame(line: &[u8]) -> Option<StreamFrame> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    let value: Value = serde_json::from_slice(payload).ok()?;
    let event = value
        .get("event")
        .and_then(Value::as_str)
        .map(str::to_owned);
    match event.as_deref() {
        Some("task_done") => serde_json::from_value::<ImportTaskDone>(value)
            .ok()
            .map(StreamFrame::TaskDone),
        Some("error") => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned);
            Some(StreamFrame::Error { message })
        }
        _ => serde_json::from_value::<ImportProgress>(value)
            .ok()
            .map(StreamFrame::Progress),
    }
}
