use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Fixed response wrapper used by every non-streaming endpoint.
///
/// `data` stays optional at the type level because error envelopes omit it;
/// decoding must succeed far enough to read `errorCode` and `message` even
/// when there is no payload to speak of.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub error_code: i64,
    #[serde(default)]
    pub message: String,
    // Missing Option fields already decode as None; a serde `default`
    // attribute here would add a `T: Default` bound to the derived impl.
    pub data: Option<T>,
    pub page: Option<Page>,
    pub meta: Option<Value>,
}

impl<T> Envelope<T> {
    /// Zero and 200 both mean success on this wire.
    pub fn is_success(&self) -> bool {
        matches!(self.error_code, 0 | 200)
    }
}

/// Pagination block accompanying list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// One unwrapped page of results plus whatever metadata the server attached.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: Option<Page>,
    pub meta: Option<Value>,
}
