use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted captured-element entry. Immutable once created; the only
/// way a record leaves the collection is bulk deletion through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
  pub id: String,
  /// Creation time in epoch milliseconds; drives ordering and date grouping.
  pub timestamp: i64,
  /// Full URL of the page the element was captured from.
  pub source_url: String,
  /// Root-to-leaf structural locator of the captured element. Best-effort,
  /// not guaranteed unique under dynamic pages.
  pub element_path: String,
  /// The element's original outer markup, preserved verbatim.
  pub element_content: String,
  /// Markdown conversion of `element_content`.
  pub generated_prompt: String,
  /// User-assigned labels.
  #[serde(default)]
  pub tags: Vec<String>,
}

impl Record {
  pub fn new(
    source_url: String,
    element_path: String,
    element_content: String,
    generated_prompt: String,
    tags: Vec<String>,
  ) -> Self {
    let timestamp = Utc::now().timestamp_millis();
    Self {
      id: generate_id(timestamp),
      timestamp,
      source_url,
      element_path,
      element_content,
      generated_prompt,
      tags,
    }
  }
}

/// Record ids are the creation timestamp plus a random suffix, so they sort
/// roughly by age while staying unique even within one millisecond.
pub fn generate_id(timestamp: i64) -> String {
  let uuid = Uuid::new_v4().simple().to_string();
  format!("{}_{}", timestamp, &uuid[..8])
}
