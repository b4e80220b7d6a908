use anyhow::Result;

use crate::convert;
use crate::record::Record;
use crate::selection::CaptureRequest;
use crate::store::RecordStore;

/// The capture pipeline: convert the raw markup to Markdown, build a record
/// with a fresh id and timestamp, and append it to the store.
///
/// The stored `element_content` is byte-for-byte the input markup. The
/// append is read-modify-write over the whole collection; a persistence
/// failure is logged by the store and surfaced here without retry.
pub fn capture(
  store: &RecordStore,
  source_url: &str,
  raw_markup: &str,
  element_path: &str,
  tags: Vec<String>,
) -> Result<Record> {
  let markdown = convert::to_markdown(raw_markup);

  let record = Record::new(
    source_url.to_string(),
    element_path.to_string(),
    raw_markup.to_string(),
    markdown,
    tags,
  );

  store.append(&record)?;
  Ok(record)
}

/// Run the pipeline for a request dispatched by the selection controller.
pub fn capture_request(
  store: &RecordStore,
  request: &CaptureRequest,
  tags: Vec<String>,
) -> Result<Record> {
  capture(store, &request.source_url, &request.outer_html, &request.element_path, tags)
}
