use anyhow::{anyhow, Result};
use colored::*;
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::clipboard;
use crate::page;
use crate::query::{filter, ClickKind, Dashboard, ViewMode};
use crate::session::{Ack, Message, SessionController};
use crate::store::RecordStore;

/// Read a page document from a file, or from stdin when the path is `-`.
fn read_document(path: &str) -> Result<String> {
  if path == "-" {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    return Ok(buf);
  }

  if !Path::new(path).exists() {
    return Err(anyhow!("Document {} not found", path));
  }
  Ok(fs::read_to_string(path)?)
}

/// Capture one element from a document: extract by selector, then drive the
/// session controller through enable -> qualifying click, which runs the
/// capture pipeline and disables selection mode again.
pub fn capture(
  document: &str,
  source_url: &str,
  selector: &str,
  tags: Vec<String>,
) -> Result<()> {
  let html = read_document(document)?;
  let extracted = page::extract(&html, selector)?;

  let mut session = SessionController::new(RecordStore::open()?);
  session.dispatch(Message::ToggleSelectionMode { enabled: true });

  let ack = session.dispatch(Message::ElementCaptured {
    source_url: source_url.to_string(),
    element_path: extracted.element_path,
    element_html: extracted.outer_html,
    tags,
  });

  match ack {
    Ack::Captured { record_id } => {
      println!("{} Captured {} from {}", "✓".green(), record_id.yellow(), source_url.cyan());
      Ok(())
    }
    Ack::Error { message } => Err(anyhow!(message)),
    _ => Err(anyhow!("Unexpected acknowledgement from session controller")),
  }
}

/// List groups for a view mode with filtered record counts.
pub fn list(view: ViewMode, query: &str) -> Result<()> {
  let store = RecordStore::open()?;
  let mut dashboard = Dashboard::load(&store);
  dashboard.set_view_mode(view);
  dashboard.set_search_query(query);

  let groups = dashboard.visible_groups();
  if groups.is_empty() {
    println!("No records found");
    return Ok(());
  }

  for (key, count) in groups {
    println!("{} ({})", key.cyan(), count);
  }
  Ok(())
}

/// Show the records of one group, in rendered (filtered) order.
pub fn show(view: ViewMode, group: &str, query: &str) -> Result<()> {
  let store = RecordStore::open()?;
  let mut dashboard = Dashboard::load(&store);
  dashboard.set_view_mode(view);
  dashboard.set_search_query(query);
  dashboard.select_group(group);

  let records = dashboard.visible_records();
  if records.is_empty() {
    println!("No records in group: {}", group.yellow());
    return Ok(());
  }

  for record in records {
    let preview: String = record.generated_prompt.chars().take(60).collect();
    println!("{}  {}", record.id.yellow(), preview.replace('\n', " "));
  }
  Ok(())
}

/// Details view for a single record; `--copy` puts the Markdown on the
/// clipboard.
pub fn details(id: &str, copy: bool) -> Result<()> {
  let store = RecordStore::open()?;
  let dashboard = Dashboard::load(&store);

  let details =
    dashboard.details(id).ok_or_else(|| anyhow!("Record {} not found", id))?;

  println!("{}", details.when.cyan());
  println!("{} {}", "Source:".bold(), details.source_url);
  println!();
  println!("{}", details.markdown);

  if copy {
    match clipboard::copy(&details.markdown) {
      Ok(()) => println!("\n{} Copied to clipboard", "✓".green()),
      Err(e) => herald::warn(&format!("Copy failed: {e}")),
    }
  }
  Ok(())
}

/// Search the whole collection, ungrouped.
pub fn search(terms: &[String]) -> Result<()> {
  let store = RecordStore::open()?;
  let records = store.load_all()?;
  let query = terms.join(" ");

  let matches = filter(&records, &query);
  if matches.is_empty() {
    println!("No records match: {}", query.yellow());
    return Ok(());
  }

  for record in matches {
    let preview: String = record.generated_prompt.chars().take(60).collect();
    println!(
      "{}  {}  {}",
      record.id.yellow(),
      record.source_url.cyan(),
      preview.replace('\n', " ")
    );
  }
  Ok(())
}

/// Build the export selection: explicit ids, or everything in a group.
fn select_for_export(
  dashboard: &mut Dashboard,
  ids: &[String],
  group: Option<&str>,
) -> Result<()> {
  if let Some(group) = group {
    dashboard.select_group(group);
    dashboard.select_all_in_group();
  }
  for id in ids {
    if dashboard.find(id).is_none() {
      return Err(anyhow!("Record {} not found", id));
    }
    dashboard.click(id, ClickKind::Toggle);
  }
  Ok(())
}

/// Export selected records as `<website_section>` blocks, to the clipboard
/// by default. Clipboard failure degrades to stdout with a warning.
pub fn export(
  view: ViewMode,
  ids: &[String],
  group: Option<&str>,
  query: &str,
  to_stdout: bool,
) -> Result<()> {
  let store = RecordStore::open()?;
  let mut dashboard = Dashboard::load(&store);
  dashboard.set_view_mode(view);
  dashboard.set_search_query(query);
  select_for_export(&mut dashboard, ids, group)?;

  let Some(bundle) = dashboard.export_selected() else {
    println!("Nothing selected to export");
    return Ok(());
  };

  if to_stdout {
    println!("{bundle}");
    return Ok(());
  }

  match clipboard::copy(&bundle) {
    Ok(()) => {
      println!(
        "{} Exported {} record(s) to clipboard",
        "✓".green(),
        dashboard.selection().len()
      );
    }
    Err(e) => {
      herald::warn(&format!("Clipboard unavailable, printing instead: {e}"));
      println!("{bundle}");
    }
  }
  Ok(())
}

/// Delete records by id, with a confirmation prompt unless forced.
pub fn delete(ids: &[String], force: bool) -> Result<()> {
  let store = RecordStore::open()?;
  let mut dashboard = Dashboard::load(&store);

  for id in ids {
    if dashboard.find(id).is_none() {
      return Err(anyhow!("Record {} not found", id));
    }
    dashboard.click(id, ClickKind::Toggle);
  }

  if dashboard.selection().is_empty() {
    println!("Nothing selected to delete");
    return Ok(());
  }

  if !force {
    println!("Are you sure you want to delete {} record(s)? [y/N]", ids.len());

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if !input.trim().to_lowercase().starts_with('y') {
      println!("Deletion cancelled");
      return Ok(());
    }
  }

  let removed = dashboard.delete_selected(&store)?;
  println!("{} Deleted {} record(s)", "✓".green(), removed);
  Ok(())
}

/// Session and store status: selection-mode flag of a fresh session plus
/// collection statistics.
pub fn status() -> Result<()> {
  let store = RecordStore::open()?;
  let session = SessionController::new(store);

  let mode = if session.selection_enabled() { "enabled" } else { "disabled" };
  println!("Selection mode: {}", mode.yellow());

  let records = session.store().load_all()?;
  println!("Records stored: {}", records.len().to_string().cyan());
  println!("Client id: {}", session.store().client_id()?);
  Ok(())
}
