use anyhow::Result;
use chrono::{Local, TimeZone};
use clap::ValueEnum;
use std::collections::HashSet;
use url::Url;

use crate::record::Record;
use crate::store::RecordStore;

/// Bucket for records whose source URL fails to parse.
pub const UNKNOWN_GROUP: &str = "unknown";
/// Key of the single group in the `all` view.
pub const ALL_GROUP: &str = "all";

/// The grouping strategy active in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ViewMode {
  /// Group by source hostname.
  #[default]
  Url,
  /// Group by local calendar date, day granularity.
  Date,
  /// One group, newest first.
  All,
}

impl ViewMode {
  pub fn as_str(self) -> &'static str {
    match self {
      ViewMode::Url => "url",
      ViewMode::Date => "date",
      ViewMode::All => "all",
    }
  }
}

impl std::fmt::Display for ViewMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone)]
pub struct Group {
  pub key: String,
  pub records: Vec<Record>,
}

/// How a record row was clicked in the dashboard list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
  /// Replace the selection with this record.
  Plain,
  /// Toggle this record's membership (ctrl/cmd click).
  Toggle,
  /// Select the contiguous span from the anchor to this record
  /// (shift click), measured over the rendered filtered list.
  Range,
}

fn host_key(source_url: &str) -> String {
  Url::parse(source_url)
    .ok()
    .and_then(|url| url.host_str().map(str::to_string))
    .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}

fn date_key(timestamp: i64) -> String {
  Local
    .timestamp_millis_opt(timestamp)
    .single()
    .map(|dt| dt.format("%Y-%m-%d").to_string())
    .unwrap_or_else(|| UNKNOWN_GROUP.to_string())
}

fn push_bucket(groups: &mut Vec<Group>, key: String, record: &Record) {
  if let Some(group) = groups.iter_mut().find(|g| g.key == key) {
    group.records.push(record.clone());
  } else {
    groups.push(Group { key, records: vec![record.clone()] });
  }
}

/// Bucket the collection for the given view mode.
///
/// `url` and `date` keep groups in encounter order and preserve collection
/// order within each bucket. `all` is the only mode with a defined sort:
/// one group, timestamp descending, ties in input order (stable).
pub fn group_by(records: &[Record], mode: ViewMode) -> Vec<Group> {
  let mut groups: Vec<Group> = Vec::new();

  match mode {
    ViewMode::Url => {
      for record in records {
        push_bucket(&mut groups, host_key(&record.source_url), record);
      }
    }
    ViewMode::Date => {
      for record in records {
        push_bucket(&mut groups, date_key(record.timestamp), record);
      }
    }
    ViewMode::All => {
      let mut sorted = records.to_vec();
      sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
      groups.push(Group { key: ALL_GROUP.to_string(), records: sorted });
    }
  }

  groups
}

/// Case-insensitive substring filter over source URL, generated Markdown
/// and raw element content. An empty query is the identity.
pub fn filter(records: &[Record], query: &str) -> Vec<Record> {
  if query.is_empty() {
    return records.to_vec();
  }

  let needle = query.to_lowercase();
  records
    .iter()
    .filter(|r| {
      r.source_url.to_lowercase().contains(&needle)
        || r.generated_prompt.to_lowercase().contains(&needle)
        || r.element_content.to_lowercase().contains(&needle)
    })
    .cloned()
    .collect()
}

/// Details-view payload for a single record.
#[derive(Debug, Clone)]
pub struct Details {
  pub when: String,
  pub source_url: String,
  pub markdown: String,
}

/// The dashboard engine: holds the loaded collection plus the transient
/// view state (view mode, selected group, multi-select set, search query,
/// range anchor). Selection and search always agree on the same filtered
/// view of the active group.
pub struct Dashboard {
  records: Vec<Record>,
  view_mode: ViewMode,
  selected_group: Option<String>,
  selection: Vec<String>,
  search_query: String,
  anchor: Option<String>,
}

impl Dashboard {
  pub fn new(records: Vec<Record>) -> Self {
    Self {
      records,
      view_mode: ViewMode::default(),
      selected_group: None,
      selection: Vec::new(),
      search_query: String::new(),
      anchor: None,
    }
  }

  /// Load from the store. A storage failure degrades to an empty
  /// collection with a logged error, mirroring a dashboard that still
  /// renders when the backing read fails.
  pub fn load(store: &RecordStore) -> Self {
    let records = match store.load_all() {
      Ok(records) => records,
      Err(e) => {
        herald::error(&format!("Failed to load records: {e}"));
        Vec::new()
      }
    };
    Self::new(records)
  }

  /// Re-read the authoritative collection (store-changed notification).
  pub fn reload(&mut self, store: &RecordStore) {
    self.records = match store.load_all() {
      Ok(records) => records,
      Err(e) => {
        herald::error(&format!("Failed to reload records: {e}"));
        Vec::new()
      }
    };
    self.ensure_selection();
  }

  pub fn records(&self) -> &[Record] {
    &self.records
  }

  pub fn view_mode(&self) -> ViewMode {
    self.view_mode
  }

  /// Switching views resets the transient state.
  pub fn set_view_mode(&mut self, mode: ViewMode) {
    self.view_mode = mode;
    self.selected_group = None;
    self.selection.clear();
    self.anchor = None;
  }

  pub fn set_search_query(&mut self, query: &str) {
    self.search_query = query.to_string();
  }

  pub fn search_query(&self) -> &str {
    &self.search_query
  }

  pub fn groups(&self) -> Vec<Group> {
    group_by(&self.records, self.view_mode)
  }

  /// Groups as rendered: filtered counts, groups emptied by the filter
  /// dropped.
  pub fn visible_groups(&self) -> Vec<(String, usize)> {
    self
      .groups()
      .into_iter()
      .filter_map(|group| {
        let count = filter(&group.records, &self.search_query).len();
        (count > 0).then_some((group.key, count))
      })
      .collect()
  }

  pub fn select_group(&mut self, key: &str) {
    self.selected_group = Some(key.to_string());
    self.selection.clear();
  }

  pub fn selected_group(&self) -> Option<&str> {
    self.selected_group.as_deref()
  }

  /// The filtered records of the active group, in rendered order.
  pub fn visible_records(&self) -> Vec<Record> {
    let Some(selected) = self.selected_group.as_deref() else {
      return Vec::new();
    };

    self
      .groups()
      .into_iter()
      .find(|group| group.key == selected)
      .map(|group| filter(&group.records, &self.search_query))
      .unwrap_or_default()
  }

  pub fn selection(&self) -> &[String] {
    &self.selection
  }

  pub fn is_selected(&self, id: &str) -> bool {
    self.selection.iter().any(|s| s == id)
  }

  fn add_to_selection(&mut self, id: &str) {
    if !self.is_selected(id) {
      self.selection.push(id.to_string());
    }
  }

  /// Apply dashboard click semantics to a record row.
  pub fn click(&mut self, id: &str, kind: ClickKind) {
    match kind {
      ClickKind::Plain => {
        self.selection.clear();
        self.selection.push(id.to_string());
        self.anchor = Some(id.to_string());
      }
      ClickKind::Toggle => {
        if self.is_selected(id) {
          self.selection.retain(|s| s != id);
        } else {
          self.selection.push(id.to_string());
        }
        self.anchor = Some(id.to_string());
      }
      ClickKind::Range => {
        let visible = self.visible_records();
        let span = self.anchor.as_deref().and_then(|anchor| {
          let start = visible.iter().position(|r| r.id == anchor)?;
          let end = visible.iter().position(|r| r.id == id)?;
          Some((start.min(end), start.max(end)))
        });

        match span {
          Some((lo, hi)) => {
            let ids: Vec<String> = visible[lo..=hi].iter().map(|r| r.id.clone()).collect();
            for id in &ids {
              self.add_to_selection(id);
            }
          }
          // no usable anchor: behave like a plain click
          None => self.click(id, ClickKind::Plain),
        }
      }
    }
  }

  /// Add every filtered record of the active group to the selection.
  /// Selection from other groups is kept; cross-group accumulation is
  /// allowed.
  pub fn select_all_in_group(&mut self) {
    let ids: Vec<String> = self.visible_records().iter().map(|r| r.id.clone()).collect();
    for id in &ids {
      self.add_to_selection(id);
    }
  }

  pub fn find(&self, id: &str) -> Option<&Record> {
    self.records.iter().find(|r| r.id == id)
  }

  /// Details view for one record.
  pub fn details(&self, id: &str) -> Option<Details> {
    let record = self.find(id)?;
    let when = Local
      .timestamp_millis_opt(record.timestamp)
      .single()
      .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
      .unwrap_or_else(|| record.timestamp.to_string());

    Some(Details {
      when,
      source_url: record.source_url.clone(),
      markdown: record.generated_prompt.clone(),
    })
  }

  /// Export bundle: one `<website_section>` block per selected record, in
  /// selection order, joined by blank lines. `None` when nothing is
  /// selected.
  pub fn export_selected(&self) -> Option<String> {
    let blocks: Vec<String> = self
      .selection
      .iter()
      .filter_map(|id| self.find(id))
      .map(|record| {
        format!(
          "<website_section name=\"{}\">\n{}\n</website_section>",
          record.source_url, record.generated_prompt
        )
      })
      .collect();

    if blocks.is_empty() {
      None
    } else {
      Some(blocks.join("\n\n"))
    }
  }

  /// Remove every selected record, persist the remainder, clear the
  /// selection. Returns how many records were removed.
  pub fn delete_selected(&mut self, store: &RecordStore) -> Result<usize> {
    let doomed: HashSet<&str> = self.selection.iter().map(String::as_str).collect();
    let before = self.records.len();
    self.records.retain(|r| !doomed.contains(r.id.as_str()));
    store.replace_all(&self.records)?;

    self.selection.clear();
    self.anchor = None;
    Ok(before - self.records.len())
  }

  /// Auto-selection on initial load or after a data change left no group
  /// selected: pick the first group and its first record.
  pub fn ensure_selection(&mut self) {
    if self.selected_group.is_some() {
      return;
    }

    let groups = self.groups();
    let Some(first) = groups.first() else {
      return;
    };

    self.selected_group = Some(first.key.clone());
    if let Some(record) = first.records.first() {
      self.selection.clear();
      self.selection.push(record.id.clone());
      self.anchor = Some(record.id.clone());
    }
  }
}
