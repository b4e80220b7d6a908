use anyhow::Result;
use snipmark::query::{filter, group_by, ClickKind, Dashboard, ViewMode, ALL_GROUP, UNKNOWN_GROUP};
use snipmark::record::Record;
use snipmark::store::RecordStore;
use tempfile::TempDir;

fn record(id: &str, timestamp: i64, url: &str, markdown: &str, content: &str) -> Record {
  Record {
    id: id.to_string(),
    timestamp,
    source_url: url.to_string(),
    element_path: "html:nth-child(1)>body:nth-child(2)>p:nth-child(1)".to_string(),
    element_content: content.to_string(),
    generated_prompt: markdown.to_string(),
    tags: vec![],
  }
}

fn sample_collection() -> Vec<Record> {
  vec![
    record("r1", 100, "https://a.com/x", "alpha text", "<p>alpha</p>"),
    record("r2", 200, "https://a.com/y", "beta text", "<p>beta</p>"),
    record("r3", 300, "https://b.com/z", "gamma text", "<p>gamma</p>"),
  ]
}

#[cfg(test)]
mod grouping_tests {
  use super::*;

  #[test]
  fn url_view_groups_by_hostname() {
    let groups = group_by(&sample_collection(), ViewMode::Url);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key, "a.com");
    assert_eq!(groups[0].records.len(), 2);
    assert_eq!(groups[1].key, "b.com");
    assert_eq!(groups[1].records.len(), 1);
  }

  #[test]
  fn unparseable_urls_land_in_the_unknown_bucket() {
    let mut records = sample_collection();
    records.push(record("r4", 400, "not a url at all", "delta", "<p>d</p>"));

    let groups = group_by(&records, ViewMode::Url);
    let unknown = groups.iter().find(|g| g.key == UNKNOWN_GROUP).unwrap();
    assert_eq!(unknown.records.len(), 1);
    assert_eq!(unknown.records[0].id, "r4");
  }

  #[test]
  fn url_view_preserves_collection_order_within_buckets() {
    let groups = group_by(&sample_collection(), ViewMode::Url);
    let ids: Vec<&str> = groups[0].records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2"]);
  }

  #[test]
  fn all_view_is_one_group_sorted_newest_first() {
    let groups = group_by(&sample_collection(), ViewMode::All);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, ALL_GROUP);
    let ids: Vec<&str> = groups[0].records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r3", "r2", "r1"]);
  }

  #[test]
  fn all_view_sort_is_stable_on_timestamp_ties() {
    let records = vec![
      record("first", 100, "https://a.com/1", "m", "c"),
      record("second", 100, "https://a.com/2", "m", "c"),
      record("third", 100, "https://a.com/3", "m", "c"),
    ];

    let groups = group_by(&records, ViewMode::All);
    let ids: Vec<&str> = groups[0].records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
  }

  #[test]
  fn all_view_returns_every_record_exactly_once() {
    let records = sample_collection();
    let groups = group_by(&records, ViewMode::All);
    assert_eq!(groups[0].records.len(), records.len());
    for r in &records {
      assert_eq!(groups[0].records.iter().filter(|g| g.id == r.id).count(), 1);
    }
  }

  #[test]
  fn date_view_buckets_by_day() {
    // both on the same (local) day, far apart in the epoch from the third
    let records = vec![
      record("r1", 1_700_000_000_000, "https://a.com/x", "m", "c"),
      record("r2", 1_700_000_060_000, "https://a.com/y", "m", "c"),
      record("r3", 1_500_000_000_000, "https://b.com/z", "m", "c"),
    ];

    let groups = group_by(&records, ViewMode::Date);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].records.len(), 2);
    assert_eq!(groups[1].records.len(), 1);
  }
}

#[cfg(test)]
mod filter_tests {
  use super::*;

  #[test]
  fn empty_query_is_the_identity() {
    let records = sample_collection();
    let filtered = filter(&records, "");

    assert_eq!(filtered.len(), records.len());
    for (a, b) in records.iter().zip(filtered.iter()) {
      assert_eq!(a.id, b.id);
    }
  }

  #[test]
  fn filter_matches_are_case_insensitive() {
    let records = sample_collection();
    assert_eq!(filter(&records, "ALPHA").len(), 1);
    assert_eq!(filter(&records, "A.CoM").len(), 2);
  }

  #[test]
  fn filter_searches_url_markdown_and_raw_content() {
    let records = vec![
      record("u", 1, "https://needle-host.com/x", "plain", "<p>plain</p>"),
      record("m", 2, "https://a.com/x", "has needle here", "<p>plain</p>"),
      record("c", 3, "https://a.com/y", "plain", "<p class=\"needle\">plain</p>"),
      record("n", 4, "https://a.com/z", "plain", "<p>plain</p>"),
    ];

    let filtered = filter(&records, "needle");
    let hits: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(hits, vec!["u", "m", "c"]);
  }

  #[test]
  fn filter_never_returns_a_non_matching_record() {
    let records = sample_collection();
    for hit in filter(&records, "beta") {
      assert!(
        hit.source_url.to_lowercase().contains("beta")
          || hit.generated_prompt.to_lowercase().contains("beta")
          || hit.element_content.to_lowercase().contains("beta")
      );
    }
  }
}

#[cfg(test)]
mod selection_tests {
  use super::*;

  fn dashboard_on_a_com() -> Dashboard {
    let mut dashboard = Dashboard::new(sample_collection());
    dashboard.select_group("a.com");
    dashboard
  }

  #[test]
  fn plain_click_replaces_the_selection() {
    let mut dashboard = dashboard_on_a_com();
    dashboard.click("r1", ClickKind::Plain);
    dashboard.click("r2", ClickKind::Plain);
    assert_eq!(dashboard.selection(), ["r2".to_string()]);
  }

  #[test]
  fn toggle_click_flips_membership() {
    let mut dashboard = dashboard_on_a_com();
    dashboard.click("r1", ClickKind::Toggle);
    dashboard.click("r2", ClickKind::Toggle);
    assert_eq!(dashboard.selection().len(), 2);

    dashboard.click("r1", ClickKind::Toggle);
    assert_eq!(dashboard.selection(), ["r2".to_string()]);
  }

  #[test]
  fn range_click_selects_the_span_from_the_anchor() {
    let mut dashboard = Dashboard::new(vec![
      record("r1", 1, "https://a.com/1", "m", "c"),
      record("r2", 2, "https://a.com/2", "m", "c"),
      record("r3", 3, "https://a.com/3", "m", "c"),
      record("r4", 4, "https://a.com/4", "m", "c"),
    ]);
    dashboard.select_group("a.com");

    dashboard.click("r2", ClickKind::Plain);
    dashboard.click("r4", ClickKind::Range);

    let mut selected: Vec<&str> = dashboard.selection().iter().map(String::as_str).collect();
    selected.sort();
    assert_eq!(selected, vec!["r2", "r3", "r4"]);
  }

  #[test]
  fn range_click_measures_over_the_filtered_list() {
    let mut dashboard = Dashboard::new(vec![
      record("r1", 1, "https://a.com/1", "keep", "c"),
      record("r2", 2, "https://a.com/2", "skip", "c"),
      record("r3", 3, "https://a.com/3", "keep", "c"),
      record("r4", 4, "https://a.com/4", "keep", "c"),
    ]);
    dashboard.select_group("a.com");
    dashboard.set_search_query("keep");

    dashboard.click("r1", ClickKind::Plain);
    dashboard.click("r4", ClickKind::Range);

    // r2 is filtered out, so the span is r1, r3, r4
    assert!(dashboard.is_selected("r1"));
    assert!(!dashboard.is_selected("r2"));
    assert!(dashboard.is_selected("r3"));
    assert!(dashboard.is_selected("r4"));
  }

  #[test]
  fn range_click_without_anchor_acts_like_plain() {
    let mut dashboard = dashboard_on_a_com();
    dashboard.click("r2", ClickKind::Range);
    assert_eq!(dashboard.selection(), ["r2".to_string()]);
  }

  #[test]
  fn select_all_in_group_accumulates_across_groups() {
    let mut dashboard = Dashboard::new(sample_collection());

    // r3 lives in b.com; select-all in a.com must not clear it
    dashboard.select_group("a.com");
    dashboard.click("r3", ClickKind::Toggle);
    dashboard.select_all_in_group();

    let mut selected: Vec<&str> = dashboard.selection().iter().map(String::as_str).collect();
    selected.sort();
    assert_eq!(selected, vec!["r1", "r2", "r3"]);
  }

  #[test]
  fn select_all_respects_the_search_filter() {
    let mut dashboard = Dashboard::new(sample_collection());
    dashboard.select_group("a.com");
    dashboard.set_search_query("beta");
    dashboard.select_all_in_group();
    assert_eq!(dashboard.selection(), ["r2".to_string()]);
  }

  #[test]
  fn view_mode_change_resets_transient_state() {
    let mut dashboard = dashboard_on_a_com();
    dashboard.click("r1", ClickKind::Plain);

    dashboard.set_view_mode(ViewMode::All);
    assert!(dashboard.selected_group().is_none());
    assert!(dashboard.selection().is_empty());
  }

  #[test]
  fn auto_selection_picks_first_group_and_record() {
    let mut dashboard = Dashboard::new(sample_collection());
    dashboard.ensure_selection();

    assert_eq!(dashboard.selected_group(), Some("a.com"));
    assert_eq!(dashboard.selection(), ["r1".to_string()]);
  }

  #[test]
  fn auto_selection_on_empty_collection_is_a_noop() {
    let mut dashboard = Dashboard::new(vec![]);
    dashboard.ensure_selection();
    assert!(dashboard.selected_group().is_none());
    assert!(dashboard.selection().is_empty());
  }
}

#[cfg(test)]
mod export_delete_tests {
  use super::*;

  #[test]
  fn export_wraps_markdown_in_source_tagged_blocks() {
    let mut dashboard = Dashboard::new(sample_collection());
    dashboard.select_group("a.com");
    dashboard.click("r1", ClickKind::Toggle);
    dashboard.click("r2", ClickKind::Toggle);

    let bundle = dashboard.export_selected().unwrap();
    assert_eq!(
      bundle,
      "<website_section name=\"https://a.com/x\">\nalpha text\n</website_section>\n\n\
       <website_section name=\"https://a.com/y\">\nbeta text\n</website_section>"
    );
  }

  #[test]
  fn export_follows_selection_order() {
    let mut dashboard = Dashboard::new(sample_collection());
    dashboard.select_group("a.com");
    dashboard.click("r2", ClickKind::Toggle);
    dashboard.click("r1", ClickKind::Toggle);

    let bundle = dashboard.export_selected().unwrap();
    let beta = bundle.find("beta text").unwrap();
    let alpha = bundle.find("alpha text").unwrap();
    assert!(beta < alpha);
  }

  #[test]
  fn export_with_empty_selection_is_none() {
    let dashboard = Dashboard::new(sample_collection());
    assert!(dashboard.export_selected().is_none());
  }

  #[test]
  fn delete_removes_exactly_the_selected_ids() -> Result<()> {
    let temp = TempDir::new()?;
    let store = RecordStore::at(temp.path());
    store.replace_all(&sample_collection())?;

    let mut dashboard = Dashboard::load(&store);
    dashboard.select_group("a.com");
    dashboard.click("r1", ClickKind::Toggle);
    dashboard.click("r3", ClickKind::Toggle);

    let removed = dashboard.delete_selected(&store)?;
    assert_eq!(removed, 2);
    assert!(dashboard.selection().is_empty());

    let remaining = store.load_all()?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "r2");
    Ok(())
  }

  #[test]
  fn delete_with_empty_selection_removes_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let store = RecordStore::at(temp.path());
    store.replace_all(&sample_collection())?;

    let mut dashboard = Dashboard::load(&store);
    let removed = dashboard.delete_selected(&store)?;
    assert_eq!(removed, 0);
    assert_eq!(store.load_all()?.len(), 3);
    Ok(())
  }

  #[test]
  fn reload_picks_up_store_changes_and_auto_selects() -> Result<()> {
    let temp = TempDir::new()?;
    let store = RecordStore::at(temp.path());

    let mut dashboard = Dashboard::load(&store);
    assert!(dashboard.records().is_empty());

    store.replace_all(&sample_collection())?;
    dashboard.reload(&store);

    assert_eq!(dashboard.records().len(), 3);
    assert_eq!(dashboard.selected_group(), Some("a.com"));
    assert_eq!(dashboard.selection(), ["r1".to_string()]);
    Ok(())
  }

  #[test]
  fn details_renders_source_and_markdown() {
    let dashboard = Dashboard::new(sample_collection());
    let details = dashboard.details("r2").unwrap();
    assert_eq!(details.source_url, "https://a.com/y");
    assert_eq!(details.markdown, "beta text");
    assert!(!details.when.is_empty());
  }
}
