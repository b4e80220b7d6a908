use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
  #[error("invalid selector `{0}`")]
  InvalidSelector(String),
  #[error("no element matches selector `{0}`")]
  NoMatch(String),
}

/// The raw material a qualifying click hands to the capture pipeline.
#[derive(Debug, Clone)]
pub struct ExtractedElement {
  /// Outer markup of the element, serialized as found in the document.
  pub outer_html: String,
  /// Structural locator of the element (see [`selector_path`]).
  pub element_path: String,
}

/// Find the first element matching `selector` in `document_html` and return
/// its outer markup plus its structural path.
pub fn extract(document_html: &str, selector: &str) -> Result<ExtractedElement, PageError> {
  let document = Html::parse_document(document_html);
  let parsed =
    Selector::parse(selector).map_err(|_| PageError::InvalidSelector(selector.to_string()))?;

  let element = document
    .select(&parsed)
    .next()
    .ok_or_else(|| PageError::NoMatch(selector.to_string()))?;

  Ok(ExtractedElement { outer_html: element.html(), element_path: selector_path(element) })
}

/// Build a (somewhat) unique selector path for the element: for every
/// ancestor, tag name plus `#id` (or `.class1.class2` when there is no id)
/// plus `:nth-child(index)` among element siblings, joined root-to-leaf
/// with `>`. Best-effort only; dynamic pages can defeat it.
pub fn selector_path(element: ElementRef<'_>) -> String {
  let mut segments = Vec::new();
  let mut current = Some(element);

  while let Some(el) = current {
    let mut segment = el.value().name().to_ascii_lowercase();

    if let Some(id) = el.value().attr("id").filter(|id| !id.is_empty()) {
      segment.push('#');
      segment.push_str(id);
    } else if let Some(class) = el.value().attr("class") {
      let classes: Vec<&str> = class.split_whitespace().collect();
      if !classes.is_empty() {
        segment.push('.');
        segment.push_str(&classes.join("."));
      }
    }

    let index = el.prev_siblings().filter(|n| n.value().is_element()).count() + 1;
    segment.push_str(&format!(":nth-child({index})"));

    segments.push(segment);
    current = el.parent().and_then(ElementRef::wrap);
  }

  segments.reverse();
  segments.join(">")
}
