use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, LinkStyle, Options};
use htmd::HtmlToMarkdown;

/// Convert captured markup to Markdown.
///
/// Total: malformed markup never surfaces an error to callers. When the
/// semantic converter rejects the input we degrade to plain tag stripping
/// and log a warning.
pub fn to_markdown(html: &str) -> String {
  let converter = HtmlToMarkdown::builder()
    .skip_tags(vec!["script", "style"])
    .options(Options {
      heading_style: HeadingStyle::Atx,
      code_block_style: CodeBlockStyle::Fenced,
      bullet_list_marker: BulletListMarker::Dash,
      link_style: LinkStyle::Inlined,
      preformatted_code: true,
      ..Default::default()
    })
    .build();

  match converter.convert(html) {
    Ok(markdown) => collapse_blank_runs(markdown.trim()).trim().to_string(),
    Err(e) => {
      herald::warn(&format!("Markdown conversion failed, falling back to tag stripping: {e}"));
      strip_tags(html)
    }
  }
}

/// Plain conversion variant: line breaks and block boundaries become
/// newlines, every remaining tag is stripped, common entities are decoded,
/// horizontal whitespace runs collapse to a single space and 3+ consecutive
/// newlines collapse to two.
pub fn strip_tags(html: &str) -> String {
  let mut out = String::with_capacity(html.len());
  let mut chars = html.char_indices();

  while let Some((start, ch)) = chars.next() {
    if ch != '<' {
      out.push(ch);
      continue;
    }

    // Scan to the closing '>'. An unterminated tag swallows the rest of
    // the input rather than leaking partial markup into the output.
    let mut end = html.len();
    for (i, c) in chars.by_ref() {
      if c == '>' {
        end = i;
        break;
      }
    }
    let tag = &html[start + 1..end.min(html.len())];
    out.push_str(tag_replacement(tag));
  }

  let decoded = decode_entities(&out);
  collapse_blank_runs(&collapse_horizontal(&decoded)).trim().to_string()
}

/// Newline convention for a stripped tag: `<br>` is a line break, closing
/// block-level tags are paragraph boundaries, everything else vanishes.
fn tag_replacement(tag: &str) -> &'static str {
  let name = tag
    .trim_start_matches('/')
    .split(|c: char| c.is_whitespace() || c == '/')
    .next()
    .unwrap_or("")
    .to_ascii_lowercase();

  if name == "br" {
    return "\n";
  }

  let closing = tag.starts_with('/');
  let block = matches!(
    name.as_str(),
    "p" | "div" | "li" | "tr" | "ul" | "ol" | "blockquote" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
  );

  if closing && block {
    "\n\n"
  } else {
    ""
  }
}

fn decode_entities(text: &str) -> String {
  text
    .replace("&nbsp;", " ")
    .replace("&lt;", "<")
    .replace("&gt;", ">")
    .replace("&quot;", "\"")
    .replace("&#039;", "'")
    .replace("&#39;", "'")
    .replace("&apos;", "'")
    .replace("&amp;", "&")
}

/// Collapse runs of spaces and tabs to a single space, preserving newlines.
fn collapse_horizontal(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut in_run = false;
  for ch in text.chars() {
    if ch == ' ' || ch == '\t' {
      if !in_run {
        out.push(' ');
        in_run = true;
      }
    } else {
      out.push(ch);
      in_run = false;
    }
  }
  out
}

/// Collapse 3+ consecutive newlines (ignoring blank-line whitespace) to two.
fn collapse_blank_runs(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut blank_streak = 0usize;
  for line in text.lines() {
    if line.trim().is_empty() {
      blank_streak += 1;
      if blank_streak > 1 {
        continue;
      }
      out.push('\n');
    } else {
      blank_streak = 0;
      if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
      }
      out.push_str(line);
      out.push('\n');
    }
  }
  if !text.ends_with('\n') && out.ends_with('\n') {
    out.pop();
  }
  out
}
