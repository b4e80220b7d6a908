use anyhow::Result;
use arboard::Clipboard;

/// Plain-text clipboard write. Callers treat failure as non-fatal: log a
/// warning and fall back to printing the payload.
pub fn copy(text: &str) -> Result<()> {
  let mut clipboard = Clipboard::new()?;
  clipboard.set_text(text.to_string())?;
  Ok(())
}
