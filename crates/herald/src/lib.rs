//! Herald - leveled diagnostic logging for the snipmark tools
//!
//! Everything goes to stderr so command output on stdout stays clean and
//! pipeable. Levels: `info`, `warn`, `error`, `debug`, `success`, plus
//! timestamped `event_*` variants for things that happen over time
//! (store writes, clipboard handoffs).

use chrono::Local;
use colored::*;

/// Core output function; splits multi-line messages so every line
/// carries its own prefix.
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

fn prefixed(color: Color, tag: &str, message: &str) {
  let prefix = format!("[{}]", tag.color(color).bold());
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// General information
pub fn info(message: &str) {
  prefixed(Color::Blue, "info", message);
}

/// Something needs attention but the operation continues
pub fn warn(message: &str) {
  prefixed(Color::Yellow, "warn", message);
}

/// Something went wrong
pub fn error(message: &str) {
  prefixed(Color::Red, "error", message);
}

/// Detailed diagnostics
pub fn debug(message: &str) {
  prefixed(Color::Magenta, "debug", message);
}

/// An operation completed successfully
pub fn success(message: &str) {
  prefixed(Color::Green, "ok", message);
}

fn event(color: Color, message: &str) {
  let timestamp = Local::now().format("%H:%M:%S").to_string();
  let prefix = format!("[{}] [{}]", "event".color(color).bold(), timestamp.cyan());
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// Timestamped info event
pub fn event_info(message: &str) {
  event(Color::Blue, message);
}

/// Timestamped warning event
pub fn event_warn(message: &str) {
  event(Color::Yellow, message);
}

/// Timestamped error event
pub fn event_error(message: &str) {
  event(Color::Red, message);
}

/// Timestamped success event
pub fn event_success(message: &str) {
  event(Color::Green, message);
}

/// A horizontal rule of `length` copies of `ch`
pub fn banner_line(length: usize, ch: char) -> String {
  ch.to_string().repeat(length)
}

/// Wrap a message between two banner lines
pub fn as_banner<F>(log_fn: F, message: &str, width: usize, border: char)
where
  F: Fn(&str),
{
  let banner = banner_line(width, border);
  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

/// Banner-wrapped announcement for session-level milestones
pub fn announce(message: &str) {
  as_banner(|msg| log(&msg.blue().bold().to_string()), message, 50, '-');
}
