//! Snipmark - Page Element Capture and Snippet Dashboard
//!
//! Captures a chosen element from an HTML document, converts it to Markdown,
//! appends it to a single local record collection, and exposes a dashboard
//! query engine for grouping, search, multi-select, export and deletion.

pub mod capture;
pub mod clipboard;
pub mod commands;
pub mod convert;
pub mod page;
pub mod query;
pub mod record;
pub mod selection;
pub mod session;
pub mod store;
