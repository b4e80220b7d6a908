use serde::{Deserialize, Serialize};

use crate::capture;
use crate::selection::{ClickTarget, PageEvent, SelectionController};
use crate::store::RecordStore;

/// Typed messages the session controller consumes. Each one elicits exactly
/// one [`Ack`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
  /// Flip selection mode to the carried state.
  ToggleSelectionMode { enabled: bool },
  /// Ask for the current selection-mode state.
  RequestSelectionModeStatus,
  /// A qualifying click happened; run the capture pipeline.
  ElementCaptured {
    source_url: String,
    element_path: String,
    element_html: String,
    #[serde(default)]
    tags: Vec<String>,
  },
  /// Open or focus the dashboard surface.
  OpenDashboard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Ack {
  SelectionModeUpdated { enabled: bool },
  SelectionModeStatus { enabled: bool },
  Captured { record_id: String },
  DashboardOpened,
  Error { message: String },
}

/// Broadcasts pushed to subscribers without a reply: selection-mode state
/// changes and store-changed notifications (the dashboard reload hook).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Notice {
  SelectionModeStatus { enabled: bool },
  StoreChanged,
}

/// Owns the session-scoped selection-mode state and routes messages between
/// the page-facing selection controller, the capture pipeline and any
/// subscribed dashboard surfaces. The enabled flag lives here, never as
/// ambient global state, and starts disabled for every new session.
pub struct SessionController {
  store: RecordStore,
  selection: SelectionController,
  subscribers: Vec<Box<dyn Fn(&Notice)>>,
}

impl SessionController {
  pub fn new(store: RecordStore) -> Self {
    Self { store, selection: SelectionController::new(), subscribers: Vec::new() }
  }

  /// Register a change-notification callback (e.g. a dashboard reload).
  pub fn subscribe(&mut self, subscriber: impl Fn(&Notice) + 'static) {
    self.subscribers.push(Box::new(subscriber));
  }

  pub fn selection_enabled(&self) -> bool {
    self.selection.is_selecting()
  }

  pub fn store(&self) -> &RecordStore {
    &self.store
  }

  /// Forward a pointer event to the selection controller so the highlight
  /// overlay tracks the hovered element. Clicks go through
  /// [`Message::ElementCaptured`] instead.
  pub fn track_pointer(&mut self, event: PageEvent) {
    if matches!(event, PageEvent::Click { .. }) {
      return;
    }
    self.selection.handle_event(event);
  }

  fn broadcast(&self, notice: &Notice) {
    for subscriber in &self.subscribers {
      subscriber(notice);
    }
  }

  /// Handle one message and produce its single acknowledgement.
  pub fn dispatch(&mut self, message: Message) -> Ack {
    match message {
      Message::ToggleSelectionMode { enabled } => {
        if enabled {
          self.selection.enable();
        } else {
          self.selection.disable();
        }
        self.broadcast(&Notice::SelectionModeStatus { enabled });
        Ack::SelectionModeUpdated { enabled }
      }

      Message::RequestSelectionModeStatus => {
        Ack::SelectionModeStatus { enabled: self.selection.is_selecting() }
      }

      Message::ElementCaptured { source_url, element_path, element_html, tags } => {
        let target =
          ClickTarget { source_url, outer_html: element_html, element_path };
        let Some(request) = self.selection.handle_event(PageEvent::Click { target }) else {
          return Ack::Error { message: "selection mode is not enabled".to_string() };
        };

        match capture::capture_request(&self.store, &request, tags) {
          Ok(record) => {
            // single-shot: the controller already dropped back to idle
            self.broadcast(&Notice::SelectionModeStatus { enabled: false });
            self.broadcast(&Notice::StoreChanged);
            Ack::Captured { record_id: record.id }
          }
          Err(e) => {
            herald::error(&format!("Capture failed: {e}"));
            Ack::Error { message: e.to_string() }
          }
        }
      }

      Message::OpenDashboard => Ack::DashboardOpened,
    }
  }
}
