//! Selection-mode control: a two-state machine driven by explicit
//! enable/disable commands plus page input events. A qualifying click while
//! selecting yields exactly one capture request and drops back to idle, so
//! every activation captures at most once.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
  Idle,
  Selecting,
}

impl Default for SelectionState {
  fn default() -> Self {
    Self::Idle
  }
}

/// Border-box geometry of a page element, viewport-relative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
}

impl Rect {
  /// Document coordinates of a viewport-relative rect given the current
  /// scroll position.
  pub fn offset_by(self, scroll_x: f64, scroll_y: f64) -> Self {
    Self { x: self.x + scroll_x, y: self.y + scroll_y, ..self }
  }
}

/// The visual highlight that tracks the hovered element.
#[derive(Debug, Default)]
pub struct Overlay {
  rect: Option<Rect>,
}

impl Overlay {
  fn show_at(&mut self, rect: Rect) {
    self.rect = Some(rect);
  }

  fn hide(&mut self) {
    self.rect = None;
  }

  /// The rect currently covered, or `None` while hidden.
  pub fn visible_rect(&self) -> Option<Rect> {
    self.rect
  }
}

/// Input observed on the page while selection mode is active.
#[derive(Debug, Clone)]
pub enum PageEvent {
  PointerEnter { rect: Rect },
  PointerLeave,
  Click { target: ClickTarget },
}

/// What a qualifying click knows about the clicked element.
#[derive(Debug, Clone)]
pub struct ClickTarget {
  pub source_url: String,
  pub outer_html: String,
  pub element_path: String,
}

/// Handed to the capture pipeline after a qualifying click. The click's
/// default handling is considered suppressed once this exists.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
  pub source_url: String,
  pub outer_html: String,
  pub element_path: String,
}

#[derive(Debug, Default)]
pub struct SelectionController {
  state: SelectionState,
  overlay: Option<Overlay>,
}

impl SelectionController {
  pub fn new() -> Self {
    Self::default()
  }

  /// Attach the input observers and create the highlight overlay.
  pub fn enable(&mut self) {
    self.enable_with_overlay(Some(Overlay::default()));
  }

  /// Enable with an explicit overlay. `None` models overlay creation
  /// failing (document not ready); pointer handling then no-ops instead of
  /// erroring, while clicks still capture.
  pub fn enable_with_overlay(&mut self, overlay: Option<Overlay>) {
    self.state = SelectionState::Selecting;
    self.overlay = overlay;
  }

  /// Detach observers and remove the overlay.
  pub fn disable(&mut self) {
    self.state = SelectionState::Idle;
    self.overlay = None;
  }

  pub fn state(&self) -> SelectionState {
    self.state
  }

  pub fn is_selecting(&self) -> bool {
    self.state == SelectionState::Selecting
  }

  pub fn overlay_rect(&self) -> Option<Rect> {
    self.overlay.as_ref().and_then(Overlay::visible_rect)
  }

  /// Feed one page event through the controller. Returns a capture request
  /// exactly when a qualifying click happened while selecting; the
  /// controller disables itself immediately after dispatching it.
  pub fn handle_event(&mut self, event: PageEvent) -> Option<CaptureRequest> {
    if !self.is_selecting() {
      return None;
    }

    match event {
      PageEvent::PointerEnter { rect } => {
        if let Some(overlay) = &mut self.overlay {
          overlay.show_at(rect);
        }
        None
      }
      PageEvent::PointerLeave => {
        if let Some(overlay) = &mut self.overlay {
          overlay.hide();
        }
        None
      }
      PageEvent::Click { target } => {
        self.disable();
        Some(CaptureRequest {
          source_url: target.source_url,
          outer_html: target.outer_html,
          element_path: target.element_path,
        })
      }
    }
  }
}
