//! The mount points the search core drives.
//!
//! The core never touches widgets or stdout directly: it issues these
//! commands and the terminal screen or the plain printer realise them.

use crate::overlay::OverlayMount;
use crate::render::Tile;

pub trait View {
  /// Collapse the search chrome. Collapsing twice must equal collapsing once.
  fn collapse_chrome(&mut self);
  fn clear_results(&mut self);
  fn append_tile(&mut self, tile: Tile);
  fn set_loader_visible(&mut self, visible: bool);
  /// Generic, user-visible failure notice.
  fn notify_failure(&mut self, message: &str);
  /// Follow a link normally (channel tiles).
  fn navigate(&mut self, url: &str);
  /// Current vertical scroll position, used to pin the overlay.
  fn scroll_offset(&self) -> usize;
  fn set_modal_active(&mut self, active: bool);
  fn mount_overlay(&mut self, overlay: OverlayMount);
  fn unmount_overlay(&mut self);
}
