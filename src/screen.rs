//! Terminal-side realisation of the view: the state `ui.rs` draws from.

use ratatui::widgets::ListState;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::overlay::OverlayMount;
use crate::player::{ExternalPlayer, open_in_browser};
use crate::render::Tile;
use crate::view::View;

/// Notices clear themselves after this long.
const NOTICE_TTL: Duration = Duration::from_secs(5);

pub struct Screen {
  pub chrome_collapsed: bool,
  pub tiles: Vec<Tile>,
  pub list_state: ListState,
  pub loader_visible: bool,
  pub notice: Option<String>,
  notice_time: Option<Instant>,
  pub modal_active: bool,
  pub overlay: Option<OverlayMount>,
  pub player: ExternalPlayer,
}

impl Screen {
  pub fn new(player: ExternalPlayer) -> Self {
    Self {
      chrome_collapsed: false,
      tiles: Vec::new(),
      list_state: ListState::default(),
      loader_visible: false,
      notice: None,
      notice_time: None,
      modal_active: false,
      overlay: None,
      player,
    }
  }

  pub fn set_notice(&mut self, msg: impl Into<String>) {
    self.notice = Some(msg.into());
    self.notice_time = Some(Instant::now());
  }

  pub fn clear_notice(&mut self) {
    self.notice = None;
    self.notice_time = None;
  }

  pub fn expire_notice(&mut self) {
    if let Some(t) = self.notice_time
      && t.elapsed() >= NOTICE_TTL
    {
      self.clear_notice();
    }
  }

  pub fn selected_tile(&self) -> Option<&Tile> {
    self.list_state.selected().and_then(|i| self.tiles.get(i))
  }

  pub fn select_next(&mut self) {
    let count = self.tiles.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
      self.list_state.select(Some(i));
    }
  }

  pub fn select_previous(&mut self) {
    let count = self.tiles.len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.list_state.select(Some(i));
    }
  }
}

impl View for Screen {
  fn collapse_chrome(&mut self) {
    self.chrome_collapsed = true;
  }

  fn clear_results(&mut self) {
    self.tiles.clear();
    self.list_state = ListState::default();
  }

  fn append_tile(&mut self, tile: Tile) {
    self.tiles.push(tile);
    if self.list_state.selected().is_none() {
      self.list_state.select(Some(0));
    }
  }

  fn set_loader_visible(&mut self, visible: bool) {
    self.loader_visible = visible;
  }

  fn notify_failure(&mut self, message: &str) {
    self.set_notice(message);
  }

  fn navigate(&mut self, url: &str) {
    if let Err(e) = open_in_browser(url) {
      warn!(err = %e, url, "navigate: failed to open browser");
      self.set_notice(format!("Failed to open browser: {}", e));
    }
  }

  fn scroll_offset(&self) -> usize {
    self.list_state.offset()
  }

  fn set_modal_active(&mut self, active: bool) {
    self.modal_active = active;
  }

  fn mount_overlay(&mut self, overlay: OverlayMount) {
    if let Err(e) = self.player.start(&overlay.player.src) {
      let err = format!("{:#}", e);
      warn!(err = %err, "overlay: external player unavailable");
    }
    self.overlay = Some(overlay);
  }

  fn unmount_overlay(&mut self) {
    self.player.stop();
    self.overlay = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::overlay::InlinePlayer;
  use crate::render::{render, tile_for};
  use crate::results::{ResultKind, SearchResult};

  fn screen() -> Screen {
    Screen::new(ExternalPlayer::new(None))
  }

  fn result(id: &str) -> SearchResult {
    SearchResult {
      id: id.to_string(),
      url: format!("https://youtube.com/watch?v={}", id),
      title: id.to_string(),
      description: "Unknown".to_string(),
      thumbnail: format!("https://img/{}.jpg", id),
      kind: ResultKind::Video,
    }
  }

  #[test]
  fn collapse_is_idempotent() {
    let mut once = screen();
    once.collapse_chrome();
    let mut twice = screen();
    twice.collapse_chrome();
    twice.collapse_chrome();
    assert_eq!(once.chrome_collapsed, twice.chrome_collapsed);
    assert!(twice.chrome_collapsed);
  }

  #[test]
  fn replace_keeps_only_new_tiles_and_resets_selection() {
    let mut s = screen();
    render(&mut s, &[result("a"), result("b"), result("c")]);
    s.select_next();
    s.select_next();
    assert_eq!(s.list_state.selected(), Some(2));

    render(&mut s, &[result("x")]);
    assert_eq!(s.tiles, vec![tile_for(&result("x"))]);
    assert_eq!(s.list_state.selected(), Some(0));
  }

  #[test]
  fn selection_wraps() {
    let mut s = screen();
    render(&mut s, &[result("a"), result("b")]);
    s.select_previous();
    assert_eq!(s.selected_tile().unwrap().title, "b");
    s.select_next();
    assert_eq!(s.selected_tile().unwrap().title, "a");
  }

  #[test]
  fn overlay_round_trip_leaves_nothing_mounted() {
    let mut s = screen();
    let mut overlay = InlinePlayer::new();
    overlay.open(&mut s, "abc123").unwrap();
    assert!(s.modal_active);
    assert_eq!(s.overlay.as_ref().unwrap().video_id, "abc123");

    overlay.background_click(&mut s);
    assert!(s.overlay.is_none());
    assert!(!s.modal_active);
    assert!(!s.player.is_running());
  }

  #[test]
  fn failure_sets_notice() {
    let mut s = screen();
    s.notify_failure("Something went wrong.");
    assert_eq!(s.notice.as_deref(), Some("Something went wrong."));
    s.expire_notice();
    assert!(s.notice.is_some());
    s.clear_notice();
    assert!(s.notice.is_none());
  }
}
