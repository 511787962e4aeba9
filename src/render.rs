use tracing::debug;

use crate::overlay::{InlinePlayer, OverlayError};
use crate::results::{ResultKind, SearchResult};
use crate::view::View;

/// What activating a tile does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileAction {
  /// Follow the link.
  Navigate(String),
  /// Navigation is suppressed and the inline player opens for this video id.
  OpenOverlay(String),
}

/// Declarative description of one rendered result entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
  pub href: String,
  /// Background image URL.
  pub background: String,
  pub title: String,
  pub description: String,
  pub kind: ResultKind,
  pub action: TileAction,
}

pub fn tile_for(result: &SearchResult) -> Tile {
  let action = match result.kind {
    ResultKind::Video => TileAction::OpenOverlay(result.id.clone()),
    ResultKind::Channel => TileAction::Navigate(result.url.clone()),
  };
  Tile {
    href: result.url.clone(),
    background: result.thumbnail.clone(),
    title: result.title.clone(),
    description: result.description.clone(),
    kind: result.kind,
    action,
  }
}

/// Replace whatever is displayed with `results`, in order.
pub fn render(view: &mut impl View, results: &[SearchResult]) {
  view.clear_results();
  for result in results {
    view.append_tile(tile_for(result));
  }
  debug!(count = results.len(), "render: result list replaced");
}

/// A click on a tile: video tiles open the overlay in place of following the
/// link, channel tiles navigate.
pub fn activate(tile: &Tile, overlay: &mut InlinePlayer, view: &mut impl View) -> Result<(), OverlayError> {
  match &tile.action {
    TileAction::OpenOverlay(video_id) => overlay.open(view, video_id),
    TileAction::Navigate(url) => {
      view.navigate(url);
      Ok(())
    }
  }
}
