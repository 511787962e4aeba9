//! Line-oriented view for one-shot `--query` runs.

use std::io::Write;
use tracing::warn;

use crate::overlay::OverlayMount;
use crate::render::{Tile, TileAction};
use crate::view::View;

/// Writes each tile as it is appended; failures go to the error stream.
pub struct PlainView<W: Write, E: Write> {
  out: W,
  err: E,
}

impl<W: Write, E: Write> PlainView<W, E> {
  pub fn new(out: W, err: E) -> Self {
    Self { out, err }
  }

  fn write_tile(&mut self, tile: &Tile) -> std::io::Result<()> {
    let label = match tile.action {
      TileAction::OpenOverlay(_) => "URL",
      TileAction::Navigate(_) => "ChannelURL",
    };
    writeln!(self.out, "{}: {}", label, tile.href)?;
    writeln!(self.out, "Title: {}", tile.title)?;
    writeln!(self.out, "Description: {}", tile.description)?;
    writeln!(self.out, "Thumbnail: {}", tile.background)?;
    writeln!(self.out)
  }
}

impl<W: Write, E: Write> View for PlainView<W, E> {
  fn collapse_chrome(&mut self) {}

  fn clear_results(&mut self) {}

  fn append_tile(&mut self, tile: Tile) {
    if let Err(e) = self.write_tile(&tile) {
      warn!(err = %e, "print: failed to write result");
    }
  }

  fn set_loader_visible(&mut self, _visible: bool) {}

  fn notify_failure(&mut self, message: &str) {
    let _ = writeln!(self.err, "{}", message);
  }

  fn navigate(&mut self, url: &str) {
    let _ = writeln!(self.out, "{}", url);
  }

  fn scroll_offset(&self) -> usize {
    0
  }

  fn set_modal_active(&mut self, _active: bool) {}

  fn mount_overlay(&mut self, overlay: OverlayMount) {
    let _ = writeln!(self.out, "{}", overlay.player.src);
  }

  fn unmount_overlay(&mut self) {}
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::render::tile_for;
  use crate::results::{ResultKind, SearchResult};

  fn result(id: &str, kind: ResultKind, url: &str) -> SearchResult {
    SearchResult {
      id: id.to_string(),
      url: url.to_string(),
      title: format!("Title {}", id),
      description: format!("About {}", id),
      thumbnail: format!("https://img/{}.jpg", id),
      kind,
    }
  }

  #[test]
  fn prints_video_and_channel_links() {
    let mut view = PlainView::new(Vec::new(), Vec::new());
    view.append_tile(tile_for(&result("v1", ResultKind::Video, "https://youtube.com/watch?v=v1")));
    view.append_tile(tile_for(&result("c1", ResultKind::Channel, "https://youtube.com/channel/c1")));

    let out = String::from_utf8(view.out.clone()).unwrap();
    assert_eq!(
      out,
      "URL: https://youtube.com/watch?v=v1\nTitle: Title v1\nDescription: About v1\nThumbnail: https://img/v1.jpg\n\n\
       ChannelURL: https://youtube.com/channel/c1\nTitle: Title c1\nDescription: About c1\nThumbnail: https://img/c1.jpg\n\n"
    );
  }

  #[test]
  fn missing_description_prints_unknown() {
    let value = serde_json::json!([{ "Items": [
      { "id": { "videoId": "v1" }, "snippet": { "title": "Lofi", "thumbnails": { "high": { "url": "https://img/h.jpg" } } } }
    ] }]);
    let results = crate::results::normalize_value(value).unwrap();
    let mut view = PlainView::new(Vec::new(), Vec::new());
    crate::render::render(&mut view, &results);

    let out = String::from_utf8(view.out).unwrap();
    assert!(out.contains("Title: Lofi\nDescription: Unknown\n"));
    assert!(view.err.is_empty());
  }

  #[test]
  fn failure_goes_to_error_stream() {
    let mut view = PlainView::new(Vec::new(), Vec::new());
    view.notify_failure("Something went wrong.");
    assert!(view.out.is_empty());
    assert_eq!(String::from_utf8(view.err.clone()).unwrap(), "Something went wrong.\n");
  }
}
