//! Inline player overlay: a single modal owned by one controller.
//!
//! `open` is only valid while closed; a click on the background is the only
//! way back to closed.

use thiserror::Error;
use tracing::{info, warn};

use crate::constants::constants;
use crate::view::View;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
  #[default]
  Closed,
  Open {
    video_id: String,
  },
}

/// The embedded player inside the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPlayer {
  pub src: String,
  pub width: u32,
  pub height: u32,
  pub allow: String,
  pub allow_fullscreen: bool,
}

/// Everything a view needs to mount the background and modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayMount {
  pub video_id: String,
  /// Vertical offset, pinned to the scroll position at open time.
  pub top: usize,
  pub loader_glyph: String,
  pub player: EmbeddedPlayer,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
  #[error("overlay already open for video {0}")]
  AlreadyOpen(String),
}

pub fn embed_url(video_id: &str) -> String {
  format!("{}{}", constants().embed_base, video_id)
}

#[derive(Debug, Default)]
pub struct InlinePlayer {
  state: OverlayState,
}

impl InlinePlayer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_open(&self) -> bool {
    matches!(self.state, OverlayState::Open { .. })
  }

  pub fn open(&mut self, view: &mut impl View, video_id: &str) -> Result<(), OverlayError> {
    if let OverlayState::Open { video_id: current } = &self.state {
      warn!(current = %current, requested = video_id, "overlay: open while already open");
      return Err(OverlayError::AlreadyOpen(current.clone()));
    }

    let c = constants();
    let mount = OverlayMount {
      video_id: video_id.to_string(),
      top: view.scroll_offset(),
      loader_glyph: c.loader_glyph.clone(),
      player: EmbeddedPlayer {
        src: embed_url(video_id),
        width: c.embed_width,
        height: c.embed_height,
        allow: c.embed_allow.clone(),
        allow_fullscreen: true,
      },
    };

    info!(video_id, top = mount.top, "overlay: open");
    view.set_modal_active(true);
    view.mount_overlay(mount);
    self.state = OverlayState::Open { video_id: video_id.to_string() };
    Ok(())
  }

  /// Click on the background. Returns whether an overlay was torn down.
  pub fn background_click(&mut self, view: &mut impl View) -> bool {
    match std::mem::take(&mut self.state) {
      OverlayState::Open { video_id } => {
        info!(video_id = %video_id, "overlay: close");
        view.unmount_overlay();
        view.set_modal_active(false);
        true
      }
      OverlayState::Closed => false,
    }
  }
}
