//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so the backend address and
//! the embed parameters are fixed at build time. Parsed once on first access
//! via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  // Backend
  pub search_endpoint: String,
  pub max_per_page: u32,

  // Link construction
  pub site_base: String,
  pub embed_base: String,
  pub embed_width: u32,
  pub embed_height: u32,
  pub embed_allow: String,

  // User-facing text
  pub failure_notice: String,
  pub loader_glyph: String,

  pub thumbnail_concurrency: usize,
  pub player_command: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
