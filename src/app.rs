use ratatui::layout::Rect;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::display::DisplayMode;
use crate::overlay::InlinePlayer;
use crate::player::ExternalPlayer;
use crate::render::activate;
use crate::screen::Screen;
use crate::session::{SearchSession, SubmitOutcome};
use crate::theme::{THEMES, Theme, theme_index};
use crate::thumbnails::ThumbnailCache;
use crate::transport::Transport;

/// Which part of the screen receives key presses when no overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Input,
  Results,
}

pub struct App<T: Transport> {
  pub input: String,
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub focus: Focus,
  pub theme_index: usize,
  pub display_mode: DisplayMode,
  pub screen: Screen,
  pub session: SearchSession<T>,
  pub overlay: InlinePlayer,
  pub thumbnails: ThumbnailCache,
  /// Where the results list was last drawn, for mouse hit-testing.
  pub results_area: Option<Rect>,
  pub should_quit: bool,
  http_client: Client,
  config: Config,
}

impl<T: Transport> App<T> {
  pub fn new(session: SearchSession<T>, config: Config, display_mode: DisplayMode) -> Self {
    let theme_index = config.theme_name.as_deref().and_then(theme_index).unwrap_or(0);
    let player = ExternalPlayer::new(config.resolve_player_command());
    Self {
      input: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      focus: Focus::Input,
      theme_index,
      display_mode,
      screen: Screen::new(player),
      session,
      overlay: InlinePlayer::new(),
      thumbnails: ThumbnailCache::default(),
      results_area: None,
      should_quit: false,
      http_client: Client::new(),
      config,
    }
  }

  pub fn theme(&self) -> &'static Theme {
    // theme_index is only ever set from position() or modular arithmetic over THEMES.
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.config.theme_name = Some(self.theme().name.to_string());
    self.config.save();
  }

  /// Submit the current input. A submit while a search is in flight is dropped.
  pub fn trigger_search(&mut self) {
    self.screen.clear_notice();
    match self.session.submit(&self.input, &mut self.screen) {
      SubmitOutcome::Started => {
        self.thumbnails.reset();
      }
      SubmitOutcome::Rejected => {
        debug!("search already in flight; submit dropped");
      }
      SubmitOutcome::EmptyQuery => {
        self.screen.set_notice("Enter a search term.");
      }
    }
  }

  /// Non-blocking bookkeeping run once per UI tick.
  pub fn check_pending(&mut self) {
    if let Some(outcome) = self.session.poll(&mut self.screen)
      && let Ok(count) = outcome
    {
      if count > 0 {
        self.focus = Focus::Results;
        let urls: Vec<String> = self.screen.tiles.iter().map(|t| t.background.clone()).collect();
        self.thumbnails.prefetch(&self.http_client, urls.iter().map(String::as_str));
      } else {
        self.screen.set_notice("No results found.");
      }
    }
    self.thumbnails.drain();
    self.screen.expire_notice();
  }

  /// Click on the selected tile.
  pub fn activate_selected(&mut self) {
    let Some(tile) = self.screen.selected_tile().cloned() else { return };
    info!(title = %tile.title, kind = tile.kind.label(), "tile activated");
    if let Err(e) = activate(&tile, &mut self.overlay, &mut self.screen) {
      warn!(err = %e, "tile activation ignored");
    }
  }

  /// Click anywhere on the overlay background.
  pub fn background_click(&mut self) {
    self.overlay.background_click(&mut self.screen);
  }

  /// Map a terminal row inside the drawn results list to a tile index.
  pub fn tile_at(&self, column: u16, row: u16) -> Option<usize> {
    let area = self.results_area?;
    // Rows inside the border.
    if column <= area.x || column >= area.right().saturating_sub(1) {
      return None;
    }
    if row <= area.y || row >= area.bottom().saturating_sub(1) {
      return None;
    }
    let index = self.screen.list_state.offset() + usize::from(row - area.y - 1);
    (index < self.screen.tiles.len()).then_some(index)
  }

  /// Stop anything the overlay started before the terminal is restored.
  pub fn shutdown(&mut self) {
    self.background_click();
    self.thumbnails.reset();
  }
}
