use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, Focus};
use crate::transport::Transport;

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event<T: Transport>(app: &mut App<T>, key: KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  // While the overlay is up the background is the only target; Enter or
  // Space "click" it. There is deliberately no Esc binding.
  if app.overlay.is_open() {
    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
      app.background_click();
    }
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
    app.next_theme();
    return;
  }

  match app.focus {
    Focus::Input => handle_input_key(app, key),
    Focus::Results => handle_results_key(app, key),
  }
}

fn handle_input_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.trigger_search();
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
      app.input.insert(byte_idx, c);
      app.cursor_position += 1;
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.input.chars().count() {
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.input.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.input.chars().count();
    }
    KeyCode::Esc => {
      if !app.input.is_empty() {
        app.input.clear();
        app.cursor_position = 0;
        app.input_scroll = 0;
      } else if !app.screen.tiles.is_empty() {
        app.focus = Focus::Results;
      } else {
        app.should_quit = true;
      }
    }
    KeyCode::Down | KeyCode::Tab => {
      if !app.screen.tiles.is_empty() {
        app.focus = Focus::Results;
      }
    }
    _ => {}
  }
}

fn handle_results_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.activate_selected();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.screen.select_next();
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.screen.select_previous();
    }
    KeyCode::Esc | KeyCode::Tab | KeyCode::Char('/') => {
      app.focus = Focus::Input;
    }
    _ => {}
  }
}

pub fn handle_mouse_event<T: Transport>(app: &mut App<T>, mouse: MouseEvent) {
  if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
    return;
  }
  if app.overlay.is_open() {
    app.background_click();
    return;
  }
  if let Some(index) = app.tile_at(mouse.column, mouse.row) {
    app.focus = Focus::Results;
    app.screen.list_state.select(Some(index));
    app.activate_selected();
  }
}
