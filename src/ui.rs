use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Flex, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::graphics::ThumbnailWidget;
use crate::overlay::OverlayMount;
use crate::results::ResultKind;
use crate::theme::Theme;
use crate::transport::Transport;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Horizontal scroll that keeps the cursor column visible in `inner_w`
/// columns. Never exceeds `cursor_col`.
fn input_scroll_for(cursor_col: usize, scroll: usize, inner_w: usize) -> usize {
  if inner_w == 0 || cursor_col < scroll {
    cursor_col
  } else if cursor_col >= scroll + inner_w {
    cursor_col - inner_w + 1
  } else {
    scroll
  }
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn rounded(theme: &Theme) -> Block<'static> {
  Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(theme.border))
}

// --- UI Rendering ---

pub fn ui<T: Transport>(frame: &mut Frame, app: &mut App<T>) {
  let theme = app.theme();
  app.results_area = None;

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, body_area, status_area, footer_area] =
    Layout::vertical([Constraint::Length(1), Constraint::Min(5), Constraint::Length(1), Constraint::Length(1)])
      .areas(frame.area());

  render_header(frame, theme, header_area);
  if app.screen.chrome_collapsed {
    let [input_area, results_area] =
      Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(body_area);
    render_input(frame, app, input_area);
    render_results(frame, app, results_area);
  } else {
    render_expanded_chrome(frame, app, body_area);
  }
  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);

  if let Some(mount) = app.screen.overlay.clone() {
    // Keep the list anchored where it was when the overlay opened.
    *app.screen.list_state.offset_mut() = mount.top;
    render_overlay(frame, app, &mount);
  }
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(" ▶ mediasearch ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

/// Before the first search the chrome owns the whole body.
fn render_expanded_chrome<T: Transport>(frame: &mut Frame, app: &mut App<T>, area: Rect) {
  let theme = app.theme();
  let [column] = Layout::horizontal([Constraint::Percentage(70)]).flex(Flex::Center).areas(area);
  let [intro_area, input_area] =
    Layout::vertical([Constraint::Length(4), Constraint::Length(3)]).flex(Flex::Center).areas(column);

  let intro = vec![
    Line::from(Span::styled("Search videos and channels", Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled("Type a query and press Enter.", Style::default().fg(theme.muted))),
  ];
  frame.render_widget(Paragraph::new(intro).alignment(Alignment::Center), intro_area);
  render_input(frame, app, input_area);
}

fn render_input<T: Transport>(frame: &mut Frame, app: &mut App<T>, area: Rect) {
  let theme = app.theme();
  let focused = app.focus == Focus::Input && !app.overlay.is_open();
  let border_color = if focused { theme.accent } else { theme.border };
  let input_block = Block::bordered()
    .title(" Search ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.input, app.cursor_position);

  app.input_scroll = input_scroll_for(cursor_col, app.input_scroll, inner_w);

  let visible: String = app
    .input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  frame.render_widget(Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block), area);

  if focused {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_results<T: Transport>(frame: &mut Frame, app: &mut App<T>, area: Rect) {
  let theme = app.theme();
  let [list_area, preview_area] =
    Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)]).areas(area);

  // Inner width: minus 2 borders, 2 for the highlight symbol, 10 for the badge.
  let inner_w = list_area.width.saturating_sub(14) as usize;
  let selected = app.screen.list_state.selected();

  let items: Vec<ListItem> = app
    .screen
    .tiles
    .iter()
    .enumerate()
    .map(|(i, tile)| {
      let is_selected = Some(i) == selected;
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };
      let badge = match tile.kind {
        ResultKind::Video => "▶ video  ",
        ResultKind::Channel => "◉ channel",
      };
      let line = Line::from(vec![
        Span::styled(format!("{} ", badge), Style::default().fg(if is_selected { fg } else { theme.muted })),
        Span::styled(truncate_str(&tile.title, inner_w), Style::default().fg(fg)),
      ]);
      ListItem::new(line).style(Style::default().bg(bg))
    })
    .collect();

  let border_color = if app.focus == Focus::Results { theme.accent } else { theme.border };
  let list = List::new(items)
    .block(
      rounded(theme)
        .title(format!(" Results ({}) ", app.screen.tiles.len()))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(border_color)),
    )
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, list_area, &mut app.screen.list_state);
  app.results_area = Some(list_area);

  render_preview(frame, app, preview_area);
}

/// The selected tile: background image, title and link target.
fn render_preview<T: Transport>(frame: &mut Frame, app: &mut App<T>, area: Rect) {
  let theme = app.theme();
  let block = rounded(theme).title(" Preview ").padding(Padding::horizontal(1));
  let inner = block.inner(area);
  frame.render_widget(block, area);

  let Some(tile) = app.screen.selected_tile().cloned() else { return };
  let [image_area, text_area] = Layout::vertical([Constraint::Percentage(60), Constraint::Min(4)]).areas(inner);

  let mode = app.display_mode;
  match app.thumbnails.fitted(&tile.background, image_area, mode) {
    Some(image) => frame.render_widget(ThumbnailWidget { image, display_mode: mode }, image_area),
    None => frame.render_widget(
      Paragraph::new(Span::styled("loading preview…", Style::default().fg(theme.muted))).alignment(Alignment::Center),
      image_area,
    ),
  }

  let text_w = text_area.width as usize;
  let hint = match tile.kind {
    ResultKind::Video => "Enter: play inline",
    ResultKind::Channel => "Enter: open in browser",
  };
  let lines = vec![
    Line::from(""),
    Line::from(Span::styled(tile.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(Span::styled(
      truncate_str(&tile.href, text_w),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
    Line::from(Span::styled(hint, Style::default().fg(theme.muted))),
    Line::from(""),
    Line::from(Span::styled(tile.description.clone(), Style::default().fg(theme.fg))),
  ];
  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), text_area);
}

fn render_status<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
  let theme = app.theme();
  let (text, style) = if app.screen.loader_visible {
    (" ⏳ Searching…".to_string(), Style::default().fg(theme.status))
  } else if let Some(notice) = &app.screen.notice {
    (format!(" ⚠  {}", notice), Style::default().fg(theme.error))
  } else if let Some(program) = app.screen.player.program().filter(|_| app.screen.player.is_running()) {
    (format!(" ♪ playing in {}", program), Style::default().fg(theme.status))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_footer<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
  let theme = app.theme();
  let has_results = !app.screen.tiles.is_empty();
  let keys: Vec<(&str, &str)> = if app.overlay.is_open() {
    vec![("Enter", "Close player"), ("Click", "Close player")]
  } else {
    match app.focus {
      Focus::Input => {
        let mut k = vec![("Enter", "Search"), ("^t", "Theme")];
        if has_results {
          k.push(("↓", "Results"));
        } else {
          k.push(("Esc", "Quit"));
        }
        k
      }
      Focus::Results => vec![("Enter", "Open"), ("j/k", "Navigate"), ("/", "Search"), ("^t", "Theme")],
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} · {} ", theme.name, app.display_mode.label());
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let label_w = theme_label.chars().count() as u16;
  let right_area = Rect { x: area.x + area.width.saturating_sub(label_w), width: label_w, ..area };
  frame.render_widget(right, right_area);
}

/// Full-screen background with the centered player modal on top.
fn render_overlay<T: Transport>(frame: &mut Frame, app: &App<T>, mount: &OverlayMount) {
  let theme = app.theme();
  let area = frame.area();
  frame.render_widget(Clear, area);
  frame.render_widget(Block::default().style(Style::default().bg(theme.scrim)), area);

  let [modal_row] = Layout::vertical([Constraint::Length(11)]).flex(Flex::Center).areas(area);
  let [modal] = Layout::horizontal([Constraint::Max(72)]).flex(Flex::Center).areas(modal_row);
  frame.render_widget(Clear, modal);

  let inner_w = modal.width.saturating_sub(4) as usize;
  let player = &mount.player;
  let playback = match app.screen.player.program() {
    Some(program) if app.screen.player.is_running() => format!("playing in {}", program),
    Some(program) => format!("{} unavailable, open the link manually", program),
    None => "no external player configured".to_string(),
  };
  let fullscreen = if player.allow_fullscreen { " · fullscreen" } else { "" };
  let lines = vec![
    Line::from(Span::styled(format!("{}  loading player…", mount.loader_glyph), Style::default().fg(theme.status))),
    Line::from(""),
    Line::from(Span::styled(
      truncate_str(&player.src, inner_w),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
    Line::from(Span::styled(
      format!("{}×{} · {}{}", player.width, player.height, player.allow, fullscreen),
      Style::default().fg(theme.muted),
    )),
    Line::from(""),
    Line::from(Span::styled(playback, Style::default().fg(theme.fg))),
    Line::from(""),
    Line::from(Span::styled("Click anywhere or press Enter to close", Style::default().fg(theme.muted))),
  ];
  let block = rounded(theme)
    .title(" Player ")
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .style(Style::default().bg(theme.bg))
    .padding(Padding::horizontal(1));
  frame.render_widget(Paragraph::new(lines).block(block), modal);
}
