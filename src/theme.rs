use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub muted: Color,
  pub accent: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
  /// Fill behind the overlay modal.
  pub scrim: Color,
}

pub static THEMES: [Theme; 3] = [
  Theme {
    name: "Midnight",
    bg: Color::Rgb(22, 24, 33),
    fg: Color::Rgb(220, 223, 228),
    muted: Color::Rgb(120, 126, 140),
    accent: Color::Rgb(255, 92, 92),
    border: Color::Rgb(60, 64, 78),
    highlight_fg: Color::Rgb(22, 24, 33),
    highlight_bg: Color::Rgb(255, 92, 92),
    stripe_bg: Color::Rgb(28, 30, 41),
    status: Color::Rgb(240, 198, 116),
    error: Color::Rgb(255, 120, 120),
    key_fg: Color::Rgb(22, 24, 33),
    key_bg: Color::Rgb(120, 126, 140),
    scrim: Color::Rgb(10, 11, 15),
  },
  Theme {
    name: "Paper",
    bg: Color::Rgb(250, 248, 242),
    fg: Color::Rgb(40, 40, 40),
    muted: Color::Rgb(130, 126, 118),
    accent: Color::Rgb(196, 40, 40),
    border: Color::Rgb(210, 204, 192),
    highlight_fg: Color::Rgb(250, 248, 242),
    highlight_bg: Color::Rgb(196, 40, 40),
    stripe_bg: Color::Rgb(242, 239, 231),
    status: Color::Rgb(160, 110, 20),
    error: Color::Rgb(190, 30, 30),
    key_fg: Color::Rgb(250, 248, 242),
    key_bg: Color::Rgb(130, 126, 118),
    scrim: Color::Rgb(200, 196, 186),
  },
  Theme {
    name: "Mono",
    bg: Color::Reset,
    fg: Color::White,
    muted: Color::DarkGray,
    accent: Color::LightRed,
    border: Color::DarkGray,
    highlight_fg: Color::Black,
    highlight_bg: Color::White,
    stripe_bg: Color::Reset,
    status: Color::Yellow,
    error: Color::Red,
    key_fg: Color::Black,
    key_bg: Color::Gray,
    scrim: Color::Black,
  },
];

pub fn theme_index(name: &str) -> Option<usize> {
  THEMES.iter().position(|t| t.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn theme_lookup_is_case_insensitive() {
    assert_eq!(theme_index("paper"), Some(1));
    assert_eq!(theme_index("MIDNIGHT"), Some(0));
    assert_eq!(theme_index("neon"), None);
  }
}
