use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliDisplayMode {
  Auto,
  Direct,
  Ascii,
}

/// How tile thumbnails are drawn in the preview pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
  Ascii,
  Direct,
}

impl DisplayMode {
  pub fn label(self) -> &'static str {
    match self {
      DisplayMode::Ascii => "ascii",
      DisplayMode::Direct => "half-block",
    }
  }
}

/// Half-block colour output needs a true-colour terminal; otherwise fall back to ASCII.
pub fn detect_display_mode() -> DisplayMode {
  let colorterm = std::env::var("COLORTERM").unwrap_or_default();
  mode_for_colorterm(&colorterm)
}

fn mode_for_colorterm(colorterm: &str) -> DisplayMode {
  match colorterm.to_lowercase().as_str() {
    "truecolor" | "24bit" => DisplayMode::Direct,
    _ => DisplayMode::Ascii,
  }
}

pub fn resolve_display_mode(cli: CliDisplayMode) -> DisplayMode {
  match cli {
    CliDisplayMode::Auto => detect_display_mode(),
    CliDisplayMode::Direct => DisplayMode::Direct,
    CliDisplayMode::Ascii => DisplayMode::Ascii,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truecolor_terminals_get_half_blocks() {
    assert_eq!(mode_for_colorterm("truecolor"), DisplayMode::Direct);
    assert_eq!(mode_for_colorterm("24BIT"), DisplayMode::Direct);
    assert_eq!(mode_for_colorterm(""), DisplayMode::Ascii);
    assert_eq!(mode_for_colorterm("256color"), DisplayMode::Ascii);
  }

  #[test]
  fn explicit_modes_win() {
    assert_eq!(resolve_display_mode(CliDisplayMode::Ascii), DisplayMode::Ascii);
    assert_eq!(resolve_display_mode(CliDisplayMode::Direct), DisplayMode::Direct);
  }
}
