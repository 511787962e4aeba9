use image::{DynamicImage, imageops::FilterType};
use ratatui::{
  buffer::Buffer,
  layout::Rect,
  style::{Color, Style},
  widgets::Widget,
};

use crate::display::DisplayMode;

// --- Thumbnail Widget ---

/// Draws a tile's background image. The image must already be sized to the
/// area with [`fit_thumbnail`]; the widget only centers and paints it.
pub struct ThumbnailWidget<'a> {
  pub image: &'a DynamicImage,
  pub display_mode: DisplayMode,
}

const ASCII_RAMP: [&str; 10] = [" ", ".", ":", "-", "=", "+", "*", "#", "%", "@"];

/// Resize to fill `area`, keeping 16:9. Half-block cells hold two pixel rows.
pub fn fit_thumbnail(image: &DynamicImage, area: Rect, mode: DisplayMode) -> DynamicImage {
  let target_w = u32::from(area.width).max(1);
  let rows_per_cell = match mode {
    DisplayMode::Direct => 2,
    DisplayMode::Ascii => 1,
  };
  // Terminal cells are roughly twice as tall as wide.
  let ideal_h = (target_w as f32 * 9.0 / 32.0 * rows_per_cell as f32).round() as u32;
  let max_h = u32::from(area.height) * rows_per_cell;
  image.resize_to_fill(target_w, ideal_h.clamp(1, max_h.max(1)), FilterType::Triangle)
}

impl Widget for ThumbnailWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
      return;
    }
    match self.display_mode {
      DisplayMode::Direct => render_half_blocks(self.image, area, buf),
      DisplayMode::Ascii => render_ascii(self.image, area, buf),
    }
  }
}

fn cell(area: Rect, offset_x: u32, offset_y: u32, x: u32, y: u32) -> (u16, u16) {
  let dx = u16::try_from(offset_x + x).unwrap_or(u16::MAX);
  let dy = u16::try_from(offset_y + y).unwrap_or(u16::MAX);
  (area.x.saturating_add(dx), area.y.saturating_add(dy))
}

fn render_half_blocks(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let rgb = image.to_rgb8();
  let img_w = rgb.width().min(u32::from(area.width));
  let img_h = rgb.height();
  let cell_h = img_h.div_ceil(2).min(u32::from(area.height));
  let offset_x = u32::from(area.width).saturating_sub(img_w) / 2;
  let offset_y = u32::from(area.height).saturating_sub(cell_h) / 2;

  for y in 0..cell_h {
    for x in 0..img_w {
      let upper = rgb.get_pixel(x, y * 2);
      let bg = if y * 2 + 1 < img_h {
        let lower = rgb.get_pixel(x, y * 2 + 1);
        Color::Rgb(lower[0], lower[1], lower[2])
      } else {
        Color::Reset
      };
      let (cx, cy) = cell(area, offset_x, offset_y, x, y);
      buf.set_string(cx, cy, "▀", Style::default().fg(Color::Rgb(upper[0], upper[1], upper[2])).bg(bg));
    }
  }
}

fn render_ascii(image: &DynamicImage, area: Rect, buf: &mut Buffer) {
  let luma = image.to_luma8();
  let img_w = luma.width().min(u32::from(area.width));
  let img_h = luma.height().min(u32::from(area.height));
  let offset_x = u32::from(area.width).saturating_sub(img_w) / 2;
  let offset_y = u32::from(area.height).saturating_sub(img_h) / 2;

  for y in 0..img_h {
    for x in 0..img_w {
      let level = f32::from(luma.get_pixel(x, y)[0]) / 255.0;
      let idx = ((level * (ASCII_RAMP.len() - 1) as f32).round() as usize).min(ASCII_RAMP.len() - 1);
      let (cx, cy) = cell(area, offset_x, offset_y, x, y);
      buf.set_string(cx, cy, ASCII_RAMP[idx], Style::default());
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{Rgb, RgbImage};

  fn solid(w: u32, h: u32, px: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb(px)))
  }

  #[test]
  fn ascii_white_is_densest_glyph() {
    let area = Rect::new(0, 0, 4, 2);
    let mut buf = Buffer::empty(area);
    ThumbnailWidget { image: &solid(4, 2, [255, 255, 255]), display_mode: DisplayMode::Ascii }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), "@");
    assert_eq!(buf[(3, 1)].symbol(), "@");
  }

  #[test]
  fn half_blocks_carry_both_rows() {
    let area = Rect::new(0, 0, 2, 1);
    let mut buf = Buffer::empty(area);
    let mut img = RgbImage::from_pixel(2, 2, Rgb([255, 0, 0]));
    img.put_pixel(0, 1, Rgb([0, 0, 255]));
    img.put_pixel(1, 1, Rgb([0, 0, 255]));
    ThumbnailWidget { image: &DynamicImage::ImageRgb8(img), display_mode: DisplayMode::Direct }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), "▀");
    assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 0, 0));
    assert_eq!(buf[(0, 0)].bg, Color::Rgb(0, 0, 255));
  }

  #[test]
  fn fit_respects_area() {
    let area = Rect::new(0, 0, 32, 4);
    let fitted = fit_thumbnail(&solid(320, 180, [0, 0, 0]), area, DisplayMode::Direct);
    assert_eq!(fitted.width(), 32);
    assert!(fitted.height() <= 8);
    let fitted = fit_thumbnail(&solid(320, 180, [0, 0, 0]), area, DisplayMode::Ascii);
    assert!(fitted.height() <= 4);
  }

  #[test]
  fn empty_area_draws_nothing() {
    let area = Rect::new(0, 0, 0, 0);
    let mut buf = Buffer::empty(Rect::new(0, 0, 1, 1));
    ThumbnailWidget { image: &solid(1, 1, [255, 255, 255]), display_mode: DisplayMode::Ascii }.render(area, &mut buf);
    assert_eq!(buf[(0, 0)].symbol(), " ");
  }
}
