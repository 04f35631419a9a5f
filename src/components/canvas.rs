use image::{imageops, Rgba, RgbaImage};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Widget,
};

use crate::{
    components::assets::Assets,
    game::render::{Drawable, Renderer, Sprite},
};

// Used when no background image is loaded.
const SKY: Rgba<u8> = Rgba([78, 192, 202, 255]);
const HALF_BLOCK: &str = "▀";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Caption {
    text: String,
    color: Color,
    y: i32,
}

/// Composes each frame into an RGBA image at world resolution and paints it
/// into the terminal with half-block cells, two pixels per cell.
#[derive(Debug)]
pub struct TerminalCanvas {
    assets: Assets,
    frame: RgbaImage,
    captions: Vec<Caption>,
}

impl TerminalCanvas {
    pub fn new(assets: Assets, width: u32, height: u32) -> Self {
        Self { assets, frame: RgbaImage::from_pixel(width, height, SKY), captions: Vec::new() }
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// Largest area with the frame's aspect ratio that fits `area`, centred in it.
    fn viewport(&self, area: Rect) -> Rect {
        let (width, height) = self.frame.dimensions();
        if width == 0 || height == 0 {
            return Rect::default();
        }
        let scale = (area.width as f64 / width as f64).min(2.0 * area.height as f64 / height as f64);
        let columns = ((width as f64 * scale) as u16).min(area.width);
        let rows = ((height as f64 * scale / 2.0) as u16).min(area.height);
        Rect::new(area.x + (area.width - columns) / 2, area.y + (area.height - rows) / 2, columns, rows)
    }

    fn sample(&self, viewport: Rect, column: u16, pixel_row: u32) -> Color {
        let (width, height) = self.frame.dimensions();
        let x = (column as u32 * width / viewport.width as u32).min(width - 1);
        let y = (pixel_row * height / (2 * viewport.height as u32)).min(height - 1);
        let Rgba([r, g, b, _]) = *self.frame.get_pixel(x, y);
        Color::Rgb(r, g, b)
    }
}

impl Renderer for TerminalCanvas {
    fn draw_background(&mut self) {
        self.captions.clear();
        match self.assets.get(Sprite::Background) {
            Some(background) => {
                self.frame.pixels_mut().for_each(|pixel| *pixel = SKY);
                imageops::replace(&mut self.frame, background, 0, 0);
            },
            None => self.frame.pixels_mut().for_each(|pixel| *pixel = SKY),
        }
    }

    fn draw_entities(&mut self, entities: &[Drawable]) {
        for entity in entities {
            if let Some(image) = self.assets.get(entity.sprite) {
                imageops::overlay(&mut self.frame, image, entity.hit_box.x as i64, entity.hit_box.y as i64);
            }
        }
    }

    fn draw_text(&mut self, text: &str, color: Color, y: i32) {
        self.captions.push(Caption { text: text.to_string(), color, y });
    }
}

impl Widget for &TerminalCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let viewport = self.viewport(area);
        if viewport.is_empty() {
            return;
        }

        for row in 0..viewport.height {
            for column in 0..viewport.width {
                let top = self.sample(viewport, column, 2 * row as u32);
                let bottom = self.sample(viewport, column, 2 * row as u32 + 1);
                if let Some(cell) = buf.cell_mut((viewport.x + column, viewport.y + row)) {
                    cell.set_symbol(HALF_BLOCK).set_fg(top).set_bg(bottom);
                }
            }
        }

        let height = self.frame.height() as i64;
        for caption in &self.captions {
            let row = caption.y as i64 * viewport.height as i64 / height;
            if !(0..viewport.height as i64).contains(&row) {
                continue;
            }
            // Captions keep the frame colours behind them.
            let line_area = Rect::new(viewport.x, viewport.y + row as u16, viewport.width, 1);
            Line::styled(caption.text.clone(), Style::new().fg(caption.color).bold()).centered().render(line_area, buf);
        }
    }
}
