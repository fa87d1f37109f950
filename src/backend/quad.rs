//! Macroquad render backend
//!
//! Adapts the [`RenderBackend`] contract onto macroquad's immediate-mode
//! drawing. Textures and fonts live in vectors owned by the backend and
//! are handed out as index handles. Asset files are read synchronously
//! and decoded in memory, so loading works outside an async context.
//!
//! `present` is a no-op here: macroquad presents when the application
//! awaits `next_frame()`.

use macroquad::prelude as mq;
use super::{Color, Flip, FontId, RenderBackend, TextureId};
use crate::math::{Point, Rect};
use crate::CoreError;

pub struct QuadBackend {
    draw_color: Color,
    textures: Vec<mq::Texture2D>,
    fonts: Vec<(mq::Font, u16)>,
}

impl QuadBackend {
    pub fn new() -> Self {
        Self {
            draw_color: Color::WHITE,
            textures: Vec::new(),
            fonts: Vec::new(),
        }
    }

    fn texture(&self, id: TextureId) -> Result<&mq::Texture2D, CoreError> {
        self.textures
            .get(id.0)
            .ok_or_else(|| CoreError::Backend(format!("unknown texture handle {}", id.0)))
    }

    fn push_texture(&mut self, texture: mq::Texture2D) -> TextureId {
        // crisp pixels when sprites are scaled
        texture.set_filter(mq::FilterMode::Nearest);
        self.textures.push(texture);
        TextureId(self.textures.len() - 1)
    }
}

impl Default for QuadBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for QuadBackend {
    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn clear(&mut self) {
        mq::clear_background(to_mq(self.draw_color));
    }

    fn upload_texture(&mut self, width: u16, height: u16, rgba: &[u8]) -> Result<TextureId, CoreError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(CoreError::Backend(format!(
                "texture upload of {}x{} expects {} bytes, got {}",
                width,
                height,
                expected,
                rgba.len()
            )));
        }
        Ok(self.push_texture(mq::Texture2D::from_rgba8(width, height, rgba)))
    }

    fn load_texture(&mut self, path: &str) -> Result<TextureId, CoreError> {
        let bytes = std::fs::read(path)
            .map_err(|e| CoreError::AssetLoad(format!("{}: {}", path, e)))?;
        let image = mq::Image::from_file_with_format(&bytes, None)
            .map_err(|e| CoreError::AssetLoad(format!("{}: {}", path, e)))?;
        Ok(self.push_texture(mq::Texture2D::from_image(&image)))
    }

    fn texture_size(&self, texture: TextureId) -> Option<Point> {
        self.textures
            .get(texture.0)
            .map(|t| Point::new(t.width() as i32, t.height() as i32))
    }

    fn load_font(&mut self, path: &str, size: u16) -> Result<FontId, CoreError> {
        let bytes = std::fs::read(path)
            .map_err(|e| CoreError::AssetLoad(format!("{}: {}", path, e)))?;
        let font = mq::load_ttf_font_from_bytes(&bytes)
            .map_err(|e| CoreError::AssetLoad(format!("{}: {}", path, e)))?;
        self.fonts.push((font, size));
        Ok(FontId(self.fonts.len() - 1))
    }

    fn blit(
        &mut self,
        texture: TextureId,
        src: Rect,
        dest: Rect,
        angle: f64,
        center: Option<Point>,
        flip: Flip,
    ) -> Result<(), CoreError> {
        let pivot = center.map(|c| mq::vec2((dest.x + c.x) as f32, (dest.y + c.y) as f32));
        let params = mq::DrawTextureParams {
            dest_size: Some(mq::vec2(dest.w as f32, dest.h as f32)),
            source: Some(mq::Rect::new(
                src.x as f32,
                src.y as f32,
                src.w as f32,
                src.h as f32,
            )),
            rotation: (angle as f32).to_radians(),
            flip_x: flip.horizontal(),
            flip_y: flip.vertical(),
            pivot,
        };
        let texture = self.texture(texture)?;
        mq::draw_texture_ex(texture, dest.x as f32, dest.y as f32, mq::WHITE, params);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect) {
        mq::draw_rectangle(
            rect.x as f32,
            rect.y as f32,
            rect.w as f32,
            rect.h as f32,
            to_mq(self.draw_color),
        );
    }

    fn draw_rect(&mut self, rect: Rect) {
        mq::draw_rectangle_lines(
            rect.x as f32,
            rect.y as f32,
            rect.w as f32,
            rect.h as f32,
            1.0,
            to_mq(self.draw_color),
        );
    }

    fn draw_text(&mut self, font: FontId, text: &str, pos: Point, color: Color) -> Result<(), CoreError> {
        let (font, size) = self
            .fonts
            .get(font.0)
            .ok_or_else(|| CoreError::Backend(format!("unknown font handle {}", font.0)))?;
        // pos is the top-left corner; macroquad anchors text on the
        // baseline, so push down by the font size
        mq::draw_text_ex(
            text,
            pos.x as f32,
            (pos.y + *size as i32) as f32,
            mq::TextParams {
                font: Some(font),
                font_size: *size,
                color: to_mq(color),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn present(&mut self) {
        // macroquad presents on next_frame()
    }
}

fn to_mq(color: Color) -> mq::Color {
    mq::Color::from_rgba(color.r, color.g, color.b, color.a)
}
