//! Render backend abstraction
//!
//! The simulation core never talks to a window or GPU directly. Everything
//! it needs from a renderer is expressed by the [`RenderBackend`] trait:
//! clear/present, rectangle fills, cropped/rotated/flipped texture blits,
//! text, and opaque asset handles. The shipped implementation wraps
//! macroquad ([`quad::QuadBackend`]); tests substitute recording fakes.

pub mod quad;

use serde::{Serialize, Deserialize};
use crate::math::{Point, Rect};
use crate::CoreError;

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Opaque handle to a texture owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureId(pub(crate) usize);

/// Opaque handle to a font owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontId(pub(crate) usize);

/// Mirroring applied when blitting a texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Flip {
    pub fn horizontal(&self) -> bool {
        matches!(self, Flip::Horizontal | Flip::Both)
    }

    pub fn vertical(&self) -> bool {
        matches!(self, Flip::Vertical | Flip::Both)
    }
}

/// The drawing surface consumed by the render system.
///
/// Asset operations return `Err` on failure; callers treat those as fatal
/// setup errors. Per-frame draw calls against a valid handle cannot fail.
pub trait RenderBackend {
    /// Set the color used by `clear`, `fill_rect` and `draw_rect`.
    fn set_draw_color(&mut self, color: Color);

    /// Fill the whole surface with the current draw color.
    fn clear(&mut self);

    /// Upload a decoded RGBA image (row-major, 4 bytes per pixel).
    fn upload_texture(&mut self, width: u16, height: u16, rgba: &[u8]) -> Result<TextureId, CoreError>;

    /// Decode an image file and upload it.
    fn load_texture(&mut self, path: &str) -> Result<TextureId, CoreError>;

    /// Pixel size of a previously uploaded texture.
    fn texture_size(&self, texture: TextureId) -> Option<Point>;

    /// Load a font at a fixed pixel size.
    fn load_font(&mut self, path: &str, size: u16) -> Result<FontId, CoreError>;

    /// Draw the `src` region of a texture into the `dest` rectangle,
    /// rotated by `angle` degrees around `center` (or the rectangle
    /// center when None) and mirrored per `flip`.
    fn blit(
        &mut self,
        texture: TextureId,
        src: Rect,
        dest: Rect,
        angle: f64,
        center: Option<Point>,
        flip: Flip,
    ) -> Result<(), CoreError>;

    /// Fill a rectangle with the current draw color.
    fn fill_rect(&mut self, rect: Rect);

    /// Outline a rectangle with the current draw color.
    fn draw_rect(&mut self, rect: Rect);

    /// Draw a line of text with the font's baked size.
    fn draw_text(&mut self, font: FontId, text: &str, pos: Point, color: Color) -> Result<(), CoreError>;

    /// Finish the frame. Backends that present implicitly may no-op.
    fn present(&mut self);
}
