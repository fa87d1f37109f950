//! Spritesheet helper
//!
//! Loads an image through the backend once and stamps out Render
//! components for cropped cells of it.

use crate::backend::{RenderBackend, TextureId};
use crate::component::RenderComponent;
use crate::math::{Point, Rect};
use crate::CoreError;

/// One loaded spritesheet texture.
pub struct Spritesheet {
    texture: TextureId,
    size: Point,
}

impl Spritesheet {
    /// Decode and upload the image at `path`. Failure is fatal to setup.
    pub fn load(backend: &mut dyn RenderBackend, path: &str) -> Result<Self, CoreError> {
        let texture = backend.load_texture(path)?;
        let size = backend
            .texture_size(texture)
            .unwrap_or(Point::ZERO);
        Ok(Self { texture, size })
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Full pixel size of the sheet.
    pub fn size(&self) -> Point {
        self.size
    }

    /// A Render component showing the `crop` region of this sheet.
    pub fn sprite(&self, crop: Rect) -> RenderComponent {
        RenderComponent::new(self.texture, crop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Color, Flip, FontId};

    /// Backend that pretends every asset loads as a 64x32 texture.
    struct FixedSizeBackend;

    impl RenderBackend for FixedSizeBackend {
        fn set_draw_color(&mut self, _: Color) {}
        fn clear(&mut self) {}

        fn upload_texture(&mut self, _: u16, _: u16, _: &[u8]) -> Result<TextureId, CoreError> {
            Ok(TextureId(0))
        }

        fn load_texture(&mut self, path: &str) -> Result<TextureId, CoreError> {
            if path.ends_with(".png") {
                Ok(TextureId(7))
            } else {
                Err(CoreError::AssetLoad(path.to_string()))
            }
        }

        fn texture_size(&self, _: TextureId) -> Option<Point> {
            Some(Point::new(64, 32))
        }

        fn load_font(&mut self, _: &str, _: u16) -> Result<FontId, CoreError> {
            Ok(FontId(0))
        }

        fn blit(
            &mut self,
            _: TextureId,
            _: Rect,
            _: Rect,
            _: f64,
            _: Option<Point>,
            _: Flip,
        ) -> Result<(), CoreError> {
            Ok(())
        }

        fn fill_rect(&mut self, _: Rect) {}
        fn draw_rect(&mut self, _: Rect) {}

        fn draw_text(&mut self, _: FontId, _: &str, _: Point, _: Color) -> Result<(), CoreError> {
            Ok(())
        }

        fn present(&mut self) {}
    }

    #[test]
    fn test_sprites_share_the_loaded_texture() {
        let mut backend = FixedSizeBackend;
        let sheet = Spritesheet::load(&mut backend, "tiles.png").unwrap();
        assert_eq!(sheet.size(), Point::new(64, 32));

        let cell = sheet.sprite(Rect::new(16, 0, 16, 16));
        assert_eq!(cell.texture, sheet.texture());
        assert_eq!(cell.crop, Rect::new(16, 0, 16, 16));
    }

    #[test]
    fn test_load_failure_propagates() {
        let mut backend = FixedSizeBackend;
        assert!(matches!(
            Spritesheet::load(&mut backend, "missing.bmp"),
            Err(CoreError::AssetLoad(_))
        ));
    }
}
