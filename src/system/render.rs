//! Rendering and interpolation
//!
//! Runs exactly once per outer loop iteration, however many fixed ticks
//! just ran. Entities with Physics draw at a blend of their committed
//! Position and physics future position, weighted by how far wall time
//! sits past the last tick boundary; the blended point becomes the new
//! committed Position. Entities without Physics draw where they are.
//!
//! A distinguished camera entity supplies the viewport used for culling
//! and the world-to-screen offset. Sprite animation advances from wall
//! time, not tick count.

use log::warn;
use crate::backend::{Color, RenderBackend};
use crate::component::{AnimationComponent, Component, ComponentKind, GeometryComponent};
use crate::entity::Registry;
use crate::math::{round, Point, Rect, Vec2f};
use crate::system::UPDATE_TICK_LENGTH;
use crate::CoreError;

/// Draws the world through a [`RenderBackend`].
pub struct RenderSystem {
    backend: Box<dyn RenderBackend>,
    pub bg_color: Color,
    camera: Option<u32>,
    /// Wall time past the last committed tick boundary, in ms.
    accumulator: u32,
    /// Wall time of the current frame, for animation.
    time: u32,
}

impl RenderSystem {
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            bg_color: Color::WHITE,
            camera: None,
            accumulator: 0,
            time: 0,
        }
    }

    /// Select the camera entity. Rendering fails without one.
    pub fn set_camera(&mut self, entity: u32) {
        self.camera = Some(entity);
    }

    /// Direct access to the backend, for loading assets at setup time.
    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        self.backend.as_mut()
    }

    /// Set the interpolation numerator for this frame. The game loop
    /// calls this before `update`.
    pub fn set_accumulator(&mut self, accumulator: u32) {
        self.accumulator = accumulator;
    }

    /// Set the frame's wall time. The game loop calls this before
    /// `update`.
    pub fn set_time(&mut self, time: u32) {
        self.time = time;
    }

    /// Draw one frame: clear, interpolate/commit positions, cull against
    /// the camera viewport, draw geometry/text/sprites, present.
    pub fn update(&mut self, world: &mut Registry) -> Result<(), CoreError> {
        self.backend.set_draw_color(self.bg_color);
        self.backend.clear();

        // alpha in [0,1): how far wall time sits into the upcoming tick
        let alpha = self.accumulator.min(UPDATE_TICK_LENGTH - 1) as f32 / UPDATE_TICK_LENGTH as f32;

        let camera_id = self.camera.ok_or(CoreError::MissingCamera)?;
        let camera_entity = world.get(camera_id).ok_or(CoreError::MissingCamera)?;
        let camera = *camera_entity.camera().ok_or(CoreError::MissingCamera)?;
        let camera_pos = camera_entity.position().map(|p| p.pos).unwrap_or(Point::ZERO);
        let viewport = Rect::new(
            camera_pos.x,
            camera_pos.y,
            camera.viewport_size.x,
            camera.viewport_size.y,
        );

        let ids: Vec<u32> = world.iter_available().map(|(entity, _)| entity.id()).collect();
        for id in ids {
            let Some(entity) = world.get_mut(id) else { continue };
            let Some(position) = entity.position() else { continue };
            let mut draw_pos = position.pos;

            // blend toward the physics future position and commit the
            // result; later ticks accumulate from the committed value
            if let Some(physics) = entity.physics().copied() {
                draw_pos = lerp(draw_pos, physics.future_pos, alpha);
                if let Some(position) = entity.position_mut() {
                    position.pos = draw_pos;
                }
            }

            let screen = Point::new(draw_pos.x - camera_pos.x, draw_pos.y - camera_pos.y);

            if let Some(geometry) = entity.get(ComponentKind::Geometry).and_then(Component::as_geometry) {
                let geometry = *geometry;
                self.draw_geometry(&geometry, draw_pos, screen, &viewport)?;
                continue;
            }

            if let Some(font) = entity.get(ComponentKind::Font).and_then(Component::as_font) {
                let font = font.clone();
                self.backend.draw_text(font.font, &font.text, screen, font.color)?;
                continue;
            }

            let Some(render) = entity.get(ComponentKind::Render).and_then(Component::as_render).copied()
            else {
                continue;
            };
            let mut crop = render.crop;

            // animation picks the crop for the current wall time
            if let Some(animation) = entity
                .get_mut(ComponentKind::Animation)
                .and_then(Component::as_animation_mut)
            {
                crop = advance_animation(self.time, animation, crop);
                if let Some(render) = entity.get_mut(ComponentKind::Render).and_then(Component::as_render_mut) {
                    render.crop = crop;
                }
            }

            let bounds = Rect::new(draw_pos.x, draw_pos.y, crop.w, crop.h);
            if !viewport.has_intersection(&bounds) {
                continue;
            }
            self.backend.blit(
                render.texture,
                crop,
                Rect::new(screen.x, screen.y, crop.w, crop.h),
                render.angle,
                render.center,
                render.flip,
            )?;
        }

        self.backend.present();
        Ok(())
    }

    fn draw_geometry(
        &mut self,
        geometry: &GeometryComponent,
        world_pos: Point,
        screen: Point,
        viewport: &Rect,
    ) -> Result<(), CoreError> {
        match geometry {
            GeometryComponent::Rectangle { size, color, filled } => {
                let bounds = Rect::new(world_pos.x, world_pos.y, size.x, size.y);
                if !viewport.has_intersection(&bounds) {
                    return Ok(());
                }
                self.backend.set_draw_color(*color);
                let rect = Rect::new(screen.x, screen.y, size.x, size.y);
                if *filled {
                    self.backend.fill_rect(rect);
                } else {
                    self.backend.draw_rect(rect);
                }
                Ok(())
            }
            GeometryComponent::Grid { .. } => {
                warn!("grid geometry reached the renderer");
                Err(CoreError::UnsupportedGeometry("grid"))
            }
        }
    }
}

/// Linear interpolation between a committed point and a future position,
/// rounded half away from zero per axis.
fn lerp(committed: Point, future: Vec2f, alpha: f32) -> Point {
    Point::new(
        round(future.x * alpha + committed.x as f32 * (1.0 - alpha)),
        round(future.y * alpha + committed.y as f32 * (1.0 - alpha)),
    )
}

/// Advance an animation to wall time `now` and return the crop for the
/// current frame. Wraps row-major through the frame table.
fn advance_animation(now: u32, animation: &mut AnimationComponent, crop: Rect) -> Rect {
    let elapsed = now.saturating_sub(animation.previous_time);
    let steps = (elapsed * animation.frames_per_second as u32 / 1000) as usize;
    if steps < 1 {
        return crop;
    }
    animation.current += steps;
    animation.previous_time = now;
    if animation.frames > 0 && animation.current >= animation.frames {
        animation.current %= animation.frames;
    }
    let column = animation.current % animation.row_len.max(1);
    let row = animation.current / animation.row_len.max(1);
    Rect::new(
        column as i32 * crop.w + animation.initial_pos.x,
        row as i32 * crop.h + animation.initial_pos.y,
        crop.w,
        crop.h,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Flip, FontId, TextureId};
    use crate::component::{
        CameraComponent, Component, PhysicsComponent, PositionComponent, RenderComponent,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Backend double that records draw calls as strings.
    #[derive(Default)]
    struct RecordingBackend {
        ops: Rc<RefCell<Vec<String>>>,
    }

    impl RenderBackend for RecordingBackend {
        fn set_draw_color(&mut self, _color: Color) {}

        fn clear(&mut self) {
            self.ops.borrow_mut().push("clear".to_string());
        }

        fn upload_texture(&mut self, _w: u16, _h: u16, _rgba: &[u8]) -> Result<TextureId, CoreError> {
            Ok(TextureId(0))
        }

        fn load_texture(&mut self, _path: &str) -> Result<TextureId, CoreError> {
            Ok(TextureId(0))
        }

        fn texture_size(&self, _texture: TextureId) -> Option<Point> {
            None
        }

        fn load_font(&mut self, _path: &str, _size: u16) -> Result<FontId, CoreError> {
            Ok(FontId(0))
        }

        fn blit(
            &mut self,
            _texture: TextureId,
            src: Rect,
            dest: Rect,
            _angle: f64,
            _center: Option<Point>,
            _flip: Flip,
        ) -> Result<(), CoreError> {
            self.ops.borrow_mut().push(format!(
                "blit src({},{},{},{}) dest({},{})",
                src.x, src.y, src.w, src.h, dest.x, dest.y
            ));
            Ok(())
        }

        fn fill_rect(&mut self, rect: Rect) {
            self.ops
                .borrow_mut()
                .push(format!("fill({},{})", rect.x, rect.y));
        }

        fn draw_rect(&mut self, rect: Rect) {
            self.ops
                .borrow_mut()
                .push(format!("outline({},{})", rect.x, rect.y));
        }

        fn draw_text(&mut self, _font: FontId, text: &str, pos: Point, _color: Color) -> Result<(), CoreError> {
            self.ops
                .borrow_mut()
                .push(format!("text({}, {},{})", text, pos.x, pos.y));
            Ok(())
        }

        fn present(&mut self) {
            self.ops.borrow_mut().push("present".to_string());
        }
    }

    fn render_system() -> (RenderSystem, Rc<RefCell<Vec<String>>>) {
        let backend = RecordingBackend::default();
        let ops = Rc::clone(&backend.ops);
        (RenderSystem::new(Box::new(backend)), ops)
    }

    fn spawn_camera(world: &mut Registry) -> u32 {
        let camera = world.create("camera");
        camera.add(Component::Position(PositionComponent { pos: Point::ZERO }));
        camera.add(Component::Camera(CameraComponent {
            viewport_size: Point::new(800, 600),
            world_size: Point::new(800, 600),
            is_active: true,
        }));
        camera.id()
    }

    #[test]
    fn test_missing_camera_is_fatal() {
        let mut world = Registry::new();
        let (mut system, _) = render_system();
        assert!(matches!(system.update(&mut world), Err(CoreError::MissingCamera)));

        // camera id set but entity lacks the component
        let bare = world.create("not-a-camera").id();
        system.set_camera(bare);
        assert!(matches!(system.update(&mut world), Err(CoreError::MissingCamera)));
    }

    #[test]
    fn test_interpolated_draw_commits_position() {
        let mut world = Registry::new();
        let (mut system, ops) = render_system();
        system.set_camera(spawn_camera(&mut world));

        let entity = world.create("mover");
        entity.add(Component::Position(PositionComponent { pos: Point::ZERO }));
        let mut physics = PhysicsComponent::new(Point::ZERO, Vec2f::ZERO, Vec2f::ZERO);
        physics.future_pos = Vec2f::new(10.0, 0.0);
        entity.add(Component::Physics(physics));
        entity.add(Component::Render(RenderComponent::new(
            TextureId(0),
            Rect::new(0, 0, 16, 16),
        )));
        let id = entity.id();

        // halfway into the 20ms tick
        system.set_accumulator(10);
        system.update(&mut world).unwrap();

        assert!(ops
            .borrow()
            .iter()
            .any(|op| op == "blit src(0,0,16,16) dest(5,0)"));
        // the blended value is now the committed position
        assert_eq!(
            world.get(id).unwrap().position().unwrap().pos,
            Point::new(5, 0)
        );
    }

    #[test]
    fn test_entity_without_physics_draws_literal_position() {
        let mut world = Registry::new();
        let (mut system, ops) = render_system();
        system.set_camera(spawn_camera(&mut world));

        let entity = world.create("prop");
        entity.add(Component::Position(PositionComponent {
            pos: Point::new(40, 30),
        }));
        entity.add(Component::Render(RenderComponent::new(
            TextureId(0),
            Rect::new(0, 0, 8, 8),
        )));

        system.set_accumulator(15);
        system.update(&mut world).unwrap();

        assert!(ops
            .borrow()
            .iter()
            .any(|op| op == "blit src(0,0,8,8) dest(40,30)"));
    }

    #[test]
    fn test_camera_offset_and_culling() {
        let mut world = Registry::new();
        let (mut system, ops) = render_system();
        let camera = world.create("camera");
        camera.add(Component::Position(PositionComponent {
            pos: Point::new(100, 50),
        }));
        camera.add(Component::Camera(CameraComponent {
            viewport_size: Point::new(200, 200),
            world_size: Point::new(800, 600),
            is_active: true,
        }));
        let camera_id = camera.id();
        system.set_camera(camera_id);

        let visible = world.create("visible");
        visible.add(Component::Position(PositionComponent {
            pos: Point::new(150, 100),
        }));
        visible.add(Component::Render(RenderComponent::new(
            TextureId(0),
            Rect::new(0, 0, 16, 16),
        )));

        let culled = world.create("culled");
        culled.add(Component::Position(PositionComponent {
            pos: Point::new(600, 500),
        }));
        culled.add(Component::Render(RenderComponent::new(
            TextureId(0),
            Rect::new(0, 0, 16, 16),
        )));

        system.update(&mut world).unwrap();

        // visible entity drawn at world minus camera position
        let ops = ops.borrow();
        assert!(ops.iter().any(|op| op == "blit src(0,0,16,16) dest(50,50)"));
        // off-viewport entity produced no blit
        assert_eq!(ops.iter().filter(|op| op.starts_with("blit")).count(), 1);
        assert_eq!(ops.iter().filter(|op| *op == "present").count(), 1);
    }

    #[test]
    fn test_geometry_and_text_paths() {
        let mut world = Registry::new();
        let (mut system, ops) = render_system();
        system.set_camera(spawn_camera(&mut world));

        let shape = world.create("shape");
        shape.add(Component::Position(PositionComponent {
            pos: Point::new(10, 20),
        }));
        shape.add(Component::Geometry(GeometryComponent::Rectangle {
            size: Point::new(30, 30),
            color: Color::BLACK,
            filled: true,
        }));

        let label = world.create("label");
        label.add(Component::Position(PositionComponent {
            pos: Point::new(5, 6),
        }));
        label.add(Component::Font(crate::component::FontComponent {
            font: FontId(0),
            text: "score".to_string(),
            color: Color::BLACK,
        }));

        system.update(&mut world).unwrap();

        let ops = ops.borrow();
        assert!(ops.iter().any(|op| op == "fill(10,20)"));
        assert!(ops.iter().any(|op| op == "text(score, 5,6)"));
    }

    #[test]
    fn test_unsupported_geometry_is_fatal() {
        let mut world = Registry::new();
        let (mut system, _) = render_system();
        system.set_camera(spawn_camera(&mut world));

        let grid = world.create("grid");
        grid.add(Component::Position(PositionComponent { pos: Point::ZERO }));
        grid.add(Component::Geometry(GeometryComponent::Grid {
            size: Point::new(32, 32),
            color: Color::BLACK,
        }));

        assert!(matches!(
            system.update(&mut world),
            Err(CoreError::UnsupportedGeometry("grid"))
        ));
    }

    #[test]
    fn test_lerp_rounds_half_away_from_zero() {
        assert_eq!(lerp(Point::new(0, 0), Vec2f::new(5.0, -5.0), 0.5), Point::new(3, -3));
        assert_eq!(lerp(Point::new(10, 10), Vec2f::new(10.0, 10.0), 0.0), Point::new(10, 10));
        assert_eq!(lerp(Point::new(0, 0), Vec2f::new(8.0, 4.0), 0.75), Point::new(6, 3));
    }

    #[test]
    fn test_animation_advances_with_wall_time() {
        let mut animation = AnimationComponent::new(Point::ZERO, 10, 6, 3);
        let crop = Rect::new(0, 0, 16, 16);

        // 50ms at 10 fps: not yet a full frame at 40ms, one frame at 100ms
        let unchanged = advance_animation(40, &mut animation, crop);
        assert_eq!(unchanged, crop);
        assert_eq!(animation.current, 0);

        let one = advance_animation(100, &mut animation, crop);
        assert_eq!(animation.current, 1);
        assert_eq!(one, Rect::new(16, 0, 16, 16));

        // jump far ahead: wraps through the 6-frame table, row-major
        let wrapped = advance_animation(500, &mut animation, crop);
        assert_eq!(animation.current, 5);
        assert_eq!(wrapped, Rect::new(32, 16, 16, 16));
    }
}
