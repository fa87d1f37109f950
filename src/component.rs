//! Component kinds and data
//!
//! Components are plain data attached to entities; behavior lives in
//! systems. Storage is dynamically typed: every component value is one
//! variant of the [`Component`] enum, keyed in the entity's map by its
//! [`ComponentKind`]. Downcast accessors return `None` on a kind
//! mismatch instead of panicking, so systems can probe freely.

use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use crate::backend::{Color, Flip, FontId, TextureId};
use crate::math::{Point, Rect, Vec2f};

/// The kinds of component an entity can carry. One value per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Position,
    Physics,
    Render,
    Animation,
    Collision,
    Camera,
    Geometry,
    Font,
}

impl ComponentKind {
    /// Stable lowercase name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ComponentKind::Position => "position",
            ComponentKind::Physics => "physics",
            ComponentKind::Render => "render",
            ComponentKind::Animation => "animation",
            ComponentKind::Collision => "collision",
            ComponentKind::Camera => "camera",
            ComponentKind::Geometry => "geometry",
            ComponentKind::Font => "font",
        }
    }
}

// =============================================================================
// Component data
// =============================================================================

/// Committed position of the entity. This is what the renderer draws and
/// game logic reads; physics advances `future_pos` instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionComponent {
    pub pos: Point,
}

/// Motion state advanced by the physics integrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicsComponent {
    /// Where the entity will be once the renderer commits the tick.
    pub future_pos: Vec2f,
    pub vel: Vec2f,
    pub acc: Vec2f,
}

impl PhysicsComponent {
    /// Physics state anchored at the entity's spawn position, so the first
    /// rendered frame interpolates from where the entity actually is.
    pub fn new(pos: Point, vel: Vec2f, acc: Vec2f) -> Self {
        Self {
            future_pos: Vec2f::from_point(pos),
            vel,
            acc,
        }
    }
}

/// Sprite drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderComponent {
    pub texture: TextureId,
    /// Region of the texture to display.
    pub crop: Rect,
    /// Rotation in degrees.
    pub angle: f64,
    /// Rotation pivot relative to the destination; None rotates around
    /// the center.
    pub center: Option<Point>,
    pub flip: Flip,
}

impl RenderComponent {
    pub fn new(texture: TextureId, crop: Rect) -> Self {
        Self {
            texture,
            crop,
            angle: 0.0,
            center: None,
            flip: Flip::None,
        }
    }
}

/// Frame animation over a row-major spritesheet table.
///
/// The frame index advances from wall time, not tick count, so animation
/// speed is independent of the simulation rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationComponent {
    /// Top-left corner of frame 0 on the spritesheet.
    pub initial_pos: Point,
    /// Frames advanced per second of wall time.
    pub frames_per_second: u8,
    /// Wall time of the last advance, in milliseconds.
    pub previous_time: u32,
    /// Current frame index.
    pub current: usize,
    /// Total frame count.
    pub frames: usize,
    /// Frames per spritesheet row.
    pub row_len: usize,
    /// Optional named frame indices (e.g. "walk" -> 4) for game code.
    pub sprite_map: HashMap<String, usize>,
}

impl AnimationComponent {
    pub fn new(initial_pos: Point, frames_per_second: u8, frames: usize, row_len: usize) -> Self {
        Self {
            initial_pos,
            frames_per_second,
            previous_time: 0,
            current: 0,
            frames,
            row_len,
            sprite_map: HashMap::new(),
        }
    }
}

/// One or more collision rectangles, relative to the entity's Position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionComponent {
    pub areas: Vec<Rect>,
}

impl CollisionComponent {
    /// Single collision area covering `w` x `h` from the position corner.
    pub fn rect(w: i32, h: i32) -> Self {
        Self {
            areas: vec![Rect::new(0, 0, w, h)],
        }
    }
}

/// Marks the entity whose viewpoint the renderer uses for culling and
/// world-to-screen offsetting. Only one camera should be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraComponent {
    pub viewport_size: Point,
    pub world_size: Point,
    pub is_active: bool,
}

/// Shapes drawn directly through the backend instead of blitting a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryComponent {
    Rectangle {
        size: Point,
        color: Color,
        filled: bool,
    },
    /// Debug overlay grid. Not supported by the renderer yet.
    Grid { size: Point, color: Color },
}

/// A line of text drawn with a backend font handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontComponent {
    pub font: FontId,
    pub text: String,
    pub color: Color,
}

// =============================================================================
// Tagged component value
// =============================================================================

/// A component value of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Position(PositionComponent),
    Physics(PhysicsComponent),
    Render(RenderComponent),
    Animation(AnimationComponent),
    Collision(CollisionComponent),
    Camera(CameraComponent),
    Geometry(GeometryComponent),
    Font(FontComponent),
}

impl Component {
    /// The kind this value belongs to; used as its key in the entity map.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Position(_) => ComponentKind::Position,
            Component::Physics(_) => ComponentKind::Physics,
            Component::Render(_) => ComponentKind::Render,
            Component::Animation(_) => ComponentKind::Animation,
            Component::Collision(_) => ComponentKind::Collision,
            Component::Camera(_) => ComponentKind::Camera,
            Component::Geometry(_) => ComponentKind::Geometry,
            Component::Font(_) => ComponentKind::Font,
        }
    }

    pub fn as_position(&self) -> Option<&PositionComponent> {
        match self {
            Component::Position(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_position_mut(&mut self) -> Option<&mut PositionComponent> {
        match self {
            Component::Position(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_physics(&self) -> Option<&PhysicsComponent> {
        match self {
            Component::Physics(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_physics_mut(&mut self) -> Option<&mut PhysicsComponent> {
        match self {
            Component::Physics(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_render(&self) -> Option<&RenderComponent> {
        match self {
            Component::Render(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_render_mut(&mut self) -> Option<&mut RenderComponent> {
        match self {
            Component::Render(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_animation(&self) -> Option<&AnimationComponent> {
        match self {
            Component::Animation(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_animation_mut(&mut self) -> Option<&mut AnimationComponent> {
        match self {
            Component::Animation(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_collision(&self) -> Option<&CollisionComponent> {
        match self {
            Component::Collision(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&CameraComponent> {
        match self {
            Component::Camera(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&GeometryComponent> {
        match self {
            Component::Geometry(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_font(&self) -> Option<&FontComponent> {
        match self {
            Component::Font(c) => Some(c),
            _ => None,
        }
    }
}
