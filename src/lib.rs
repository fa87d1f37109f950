//! KESTREL: a fixed-timestep 2D simulation core
//!
//! Entity-component storage, a 50Hz fixed-tick scheduler decoupled from
//! display rate via interpolation, and cooperating simulation systems
//! wired through a publish/subscribe event bus:
//! - Entities are ids plus bags of components; ids recycle oldest-first
//! - Physics advances future positions with semi-implicit Euler
//! - Collision runs border and pairwise AABB checks and publishes events
//! - Rendering blends committed and future positions by sub-tick alpha
//!
//! Windowing, decoding and device polling are collaborator concerns
//! behind the [`backend`], [`input`] and [`time`] traits; the shipped
//! implementations wrap macroquad.

pub mod backend;
pub mod component;
pub mod config;
pub mod entity;
pub mod event;
pub mod gameloop;
pub mod input;
pub mod math;
pub mod scene;
pub mod sprite;
pub mod system;
pub mod time;

pub use component::{Component, ComponentKind};
pub use entity::{Entity, Registry};
pub use event::{Event, EventBus, EventWriter};
pub use gameloop::{GameLoop, LoopState};
pub use scene::{Scene, SceneManager};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default window/world title
pub const WIN_TITLE: &str = "kestrel";
/// Default logical world width, used by border checks without a camera
pub const WORLD_WIDTH: i32 = 800;
/// Default logical world height
pub const WORLD_HEIGHT: i32 = 600;

/// Fatal setup and programmer errors.
///
/// Steady-state per-tick conditions (missing components, exhausted
/// cursors, deleting an absent id) are skip/no-op outcomes and never
/// surface here; what does surface is unrecoverable: continuing would
/// leave the render or simulation state inconsistent.
#[derive(Debug)]
pub enum CoreError {
    /// The loop was started with no scene added.
    NoScene,
    /// The current scene has no render system.
    NoRenderer,
    /// No camera entity was set, or it lost its Camera component.
    MissingCamera,
    /// A geometry variant the renderer does not implement.
    UnsupportedGeometry(&'static str),
    /// An asset file failed to read or decode.
    AssetLoad(String),
    /// The backend rejected an operation (bad handle, bad upload).
    Backend(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::NoScene => write!(f, "no scene added to the game loop"),
            CoreError::NoRenderer => write!(f, "current scene has no render system"),
            CoreError::MissingCamera => write!(f, "no camera entity available to the renderer"),
            CoreError::UnsupportedGeometry(kind) => {
                write!(f, "geometry variant not supported by the renderer: {}", kind)
            }
            CoreError::AssetLoad(detail) => write!(f, "asset load failed: {}", detail),
            CoreError::Backend(detail) => write!(f, "backend error: {}", detail),
        }
    }
}
