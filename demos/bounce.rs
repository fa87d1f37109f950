//! Bouncing boxes
//!
//! Smallest complete wiring of the engine: a camera, two filled
//! rectangles with physics and collision areas, the stock physics and
//! collision systems, and bus handlers that bounce the boxes off each
//! other and off the world border.
//!
//! Reads an optional `bounce.ron` config next to the working directory;
//! set RUST_LOG=debug for the per-second FPS report.

use log::{error, info, warn};
use macroquad::prelude::{next_frame, Conf};

use kestrel::backend::quad::QuadBackend;
use kestrel::backend::Color;
use kestrel::component::{
    CameraComponent, CollisionComponent, Component, GeometryComponent, PhysicsComponent,
    PositionComponent,
};
use kestrel::config::{self, GameConfig};
use kestrel::event::{BorderSide, Event, BORDER_EVENT, COLLISION_EVENT};
use kestrel::input::QuadInput;
use kestrel::math::{Point, Vec2f};
use kestrel::system::{invert_velocity, CollisionSystem, PhysicsSystem, RenderSystem};
use kestrel::time::SystemClock;
use kestrel::{GameLoop, Scene, WIN_TITLE, WORLD_HEIGHT, WORLD_WIDTH};

const CONFIG_PATH: &str = "bounce.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("{} bounce", WIN_TITLE),
        window_width: WORLD_WIDTH,
        window_height: WORLD_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

fn spawn_box(
    gameloop: &mut GameLoop,
    tag: &str,
    pos: Point,
    vel: Vec2f,
    size: i32,
    color: Color,
) {
    let entity = gameloop.world_mut().create(tag);
    entity.add(Component::Position(PositionComponent { pos }));
    entity.add(Component::Physics(PhysicsComponent::new(pos, vel, Vec2f::ZERO)));
    entity.add(Component::Collision(CollisionComponent::rect(size, size)));
    entity.add(Component::Geometry(GeometryComponent::Rectangle {
        size: Point::new(size, size),
        color,
        filled: true,
    }));
}

/// Reflect an entity's velocity back into the world when it crosses an
/// edge, and re-anchor its future position so interpolation follows.
fn bounce_off_border(world: &mut kestrel::Registry, event: &Event) {
    let Event::Border { entity, side } = event else { return };
    let Some(entity) = world.get_mut(*entity) else { return };
    let Some(pos) = entity.position().map(|p| p.pos) else { return };
    let Some(physics) = entity.physics_mut() else { return };
    match side {
        BorderSide::Left => physics.vel.x = physics.vel.x.abs(),
        BorderSide::Right => physics.vel.x = -physics.vel.x.abs(),
        BorderSide::Top => physics.vel.y = physics.vel.y.abs(),
        BorderSide::Bottom => physics.vel.y = -physics.vel.y.abs(),
    }
    physics.future_pos = Vec2f::from_point(pos) + physics.vel;
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let config = match config::load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}: {} (using defaults)", CONFIG_PATH, e);
            GameConfig::default()
        }
    };

    let mut gameloop = GameLoop::new(
        Box::new(QuadInput::new()),
        Box::new(SystemClock::new()),
    );

    // camera at the origin; its world size drives the border checks
    let camera = gameloop.world_mut().create("camera");
    camera.add(Component::Position(PositionComponent { pos: Point::ZERO }));
    camera.add(Component::Camera(CameraComponent {
        viewport_size: Point::new(config.window_width, config.window_height),
        world_size: Point::new(config.world_width, config.world_height),
        is_active: true,
    }));
    let camera_id = camera.id();

    spawn_box(
        &mut gameloop,
        "box-a",
        Point::new(120, 160),
        Vec2f::new(3.0, 2.0),
        40,
        Color::rgb(0xE0, 0x50, 0x50),
    );
    spawn_box(
        &mut gameloop,
        "box-b",
        Point::new(520, 300),
        Vec2f::new(-2.0, 3.0),
        40,
        Color::rgb(0x50, 0x60, 0xE0),
    );

    let bus = gameloop.bus_mut();
    bus.add_handler(
        COLLISION_EVENT,
        Box::new(|world, event, _| invert_velocity(world, event)),
    );
    bus.add_handler(
        BORDER_EVENT,
        Box::new(|world, event, _| bounce_off_border(world, event)),
    );

    let mut render = RenderSystem::new(Box::new(QuadBackend::new()));
    render.set_camera(camera_id);

    let mut scene = Scene::new("bounce");
    scene.options.bg_color = config.bg_color;
    scene.add_update_system(Box::new(PhysicsSystem));
    scene.add_update_system(Box::new(CollisionSystem));
    scene.set_render_system(render);
    gameloop.scenes.add_scene(scene);

    info!("kestrel {} bounce demo", kestrel::VERSION);
    loop {
        match gameloop.step() {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
        next_frame().await;
    }
    info!("terminated");
}
