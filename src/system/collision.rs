//! Collision detection and response
//!
//! The detector walks every entity holding Position and Collision, checks
//! its translated collision areas against the world border, then against
//! every other qualifying entity's areas. Matches publish border and
//! collision events on the bus synchronously, inside the update pass, so
//! handlers see (and may mutate) mid-pass state.
//!
//! Every ordered pair is scanned: (A,B) and (B,A) are separate checks.
//! There is no spatial index; the pairwise check is O(n²) over
//! qualifying entities, which is fine at this engine's entity counts.
//!
//! Response lives here too: [`invert_velocity`] is the stock collision
//! handler. It bounces both parties on the axis of least penetration and
//! shifts the first-named entity out of the overlap.

use log::debug;
use super::System;
use crate::component::ComponentKind;
use crate::entity::Registry;
use crate::event::{BorderSide, Event, EventBus};
use crate::input::InputSource;
use crate::math::{Point, Rect};
use crate::{WORLD_HEIGHT, WORLD_WIDTH};

/// Border and pairwise AABB checks over Position + Collision holders.
#[derive(Debug, Default)]
pub struct CollisionSystem;

impl System for CollisionSystem {
    fn update(&mut self, world: &mut Registry, bus: &mut EventBus, _input: &dyn InputSource) {
        let world_size = active_world_size(world);
        let ids: Vec<u32> = world
            .iter_with(&[ComponentKind::Position, ComponentKind::Collision])
            .map(|(entity, _)| entity.id())
            .collect();

        for &id in &ids {
            let Some((pos, areas)) = collider(world, id) else { continue };

            // border check, one event per violated side per area
            for area in &areas {
                let rect = area.translated(pos);
                if rect.right() > world_size.x - 1 {
                    bus.notify(world, Event::Border { entity: id, side: BorderSide::Right });
                } else if rect.x < 1 {
                    bus.notify(world, Event::Border { entity: id, side: BorderSide::Left });
                }
                if rect.y < 1 {
                    bus.notify(world, Event::Border { entity: id, side: BorderSide::Top });
                } else if rect.bottom() > world_size.y - 1 {
                    bus.notify(world, Event::Border { entity: id, side: BorderSide::Bottom });
                }
            }

            // pairwise check against every other qualifying entity; the
            // first intersecting area pair settles the whole entity pair
            for &other in &ids {
                if other == id {
                    continue;
                }
                // re-read both sides: an earlier handler may have moved
                // or deleted either entity
                let Some((pos_a, areas_a)) = collider(world, id) else { break };
                let Some((pos_b, areas_b)) = collider(world, other) else { continue };
                if first_overlap(pos_a, &areas_a, pos_b, &areas_b).is_some() {
                    bus.notify(world, Event::Collision { entity: id, with: other });
                }
            }
        }
    }
}

/// World size from the active camera, or the crate default space.
fn active_world_size(world: &Registry) -> Point {
    for (entity, _) in world.iter_with(&[ComponentKind::Camera]) {
        if let Some(camera) = entity.camera() {
            if camera.is_active {
                return camera.world_size;
            }
        }
    }
    Point::new(WORLD_WIDTH, WORLD_HEIGHT)
}

/// Position and collision areas of an entity, or None if it lost either.
fn collider(world: &Registry, id: u32) -> Option<(Point, Vec<Rect>)> {
    let entity = world.get(id)?;
    let pos = entity.position()?.pos;
    let areas = entity.collision()?.areas.clone();
    Some((pos, areas))
}

/// The overlap rectangle of the first intersecting area pair, in world
/// space, checked in area-list order.
fn first_overlap(pos_a: Point, areas_a: &[Rect], pos_b: Point, areas_b: &[Rect]) -> Option<Rect> {
    for area_a in areas_a {
        let rect_a = area_a.translated(pos_a);
        for area_b in areas_b {
            let rect_b = area_b.translated(pos_b);
            if let Some(overlap) = rect_a.intersection(&rect_b) {
                return Some(overlap);
            }
        }
    }
    None
}

/// Stock collision response: bounce on the axis of least penetration.
///
/// Recomputes the overlap between the two entities named by the event and
/// inverts velocity and acceleration on the axis with the smaller
/// penetration depth (both axes when equal) for both entities. The
/// first-named entity is additionally shifted out of the overlap by the
/// penetration depth, and both future positions are re-anchored to
/// `position + velocity` so interpolation resumes from a consistent
/// state. Skips silently when either entity is gone or the overlap was
/// already resolved earlier in the handler chain, which is exactly what
/// the mirrored (B,A) event hits after (A,B) was handled.
///
/// This is a deliberately simplified resolution: no mass, no restitution.
pub fn invert_velocity(world: &mut Registry, event: &Event) {
    let Event::Collision { entity, with } = event else { return };
    let Some((pos_a, areas_a)) = collider(world, *entity) else { return };
    let Some((pos_b, areas_b)) = collider(world, *with) else { return };
    let Some(overlap) = first_overlap(pos_a, &areas_a, pos_b, &areas_b) else { return };

    let depth = Point::new(overlap.w, overlap.h);
    let invert_x = depth.x <= depth.y;
    let invert_y = depth.y <= depth.x;
    debug!("bouncing entities {} and {}", entity, with);

    apply_bounce(world, *entity, invert_x, invert_y, Some(depth));
    apply_bounce(world, *with, invert_x, invert_y, None);
}

/// Invert an entity's motion on the chosen axes, optionally shifting its
/// position out of overlap by `depth` along the post-inversion direction.
fn apply_bounce(world: &mut Registry, id: u32, invert_x: bool, invert_y: bool, shift: Option<Point>) {
    let Some(entity) = world.get_mut(id) else { return };
    let Some(physics) = entity.physics() else { return };
    let mut vel = physics.vel;
    let mut acc = physics.acc;
    let mut future = physics.future_pos;
    let Some(position) = entity.position() else { return };
    let mut pos = position.pos;

    if invert_x {
        vel.x = -vel.x;
        acc.x = -acc.x;
        if let Some(depth) = shift {
            if vel.x > 0.0 {
                pos.x += depth.x;
            } else if vel.x < 0.0 {
                pos.x -= depth.x;
            }
        }
        future.x = pos.x as f32 + vel.x;
    }
    if invert_y {
        vel.y = -vel.y;
        acc.y = -acc.y;
        if let Some(depth) = shift {
            if vel.y > 0.0 {
                pos.y += depth.y;
            } else if vel.y < 0.0 {
                pos.y -= depth.y;
            }
        }
        future.y = pos.y as f32 + vel.y;
    }

    if let Some(physics) = entity.physics_mut() {
        physics.vel = vel;
        physics.acc = acc;
        physics.future_pos = future;
    }
    if let Some(position) = entity.position_mut() {
        position.pos = pos;
    }
}
