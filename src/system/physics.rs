//! Physics integration
//!
//! Semi-implicit Euler: velocity is updated from acceleration first, then
//! the future position from the new velocity. Integrating in this order
//! keeps energy more stable than explicit Euler. Only `future_pos`
//! advances here; the committed Position moves when the renderer
//! interpolates the tick in.

use super::System;
use crate::component::ComponentKind;
use crate::entity::Registry;
use crate::event::EventBus;
use crate::input::InputSource;

/// Advances every entity holding a Physics component.
#[derive(Debug, Default)]
pub struct PhysicsSystem;

impl System for PhysicsSystem {
    fn update(&mut self, world: &mut Registry, _bus: &mut EventBus, _input: &dyn InputSource) {
        // collect ids first so we can re-borrow mutably per entity
        let ids: Vec<u32> = world
            .iter_with(&[ComponentKind::Physics])
            .map(|(entity, _)| entity.id())
            .collect();

        for id in ids {
            let Some(entity) = world.get_mut(id) else { continue };
            let Some(physics) = entity.physics_mut() else { continue };
            physics.vel += physics.acc;
            physics.future_pos += physics.vel;
        }
    }
}
