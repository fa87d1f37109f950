//! Scenes
//!
//! A scene bundles the systems that should run while it is current: an
//! ordered list of update systems plus one render system. The manager
//! owns the scene list and switches by position or by name; the first
//! scene added, and every scene switched to, gets initialized.

use std::collections::HashMap;
use crate::backend::Color;
use crate::system::{RenderSystem, System};

/// Per-scene presentation options.
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    pub bg_color: Color,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            bg_color: Color::WHITE,
        }
    }
}

/// The systems running while this scene is current.
pub struct Scene {
    name: String,
    update_systems: Vec<Box<dyn System>>,
    render_system: Option<RenderSystem>,
    pub options: SceneOptions,
}

impl Scene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            update_systems: Vec::new(),
            render_system: None,
            options: SceneOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append an update system; tick order is registration order.
    pub fn add_update_system(&mut self, system: Box<dyn System>) {
        self.update_systems.push(system);
    }

    pub fn set_render_system(&mut self, system: RenderSystem) {
        self.render_system = Some(system);
    }

    pub(crate) fn update_systems_mut(&mut self) -> &mut [Box<dyn System>] {
        &mut self.update_systems
    }

    pub fn render_system_mut(&mut self) -> Option<&mut RenderSystem> {
        self.render_system.as_mut()
    }

    /// Run every system's init hook and apply scene options.
    fn init(&mut self) {
        if let Some(render) = self.render_system.as_mut() {
            render.bg_color = self.options.bg_color;
        }
        for system in &mut self.update_systems {
            system.init();
        }
    }
}

/// Owns the scene list and tracks which scene is current.
#[derive(Default)]
pub struct SceneManager {
    scenes: Vec<Scene>,
    current: usize,
    by_name: HashMap<String, usize>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scene. The first scene added becomes current and is
    /// initialized immediately.
    pub fn add_scene(&mut self, scene: Scene) {
        if !scene.name.is_empty() {
            self.by_name.insert(scene.name.clone(), self.scenes.len());
        }
        self.scenes.push(scene);
        if self.scenes.len() == 1 {
            self.scenes[0].init();
        }
    }

    pub fn current(&self) -> Option<&Scene> {
        self.scenes.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.get_mut(self.current)
    }

    /// Advance to the next scene, wrapping at the end, and initialize it.
    pub fn next_scene(&mut self) {
        if self.scenes.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.scenes.len();
        self.scenes[self.current].init();
    }

    /// Switch to a scene by name. Returns false for unknown names, with
    /// the current scene left in place.
    pub fn change_scene(&mut self, name: &str) -> bool {
        match self.by_name.get(name) {
            Some(&index) => {
                self.current = index;
                self.scenes[index].init();
                true
            }
            None => false,
        }
    }
}
