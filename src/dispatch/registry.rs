//! Ordered collection of active skyboxes.

use std::cell::Cell;

use crate::skybox::SkyboxDefinition;

/// Session-scoped store of skybox definitions, iterated in draw order.
///
/// Also carries the "decorations rendered this frame" flag so that the
/// sun, moon and stars are drawn by at most one skybox per frame. The flag
/// is settable through `&self` so it can be consulted while iterating.
pub trait SkyboxRegistry {
    /// Replace every skybox with `skyboxes`, keeping their order.
    fn replace_all(&mut self, skyboxes: Vec<SkyboxDefinition>);

    /// Append `skybox`, or replace in place the one with the same id.
    fn add(&mut self, skybox: SkyboxDefinition) -> Option<SkyboxDefinition>;

    fn remove(&mut self, id: &str) -> Option<SkyboxDefinition>;

    fn get(&self, id: &str) -> Option<&SkyboxDefinition>;

    /// Visit every skybox in draw order.
    fn for_each(&self, visit: &mut dyn FnMut(&SkyboxDefinition));

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn decorations_rendered(&self) -> bool;

    fn set_decorations_rendered(&self, rendered: bool);
}

/// [`SkyboxRegistry`] backed by a `Vec`.
#[derive(Clone, Debug, Default)]
pub struct SkyboxList {
    skyboxes: Vec<SkyboxDefinition>,
    decorations_rendered: Cell<bool>,
}

impl SkyboxList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkyboxDefinition> {
        self.skyboxes.iter()
    }

    /// Ids in draw order.
    pub fn ids(&self) -> Vec<&str> {
        self.skyboxes.iter().map(SkyboxDefinition::id).collect()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.skyboxes.iter().position(|s| s.id() == id)
    }
}

impl SkyboxRegistry for SkyboxList {
    fn replace_all(&mut self, skyboxes: Vec<SkyboxDefinition>) {
        self.skyboxes = skyboxes;
    }

    fn add(&mut self, skybox: SkyboxDefinition) -> Option<SkyboxDefinition> {
        match self.position(skybox.id()) {
            Some(index) => Some(std::mem::replace(&mut self.skyboxes[index], skybox)),
            None => {
                self.skyboxes.push(skybox);
                None
            }
        }
    }

    fn remove(&mut self, id: &str) -> Option<SkyboxDefinition> {
        let index = self.position(id)?;
        Some(self.skyboxes.remove(index))
    }

    fn get(&self, id: &str) -> Option<&SkyboxDefinition> {
        self.skyboxes.iter().find(|s| s.id() == id)
    }

    fn for_each(&self, visit: &mut dyn FnMut(&SkyboxDefinition)) {
        for skybox in &self.skyboxes {
            visit(skybox);
        }
    }

    fn len(&self) -> usize {
        self.skyboxes.len()
    }

    fn decorations_rendered(&self) -> bool {
        self.decorations_rendered.get()
    }

    fn set_decorations_rendered(&self, rendered: bool) {
        self.decorations_rendered.set(rendered);
    }
}
