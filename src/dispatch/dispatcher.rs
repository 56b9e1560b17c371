//! Per-frame orchestration of the skybox stack.

use std::collections::HashMap;

use crate::core::Result;
use crate::dispatch::registry::{SkyboxList, SkyboxRegistry};
use crate::dispatch::surface::{DrawCall, DrawSurface, FrameOutput};
use crate::resource::{DocumentSource, LoaderConfig, ReloadReport, load_batch};
use crate::skybox::fade;
use crate::skybox::{EnvironmentSnapshot, RuntimeState, SkyboxDefinition, TimeOfDay, VariantRegistry};

/// Owns the skybox registry and every skybox's runtime state.
///
/// `reload` and `render_frame` both take `&mut self`, so a frame never
/// observes a half-replaced batch.
pub struct SkyboxDispatcher<R: SkyboxRegistry = SkyboxList> {
    variants: VariantRegistry,
    registry: R,
    states: HashMap<String, RuntimeState>,
}

impl SkyboxDispatcher<SkyboxList> {
    /// Empty dispatcher with the built-in variant kinds.
    pub fn new() -> Self {
        Self::with_registry(SkyboxList::new())
    }
}

impl Default for SkyboxDispatcher<SkyboxList> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SkyboxRegistry> SkyboxDispatcher<R> {
    pub fn with_registry(registry: R) -> Self {
        Self {
            variants: VariantRegistry::default(),
            registry,
            states: HashMap::new(),
        }
    }

    pub fn variants(&self) -> &VariantRegistry {
        &self.variants
    }

    /// Register additional variant kinds before the next reload.
    pub fn variants_mut(&mut self) -> &mut VariantRegistry {
        &mut self.variants
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Replace the active skyboxes with everything `source` offers.
    ///
    /// If the source itself fails, the current batch stays active.
    pub fn reload(&mut self, source: &dyn DocumentSource, config: &LoaderConfig) -> Result<ReloadReport> {
        let (definitions, report) = load_batch(source, config, &self.variants)?;
        self.replace_all(definitions);
        Ok(report)
    }

    /// Replace the active skyboxes and discard all runtime state.
    pub fn replace_all(&mut self, skyboxes: Vec<SkyboxDefinition>) {
        self.states.clear();
        self.registry.replace_all(skyboxes);
    }

    /// Add a skybox with fresh runtime state, replacing any with the same id.
    pub fn add(&mut self, skybox: SkyboxDefinition) -> Option<SkyboxDefinition> {
        self.states.remove(skybox.id());
        self.registry.add(skybox)
    }

    pub fn remove(&mut self, id: &str) -> Option<SkyboxDefinition> {
        self.states.remove(id);
        self.registry.remove(id)
    }

    /// Runtime state of a skybox that has been through at least one frame.
    pub fn state(&self, id: &str) -> Option<&RuntimeState> {
        self.states.get(id)
    }

    pub fn alpha(&self, id: &str) -> Option<f32> {
        self.state(id).map(|s| s.alpha)
    }

    /// Advance every skybox by one frame and draw the visible ones.
    ///
    /// Skyboxes are evaluated in registry order; the fog of the last visible
    /// fog-changing skybox wins.
    pub fn render_frame(
        &mut self,
        env: &EnvironmentSnapshot,
        now_millis: u64,
        surface: &mut dyn DrawSurface,
    ) -> FrameOutput {
        let time = TimeOfDay::from_world_time(env.time_of_day);
        let mut output = FrameOutput::default();

        self.registry.set_decorations_rendered(false);
        let registry = &self.registry;
        let states = &mut self.states;

        registry.for_each(&mut |skybox| {
            if !states.contains_key(skybox.id()) {
                states.insert(skybox.id().to_string(), RuntimeState::default());
            }
            let Some(state) = states.get_mut(skybox.id()) else {
                return;
            };

            let matches = skybox.conditions().matches(env);
            let faded = fade::step(skybox.properties(), matches, time, &mut state.alpha);
            let textures = skybox.payload().select_textures(&mut state.cursor, now_millis);

            if let Some(fog) = faded.fog {
                output.fog = Some(fog);
            }

            let Some(textures) = textures else {
                return;
            };
            if faded.alpha <= 0.0 {
                return;
            }

            let draw_decorations = !registry.decorations_rendered() && skybox.decorations().any_enabled();
            surface.draw(&DrawCall {
                skybox,
                textures,
                alpha: faded.alpha,
                draw_decorations,
            });
            if draw_decorations {
                registry.set_decorations_rendered(true);
            }
            output.drawn += 1;
        });

        output
    }
}
