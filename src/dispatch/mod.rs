//! Frame dispatch: registry of active skyboxes, the draw interface and the
//! dispatcher tying them to the visibility logic.

pub mod dispatcher;
pub mod registry;
pub mod surface;

pub use dispatcher::SkyboxDispatcher;
pub use registry::{SkyboxList, SkyboxRegistry};
pub use surface::{DrawCall, DrawSurface, FrameOutput, NullSurface};
