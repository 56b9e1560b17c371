//! Skylayer - layered skybox visibility and blending
//!
//! Skybox documents are decoded into immutable definitions
//! ([`skybox::decode()`]), loaded in batches from a document source
//! ([`resource`]), and evaluated every frame by the
//! [`dispatch::SkyboxDispatcher`], which hands visible layers to a
//! host-provided [`dispatch::DrawSurface`].

pub mod core;
pub mod skybox;
pub mod resource;
pub mod dispatch;
