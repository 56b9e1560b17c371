//! Core types and utilities shared by the skybox modules

pub mod types;
pub mod error;
pub mod logging;
pub mod time;

pub use types::*;
pub use error::{DecodeError, Error};
