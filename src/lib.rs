//! Slimebrawl library.
//!
//! This module exposes the entity-component kernel (world, entities,
//! components), the data-driven entity builder, resources and the draw
//! boundary, for use by the binary, integration tests and tools.

pub mod builder;
pub mod components;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod math;
pub mod resources;
pub mod systems;
pub mod world;
