//! Engine systems.
//!
//! This module groups the code that drives the world forward and the draw
//! boundary towards rendering backends.
//!
//! Submodules overview
//! - [`phase`] – run one lifecycle phase over every live entity
//! - [`render`] – canvas and image-upload traits, Y flip, recording canvas
//! - [`time`] – update simulation time and delta
//! - `raylib_backend` – raylib canvas and texture upload (feature `raylib`)

pub mod phase;
#[cfg(feature = "raylib")]
pub mod raylib_backend;
pub mod render;
pub mod time;
