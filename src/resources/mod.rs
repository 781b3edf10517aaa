//! Long-lived data owned by the world or the host loop.
//!
//! Overview
//! - `assets` – read-only sprite and animation tables
//! - `gameconfig` – INI-backed settings for the binary
//! - `prefabs` – declarative entity recipes
//! - `texturestore` – asynchronous texture loading keyed by asset key
//! - `worldtime` – simulation time and delta
pub mod assets;
pub mod gameconfig;
pub mod prefabs;
pub mod texturestore;
pub mod worldtime;
