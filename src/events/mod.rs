//! Event types.
//!
//! - [`timeline`] – animation timeline keys and the callbacks bound to them
pub mod timeline;
