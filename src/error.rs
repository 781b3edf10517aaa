//! Engine error type.
//!
//! Lookup failures (assets, animations, prefabs, component kinds) are fatal at
//! construction time. A missing sibling component is a malformed prefab and
//! surfaces as [`EngineError::MissingComponent`].

use thiserror::Error;

use crate::world::EntityId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown asset '{0}'")]
    UnknownAsset(String),

    #[error("asset '{asset}' has no animation named '{animation}'")]
    UnknownAnimation { asset: String, animation: String },

    #[error("unknown prefab '{0}'")]
    UnknownPrefab(String),

    #[error("unknown kind '{0}' in prefab data")]
    UnknownKind(String),

    #[error("bad argument {index} for '{kind}': expected {expected}")]
    BadArgument {
        kind: String,
        index: usize,
        expected: &'static str,
    },

    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: EntityId,
        component: &'static str,
    },

    #[error("entity {0:?} is not alive")]
    DeadEntity(EntityId),

    #[error("config error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
