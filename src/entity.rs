//! Entities: a transform plus an ordered list of component slots.
//!
//! Slot order is insertion order and is significant: components update and
//! draw in the order they were added, which gives draw layering within an
//! entity.

use smallvec::SmallVec;

use crate::components::transform::Transform;
use crate::components::{Component, ComponentKind, ComponentType, LifecycleState};

#[derive(Debug)]
pub struct ComponentSlot {
    pub(crate) kind: ComponentKind,
    pub(crate) state: LifecycleState,
    /// `None` while the component is detached to run one of its hooks.
    pub(crate) component: Option<Component>,
}

impl ComponentSlot {
    pub(crate) fn new(component: Component) -> Self {
        Self {
            kind: component.kind(),
            state: LifecycleState::Attached,
            component: Some(component),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }
}

#[derive(Debug, Default)]
pub struct Entity {
    pub transform: Transform,
    pub(crate) components: SmallVec<[ComponentSlot; 6]>,
}

impl Entity {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            components: SmallVec::new(),
        }
    }

    pub fn slots(&self) -> &[ComponentSlot] {
        &self.components
    }

    /// First component of type `T`, in insertion order.
    pub fn get_component<T: ComponentType>(&self) -> Option<&T> {
        self.components
            .iter()
            .filter_map(|slot| slot.component.as_ref())
            .find_map(T::downcast_ref)
    }

    pub fn get_component_mut<T: ComponentType>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .filter_map(|slot| slot.component.as_mut())
            .find_map(T::downcast_mut)
    }

    /// Every component of type `T`, in insertion order.
    pub fn get_components<T: ComponentType>(&self) -> impl Iterator<Item = &T> {
        self.components
            .iter()
            .filter_map(|slot| slot.component.as_ref())
            .filter_map(T::downcast_ref)
    }

    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|slot| slot.kind == kind)
    }
}
