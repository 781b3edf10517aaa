//! The simulation context.
//!
//! [`World`] owns every live entity, the registration order the phase driver
//! walks, the per-kind entity index controllers use to find each other, the
//! clock, the shared asset catalog and the texture store. Nothing here is
//! global: tests and tools can run as many worlds side by side as they like.
//!
//! # Tick contract
//!
//! 1. [`World::start`] runs `on_init` for every component, then `after_init`
//!    for every component.
//! 2. Each frame, [`World::update`] advances the clock and runs the update
//!    pass; [`World::draw`] runs the before-draw, draw and after-draw passes.
//!    Every pass visits all entities before the next pass begins.
//!
//! Entity handles are generational, so a handle kept after the entity was
//! destroyed simply stops resolving.

use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::components::transform::Transform;
use crate::components::{Component, ComponentKind, ComponentType, Ctx, LifecycleState};
use crate::entity::{ComponentSlot, Entity};
use crate::error::{EngineError, EngineResult};
use crate::math::Vector2;
use crate::resources::assets::AssetCatalog;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::phase::{Phase, run_draw_phase, run_phase};
use crate::systems::render::{Canvas, ImageUploader};
use crate::systems::time::update_world_time;

new_key_type! {
    /// Non-owning handle to an entity.
    pub struct EntityId;
}

pub struct World {
    entities: SlotMap<EntityId, Entity>,
    order: Vec<EntityId>,
    kinds: FxHashMap<ComponentKind, Vec<EntityId>>,
    time: WorldTime,
    assets: Arc<AssetCatalog>,
    pub textures: TextureStore,
    /// Draw hitbox outlines after each frame.
    pub debug_hitboxes: bool,
    started: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new(Arc::new(AssetCatalog::default()))
    }
}

impl World {
    pub fn new(assets: Arc<AssetCatalog>) -> Self {
        Self {
            entities: SlotMap::with_key(),
            order: Vec::new(),
            kinds: FxHashMap::default(),
            time: WorldTime::default(),
            assets,
            textures: TextureStore::offline(),
            debug_hitboxes: false,
            started: false,
        }
    }

    pub fn with_textures(mut self, textures: TextureStore) -> Self {
        self.textures = textures;
        self
    }

    pub fn with_time(mut self, time: WorldTime) -> Self {
        self.time = time;
        self
    }

    pub fn time(&self) -> &WorldTime {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut WorldTime {
        &mut self.time
    }

    pub fn assets(&self) -> Arc<AssetCatalog> {
        Arc::clone(&self.assets)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // ---------------------------------------------------------------------
    // Entities
    // ---------------------------------------------------------------------

    /// Register a new empty entity at `position`.
    pub fn spawn(&mut self, position: Vector2) -> EntityId {
        let id = self.entities.insert(Entity::new(Transform::new(position)));
        self.order.push(id);
        debug!("spawned entity {:?} at ({}, {})", id, position.x, position.y);
        id
    }

    /// Spawn an entity and attach `components` in order.
    pub fn spawn_with(
        &mut self,
        position: Vector2,
        components: impl IntoIterator<Item = Component>,
    ) -> EngineResult<EntityId> {
        let id = self.spawn(position);
        for component in components {
            self.add_component(id, component)?;
        }
        Ok(id)
    }

    pub fn add_component(
        &mut self,
        entity: EntityId,
        component: impl Into<Component>,
    ) -> EngineResult<()> {
        let mut component = component.into();
        let target = self
            .entities
            .get_mut(entity)
            .ok_or(EngineError::DeadEntity(entity))?;
        component.hooks().on_attach(entity);
        let slot = ComponentSlot::new(component);
        let kind = slot.kind;
        target.components.push(slot);
        let owners = self.kinds.entry(kind).or_default();
        if !owners.contains(&entity) {
            owners.push(entity);
        }
        Ok(())
    }

    /// Destroy an entity: every present component receives `on_destroy`, then
    /// the entity leaves the registries. Returns `false` if it was already gone.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let Some(mut entity) = self.entities.remove(id) else {
            return false;
        };
        debug!("destroying entity {:?}", id);
        self.order.retain(|e| *e != id);
        for slot in entity.components.iter_mut() {
            if let Some(mut component) = slot.component.take() {
                let mut ctx = Ctx {
                    world: self,
                    entity: id,
                };
                component.hooks().on_destroy(&mut ctx);
            }
            slot.state = LifecycleState::Destroyed;
        }
        for slot in entity.components.iter() {
            self.unregister_kind(slot.kind, id);
        }
        true
    }

    fn unregister_kind(&mut self, kind: ComponentKind, id: EntityId) {
        if let Some(owners) = self.kinds.get_mut(&kind) {
            owners.retain(|e| *e != id);
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    /// Snapshot of live entities in registration order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    /// Entities holding at least one component of `kind`, in the order the
    /// first such component was added.
    pub fn entities_with(&self, kind: ComponentKind) -> &[EntityId] {
        self.kinds.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    // ---------------------------------------------------------------------
    // Components
    // ---------------------------------------------------------------------

    pub fn get_component<T: ComponentType>(&self, id: EntityId) -> Option<&T> {
        self.entities.get(id)?.get_component::<T>()
    }

    pub fn get_component_mut<T: ComponentType>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(id)?.get_component_mut::<T>()
    }

    pub fn get_components<T: ComponentType>(&self, id: EntityId) -> impl Iterator<Item = &T> {
        self.entities
            .get(id)
            .into_iter()
            .flat_map(|e| e.get_components::<T>())
    }

    /// Like [`World::get_component_mut`], but a missing entity or component
    /// is an error.
    pub fn require_component_mut<T: ComponentType>(&mut self, id: EntityId) -> EngineResult<&mut T> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(EngineError::DeadEntity(id))?;
        entity
            .get_component_mut::<T>()
            .ok_or(EngineError::MissingComponent {
                entity: id,
                component: T::NAME,
            })
    }

    /// Detach the first `T` on `id`, run `f` with it and the rest of the
    /// world, then reattach it. Returns `None` if there is no such component.
    pub fn with_component<T: ComponentType, R>(
        &mut self,
        id: EntityId,
        f: impl FnOnce(&mut T, &mut World) -> R,
    ) -> Option<R> {
        let entity = self.entities.get_mut(id)?;
        let index = entity.components.iter().position(|slot| {
            slot.component
                .as_ref()
                .is_some_and(|c| T::downcast_ref(c).is_some())
        })?;
        let mut component = entity.components[index].component.take()?;
        let result = T::downcast_mut(&mut component).map(|typed| f(typed, self));
        self.reattach(id, index, component, None);
        result
    }

    /// Take the component in slot `index` out of its entity, if the slot is
    /// present and its state passes `eligible`.
    pub(crate) fn detach(
        &mut self,
        id: EntityId,
        index: usize,
        eligible: impl Fn(LifecycleState) -> bool,
    ) -> Option<(Component, LifecycleState)> {
        let slot = self.entities.get_mut(id)?.components.get_mut(index)?;
        if !eligible(slot.state) {
            return None;
        }
        let component = slot.component.take()?;
        Some((component, slot.state))
    }

    /// Put a detached component back. If its entity was destroyed meanwhile,
    /// the component gets its `on_destroy` call instead.
    pub(crate) fn reattach(
        &mut self,
        id: EntityId,
        index: usize,
        mut component: Component,
        state: Option<LifecycleState>,
    ) {
        if let Some(slot) = self
            .entities
            .get_mut(id)
            .and_then(|e| e.components.get_mut(index))
        {
            slot.component = Some(component);
            if let Some(state) = state {
                slot.state = state;
            }
            return;
        }
        let mut ctx = Ctx {
            world: self,
            entity: id,
        };
        component.hooks().on_destroy(&mut ctx);
    }

    pub(crate) fn component_count(&self, id: EntityId) -> Option<usize> {
        self.entities.get(id).map(|e| e.components.len())
    }

    // ---------------------------------------------------------------------
    // Transforms
    // ---------------------------------------------------------------------

    /// Resolved world-space position of an entity.
    pub fn position(&self, id: EntityId) -> Option<Vector2> {
        Some(self.entities.get(id)?.transform.position(self))
    }

    /// Set an entity's local position.
    pub fn set_position(&mut self, id: EntityId, position: Vector2) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.transform.set_position(position);
                true
            }
            None => false,
        }
    }

    pub fn set_parent(&mut self, id: EntityId, parent: Option<EntityId>) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.transform.parent = parent;
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Tick
    // ---------------------------------------------------------------------

    /// Initialise every component: all `on_init` calls complete before any
    /// `after_init` call begins.
    pub fn start(&mut self) -> EngineResult<()> {
        run_phase(self, Phase::Init)?;
        run_phase(self, Phase::AfterInit)?;
        self.started = true;
        Ok(())
    }

    /// Advance the clock by `delta` seconds and run the update pass.
    pub fn update(&mut self, delta: f32) -> EngineResult<()> {
        update_world_time(self, delta);
        run_phase(self, Phase::Update)
    }

    /// Run the three draw passes.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) -> EngineResult<()> {
        run_draw_phase(self, Phase::BeforeDraw, canvas)?;
        run_draw_phase(self, Phase::Draw, canvas)?;
        run_draw_phase(self, Phase::AfterDraw, canvas)
    }

    /// One full frame: update pass followed by the draw passes.
    pub fn tick(&mut self, delta: f32, canvas: &mut dyn Canvas) -> EngineResult<()> {
        self.update(delta)?;
        self.draw(canvas)
    }

    /// Hand finished texture loads to the backend.
    pub fn poll_textures(&mut self, uploader: &mut dyn ImageUploader) -> usize {
        self.textures.poll(uploader)
    }
}
