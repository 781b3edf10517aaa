//! Phase driver.
//!
//! A phase is one full pass over every live entity in registration order and,
//! within an entity, over its components in insertion order. The pass walks a
//! snapshot of the registration order taken when it starts:
//!
//! - entities spawned during a pass are first visited by the next pass;
//! - entities destroyed during a pass are skipped when their turn comes.
//!
//! Each hook runs with its component detached from the entity (see
//! [`Ctx`](crate::components::Ctx)), so a hook can freely mutate the world,
//! including destroying its own entity.
//!
//! # Lifecycle
//!
//! | Phase        | Runs on slots in state      | Moves slot to |
//! |--------------|-----------------------------|---------------|
//! | `Init`       | `Attached`                  | `Initialized` |
//! | `AfterInit`  | `Initialized`               | `Active`      |
//! | `Update`     | any live state              | `Active`      |
//! | draw phases  | `Active`                    | unchanged     |
//!
//! The update pass initialises late components itself before their first
//! `update`: per entity, every pending `on_init`, then every pending
//! `after_init`, then the updates.

use crate::components::{Component, Ctx, LifecycleState};
use crate::error::EngineResult;
use crate::systems::render::Canvas;
use crate::world::{EntityId, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    AfterInit,
    Update,
    BeforeDraw,
    Draw,
    AfterDraw,
}

impl Phase {
    fn accepts(self, state: LifecycleState) -> bool {
        match self {
            Phase::Init => state == LifecycleState::Attached,
            Phase::AfterInit => state == LifecycleState::Initialized,
            Phase::Update => state != LifecycleState::Destroyed,
            Phase::BeforeDraw | Phase::Draw | Phase::AfterDraw => state == LifecycleState::Active,
        }
    }
}

/// Run a non-drawing phase over the whole world.
///
/// The update pass brings late entities up first: every `Attached` slot of
/// the entity gets `on_init`, then every `Initialized` slot gets
/// `after_init`, and only then does any slot of that entity see `update`.
pub fn run_phase(world: &mut World, phase: Phase) -> EngineResult<()> {
    if phase != Phase::Update {
        return for_each_slot(world, phase, run_hook);
    }
    for entity in world.entity_ids() {
        for step in [Phase::Init, Phase::AfterInit, Phase::Update] {
            for_each_slot_of(world, entity, step, &mut run_hook)?;
        }
    }
    Ok(())
}

fn run_hook(
    phase: Phase,
    component: &mut Component,
    ctx: &mut Ctx<'_>,
    state: LifecycleState,
) -> EngineResult<LifecycleState> {
    let hooks = component.hooks();
    match phase {
        Phase::Init => {
            hooks.on_init(ctx)?;
            Ok(LifecycleState::Initialized)
        }
        Phase::AfterInit => {
            hooks.after_init(ctx)?;
            Ok(LifecycleState::Active)
        }
        _ => {
            // Added by a sibling earlier in this same pass.
            if state == LifecycleState::Attached {
                hooks.on_init(ctx)?;
            }
            if state != LifecycleState::Active {
                hooks.after_init(ctx)?;
            }
            hooks.update(ctx)?;
            Ok(LifecycleState::Active)
        }
    }
}

/// Run one of the draw phases over the whole world.
pub fn run_draw_phase(world: &mut World, phase: Phase, canvas: &mut dyn Canvas) -> EngineResult<()> {
    for_each_slot(world, phase, |_, component, ctx, state| {
        let hooks = component.hooks();
        match phase {
            Phase::BeforeDraw => hooks.before_draw(ctx, canvas)?,
            Phase::Draw => hooks.on_draw(ctx, canvas)?,
            _ => hooks.after_draw(ctx, canvas)?,
        }
        Ok(state)
    })
}

fn for_each_slot<F>(world: &mut World, phase: Phase, mut run: F) -> EngineResult<()>
where
    F: FnMut(Phase, &mut Component, &mut Ctx<'_>, LifecycleState) -> EngineResult<LifecycleState>,
{
    for entity in world.entity_ids() {
        for_each_slot_of(world, entity, phase, &mut run)?;
    }
    Ok(())
}

fn for_each_slot_of<F>(
    world: &mut World,
    entity: EntityId,
    phase: Phase,
    run: &mut F,
) -> EngineResult<()>
where
    F: FnMut(Phase, &mut Component, &mut Ctx<'_>, LifecycleState) -> EngineResult<LifecycleState>,
{
    let mut index = 0;
    while let Some(count) = world.component_count(entity) {
        if index >= count {
            break;
        }
        run_slot(world, entity, index, phase, run)?;
        index += 1;
    }
    Ok(())
}

fn run_slot<F>(
    world: &mut World,
    entity: EntityId,
    index: usize,
    phase: Phase,
    run: &mut F,
) -> EngineResult<()>
where
    F: FnMut(Phase, &mut Component, &mut Ctx<'_>, LifecycleState) -> EngineResult<LifecycleState>,
{
    let Some((mut component, state)) = world.detach(entity, index, |s| phase.accepts(s)) else {
        return Ok(());
    };
    let mut ctx = Ctx {
        world: &mut *world,
        entity,
    };
    let result = run(phase, &mut component, &mut ctx, state);
    let next = result.as_ref().ok().copied();
    world.reattach(entity, index, component, next);
    result.map(|_| ())
}
