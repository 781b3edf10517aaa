//! Components attached to entities.
//!
//! The component set is closed: every kind is a variant of [`Component`] and
//! carries a [`ComponentKind`] tag used by the world's per-kind index. Each
//! component implements [`Hooks`], the lifecycle capability set the phase
//! driver calls into. Typed lookups go through [`ComponentType`].
//!
//! Submodules overview:
//! - [`animation`] – frame-driven sprite animation state
//! - [`animatedsprite`] – sprite playing named animations and timeline keys
//! - [`attack`] – cooldown-gated attack bound to animation timeline keys
//! - [`controller`] – target-seeking movement state machine
//! - [`floatinghealth`] – health bar drawn above an entity
//! - [`health`] – damage and death state
//! - [`hitbox`] – passive axis-aligned collision volume
//! - [`hurtbox`] – active collision volume applying damage on overlap
//! - [`sprite`] – static sprite drawing a region of a texture
//! - [`transform`] – position with optional parent-relative composition

pub mod animatedsprite;
pub mod animation;
pub mod attack;
pub mod controller;
pub mod floatinghealth;
pub mod health;
pub mod hitbox;
pub mod hurtbox;
pub mod sprite;
pub mod transform;

use crate::error::EngineResult;
use crate::systems::render::Canvas;
use crate::world::{EntityId, World};

use animatedsprite::AnimatedSprite;
use attack::Attack;
use controller::CharacterController;
use floatinghealth::FloatingHealth;
use health::Health;
use hitbox::Hitbox;
use hurtbox::Hurtbox;
use sprite::Sprite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Sprite,
    AnimatedSprite,
    Hitbox,
    Hurtbox,
    Health,
    FloatingHealth,
    Attack,
    SlimeController,
    EnemyController,
}

/// Where a component slot is in its lifecycle. An unattached component is a
/// plain value that has not been added to a world yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Attached,
    Initialized,
    Active,
    Destroyed,
}

/// Execution context handed to every hook: the world and the owning entity.
///
/// While a hook runs, its component is detached from the entity, so lookups on
/// the owning entity only see its siblings.
pub struct Ctx<'a> {
    pub world: &'a mut World,
    pub entity: EntityId,
}

impl Ctx<'_> {
    /// Seconds since the simulation started.
    pub fn time(&self) -> f64 {
        self.world.time().elapsed
    }

    /// Seconds since the previous frame.
    pub fn delta(&self) -> f32 {
        self.world.time().delta
    }
}

/// Lifecycle capability set. Every hook is optional.
pub trait Hooks {
    /// Called once when the component is added to an entity.
    fn on_attach(&mut self, _entity: EntityId) {}
    fn on_init(&mut self, _ctx: &mut Ctx<'_>) -> EngineResult<()> {
        Ok(())
    }
    fn after_init(&mut self, _ctx: &mut Ctx<'_>) -> EngineResult<()> {
        Ok(())
    }
    fn update(&mut self, _ctx: &mut Ctx<'_>) -> EngineResult<()> {
        Ok(())
    }
    fn before_draw(&mut self, _ctx: &mut Ctx<'_>, _canvas: &mut dyn Canvas) -> EngineResult<()> {
        Ok(())
    }
    fn on_draw(&mut self, _ctx: &mut Ctx<'_>, _canvas: &mut dyn Canvas) -> EngineResult<()> {
        Ok(())
    }
    fn after_draw(&mut self, _ctx: &mut Ctx<'_>, _canvas: &mut dyn Canvas) -> EngineResult<()> {
        Ok(())
    }
    fn on_destroy(&mut self, _ctx: &mut Ctx<'_>) {}
}

/// Typed view into the closed component set.
pub trait ComponentType: Sized + 'static {
    const NAME: &'static str;
    fn downcast_ref(component: &Component) -> Option<&Self>;
    fn downcast_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! component_set {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        #[derive(Debug)]
        pub enum Component {
            $($variant($ty)),*
        }

        impl Component {
            pub fn hooks(&mut self) -> &mut dyn Hooks {
                match self {
                    $(Component::$variant(c) => c),*
                }
            }
        }

        $(
            impl From<$ty> for Component {
                fn from(component: $ty) -> Self {
                    Component::$variant(component)
                }
            }

            impl ComponentType for $ty {
                const NAME: &'static str = stringify!($variant);

                fn downcast_ref(component: &Component) -> Option<&Self> {
                    match component {
                        Component::$variant(c) => Some(c),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn downcast_mut(component: &mut Component) -> Option<&mut Self> {
                    match component {
                        Component::$variant(c) => Some(c),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )*
    };
}

component_set! {
    Sprite(Sprite),
    AnimatedSprite(AnimatedSprite),
    Hitbox(Hitbox),
    Hurtbox(Hurtbox),
    Health(Health),
    FloatingHealth(FloatingHealth),
    Attack(Attack),
    Controller(CharacterController),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Sprite(_) => ComponentKind::Sprite,
            Component::AnimatedSprite(_) => ComponentKind::AnimatedSprite,
            Component::Hitbox(_) => ComponentKind::Hitbox,
            Component::Hurtbox(_) => ComponentKind::Hurtbox,
            Component::Health(_) => ComponentKind::Health,
            Component::FloatingHealth(_) => ComponentKind::FloatingHealth,
            Component::Attack(_) => ComponentKind::Attack,
            Component::Controller(c) => c.kind(),
        }
    }
}
