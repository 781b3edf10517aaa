use crate::components::health::Health;
use crate::components::transform::Transform;
use crate::components::{Ctx, Hooks};
use crate::error::{EngineError, EngineResult};
use crate::math::{Bounds, Size, Vector2};
use crate::systems::render::{Canvas, Color, flip_y};
use crate::world::EntityId;

/// Health bar floating at an offset from its entity.
///
/// Draws a background rectangle and a fill whose width follows the ratio of
/// the entity's first [`Health`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingHealth {
    pub transform: Transform,
    pub size: Size,
    pub background: Color,
    pub fill: Color,
}

impl FloatingHealth {
    pub fn new(offset: Vector2, size: Size) -> Self {
        Self {
            transform: Transform::new(offset),
            size,
            background: Color::DARK_GRAY,
            fill: Color::RED,
        }
    }

    pub fn with_colors(mut self, background: Color, fill: Color) -> Self {
        self.background = background;
        self.fill = fill;
        self
    }
}

impl Hooks for FloatingHealth {
    fn on_attach(&mut self, entity: EntityId) {
        self.transform.parent = Some(entity);
    }

    fn on_draw(&mut self, ctx: &mut Ctx<'_>, canvas: &mut dyn Canvas) -> EngineResult<()> {
        let ratio = ctx
            .world
            .get_component::<Health>(ctx.entity)
            .ok_or(EngineError::MissingComponent {
                entity: ctx.entity,
                component: "Health",
            })?
            .ratio();
        let origin = self.transform.position(ctx.world);
        let back = Bounds::new(origin.x, origin.y, self.size.width, self.size.height);
        let front = Bounds {
            width: self.size.width * ratio,
            ..back
        };
        canvas.fill_rect(flip_y(back, canvas.height()), self.background);
        canvas.fill_rect(flip_y(front, canvas.height()), self.fill);
        Ok(())
    }
}
