//! Player projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::physics::Facing;
use crate::consts::*;

/// A straight-flying shot. Horizontal speed never changes after firing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub rect: Rect,
    pub dx: f32,
    pub facing: Facing,
}

impl Bullet {
    /// Fire from a shooter's center, inheriting the shooter's horizontal speed
    pub fn fire(shooter_center: Vec2, facing: Facing, shooter_dx: f32) -> Self {
        Self {
            rect: Rect::new(
                shooter_center.x,
                shooter_center.y - BULLET_MUZZLE_RISE,
                BULLET_WIDTH,
                BULLET_HEIGHT,
            ),
            dx: BULLET_SPEED * facing.sign() + shooter_dx,
            facing,
        }
    }

    pub fn advance(&mut self) {
        self.rect.translate(Vec2::new(self.dx, 0.0));
    }

    pub fn is_off_screen(&self, width: f32) -> bool {
        self.rect.x < 0.0 || self.rect.x > width
    }
}
