//! Per-frame physics for every dynamic entity
//!
//! Gravity, ground drag and position integration. Velocities are in units per
//! frame, so one call of each function is one frame of simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::consts::*;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// What a body is resting on this frame. Grounded and wall-sliding exclude each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Footing {
    #[default]
    Airborne,
    Grounded,
    /// Sliding down a wall; a wall jump pushes off toward the given facing
    WallSliding(Facing),
}

/// Position, velocity and footing shared by everything that moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
    pub vel: Vec2,
    pub footing: Footing,
}

impl Body {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            vel: Vec2::ZERO,
            footing: Footing::Airborne,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.footing == Footing::Grounded
    }

    pub fn is_wall_sliding(&self) -> bool {
        matches!(self.footing, Footing::WallSliding(_))
    }
}

/// Accelerate downward, capped at the terminal velocity for the current footing
pub fn gravitate(body: &mut Body) {
    match body.footing {
        Footing::Airborne => {
            if body.vel.y < TERMINAL_VELOCITY {
                body.vel.y = (body.vel.y + GRAVITY).min(TERMINAL_VELOCITY);
            }
        }
        Footing::WallSliding(_) => {
            if body.vel.y < WALL_TERMINAL_VELOCITY {
                body.vel.y = (body.vel.y + WALL_GRAVITY).min(WALL_TERMINAL_VELOCITY);
            }
        }
        Footing::Grounded => {}
    }
}

/// Ground friction: bleed horizontal speed toward zero, snapping to exactly zero
pub fn apply_drag(body: &mut Body) {
    if !body.is_grounded() {
        return;
    }
    if body.vel.x > GROUND_FRICTION {
        body.vel.x -= GROUND_FRICTION;
    } else if body.vel.x < -GROUND_FRICTION {
        body.vel.x += GROUND_FRICTION;
    } else {
        body.vel.x = 0.0;
    }
}

/// Displace the body by its velocity
pub fn integrate(body: &mut Body) {
    body.rect.translate(body.vel);
}

/// Displace the body by its velocity scaled per axis. The stored velocity is untouched.
pub fn integrate_scaled(body: &mut Body, scale: Vec2) {
    body.rect.translate(body.vel * scale);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body_with(vel: Vec2, footing: Footing) -> Body {
        Body {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            vel,
            footing,
        }
    }

    #[test]
    fn test_grounded_bodies_ignore_gravity() {
        let mut body = body_with(Vec2::new(0.0, 0.0), Footing::Grounded);
        gravitate(&mut body);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_wall_slide_uses_reduced_gravity() {
        let mut body = body_with(Vec2::ZERO, Footing::WallSliding(Facing::Left));
        gravitate(&mut body);
        assert_eq!(body.vel.y, WALL_GRAVITY);
        for _ in 0..50 {
            gravitate(&mut body);
        }
        assert_eq!(body.vel.y, WALL_TERMINAL_VELOCITY);
    }

    #[test]
    fn test_dash_scaling_does_not_change_velocity() {
        let mut body = body_with(Vec2::new(4.0, 1.0), Footing::Grounded);
        integrate_scaled(&mut body, Vec2::new(DASH_MULTIPLIER, 1.0));
        assert_eq!(body.rect.x, 8.0);
        assert_eq!(body.rect.y, 1.0);
        assert_eq!(body.vel, Vec2::new(4.0, 1.0));
    }

    #[test]
    fn test_drag_only_on_ground() {
        let mut body = body_with(Vec2::new(3.0, 0.0), Footing::Airborne);
        apply_drag(&mut body);
        assert_eq!(body.vel.x, 3.0);

        body.footing = Footing::Grounded;
        apply_drag(&mut body);
        assert!((body.vel.x - (3.0 - GROUND_FRICTION)).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_gravity_converges_to_terminal(start in -30.0f32..10.0, steps in 0usize..80) {
            let mut body = body_with(Vec2::new(0.0, start), Footing::Airborne);
            let mut last = body.vel.y;
            for _ in 0..steps {
                gravitate(&mut body);
                prop_assert!(body.vel.y <= TERMINAL_VELOCITY);
                prop_assert!(body.vel.y >= last);
                last = body.vel.y;
            }
            if steps as f32 >= (TERMINAL_VELOCITY - start) / GRAVITY + 1.0 {
                prop_assert_eq!(body.vel.y, TERMINAL_VELOCITY);
            }
        }

        #[test]
        fn prop_drag_snaps_to_zero(dx in -GROUND_FRICTION..=GROUND_FRICTION) {
            let mut body = body_with(Vec2::new(dx, 0.0), Footing::Grounded);
            apply_drag(&mut body);
            prop_assert_eq!(body.vel.x, 0.0);
        }

        #[test]
        fn prop_drag_never_overshoots(dx in -50.0f32..50.0) {
            let mut body = body_with(Vec2::new(dx, 0.0), Footing::Grounded);
            apply_drag(&mut body);
            prop_assert!(body.vel.x == 0.0 || body.vel.x.signum() == dx.signum());
            prop_assert!(body.vel.x.abs() <= dx.abs());
        }
    }
}
