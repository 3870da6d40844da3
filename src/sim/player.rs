//! Player state machine
//!
//! Footing (airborne / grounded / wall-sliding) lives on the body and is
//! mutually exclusive. Dashing, stun and the pending wall jump are orthogonal
//! and each owns a cooldown counter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::collision::{TileHit, TileResponder};
use super::geom::Rect;
use super::physics::{self, Body, Facing, Footing};
use super::state::{Effect, SoundId};
use super::tick::InputEvent;
use crate::consts::*;
use crate::same_sign;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Player slot, used for HUD colors
    pub id: u8,
    pub body: Body,
    pub hp: i32,
    pub facing: Facing,
    /// Direction currently held on the stick, if any
    pub held_direction: Option<Facing>,

    pub second_jump_available: bool,
    /// Pending wall jump and the direction it pushes off toward
    pub wall_jump: Option<Facing>,
    pub dashing: bool,
    pub stunned: bool,

    // === Cooldowns (frames) ===
    pub dash_cooldown: u32,
    pub wall_jump_cooldown: u32,
    pub stun_cooldown: u32,
    /// Counts down after landing; wall contact can't turn the player meanwhile
    pub landing_cooldown: u32,
}

impl Player {
    pub fn new(id: u8, x: f32, y: f32) -> Self {
        Self {
            id,
            body: Body::new(Rect::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT)),
            hp: PLAYER_HP,
            facing: Facing::Right,
            held_direction: None,
            second_jump_available: true,
            wall_jump: None,
            dashing: false,
            stunned: false,
            dash_cooldown: 0,
            wall_jump_cooldown: 0,
            stun_cooldown: 0,
            landing_cooldown: 0,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    pub fn center(&self) -> Vec2 {
        self.body.rect.center()
    }

    /// Apply one input event. Returns a bullet if the player fired.
    pub fn control(&mut self, event: InputEvent, effects: &mut Vec<Effect>) -> Option<Bullet> {
        match event {
            InputEvent::Left => {
                self.run(Facing::Left);
                self.held_direction = Some(Facing::Left);
            }
            InputEvent::Right => {
                self.run(Facing::Right);
                self.held_direction = Some(Facing::Right);
            }
            InputEvent::NoDirection => {
                physics::apply_drag(&mut self.body);
                self.held_direction = None;
            }
            InputEvent::Down => {
                self.fast_fall();
                physics::apply_drag(&mut self.body);
            }
            InputEvent::Jump => self.jump(effects),
            InputEvent::JumpReleased => self.release_jump(),
            InputEvent::Dash => self.dash(),
            InputEvent::Shoot => return Some(self.shoot()),
            InputEvent::Pause => {}
        }
        None
    }

    /// Accelerate toward `direction`, braking hard first if moving the other way
    pub fn run(&mut self, direction: Facing) {
        let sign = direction.sign();
        let along = self.body.vel.x * sign;

        let along = if along >= 0.0 && along < PLAYER_TOP_SPEED {
            along + PLAYER_ACCELERATION
        } else if along <= -PLAYER_GROUND_DECELERATION {
            along + PLAYER_GROUND_DECELERATION
        } else if along <= 0.0 && along > -PLAYER_GROUND_DECELERATION {
            0.0
        } else {
            along
        };
        self.body.vel.x = along * sign;

        if self.wall_jump_cooldown == 0 {
            self.facing = direction;
        }
    }

    /// Ground jump, then the single air jump, then a wall jump.
    /// An air jump leaves a pending wall jump armed for the next press.
    pub fn jump(&mut self, effects: &mut Vec<Effect>) {
        if self.body.is_grounded() {
            effects.push(Effect::PlaySound(SoundId::Jump));
            self.body.vel.y = -JUMP_POWER;
            self.body.footing = Footing::Airborne;
            self.second_jump_available = true;
        } else if self.second_jump_available {
            effects.push(Effect::PlaySound(SoundId::AirJump));
            self.body.vel.y = -JUMP_POWER;
            self.second_jump_available = false;
        } else if let Some(push_off) = self.wall_jump.take() {
            effects.push(Effect::PlaySound(SoundId::Jump));
            self.body.vel.y = -JUMP_POWER * WALL_JUMP_ANGLE.sin();
            self.body.vel.x = JUMP_POWER * WALL_JUMP_ANGLE.cos() * push_off.sign();
            self.second_jump_available = true;
            self.body.footing = Footing::Airborne;
        }
    }

    /// Letting go of jump stops the ascent
    pub fn release_jump(&mut self) {
        if self.body.vel.y < 0.0 {
            self.body.vel.y = 0.0;
        }
    }

    pub fn dash(&mut self) {
        if self.body.is_grounded() || self.body.is_wall_sliding() {
            self.dashing = true;
            self.dash_cooldown = DASH_DURATION;
        }
    }

    pub fn fast_fall(&mut self) {
        if !self.body.is_grounded() {
            self.body.vel.y = TERMINAL_VELOCITY;
        }
    }

    pub fn shoot(&self) -> Bullet {
        Bullet::fire(self.center(), self.facing, self.body.vel.x)
    }

    /// Count every cooldown down by one frame
    pub fn tick_cooldowns(&mut self) {
        if self.dashing && self.dash_cooldown > 0 {
            self.dash_cooldown -= 1;
        }
        if self.dash_cooldown == 0 && self.body.is_grounded() {
            self.dashing = false;
        }

        if self.wall_jump_cooldown > 0 {
            self.wall_jump_cooldown -= 1;
        } else {
            self.wall_jump = None;
        }

        if self.stunned && self.stun_cooldown > 0 {
            self.stun_cooldown -= 1;
        }
        if self.stun_cooldown == 0 {
            self.stunned = false;
        }

        self.landing_cooldown = self.landing_cooldown.saturating_sub(1);
    }

    /// Move by this frame's velocity; dashing doubles horizontal travel only
    pub fn integrate(&mut self) {
        if self.dashing {
            physics::integrate_scaled(&mut self.body, Vec2::new(DASH_MULTIPLIER, 1.0));
        } else {
            physics::integrate(&mut self.body);
        }
    }

    /// Take contact damage. A stunned player can't be hurt again until the stun wears off.
    pub fn take_hit(
        &mut self,
        damage: i32,
        knockback: f32,
        attacker_dx: f32,
        effects: &mut Vec<Effect>,
    ) -> bool {
        assert!(damage >= 0, "contact damage must not heal");
        if self.stunned {
            return false;
        }
        effects.push(Effect::PlaySound(SoundId::Hurt));
        self.stunned = true;
        self.stun_cooldown = STUN_DURATION;
        self.hp -= damage;
        self.body.vel.x = same_sign(knockback, attacker_dx);
        self.body.vel.y = -knockback;
        true
    }

    fn hit_floor(&mut self) {
        // Still rising through the tile
        if self.body.vel.y < 0.0 {
            return;
        }
        self.body.vel.y = 0.0;
        self.body.footing = Footing::Grounded;
        self.second_jump_available = true;
        self.landing_cooldown = LANDING_FACING_LOCK;
    }

    fn hit_ceiling(&mut self) {
        if self.body.vel.y < 0.0 {
            self.body.vel.y = -self.body.vel.y / 2.0;
        }
    }

    fn hit_wall(&mut self, push_off: Facing) {
        if self.landing_cooldown == 0 {
            self.body.vel.x = 0.0;
            self.facing = push_off;
        }

        if self.held_direction.is_some() {
            self.body.footing = Footing::WallSliding(push_off);
            self.wall_jump = Some(push_off);
            self.wall_jump_cooldown = WALL_JUMP_WINDOW;
        } else if self.body.is_wall_sliding() {
            self.body.footing = Footing::Airborne;
        }
    }
}

impl TileResponder for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn on_tile_hit(&mut self, hit: TileHit) {
        match hit {
            TileHit::Floor => self.hit_floor(),
            TileHit::Ceiling => self.hit_ceiling(),
            TileHit::Wall(push_off) => self.hit_wall(push_off),
        }
    }

    fn on_airborne(&mut self) {
        self.body.footing = Footing::Airborne;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::resolve_tile_collisions;
    use crate::sim::tilemap::Tile;

    fn grounded_player() -> Player {
        let mut player = Player::new(0, 100.0, 100.0);
        player.body.footing = Footing::Grounded;
        player
    }

    #[test]
    fn test_landing_scenario() {
        // Bottom edge 5 units into a tile, falling at 8
        let mut player = Player::new(0, 102.0, 0.0);
        player.body.rect.set_bottom(105.0);
        player.body.vel.y = 8.0;
        let floor = Tile {
            rect: Rect::new(100.0, 100.0, 32.0, 32.0),
        };

        assert!(resolve_tile_collisions(&mut player, &[floor]));
        assert!(player.body.is_grounded());
        assert_eq!(player.body.vel.y, 0.0);
        assert_eq!(player.landing_cooldown, LANDING_FACING_LOCK);
        assert!(player.second_jump_available);
    }

    #[test]
    fn test_air_jump_after_walking_off_ledge() {
        let mut effects = Vec::new();
        let mut player = Player::new(0, 102.0, 0.0);
        player.second_jump_available = false;
        player.body.rect.set_bottom(105.0);
        player.body.vel.y = 8.0;
        let floor = Tile {
            rect: Rect::new(100.0, 100.0, 32.0, 32.0),
        };
        assert!(resolve_tile_collisions(&mut player, &[floor]));

        // Ground drops away without a jump
        player.body.rect.x = 300.0;
        assert!(!resolve_tile_collisions(&mut player, &[floor]));
        assert_eq!(player.body.footing, Footing::Airborne);

        player.jump(&mut effects);
        assert_eq!(player.body.vel.y, -JUMP_POWER);
        assert!(!player.second_jump_available);
        assert_eq!(effects, vec![Effect::PlaySound(SoundId::AirJump)]);
    }

    #[test]
    fn test_air_jump_spent_before_wall_jump() {
        let mut effects = Vec::new();
        let mut player = Player::new(0, 100.0, 100.0);
        player.held_direction = Some(Facing::Left);
        player.on_tile_hit(TileHit::Wall(Facing::Right));
        assert!(player.second_jump_available);
        assert_eq!(player.wall_jump, Some(Facing::Right));

        player.jump(&mut effects);
        assert_eq!(player.body.vel, Vec2::new(0.0, -JUMP_POWER));
        assert!(!player.second_jump_available);
        assert_eq!(player.wall_jump, Some(Facing::Right));

        player.jump(&mut effects);
        assert!(player.body.vel.x > 0.0);
        assert_eq!(player.wall_jump, None);
        assert!(player.second_jump_available);
        assert_eq!(
            effects,
            vec![
                Effect::PlaySound(SoundId::AirJump),
                Effect::PlaySound(SoundId::Jump)
            ]
        );
    }

    #[test]
    fn test_jump_priority() {
        let mut effects = Vec::new();
        let mut player = grounded_player();

        player.jump(&mut effects);
        assert_eq!(player.body.vel.y, -JUMP_POWER);
        assert!(!player.body.is_grounded());
        assert!(player.second_jump_available);

        player.body.vel.y = -3.0;
        player.jump(&mut effects);
        assert_eq!(player.body.vel.y, -JUMP_POWER);
        assert!(!player.second_jump_available);

        player.body.vel.y = 2.0;
        player.jump(&mut effects);
        assert_eq!(player.body.vel.y, 2.0);

        assert_eq!(
            effects,
            vec![
                Effect::PlaySound(SoundId::Jump),
                Effect::PlaySound(SoundId::AirJump)
            ]
        );
    }

    #[test]
    fn test_wall_jump_pushes_off() {
        let mut effects = Vec::new();
        let mut player = Player::new(0, 100.0, 100.0);
        player.held_direction = Some(Facing::Left);
        player.second_jump_available = false;

        player.on_tile_hit(TileHit::Wall(Facing::Right));
        assert_eq!(player.body.footing, Footing::WallSliding(Facing::Right));
        assert_eq!(player.facing, Facing::Right);

        player.jump(&mut effects);
        assert!(player.body.vel.x > 0.0);
        assert!((player.body.vel.y + JUMP_POWER * WALL_JUMP_ANGLE.sin()).abs() < 1e-4);
        assert!(player.second_jump_available);
        assert_eq!(player.wall_jump, None);
        assert_eq!(player.body.footing, Footing::Airborne);
    }

    #[test]
    fn test_wall_without_input_does_not_slide() {
        let mut player = Player::new(0, 100.0, 100.0);
        player.body.vel.x = 4.0;
        player.on_tile_hit(TileHit::Wall(Facing::Left));
        assert_eq!(player.body.footing, Footing::Airborne);
        assert_eq!(player.body.vel.x, 0.0);
        assert_eq!(player.wall_jump, None);
    }

    #[test]
    fn test_landing_lock_keeps_facing() {
        let mut player = grounded_player();
        player.held_direction = Some(Facing::Right);
        player.landing_cooldown = LANDING_FACING_LOCK;
        player.body.vel.x = 4.0;

        player.on_tile_hit(TileHit::Wall(Facing::Left));
        assert_eq!(player.facing, Facing::Right);
        assert_eq!(player.body.vel.x, 4.0);
        // Grounded and wall-sliding never coexist
        assert_eq!(player.body.footing, Footing::WallSliding(Facing::Left));
    }

    #[test]
    fn test_wall_jump_window_expires() {
        let mut player = Player::new(0, 100.0, 100.0);
        player.held_direction = Some(Facing::Right);
        player.on_tile_hit(TileHit::Wall(Facing::Left));
        for _ in 0..=WALL_JUMP_WINDOW {
            player.tick_cooldowns();
        }
        assert_eq!(player.wall_jump, None);
    }

    #[test]
    fn test_run_accelerates_and_brakes() {
        let mut player = grounded_player();
        player.run(Facing::Right);
        assert!((player.body.vel.x - PLAYER_ACCELERATION).abs() < 1e-6);

        player.body.vel.x = 4.0;
        player.run(Facing::Left);
        assert!((player.body.vel.x - 1.0).abs() < 1e-6);
        player.run(Facing::Left);
        assert_eq!(player.body.vel.x, 0.0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_dash_requires_footing_and_expires() {
        let mut player = Player::new(0, 0.0, 0.0);
        player.dash();
        assert!(!player.dashing);

        player.body.footing = Footing::Grounded;
        player.dash();
        assert!(player.dashing);

        player.body.vel.x = 3.0;
        let x = player.body.rect.x;
        player.integrate();
        assert_eq!(player.body.rect.x, x + 6.0);
        assert_eq!(player.body.vel.x, 3.0);

        for _ in 0..DASH_DURATION {
            player.tick_cooldowns();
        }
        assert!(!player.dashing);
    }

    #[test]
    fn test_stun_gates_damage() {
        let mut effects = Vec::new();
        let mut player = Player::new(0, 0.0, 0.0);

        assert!(player.take_hit(1, 10.0, -2.0, &mut effects));
        assert_eq!(player.hp, PLAYER_HP - 1);
        assert_eq!(player.body.vel, Vec2::new(-10.0, -10.0));

        assert!(!player.take_hit(1, 10.0, -2.0, &mut effects));
        assert_eq!(player.hp, PLAYER_HP - 1);

        for _ in 0..STUN_DURATION {
            player.tick_cooldowns();
        }
        assert!(!player.stunned);
        assert!(player.take_hit(1, 10.0, 2.0, &mut effects));
        assert_eq!(player.hp, PLAYER_HP - 2);
    }

    #[test]
    fn test_jump_release_and_fast_fall() {
        let mut player = Player::new(0, 0.0, 0.0);
        player.body.vel.y = -7.0;
        player.release_jump();
        assert_eq!(player.body.vel.y, 0.0);

        player.fast_fall();
        assert_eq!(player.body.vel.y, TERMINAL_VELOCITY);
    }

    #[test]
    fn test_shoot_fires_in_facing_direction() {
        let mut effects = Vec::new();
        let mut player = grounded_player();
        player.facing = Facing::Left;
        let bullet = player.control(InputEvent::Shoot, &mut effects).unwrap();
        assert_eq!(bullet.facing, Facing::Left);
        assert!(bullet.dx < 0.0);
    }
}
