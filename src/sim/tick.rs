//! Frame-stepped simulation
//!
//! One call to `step_simulation` advances the world by one frame. Within a
//! frame the order is fixed: terrain upkeep, integration, collision
//! resolution, entity reactions, then the camera.

use serde::{Deserialize, Serialize};

use super::camera::{
    adjust_camera, advance_boss_event, auto_scroll, begin_boss_event, defeat_boss, rumble,
};
use super::collision::{
    Attacker, bounce_enemy_off_world_edge, clamp_player_to_world, detect_groups, remove_indices,
    resolve_tile_collisions,
};
use super::fx::{Explosion, MoonTimer};
use super::physics;
use super::state::{Effect, Mode, SoundId, World};
use crate::consts::*;

/// Abstract controller events, in the order they arrived this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Left,
    Right,
    Down,
    Jump,
    JumpReleased,
    Dash,
    Shoot,
    /// Toggles the global pause
    Pause,
    /// Stick released
    NoDirection,
}

/// Advance the world by one frame and return the effects it requested.
///
/// `dt` only feeds the elapsed-time counter; every velocity and timer is per frame.
pub fn step_simulation(world: &mut World, inputs: &[InputEvent], dt: f32) -> Vec<Effect> {
    let mut effects = std::mem::take(&mut world.queued);

    if world.in_menu() {
        step_menu(world);
        world.time_ticks += 1;
        world.elapsed += dt;
        return effects;
    }

    for _ in inputs.iter().filter(|&&event| event == InputEvent::Pause) {
        toggle_pause(world, &mut effects);
    }
    if world.paused {
        return effects;
    }
    world.time_ticks += 1;
    world.elapsed += dt;

    apply_inputs(world, inputs, &mut effects);

    world.maintain_terrain();
    advance_boss_event(world);

    integrate(world);
    resolve_collisions(world, &mut effects);
    update_entities(world, &mut effects);

    adjust_camera(world);
    effects
}

fn toggle_pause(world: &mut World, effects: &mut Vec<Effect>) {
    world.paused = !world.paused;
    if world.paused {
        effects.push(Effect::PauseAudio);
        effects.push(Effect::PlaySound(SoundId::Pause));
    } else {
        effects.push(Effect::ResumeAudio);
    }
}

/// Splash countdown, then scroll the landscape
fn step_menu(world: &mut World) {
    if let Mode::Menu { splash_frames } = world.mode
        && splash_frames > 0
    {
        world.mode = Mode::Menu {
            splash_frames: splash_frames - 1,
        };
        return;
    }
    let speed = world.settings.menu_scroll_speed;
    auto_scroll(world, speed);
    world.maintain_terrain();
}

fn apply_inputs(world: &mut World, inputs: &[InputEvent], effects: &mut Vec<Effect>) {
    for &event in inputs {
        if event == InputEvent::Pause {
            continue;
        }
        for player in &mut world.players {
            if let Some(bullet) = player.control(event, effects) {
                world.bullets.push(bullet);
            }
        }
    }
}

/// Move everything by this frame's velocity, then apply gravity. The boss's
/// rumble lands here so it shifts the terrain before collisions.
fn integrate(world: &mut World) {
    let centers = world.player_centers();

    for player in &mut world.players {
        player.tick_cooldowns();
        player.integrate();
        physics::gravitate(&mut player.body);
    }
    for bullet in &mut world.bullets {
        bullet.advance();
    }
    for jumper in &mut world.enemies {
        jumper.advance(&centers);
    }
    let boss_rumble = world
        .boss
        .as_mut()
        .is_some_and(|boss| boss.advance(&centers));
    if boss_rumble {
        rumble(world);
    }
}

fn resolve_collisions(world: &mut World, effects: &mut Vec<Effect>) {
    let width = world.settings.width;

    // Tiles
    for player in &mut world.players {
        resolve_tile_collisions(player, &world.terrain);
        clamp_player_to_world(&mut player.body, width);
    }
    for jumper in &mut world.enemies {
        if jumper.mobile.touches_terrain(&world.terrain) {
            jumper.mobile.bounce(&mut world.rng);
        }
    }
    if let Some(boss) = &mut world.boss
        && boss.mobile.touches_terrain(&world.terrain)
    {
        boss.land(&mut world.rng, effects);
    }

    // Groups: decide everything first, then mutate
    let hits = detect_groups(
        &world.bullets,
        &world.terrain,
        &world.enemies,
        world.boss.as_ref(),
        &world.players,
    );

    for &(attacker, index) in &hits.player_contacts {
        let mobile = match attacker {
            Attacker::Jumper(j) => &world.enemies[j].mobile,
            Attacker::Boss => match &world.boss {
                Some(boss) => &boss.mobile,
                None => continue,
            },
        };
        let (damage, knockback, dx) = (mobile.damage, mobile.knockback, mobile.body.vel.x);
        world.players[index].take_hit(damage, knockback, dx, effects);
    }

    for &j in &hits.jumpers_shot {
        let center = world.enemies[j].mobile.body.rect.center();
        world.spawn_explosion(Explosion::new(center, true), effects);
        world.score += JUMPER_KILL_SCORE;
    }
    remove_indices(&mut world.enemies, &hits.jumpers_shot);
    remove_indices(&mut world.bullets, &hits.spent_bullets);

    if let Some(boss) = &mut world.boss {
        boss.take_hits(hits.boss_hits);
    }

    // World edges
    for jumper in &mut world.enemies {
        bounce_enemy_off_world_edge(&mut jumper.mobile.body, width);
    }
    if let Some(boss) = &mut world.boss {
        bounce_enemy_off_world_edge(&mut boss.mobile.body, width);
    }
    world.bullets.retain(|bullet| !bullet.is_off_screen(width));
}

/// Deaths, the boss, the moon clock and explosions
fn update_entities(world: &mut World, effects: &mut Vec<Effect>) {
    let fallen: Vec<_> = world
        .players
        .iter()
        .filter(|player| player.is_defeated())
        .map(|player| (player.id, player.center()))
        .collect();
    if !fallen.is_empty() {
        world.players.retain(|player| !player.is_defeated());
        for (id, center) in fallen {
            log::info!("Player {id} defeated at score {}", world.score_points());
            world.spawn_explosion(Explosion::new(center, true), effects);
            effects.push(Effect::PlaySound(SoundId::Death));
        }
        if world.players.is_empty() {
            world.display_score = true;
        }
    }

    let tile_size = world.settings.tile_size;
    let boss_frame = world
        .boss
        .as_mut()
        .map(|boss| boss.update(&mut world.rng, tile_size, effects));
    if let Some(frame) = boss_frame {
        if let Some(center) = frame.debris {
            world.spawn_explosion(Explosion::new(center, true), effects);
        }
        if frame.defeated {
            defeat_boss(world, effects);
        }
    }

    if world.moon.as_mut().is_some_and(MoonTimer::update) {
        begin_boss_event(world, effects);
    }

    world.explosions.retain_mut(|explosion| explosion.update(effects));

    let mut burst = Vec::new();
    let rng = &mut world.rng;
    world
        .moon_explosions
        .retain_mut(|blast| blast.update(rng, &mut burst, effects));
    for explosion in burst {
        world.spawn_explosion(explosion, effects);
    }
}
