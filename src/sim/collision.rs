//! Collision resolver
//!
//! Intersects the player hitbox with every live entity. Obstacle contacts are
//! classified by `resolve_contact` in a fixed precedence order, then applied.
//! The first fatal contact ends the run and stops resolution.

use super::entities::Tint;
use super::modifiers::{Effect, apply_powerup};
use super::rect::Rect;
use super::state::{GameEvent, GameState, Player, PowerupKind};
use super::variant::Lethality;

/// Pickup radius around the hitbox for bits
const BIT_REACH: f32 = 20.0;

/// What a player/obstacle contact does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No effect
    Ignore,
    /// Popup: neutralize and spam the screen
    Distract,
    /// Overclock smashes through
    Delete,
    /// Shield absorbs the hit
    BreakShield,
    /// An extra life absorbs the hit
    SpendLife,
    /// Run over
    Fatal,
}

/// Classify one contact. Chasms are checked first and ignore protection.
pub fn resolve_contact(
    lethality: Lethality,
    lit: bool,
    player: &Player,
    overclocked: bool,
    revives_left: u8,
) -> Resolution {
    match lethality {
        Lethality::Chasm => {
            return if player.is_airborne() {
                Resolution::Ignore
            } else {
                Resolution::Fatal
            };
        }
        Lethality::Distraction => return Resolution::Distract,
        Lethality::Solid | Lethality::DutyCycle => {}
    }

    if player.is_flying() {
        return Resolution::Ignore;
    }
    if overclocked {
        return Resolution::Delete;
    }
    if lethality == Lethality::DutyCycle && !lit {
        return Resolution::Ignore;
    }

    if player.invincible_ticks > 0 {
        Resolution::Ignore
    } else if player.has_shield {
        Resolution::BreakShield
    } else if revives_left > 0 {
        Resolution::SpendLife
    } else {
        Resolution::Fatal
    }
}

/// Resolve every contact for this tick
pub fn resolve(state: &mut GameState) {
    if state.is_over() {
        return;
    }
    let hitbox = state.player.hitbox(state.ground_y());
    collect_bits(state, &hitbox);
    collect_pickups(state, &hitbox);
    resolve_obstacles(state, &hitbox);
}

fn collect_bits(state: &mut GameState, hitbox: &Rect) {
    let reach = hitbox.grow(BIT_REACH);
    let before = state.entities.bits.len();
    state.entities.bits.retain(|b| !b.rect.overlaps(&reach));
    let collected = before - state.entities.bits.len();

    for _ in 0..collected {
        state.bits_collected += 1;
        state.clock.add_score(state.tuning.bit_score);
        state.events.push(GameEvent::Collect);
    }
}

fn collect_pickups(state: &mut GameState, hitbox: &Rect) {
    let mut taken: Vec<(PowerupKind, Rect)> = Vec::new();
    for pickup in state
        .entities
        .pickups
        .iter_mut()
        .filter(|p| p.active && p.rect.overlaps(hitbox))
    {
        pickup.active = false;
        taken.push((pickup.kind, pickup.rect));
    }

    for (kind, rect) in taken {
        state
            .entities
            .float_text(rect.x, rect.y - 50.0, kind.label(), Tint::Cyan);
        apply_powerup(state, kind);
    }
}

fn resolve_obstacles(state: &mut GameState, hitbox: &Rect) {
    let overclocked = state.modifiers.is_active(Effect::Overclock);
    let tick = state.clock.ticks;

    for idx in 0..state.entities.obstacles.len() {
        let obstacle = &state.entities.obstacles[idx];
        if obstacle.neutralized || !obstacle.rect.overlaps(hitbox) {
            continue;
        }

        let lethality = obstacle.variant.spec().lethality;
        let resolution = resolve_contact(
            lethality,
            obstacle.lit,
            &state.player,
            overclocked,
            state.revives_left,
        );

        match resolution {
            Resolution::Ignore => {}
            Resolution::Distract => {
                state.entities.obstacles[idx].neutralized = true;
                state.player.distraction_ticks = state.tuning.distraction_ticks;
                state.events.push(GameEvent::Distraction);
            }
            Resolution::Delete => {
                state.entities.obstacles[idx].neutralized = true;
                state.shake = 5.0;
                state
                    .entities
                    .burst(hitbox.right(), hitbox.y + hitbox.h / 2.0, Tint::Cyan, 15, tick);
                state
                    .entities
                    .float_text(hitbox.x, hitbox.y, "DELETED", Tint::Cyan);
                state.events.push(GameEvent::ObstacleDeleted);
            }
            Resolution::BreakShield => {
                let level = state.levels.level(PowerupKind::Shield);
                state.player.has_shield = false;
                state.player.invincible_ticks = state.tuning.shield_invincibility(level);
                state.shake = 10.0;
                state.entities.burst(hitbox.x, hitbox.y, Tint::Cyan, 10, tick);
                state
                    .entities
                    .float_text(hitbox.x, hitbox.y, "SHIELD BROKEN", Tint::White);
                state.events.push(GameEvent::ShieldBreak);
            }
            Resolution::SpendLife => {
                state.revives_left -= 1;
                state.player.invincible_ticks = state.tuning.restore_invincibility;
                state.shake = 20.0;
                state.entities.obstacles[idx].neutralized = true;
                state
                    .entities
                    .float_text(hitbox.x, hitbox.y - 50.0, "SYSTEM RESTORED", Tint::Lime);
                state
                    .entities
                    .digital_burst(hitbox.x, hitbox.y, Tint::Lime, 30, tick);
                state.events.push(GameEvent::ExtraLifeUsed);
                log::info!("Extra life used, {} left", state.revives_left);
            }
            Resolution::Fatal => {
                let tint = if lethality == Lethality::Chasm {
                    Tint::Dark
                } else {
                    Tint::Red
                };
                state.shake = 30.0;
                state.entities.burst(hitbox.x, hitbox.y, tint, 50, tick);
                state.end_run();
                return;
            }
        }
    }
}
