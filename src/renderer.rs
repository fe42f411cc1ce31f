//! Canvas 2D renderer
//!
//! Draws a [`Snapshot`] each frame. Holds no game state of its own; palette
//! and skin come from the equipped profile items.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::catalog::{self, ThemePalette};
use crate::profile::Profile;
use crate::settings::Settings;
use crate::sim::{MotionState, ObstacleVariant, PowerupKind, Snapshot, Tint};

const NEON_CYAN: &str = "#22d3ee";
const NEON_MAGENTA: &str = "#d946ef";
const NEON_LIME: &str = "#a3e635";
const NEON_RED: &str = "#f43f5e";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    palette: ThemePalette,
    skin: &'static str,
    character: String,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let defaults = Profile::default();
        let mut renderer = Self {
            ctx,
            palette: default_palette(),
            skin: NEON_CYAN,
            character: String::new(),
        };
        renderer.apply_profile(&defaults);
        Some(renderer)
    }

    /// Pick up the equipped theme, skin and character
    pub fn apply_profile(&mut self, profile: &Profile) {
        self.palette = catalog::find(&profile.equipped.theme)
            .and_then(|item| item.palette)
            .unwrap_or_else(default_palette);
        self.skin = profile.skin_color();
        self.character = profile.equipped.character.clone();
    }

    fn tint(&self, tint: Tint) -> &'static str {
        match tint {
            Tint::Cyan => NEON_CYAN,
            Tint::Magenta => NEON_MAGENTA,
            Tint::Lime => NEON_LIME,
            Tint::Red => NEON_RED,
            Tint::White => "#ffffff",
            Tint::Dark => "#333333",
            Tint::Skin => self.skin,
        }
    }

    pub fn render(&self, snap: &Snapshot, settings: &Settings) {
        let ctx = &self.ctx;
        let (w, h) = (f64::from(snap.view_width), f64::from(snap.view_height));
        let ground = f64::from(snap.ground_y);

        ctx.save();
        if settings.effective_screen_shake() && snap.shake > 0.0 {
            // Hash the tick so shaking never touches the run's RNG
            let jitter = |salt: u64| {
                let h = snap.tick.wrapping_mul(2654435761).wrapping_add(salt * 7919) % 1000;
                (h as f64 / 500.0 - 1.0) * f64::from(snap.shake)
            };
            let _ = ctx.translate(jitter(1), jitter(2));
        }

        self.draw_background(w, h, ground, snap.tick);

        for bit in snap.bits {
            ctx.set_fill_style_str(NEON_LIME);
            let r = &bit.rect;
            ctx.fill_rect(r.x.into(), r.y.into(), r.w.into(), r.h.into());
        }

        for pickup in snap.pickups.iter().filter(|p| p.active) {
            let r = &pickup.rect;
            ctx.set_fill_style_str(pickup_color(pickup.kind));
            ctx.begin_path();
            let _ = ctx.arc(
                f64::from(r.x + r.w / 2.0),
                f64::from(r.y + r.h / 2.0),
                f64::from(r.w / 2.0),
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
            ctx.set_fill_style_str("#000000");
            ctx.set_font("bold 12px monospace");
            let _ = ctx.fill_text(
                &pickup.kind.label()[..1],
                f64::from(r.x + r.w / 2.0 - 4.0),
                f64::from(r.y + r.h / 2.0 + 4.0),
            );
        }

        for obstacle in snap.obstacles {
            if obstacle.neutralized {
                ctx.set_global_alpha(0.25);
            }
            let r = &obstacle.rect;
            let (x, y, ow, oh): (f64, f64, f64, f64) =
                (r.x.into(), r.y.into(), r.w.into(), r.h.into());
            match obstacle.variant {
                ObstacleVariant::Spikes => {
                    ctx.set_fill_style_str(NEON_RED);
                    ctx.begin_path();
                    ctx.move_to(x, y + oh);
                    ctx.line_to(x + ow / 2.0, y);
                    ctx.line_to(x + ow, y + oh);
                    ctx.close_path();
                    ctx.fill();
                }
                ObstacleVariant::Void => {
                    ctx.set_fill_style_str("#000000");
                    ctx.fill_rect(x, ground, ow, h - ground);
                }
                ObstacleVariant::Laser => {
                    let color = if obstacle.lit { NEON_RED } else { "#3f1d24" };
                    ctx.set_fill_style_str(color);
                    ctx.fill_rect(x + ow / 2.0 - 2.0, y, 4.0, oh);
                }
                ObstacleVariant::Popup => {
                    ctx.set_fill_style_str("#e5e7eb");
                    ctx.fill_rect(x, y, ow, oh);
                    ctx.set_fill_style_str("#1d4ed8");
                    ctx.fill_rect(x, y, ow, 10.0);
                }
                ObstacleVariant::Firewall | ObstacleVariant::Crawler => {
                    ctx.set_fill_style_str(NEON_MAGENTA);
                    ctx.fill_rect(x, y, ow, oh);
                }
                ObstacleVariant::Drone | ObstacleVariant::Virus => {
                    ctx.set_fill_style_str("#f97316");
                    ctx.fill_rect(x, y, ow, oh);
                }
            }
            ctx.set_global_alpha(1.0);
        }

        self.draw_player(snap);

        if settings.particles {
            for p in snap.particles {
                ctx.set_global_alpha(f64::from(p.life.clamp(0.0, 1.0)));
                ctx.set_fill_style_str(self.tint(p.tint));
                let size = f64::from(p.size);
                ctx.fill_rect(p.pos.x.into(), p.pos.y.into(), size, size);
            }
            ctx.set_font("bold 20px monospace");
            for t in snap.texts {
                ctx.set_global_alpha(f64::from(t.life.clamp(0.0, 1.0)));
                ctx.set_fill_style_str(self.tint(t.tint));
                let _ = ctx.fill_text(&t.text, t.pos.x.into(), t.pos.y.into());
            }
            ctx.set_global_alpha(1.0);
        }

        ctx.restore();

        if snap.distracted && settings.effective_popup_overlay() {
            self.draw_popup_spam(w, h, snap.tick);
        }
    }

    fn draw_background(&self, w: f64, h: f64, ground: f64, tick: u64) {
        let ctx = &self.ctx;
        let sky = ctx.create_linear_gradient(0.0, 0.0, 0.0, ground);
        let _ = sky.add_color_stop(0.0, self.palette.sky_start);
        let _ = sky.add_color_stop(1.0, self.palette.sky_end);
        ctx.set_fill_style_canvas_gradient(&sky);
        ctx.fill_rect(0.0, 0.0, w, ground);

        // Parallax skyline
        ctx.set_fill_style_str(self.palette.building);
        let offset = (tick as f64 * 0.5) % 160.0;
        let mut x = -offset;
        let mut n = 0u32;
        while x < w {
            let height = 80.0 + f64::from((n * 37) % 5) * 40.0;
            ctx.fill_rect(x, ground - height, 120.0, height);
            x += 160.0;
            n += 1;
        }

        ctx.set_fill_style_str(self.palette.ground);
        ctx.fill_rect(0.0, ground, w, h - ground);
        ctx.set_stroke_style_str(self.palette.grid);
        ctx.set_line_width(1.0);
        let grid_offset = (tick as f64 * 6.0) % 40.0;
        let mut gx = -grid_offset;
        while gx < w {
            ctx.begin_path();
            ctx.move_to(gx, ground);
            ctx.line_to(gx, h);
            ctx.stroke();
            gx += 40.0;
        }
    }

    fn draw_player(&self, snap: &Snapshot) {
        let ctx = &self.ctx;
        let r = &snap.player;
        let (x, y, w, h) = (
            f64::from(r.x),
            f64::from(r.y),
            f64::from(r.w),
            f64::from(r.h),
        );

        // Blink while invincible
        if snap.invincible && (snap.tick / 4) % 2 == 0 {
            ctx.set_global_alpha(0.4);
        }
        ctx.set_fill_style_str(self.skin);
        match self.character.as_str() {
            "char_sphere" => {
                ctx.begin_path();
                let _ = ctx.arc(
                    x + w / 2.0,
                    y + h / 2.0,
                    w.min(h) / 2.0,
                    0.0,
                    std::f64::consts::TAU,
                );
                ctx.fill();
            }
            "char_bot" => {
                ctx.fill_rect(x - 4.0, y, w + 8.0, h);
                ctx.set_fill_style_str("#000000");
                ctx.fill_rect(x + w * 0.5, y + 8.0, w * 0.4, 6.0);
            }
            _ => {
                ctx.fill_rect(x, y, w, h);
                ctx.set_fill_style_str(NEON_RED);
                ctx.fill_rect(x, y + 10.0, w, 4.0);
            }
        }
        if snap.motion == MotionState::Flying {
            ctx.set_fill_style_str(NEON_CYAN);
            ctx.fill_rect(x - 10.0, y + h - 6.0, 10.0, 4.0);
        }
        ctx.set_global_alpha(1.0);

        if snap.has_shield {
            ctx.set_stroke_style_str(NEON_CYAN);
            ctx.set_line_width(2.0);
            ctx.begin_path();
            let _ = ctx.arc(
                x + w / 2.0,
                y + h / 2.0,
                w.max(h) * 0.75,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.stroke();
        }
    }

    fn draw_popup_spam(&self, w: f64, h: f64, tick: u64) {
        let ctx = &self.ctx;
        for i in 0..6u64 {
            let seed = (tick / 10 + i).wrapping_mul(2654435761);
            let px = (seed % 1000) as f64 / 1000.0 * (w - 240.0);
            let py = ((seed / 1000) % 1000) as f64 / 1000.0 * (h - 120.0);
            ctx.set_fill_style_str("#e5e7eb");
            ctx.fill_rect(px, py, 240.0, 120.0);
            ctx.set_fill_style_str("#1d4ed8");
            ctx.fill_rect(px, py, 240.0, 18.0);
            ctx.set_fill_style_str("#000000");
            ctx.set_font("bold 14px monospace");
            let _ = ctx.fill_text("YOU WON A PRIZE!", px + 20.0, py + 60.0);
        }
    }
}

fn default_palette() -> ThemePalette {
    ThemePalette {
        sky_start: "#0a0515",
        sky_end: "#241235",
        building: "#1c0b2e",
        ground: "#151518",
        grid: "rgba(215, 40, 255, 0.05)",
    }
}

fn pickup_color(kind: PowerupKind) -> &'static str {
    match kind {
        PowerupKind::Overclock => "#facc15",
        PowerupKind::Shield => NEON_CYAN,
        PowerupKind::Flight => "#60a5fa",
        PowerupKind::SlowMotion => "#a78bfa",
        PowerupKind::Magnet => NEON_MAGENTA,
        PowerupKind::ScreenClear => "#ffffff",
    }
}
