//! Canvas 2D draw pass
//!
//! Pure consumer of simulation state: reads boxes and scores each frame and
//! paints the phosphor-green scene, then lays a scanline filter over it.
//! Nothing here feeds back into the simulation.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::sim::{GamePhase, GameState, Player, Star};

const PHOSPHOR: &str = "#0f0";
const BACKDROP: &str = "#000";
const SCANLINE: &str = "rgba(0, 0, 0, 0.3)";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        Ok(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    /// Paint one frame from a read-only state snapshot
    pub fn draw(&self, state: &GameState) {
        self.ctx.set_fill_style_str(BACKDROP);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);

        self.draw_ground(state);

        for obstacle in &state.obstacles {
            let b = obstacle.aabb(state.tuning.ground_y);
            self.ctx.set_fill_style_str(PHOSPHOR);
            self.ctx.fill_rect(
                b.min.x as f64,
                b.min.y as f64,
                b.size.x as f64,
                b.size.y as f64,
            );
        }

        for star in &state.stars {
            self.draw_star(star);
        }

        self.draw_player(&state.player);
        self.draw_hud(state);

        if state.phase == GamePhase::GameOver {
            self.draw_game_over();
        }

        self.draw_scanlines();
    }

    /// Dashed ground line; the dash offset scrolls with the score so the
    /// ground appears to move
    fn draw_ground(&self, state: &GameState) {
        let ground = state.tuning.ground_y as f64;
        self.ctx.set_stroke_style_str(PHOSPHOR);
        self.ctx.set_line_width(2.0);

        let dashes = js_sys::Array::of2(&JsValue::from_f64(20.0), &JsValue::from_f64(20.0));
        let _ = self.ctx.set_line_dash(&dashes);
        self.ctx
            .set_line_dash_offset(-((state.score as f64) * state.scroll_speed as f64));

        self.ctx.begin_path();
        self.ctx.move_to(0.0, ground);
        self.ctx.line_to(self.width, ground);
        self.ctx.stroke();

        let _ = self.ctx.set_line_dash(&js_sys::Array::new());
    }

    /// Blocky character: body, head, neck, legs
    fn draw_player(&self, player: &Player) {
        let x = player.pos.x as f64;
        let y = player.pos.y as f64; // feet line
        let w = player.size.x as f64;
        let h = player.size.y as f64;

        self.ctx.set_fill_style_str(PHOSPHOR);
        self.ctx.fill_rect(x, y - h, w, h);
        self.ctx.fill_rect(x + w - 10.0, y - h - 20.0, 20.0, 20.0);
        self.ctx.fill_rect(x + w - 5.0, y - h, 10.0, 20.0);
        self.ctx.fill_rect(x + 5.0, y - 20.0, 8.0, 20.0);
        self.ctx.fill_rect(x + w - 15.0, y - 20.0, 8.0, 20.0);
    }

    /// Five-point star path; collected stars are invisible while they
    /// scroll out
    fn draw_star(&self, star: &Star) {
        if star.collected {
            return;
        }
        let w = star.size.x as f64;
        let h = star.size.y as f64;
        let cx = star.pos.x as f64 + w / 2.0;
        let cy = star.pos.y as f64 + h / 2.0;

        self.ctx.set_fill_style_str(PHOSPHOR);
        self.ctx.begin_path();
        for i in 0..5 {
            let angle = (i as f64 * 4.0 * std::f64::consts::PI) / 5.0 - std::f64::consts::FRAC_PI_2;
            let px = cx + angle.cos() * w / 2.0;
            let py = cy + angle.sin() * h / 2.0;
            if i == 0 {
                self.ctx.move_to(px, py);
            } else {
                self.ctx.line_to(px, py);
            }
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn draw_hud(&self, state: &GameState) {
        self.ctx.set_fill_style_str(PHOSPHOR);
        self.ctx.set_font("20px monospace");
        let _ = self
            .ctx
            .fill_text(&format!("Distance: {}", state.distance()), 20.0, 30.0);
        let _ = self
            .ctx
            .fill_text(&format!("Stars: {}", state.bonus_points), 20.0, 60.0);
    }

    fn draw_game_over(&self) {
        self.ctx.set_fill_style_str(PHOSPHOR);
        self.ctx.set_font("40px monospace");
        let _ = self
            .ctx
            .fill_text("GAME OVER", self.width / 2.0 - 100.0, self.height / 2.0);
        self.ctx.set_font("20px monospace");
        let _ = self.ctx.fill_text(
            "Press SPACE to restart",
            self.width / 2.0 - 120.0,
            self.height / 2.0 + 40.0,
        );
    }

    fn draw_scanlines(&self) {
        self.ctx.set_fill_style_str(SCANLINE);
        let mut y = 0.0;
        while y < self.height {
            self.ctx.fill_rect(0.0, y, self.width, 2.0);
            y += 4.0;
        }
    }
}
