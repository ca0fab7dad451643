//! Per-game drawing

use glam::Vec2;

use super::colors;
use super::shapes::{inset_rect, star_points};
use super::Surface;
use crate::sim::{DodgerState, Extent, MemoryState, SnakeState};

/// Font size for memory target numbers
const TARGET_FONT_PX: f32 = 24.0;
/// Gap between snake cells
const CELL_INSET: f32 = 1.0;

/// A game state that can draw itself
pub trait Scene {
    fn draw(&self, surface: &mut dyn Surface);
}

impl Scene for DodgerState {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(colors::BLACK);

        let size = self.player.size();
        surface.fill_rect(self.player.pos.x, self.player.pos.y, size.x, size.y, colors::DODGER_PLAYER);

        for obstacle in &self.obstacles {
            surface.fill_circle(obstacle.center(), DodgerState::obstacle_radius(obstacle), colors::DODGER_OBSTACLE);
        }
    }
}

impl Scene for SnakeState {
    fn draw(&self, surface: &mut dyn Surface) {
        let cell = self.config.cell_size;
        let extent = self.config.grid_size as f32 * cell;
        surface.clear(colors::SNAKE_BACKGROUND);

        for i in 0..=self.config.grid_size {
            let offset = i as f32 * cell;
            surface.stroke_line(Vec2::new(offset, 0.0), Vec2::new(offset, extent), colors::SNAKE_GRID, 1.0);
            surface.stroke_line(Vec2::new(0.0, offset), Vec2::new(extent, offset), colors::SNAKE_GRID, 1.0);
        }

        let cell_center = |c: glam::IVec2| c.as_vec2() * cell + Vec2::splat(cell / 2.0);

        if let Some(food) = self.food {
            surface.fill_circle(cell_center(food), cell / 2.0 - 2.0, colors::SNAKE_FOOD);
        }

        let outer = cell / 2.0 - 1.0;
        for &star in &self.bonus {
            let points = star_points(cell_center(star), outer, outer / 2.0, 5);
            surface.fill_polygon(&points, colors::SNAKE_BONUS_FILL);
            surface.stroke_polygon(&points, colors::SNAKE_BONUS_STROKE, 2.0);
        }

        for (i, segment) in self.body.iter().enumerate() {
            let color = if i == 0 { colors::SNAKE_HEAD } else { colors::SNAKE_BODY };
            let (x, y, w, h) = inset_rect(segment.x as f32 * cell, segment.y as f32 * cell, cell, cell, CELL_INSET);
            surface.fill_rect(x, y, w, h, color);
        }
    }
}

impl Scene for MemoryState {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(colors::BLACK);

        let hinted = if self.hint_active() { self.expected_next() } else { None };
        for target in &self.targets {
            let Extent::Circle { radius } = target.shape.extent else {
                continue;
            };
            let color = if hinted == Some(target.value) {
                colors::MEMORY_HINT
            } else {
                colors::MEMORY_TARGET
            };
            surface.fill_circle(target.shape.pos, radius, color);
            if self.is_number_visible(target) {
                surface.fill_text(&target.value.to_string(), target.shape.pos, TARGET_FONT_PX, colors::WHITE);
            }
        }
    }
}
