//! Headless render target that only counts draw calls

use arcade_engine::prelude::*;

/// Draw calls received, by primitive
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountingRenderer {
    /// Polygon outlines
    pub polygons: u64,
    /// Line segments
    pub lines: u64,
    /// Circle outlines
    pub circles: u64,
}

impl CountingRenderer {
    /// Total primitives drawn
    pub fn total(&self) -> u64 {
        self.polygons + self.lines + self.circles
    }
}

impl RenderContext for CountingRenderer {
    fn draw_polygon(&mut self, _points: &[Vec2], _color: Color) {
        self.polygons += 1;
    }

    fn draw_line(&mut self, _from: Vec2, _to: Vec2, _color: Color) {
        self.lines += 1;
    }

    fn draw_circle(&mut self, _center: Vec2, _radius: f64, _color: Color) {
        self.circles += 1;
    }
}
