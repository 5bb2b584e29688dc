//! Rendering seam
//!
//! The simulation core does not rasterize anything. It hands world-space
//! geometry to a [`RenderContext`] supplied by the host application once per
//! frame, after the collision pass.

use crate::foundation::math::Vec2;
use crate::scene::SceneGraph;

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
    /// Alpha channel (0.0 - 1.0)
    pub a: f32,
}

impl Color {
    /// Opaque red
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque color from RGB channels
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color scaled towards black
    #[must_use]
    pub fn darker(self) -> Self {
        Self::rgb(self.r * 0.7, self.g * 0.7, self.b * 0.7)
    }
}

/// Drawing surface provided by the host for one frame
///
/// All coordinates are world space.
pub trait RenderContext {
    /// Outline a closed polygon
    fn draw_polygon(&mut self, points: &[Vec2], color: Color);

    /// Draw a line segment
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);

    /// Outline a circle
    fn draw_circle(&mut self, center: Vec2, radius: f64, color: Color);

    /// Mark a point with a small cross
    fn draw_cross(&mut self, at: Vec2, size: f64, color: Color) {
        let half = size * 0.5;
        self.draw_line(at - Vec2::new(half, half), at + Vec2::new(half, half), color);
        self.draw_line(at - Vec2::new(half, -half), at + Vec2::new(half, -half), color);
    }
}

/// Something that can put itself on a [`RenderContext`]
pub trait Drawable {
    /// Draw using world-space positions resolved through `scene`
    fn draw(&self, scene: &SceneGraph, ctx: &mut dyn RenderContext);
}
