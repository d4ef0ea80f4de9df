//! Pointer tracking.
//!
//! Positions arrive in physical pixels with the origin at the top-left, the
//! way the window system reports them. The shader-side convention is fixed
//! here once: `u_mouse` components are nominally in `[0, 1]` with Y flipped,
//! so the bottom edge of the viewport is 0.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    x: f32,
    y: f32,
}

impl PointerState {
    /// Starting state before any movement: the viewport centre, so shaders
    /// that key off the pointer get a sensible value from frame one.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            x: width as f32 / 2.0,
            y: height as f32 / 2.0,
        }
    }

    pub fn update(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn to_uniform(&self, width: u32, height: u32) -> [f32; 2] {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        [self.x / w, 1.0 - self.y / h]
    }
}
