//! Fitting the fixed logical playfield into an arbitrary window
//!
//! The simulation never sees pixels. This is the single place where logical
//! units are related to screen size.

use glam::Vec2;

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Fraction of the window the canvas may occupy
pub const WINDOW_MARGIN: f32 = 0.9;

/// On-screen canvas size (CSS pixels) and its scale relative to logical units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
}

impl Viewport {
    /// Logical playfield size
    pub fn logical_size() -> Vec2 {
        Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)
    }

    /// Backing-store size for a given device pixel ratio
    pub fn physical_size(&self, device_pixel_ratio: f64) -> (u32, u32) {
        let dpr = device_pixel_ratio.max(1.0);
        (
            ((self.width as f64 * dpr) as u32).max(1),
            ((self.height as f64 * dpr) as u32).max(1),
        )
    }
}

/// Largest canvas with the playfield's aspect ratio that fits in
/// `WINDOW_MARGIN` of the window
pub fn fit(window_width: f32, window_height: f32) -> Viewport {
    let logical = Viewport::logical_size();

    let mut size = Vec2::new(window_width, window_height).max(Vec2::ONE) * WINDOW_MARGIN;
    if size.x * logical.y > size.y * logical.x {
        // Wider than the playfield: height limits
        size.x = size.y * logical.x / logical.y;
    } else {
        size.y = size.x * logical.y / logical.x;
    }

    let size = size.floor().max(Vec2::ONE);
    Viewport {
        width: size.x as u32,
        height: size.y as u32,
        scale: size.x / logical.x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_window_limited_by_height() {
        let vp = fit(1920.0, 1000.0);
        assert_eq!(vp.height, 900);
        assert_eq!(vp.width, 600);
        assert!((vp.scale - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_tall_window_limited_by_width() {
        let vp = fit(400.0, 2000.0);
        assert_eq!(vp.width, 360);
        assert_eq!(vp.height, 540);
        assert!((vp.scale - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_window_stays_positive() {
        let vp = fit(0.0, 0.0);
        assert!(vp.width >= 1 && vp.height >= 1);
        assert!(vp.scale > 0.0);
    }

    #[test]
    fn test_physical_size_follows_pixel_ratio() {
        let vp = fit(1920.0, 1000.0);
        assert_eq!(vp.physical_size(2.0), (1200, 1800));
        assert_eq!(vp.physical_size(0.5), (600, 900));
    }
}
