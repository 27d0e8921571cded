//! Letterboxing viewport: maps the fixed logical resolution onto whatever
//! surface the host currently has.
//!
//! The scale factor, scaled extent, and centering offsets are cached and
//! recomputed on every geometry change; using stale parameters after a
//! resize is a correctness bug, so the constructor and every mutator
//! recompute eagerly.

use tracing::debug;

#[derive(Debug, Clone)]
pub struct Viewport {
    logical_w: f32,
    logical_h: f32,
    physical_w: f32,
    physical_h: f32,
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    scaled_w: f32,
    scaled_h: f32,
    fullscreen: bool,
    windowed: (u32, u32),
}

impl Viewport {
    pub fn new(logical_w: u32, logical_h: u32, physical_w: u32, physical_h: u32) -> Self {
        let mut viewport = Self {
            logical_w: logical_w as f32,
            logical_h: logical_h as f32,
            physical_w: physical_w as f32,
            physical_h: physical_h as f32,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            scaled_w: 0.0,
            scaled_h: 0.0,
            fullscreen: false,
            windowed: (physical_w, physical_h),
        };
        viewport.recompute();
        viewport
    }

    fn recompute(&mut self) {
        self.scale = (self.physical_w / self.logical_w).min(self.physical_h / self.logical_h);
        self.scaled_w = self.logical_w * self.scale;
        self.scaled_h = self.logical_h * self.scale;
        self.offset_x = (self.physical_w - self.scaled_w) / 2.0;
        self.offset_y = (self.physical_h - self.scaled_h) / 2.0;
        debug!(
            scale = self.scale,
            offset_x = self.offset_x,
            offset_y = self.offset_y,
            "viewport parameters recomputed"
        );
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.physical_w = width as f32;
        self.physical_h = height as f32;
        if !self.fullscreen {
            self.windowed = (width, height);
        }
        self.recompute();
    }

    /// Enter fullscreen at the display size, or leave it and restore the
    /// remembered windowed size. Returns the new fullscreen state.
    pub fn toggle_fullscreen(&mut self, display_w: u32, display_h: u32) -> bool {
        if self.fullscreen {
            self.fullscreen = false;
            self.physical_w = self.windowed.0 as f32;
            self.physical_h = self.windowed.1 as f32;
        } else {
            self.windowed = (self.physical_w as u32, self.physical_h as u32);
            self.fullscreen = true;
            self.physical_w = display_w as f32;
            self.physical_h = display_h as f32;
        }
        self.recompute();
        self.fullscreen
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> (f32, f32) {
        (self.offset_x, self.offset_y)
    }

    pub fn logical_size(&self) -> (f32, f32) {
        (self.logical_w, self.logical_h)
    }

    pub fn physical_size(&self) -> (f32, f32) {
        (self.physical_w, self.physical_h)
    }

    pub fn scaled_size(&self) -> (f32, f32) {
        (self.scaled_w, self.scaled_h)
    }

    /// Map a screen point into logical coordinates. Points in the
    /// letterbox bars are out of bounds and return `None`, never clamped.
    pub fn screen_to_logical(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if x < self.offset_x
            || x >= self.offset_x + self.scaled_w
            || y < self.offset_y
            || y >= self.offset_y + self.scaled_h
        {
            return None;
        }
        Some(((x - self.offset_x) / self.scale, (y - self.offset_y) / self.scale))
    }

    /// Forward transform: logical point to screen coordinates.
    pub fn logical_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.scale + self.offset_x, y * self.scale + self.offset_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_aspect_has_no_bars() {
        let vp = Viewport::new(800, 600, 1600, 1200);
        assert_eq!(vp.scale(), 2.0);
        assert_eq!(vp.offset(), (0.0, 0.0));
        assert_eq!(vp.scaled_size(), (1600.0, 1200.0));
    }

    #[test]
    fn wide_surface_letterboxes_horizontally() {
        let vp = Viewport::new(800, 600, 1000, 600);
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), (100.0, 0.0));
    }

    #[test]
    fn tall_surface_letterboxes_vertically() {
        let vp = Viewport::new(800, 600, 800, 800);
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.offset(), (0.0, 100.0));
    }

    #[test]
    fn screen_to_logical_inverts_forward_transform() {
        let vp = Viewport::new(800, 600, 1280, 720);
        for &(lx, ly) in &[(0.5, 0.5), (100.0, 200.0), (799.0, 599.0), (400.0, 300.0)] {
            let (sx, sy) = vp.logical_to_screen(lx, ly);
            let (bx, by) = vp.screen_to_logical(sx, sy).unwrap();
            assert!((bx - lx).abs() < 1e-3, "x: {bx} vs {lx}");
            assert!((by - ly).abs() < 1e-3, "y: {by} vs {ly}");
        }
    }

    #[test]
    fn letterbox_points_are_out_of_bounds() {
        // 1280x720 around 800x600 scaled by 1.2: bars of 160px on each side
        let vp = Viewport::new(800, 600, 1280, 720);
        assert_eq!(vp.screen_to_logical(10.0, 360.0), None);
        assert_eq!(vp.screen_to_logical(1275.0, 360.0), None);
        assert!(vp.screen_to_logical(640.0, 360.0).is_some());
    }

    #[test]
    fn resize_recomputes_before_use() {
        let mut vp = Viewport::new(800, 600, 800, 600);
        assert!(vp.screen_to_logical(10.0, 300.0).is_some());
        vp.resize(1000, 600);
        // after widening, the left 100px are letterbox
        assert_eq!(vp.screen_to_logical(10.0, 300.0), None);
    }

    #[test]
    fn fullscreen_round_trip_restores_windowed_size() {
        let mut vp = Viewport::new(800, 600, 1024, 768);
        assert!(vp.toggle_fullscreen(1920, 1080));
        assert_eq!(vp.physical_size(), (1920.0, 1080.0));
        assert!(vp.is_fullscreen());
        assert!(!vp.toggle_fullscreen(1920, 1080));
        assert_eq!(vp.physical_size(), (1024.0, 768.0));
    }
}
