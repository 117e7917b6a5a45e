use std::f64::consts::PI;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 64.0;
const ZOOM_STEP: f64 = 1.5;

/// Normalized Web Mercator y (0 at the top edge, 1 at the bottom)
#[inline]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

/// Inverse of [`mercator_y`]
#[inline]
fn mercator_lat(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
}

/// Visible part of the map: centre, zoom and canvas size in braille pixels
#[derive(Clone, Debug)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Whole-world view centred at 20°N 0°E
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, 20.0, 1.0, width, height)
    }

    #[inline]
    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// Pan by a pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let (lon, lat) = self.unproject(self.width as i32 / 2 + dx, self.height as i32 / 2 + dy);
        self.center_lon = if lon > 180.0 {
            lon - 360.0
        } else if lon < -180.0 {
            lon + 360.0
        } else {
            lon
        };
        self.center_lat = lat.clamp(-80.0, 80.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom while keeping the point under (px, py) fixed on screen
    pub fn zoom_at(&mut self, px: i32, py: i32, zoom_in: bool) {
        let anchor = self.unproject(px, py);
        if zoom_in {
            self.zoom_in();
        } else {
            self.zoom_out();
        }
        let (new_px, new_py) = self.project(anchor.0, anchor.1);
        self.pan(new_px - px, new_py - py);
    }

    /// Geographic (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon - self.center_lon) / 360.0;
        let y = mercator_y(lat) - mercator_y(self.center_lat);
        let px = x * self.scale() + self.width as f64 / 2.0;
        let py = y * self.scale() + self.height as f64 / 2.0;
        (px.round() as i32, py.round() as i32)
    }

    /// Pixel coordinates back to geographic (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let x = (px as f64 - self.width as f64 / 2.0) / self.scale();
        let y = (py as f64 - self.height as f64 / 2.0) / self.scale() + mercator_y(self.center_lat);
        (self.center_lon + x * 360.0, mercator_lat(y))
    }

    /// Whether a projected point lies on the canvas, with a margin in pixels
    pub fn is_visible(&self, px: i32, py: i32, margin: i32) -> bool {
        px >= -margin && px < self.width as i32 + margin && py >= -margin && py < self.height as i32 + margin
    }

    /// Rough bounding-box test for a segment
    pub fn segment_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        p1.0.max(p2.0) >= 0
            && p1.0.min(p2.0) < self.width as i32
            && p1.1.max(p2.1) >= 0
            && p1.1.min(p2.1) < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_projects_to_middle() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
        let vp = Viewport::world(200, 80);
        assert_eq!(vp.project(0.0, 20.0), (100, 40));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::new(10.0, 30.0, 4.0, 400, 200);
        let (px, py) = vp.project(12.0, 33.0);
        let (lon, lat) = vp.unproject(px, py);
        assert!((lon - 12.0).abs() < 0.5);
        assert!((lat - 33.0).abs() < 0.5);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
        vp.pan(0, -10);
        assert!(vp.center_lat > 0.0);
    }

    #[test]
    fn test_zoom_limits() {
        let mut vp = Viewport::world(100, 100);
        for _ in 0..50 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, MAX_ZOOM);
        for _ in 0..50 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_at_keeps_anchor() {
        let mut vp = Viewport::new(0.0, 0.0, 2.0, 400, 400);
        let before = vp.unproject(300, 120);
        vp.zoom_at(300, 120, true);
        let after = vp.unproject(300, 120);
        assert!((before.0 - after.0).abs() < 1.0);
        assert!((before.1 - after.1).abs() < 1.0);
    }
}
