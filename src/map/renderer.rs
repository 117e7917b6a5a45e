use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_disc, draw_line, draw_ring};
use crate::map::projection::Viewport;
use crate::map::symbols::{pixel_radius, SymbolLayer};

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Symbols smaller than this (in pixels) get no label
const LABEL_MIN_RADIUS_PX: i32 = 4;

/// Layer visibility
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_basemap: bool,
    pub show_symbols: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_basemap: true,
            show_symbols: true,
            show_labels: false,
        }
    }
}

/// Rendered layers, drawn back to front by the UI
pub struct MapLayers {
    pub basemap: BrailleCanvas,
    pub symbols: BrailleCanvas,
    pub selected: BrailleCanvas,
    /// (column, row, text) in character cells
    pub labels: Vec<(u16, u16, String)>,
}

/// Draws the basemap and the proportional symbols onto braille canvases
pub struct MapRenderer {
    pub basemap: Vec<LineString>,
    pub settings: DisplaySettings,
    /// Braille pixels per unit of symbol radius at zoom 1
    pub symbol_scale: f64,
}

impl MapRenderer {
    pub fn new(basemap: Vec<LineString>, symbol_scale: f64) -> Self {
        Self {
            basemap,
            settings: DisplaySettings::default(),
            symbol_scale,
        }
    }

    /// Render into canvases of `width` x `height` characters
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        layer: &SymbolLayer,
        selected: Option<usize>,
    ) -> MapLayers {
        let mut layers = MapLayers {
            basemap: BrailleCanvas::new(width, height),
            symbols: BrailleCanvas::new(width, height),
            selected: BrailleCanvas::new(width, height),
            labels: Vec::new(),
        };

        if self.settings.show_basemap {
            for line in &self.basemap {
                draw_linestring(&mut layers.basemap, line, viewport);
            }
        }

        if !self.settings.show_symbols {
            return layers;
        }

        for symbol in layer.symbols() {
            let (px, py) = viewport.project(symbol.lon, symbol.lat);
            let r = pixel_radius(symbol.radius, self.symbol_scale, viewport.zoom);
            if !viewport.is_visible(px, py, r) {
                continue;
            }

            if selected == Some(symbol.feature) {
                draw_disc(&mut layers.selected, px, py, r);
            } else {
                draw_ring(&mut layers.symbols, px, py, r);
            }

            if self.settings.show_labels && r >= LABEL_MIN_RADIUS_PX {
                let name = &symbol.popup.country;
                let col = (px / 2) - (name.chars().count() as i32 / 2);
                let row = py / 4;
                if col >= 0 && row >= 0 {
                    layers.labels.push((col as u16, row as u16, name.clone()));
                }
            }
        }

        layers
    }
}

/// Draw a linestring, skipping segments that wrap across the antimeridian
/// or fall entirely off-canvas
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    let mut prev: Option<(i32, i32)> = None;
    for &(lon, lat) in line {
        let p = viewport.project(lon, lat);
        if let Some(q) = prev {
            let span = ((p.0 - q.0).abs() + (p.1 - q.1).abs()) as usize;
            if span < viewport.width && viewport.segment_might_be_visible(q, p) {
                draw_line(canvas, q, p);
            }
        }
        prev = Some(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_dataset, YearRange};

    fn layer() -> SymbolLayer {
        SymbolLayer::new(sample_dataset(YearRange::default()).unwrap(), 5.0).unwrap()
    }

    #[test]
    fn test_renders_basemap_and_symbols() {
        let renderer = MapRenderer::new(vec![vec![(-90.0, 0.0), (90.0, 0.0)]], 0.25);
        let vp = Viewport::new(0.0, 0.0, 1.0, 160, 80);
        let layers = renderer.render(80, 20, &vp, &layer(), None);

        let dots = |c: &BrailleCanvas| {
            (0..c.height())
                .flat_map(|row| (0..c.width()).map(move |col| (col, row)))
                .filter(|&(col, row)| c.glyph(col, row).is_some())
                .count()
        };
        assert!(dots(&layers.basemap) > 0);
        assert!(dots(&layers.symbols) > 0);
        assert_eq!(dots(&layers.selected), 0);
    }

    #[test]
    fn test_selected_symbol_drawn_separately() {
        let renderer = MapRenderer::new(Vec::new(), 0.25);
        let vp = Viewport::new(0.0, 20.0, 1.0, 160, 80);
        let layers = renderer.render(80, 20, &vp, &layer(), Some(0));
        let (px, py) = vp.project(2.2, 46.6);
        assert!(layers.selected.is_set(px as usize, py as usize));
    }

    #[test]
    fn test_labels_toggle() {
        let mut renderer = MapRenderer::new(Vec::new(), 0.25);
        let vp = Viewport::new(2.2, 46.6, 4.0, 160, 80);
        assert!(renderer.render(80, 20, &vp, &layer(), None).labels.is_empty());
        renderer.settings.show_labels = true;
        let labels = renderer.render(80, 20, &vp, &layer(), None).labels;
        assert!(labels.iter().any(|(col, row, text)| text == "France" && (*col, *row) == (37, 10)));
    }

    #[test]
    fn test_hidden_symbols() {
        let mut renderer = MapRenderer::new(Vec::new(), 0.25);
        renderer.settings.show_symbols = false;
        let vp = Viewport::world(160, 80);
        let layers = renderer.render(80, 20, &vp, &layer(), Some(0));
        assert!(layers.labels.is_empty());
        assert!(!layers.selected.is_set(80, 40));
    }
}
