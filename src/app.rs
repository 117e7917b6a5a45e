use crate::config::Config;
use crate::data::Dataset;
use crate::error::Result;
use crate::map::{LineString, MapRenderer, PopupFields, SymbolLayer, Viewport};
use crate::sequence::SequenceController;
use log::{error, info, warn};
use ratatui::layout::Rect;
use std::cell::RefCell;
use std::rc::Rc;

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    /// Restyled by the sequence observer on every year change
    pub symbols: Rc<RefCell<SymbolLayer>>,
    pub sequence: SequenceController,
    /// Feature index whose popup is open
    pub selected: Option<usize>,
    /// Show every property of the selected feature, not just its value
    pub show_details: bool,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// One-line message for the status bar (last error)
    pub message: Option<String>,
}

impl App {
    /// Build the app for a canvas of `width` x `height` braille pixels
    pub fn new(
        dataset: Dataset,
        basemap: Vec<LineString>,
        config: &Config,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let layer = SymbolLayer::new(dataset, config.base_radius)?;
        let stats = *layer.statistics();
        info!(
            "statistics over {} values: min {} max {} mean {:.1}",
            stats.count, stats.min, stats.max, stats.mean
        );

        let mut sequence = SequenceController::new(layer.dataset().years.clone())?;
        let symbols = Rc::new(RefCell::new(layer));

        let sink = Rc::clone(&symbols);
        sequence.subscribe(move |year| match sink.borrow_mut().restyle(year) {
            Ok(()) => info!("showing {year}"),
            Err(e) => error!("cannot restyle for {year}: {e}"),
        });

        Ok(Self {
            viewport: Viewport::world(width, height),
            map_renderer: MapRenderer::new(basemap, config.symbol_scale),
            symbols,
            sequence,
            selected: None,
            show_details: false,
            should_quit: false,
            last_mouse: None,
            message: None,
        })
    }

    /// Match the viewport to the inner map area (in character cells)
    pub fn resize(&mut self, map_inner: Rect) {
        // Braille gives 2x4 pixels per character
        self.viewport.width = map_inner.width as usize * 2;
        self.viewport.height = map_inner.height as usize * 4;
    }

    pub fn next_year(&mut self) {
        self.sequence.advance();
        self.message = None;
    }

    pub fn previous_year(&mut self) {
        self.sequence.retreat();
        self.message = None;
    }

    /// Jump to the year at `index`; an invalid index is reported, not applied
    pub fn seek_year(&mut self, index: usize) {
        match self.sequence.seek(index) {
            Ok(_) => self.message = None,
            Err(e) => {
                warn!("seek rejected: {e}");
                self.message = Some(e.to_string());
            }
        }
    }

    pub fn current_year(&self) -> &str {
        self.sequence.current_attribute()
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom about a pixel of the map canvas
    pub fn zoom_at(&mut self, px: i32, py: i32, zoom_in: bool) {
        self.viewport.zoom_at(px, py, zoom_in);
    }

    pub fn reset_view(&mut self) {
        self.viewport = Viewport::world(self.viewport.width, self.viewport.height);
        self.selected = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Pan by the mouse movement since the last drag event
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = (last_col as i32 - col as i32) * 2;
            let dy = (last_row as i32 - row as i32) * 4;
            self.pan(dx, dy);
        }
        self.last_mouse = Some((col, row));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    /// Open the popup of the symbol under a map pixel, or close it on a miss
    pub fn select_at(&mut self, px: i32, py: i32) {
        let symbol_scale = self.map_renderer.symbol_scale;
        self.selected = self.symbols.borrow().pick(&self.viewport, symbol_scale, px, py);
        if let Some(idx) = self.selected {
            info!("selected {}", self.symbols.borrow().dataset().features[idx].country);
        }
    }

    /// Popup fields of the selected feature for the current year
    pub fn popup(&self) -> Option<PopupFields> {
        let idx = self.selected?;
        let layer = self.symbols.borrow();
        layer.symbol_for_feature(idx).map(|s| s.popup.clone())
    }

    /// Every property of the selected feature as (name, value) text
    pub fn popup_details(&self) -> Vec<(String, String)> {
        let Some(idx) = self.selected else {
            return Vec::new();
        };
        let layer = self.symbols.borrow();
        layer.dataset().features[idx]
            .properties
            .iter()
            .map(|(key, value)| {
                let text = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                (key.clone(), text)
            })
            .collect()
    }

    /// Zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    /// Map centre as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_dataset, YearRange};

    fn app() -> App {
        let dataset = sample_dataset(YearRange::default()).unwrap();
        App::new(dataset, Vec::new(), &Config::default(), 160, 80).unwrap()
    }

    fn france_value(app: &App) -> f64 {
        app.symbols.borrow().symbol_for_feature(0).unwrap().popup.value
    }

    #[test]
    fn test_year_change_restyles_symbols() {
        let mut app = app();
        assert_eq!(app.current_year(), "2013");
        assert_eq!(france_value(&app), 83_634_000.0);

        app.next_year();
        assert_eq!(app.current_year(), "2014");
        assert_eq!(app.symbols.borrow().year(), "2014");
        assert_eq!(france_value(&app), 83_701_000.0);

        app.previous_year();
        app.previous_year();
        assert_eq!(app.symbols.borrow().year(), "2020");
        assert_eq!(france_value(&app), 41_684_000.0);
    }

    #[test]
    fn test_seek_out_of_range_reports() {
        let mut app = app();
        app.seek_year(3);
        assert_eq!(app.symbols.borrow().year(), "2016");
        app.seek_year(8);
        assert_eq!(app.current_year(), "2016");
        assert!(app.message.is_some());
        app.next_year();
        assert!(app.message.is_none());
    }

    #[test]
    fn test_select_and_popup() {
        let mut app = app();
        let (px, py) = app.viewport.project(2.2, 46.6);
        app.select_at(px, py);
        let popup = app.popup().unwrap();
        assert_eq!(popup.year, "2013");
        // France and its neighbours overlap at world zoom; the topmost wins
        assert!(!popup.country.is_empty());

        app.seek_year(7);
        assert_eq!(app.popup().unwrap().year, "2020");

        let details = app.popup_details();
        assert!(details.iter().any(|(k, _)| k == "Country"));
        assert_eq!(details.len(), 9);
    }

    #[test]
    fn test_click_on_empty_sea_closes_popup() {
        let mut app = app();
        app.selected = Some(0);
        let (px, py) = app.viewport.project(-150.0, -50.0);
        app.select_at(px, py);
        assert_eq!(app.selected, None);
        assert!(app.popup().is_none());
        assert!(app.popup_details().is_empty());
    }

    #[test]
    fn test_resize_and_reset() {
        let mut app = app();
        app.resize(Rect::new(1, 1, 50, 20));
        assert_eq!((app.viewport.width, app.viewport.height), (100, 80));
        app.zoom_in();
        app.pan(10, 10);
        app.reset_view();
        assert_eq!(app.viewport.zoom, 1.0);
        assert_eq!(app.viewport.center_lat, 20.0);
        assert_eq!(app.viewport.width, 100);
    }
}
