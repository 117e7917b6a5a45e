mod geometry;
mod projection;
mod renderer;
mod symbols;

pub use geometry::draw_ring;
pub use projection::Viewport;
pub use renderer::{DisplaySettings, LineString, MapLayers, MapRenderer};
pub use symbols::{pixel_radius, PopupFields, Symbol, SymbolLayer, MAX_SYMBOL_PX};
