use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::map::{draw_ring, MapLayers};
use crate::stats::{group_thousands, radius_for};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

/// Symbol fill colour
const SYMBOL_COLOR: Color = Color::Rgb(227, 103, 110);
/// Selected symbol colour
const SELECTED_COLOR: Color = Color::Rgb(236, 171, 172);

const SIDE_PANEL_WIDTH: u16 = 34;
/// Character columns given to the legend circles
const LEGEND_CANVAS_WIDTH: u16 = 10;
/// Width of each step button in the sequence bar
const BUTTON_WIDTH: u16 = 3;

/// Screen areas, shared by drawing and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub map: Rect,
    /// Map area inside its border, where the braille canvas goes
    pub map_inner: Rect,
    pub side: Rect,
    pub sequence: Rect,
    /// Sequence bar inside its border
    pub sequence_inner: Rect,
    pub status: Rect,
}

/// What a click on the sequence bar does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceHit {
    Retreat,
    Advance,
    Seek(usize),
}

pub fn layout(area: Rect) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Map and side panel
            Constraint::Length(3), // Sequence bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(SIDE_PANEL_WIDTH)])
        .split(rows[0]);

    let bordered = Block::default().borders(Borders::ALL);
    AppLayout {
        map: top[0],
        map_inner: bordered.inner(top[0]),
        side: top[1],
        sequence: rows[1],
        sequence_inner: bordered.inner(rows[1]),
        status: rows[2],
    }
}

/// One slot per year between the two step buttons
pub fn sequence_slots(inner: Rect, count: usize) -> Vec<Rect> {
    let start = inner.x + BUTTON_WIDTH;
    let span = inner.width.saturating_sub(BUTTON_WIDTH * 2);
    if count == 0 || span == 0 {
        return Vec::new();
    }
    let n = count as u16;
    (0..n)
        .map(|i| {
            let x0 = start + span * i / n;
            let x1 = start + span * (i + 1) / n;
            Rect::new(x0, inner.y, x1 - x0, inner.height)
        })
        .collect()
}

/// Resolve a click inside the sequence bar
pub fn sequence_hit(inner: Rect, count: usize, col: u16, row: u16) -> Option<SequenceHit> {
    if row < inner.y || row >= inner.y + inner.height || col < inner.x || col >= inner.x + inner.width {
        return None;
    }
    if col < inner.x + BUTTON_WIDTH {
        return Some(SequenceHit::Retreat);
    }
    if col >= (inner.x + inner.width).saturating_sub(BUTTON_WIDTH) {
        return Some(SequenceHit::Advance);
    }
    sequence_slots(inner, count)
        .iter()
        .position(|slot| col >= slot.x && col < slot.x + slot.width)
        .map(SequenceHit::Seek)
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let areas = layout(frame.area());

    render_map(frame, app, areas.map);
    render_side_panel(frame, app, areas.side);
    render_sequence_bar(frame, app, areas.sequence);
    render_status_bar(frame, app, areas.status);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" Inbound tourism · {} ", app.current_year()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        &app.symbols.borrow(),
        app.selected,
    );
    frame.render_widget(MapWidget { layers }, inner);
}

/// Braille layers with labels on top
struct MapWidget {
    layers: MapLayers,
}

fn paint_canvas(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    let rows = canvas.height().min(area.height as usize);
    let cols = canvas.width().min(area.width as usize);
    for row in 0..rows {
        for col in 0..cols {
            if let Some(ch) = canvas.glyph(col, row) {
                buf[(area.x + col as u16, area.y + row as u16)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        paint_canvas(&self.layers.basemap, Color::Cyan, area, buf);
        paint_canvas(&self.layers.symbols, SYMBOL_COLOR, area, buf);
        paint_canvas(&self.layers.selected, SELECTED_COLOR, area, buf);

        let style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        for (col, row, text) in &self.layers.labels {
            if *row >= area.height || *col >= area.width {
                continue;
            }
            let room = (area.width - col) as usize;
            buf.set_stringn(area.x + col, area.y + row, text, room, style);
        }
    }
}

fn render_side_panel(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(7)])
        .split(area);

    render_popup(frame, app, chunks[0]);
    render_legend(frame, app, chunks[1]);
}

fn render_popup(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Country ");

    let label = Style::default().fg(Color::DarkGray);
    let lines: Vec<Line> = match app.popup() {
        None => vec![Line::from(Span::styled("click a circle", label))],
        Some(popup) if app.show_details => {
            let mut lines = vec![Line::from(Span::styled(
                popup.country,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))];
            lines.extend(app.popup_details().into_iter().map(|(key, value)| {
                Line::from(vec![Span::styled(format!("{key}: "), label), Span::raw(value)])
            }));
            lines
        }
        Some(popup) => vec![
            Line::from(vec![
                Span::styled("Country: ", label),
                Span::styled(popup.country, Style::default().add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::styled(format!("Tourists in {}: ", popup.year), label),
                Span::styled(group_thousands(popup.value), Style::default().fg(SYMBOL_COLOR)),
            ]),
        ],
    };

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
}

/// Nested circles sharing a bottom tangent, largest first.
/// Radii are scaled together so the largest fits the canvas.
pub fn legend_canvas(radii: &[f64], width: usize, height: usize) -> BrailleCanvas {
    let mut canvas = BrailleCanvas::new(width, height);
    let (px_width, px_height) = (width as i32 * 2, height as i32 * 4);
    let largest = radii.iter().copied().fold(0.0, f64::max);
    let fit = ((px_width - 1) / 2).min((px_height - 1) / 2);
    if largest <= 0.0 || fit < 1 {
        return canvas;
    }

    let scale = fit as f64 / largest;
    let (cx, bottom) = (px_width / 2, px_height - 1);
    for &r in radii {
        let r_px = ((r * scale).round() as i32).max(1);
        draw_ring(&mut canvas, cx, bottom - r_px, r_px);
    }
    canvas
}

/// Max, mean and min of the whole dataset drawn as nested circles, with their values
fn render_legend(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Legend, all years ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LEGEND_CANVAS_WIDTH), Constraint::Min(1)])
        .split(inner);

    let layer = app.symbols.borrow();
    let stats = layer.statistics();
    let label = Style::default().fg(Color::DarkGray);

    let entries = [("max ", stats.max), ("mean", stats.mean), ("min ", stats.min)];
    let radii: Vec<f64> = entries
        .iter()
        .filter_map(|&(_, value)| radius_for(value, stats.min, layer.base_radius()).ok())
        .collect();

    let circles = legend_canvas(&radii, columns[0].width as usize, columns[0].height as usize);
    paint_canvas(&circles, SYMBOL_COLOR, columns[0], frame.buffer_mut());

    let mut lines = Vec::with_capacity(entries.len() + 1);
    for (name, value) in entries {
        let radius = radius_for(value, stats.min, layer.base_radius())
            .map(|r| format!("r{r:.0}"))
            .unwrap_or_else(|_| "r-".to_string());
        lines.push(Line::from(vec![
            Span::styled(name, label),
            Span::raw(format!("{:>12} ", group_thousands(value))),
            Span::styled(radius, label),
        ]));
    }
    lines.push(Line::from(Span::styled(format!("{} values", stats.count), label)));

    frame.render_widget(Paragraph::new(lines), columns[1]);
}

fn render_sequence_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Year ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buf = frame.buffer_mut();
    let button = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    if inner.width >= BUTTON_WIDTH * 2 && inner.height > 0 {
        buf.set_string(inner.x, inner.y, " ◀ ", button);
        buf.set_string(inner.x + inner.width - BUTTON_WIDTH, inner.y, " ▶ ", button);
    }

    let current = app.sequence.index();
    for (i, (slot, year)) in sequence_slots(inner, app.sequence.len())
        .into_iter()
        .zip(app.sequence.years())
        .enumerate()
    {
        let style = if i == current {
            Style::default().fg(Color::Black).bg(SYMBOL_COLOR).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let text = format!("{year:^width$}", width = slot.width as usize);
        buf.set_stringn(slot.x, slot.y, text, slot.width as usize, style);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let toggle = |on: bool, text: &'static str| {
        Span::styled(text, Style::default().fg(if on { Color::Green } else { Color::DarkGray }))
    };

    let mut spans = vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        toggle(settings.show_basemap, "[b]asemap "),
        toggle(settings.show_labels, "[L]abels "),
        toggle(app.show_details, "[i]nfo "),
    ];

    match &app.message {
        Some(msg) => spans.push(Span::styled(format!("| {msg}"), Style::default().fg(Color::Red))),
        None => spans.push(Span::styled(
            "| ←/→:year hjkl:pan +/-:zoom r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
