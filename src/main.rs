use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use log::{info, warn};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use std::fs::File;
use std::time::Duration;
use tourism_map::app::App;
use tourism_map::config::Config;
use tourism_map::data::{self, Dataset, YearRange};
use tourism_map::map::LineString;
use tourism_map::ui::{self, SequenceHit};

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let range = config.validate()?;
    let dataset = load_dataset(&config, range)?;
    let basemap = load_basemap(&config);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, dataset, basemap, &config);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Logs go to a file so they never draw over the terminal UI
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_dataset(config: &Config, range: YearRange) -> Result<Dataset> {
    if config.data.exists() {
        return Dataset::load(&config.data, range, &config.name_field);
    }
    warn!("{} not found, using the built-in sample", config.data.display());
    Ok(data::sample_dataset(range)?)
}

fn load_basemap(config: &Config) -> Vec<LineString> {
    if let Some(path) = &config.basemap {
        match data::load_basemap(path) {
            Ok(lines) if !lines.is_empty() => return lines,
            Ok(_) => warn!("basemap {} has no lines", path.display()),
            Err(e) => warn!("basemap {}: {e:#}", path.display()),
        }
    }
    data::simple_world()
}

/// Terminal cell to map canvas pixel, if the cell is on the map
fn map_pixel(map_inner: Rect, col: u16, row: u16) -> Option<(i32, i32)> {
    let inside = col >= map_inner.x
        && col < map_inner.x + map_inner.width
        && row >= map_inner.y
        && row < map_inner.y + map_inner.height;
    // Braille gives 2x4 pixels per character; aim at the cell centre
    inside.then(|| {
        (
            (col - map_inner.x) as i32 * 2 + 1,
            (row - map_inner.y) as i32 * 4 + 2,
        )
    })
}

/// Handle mouse events for the map and the year bar
fn handle_mouse(app: &mut App, areas: &ui::AppLayout, mouse: MouseEvent) {
    let on_map = map_pixel(areas.map_inner, mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => {
            if let Some((px, py)) = on_map {
                app.zoom_at(px, py, true);
            }
        }
        MouseEventKind::ScrollDown => {
            if let Some((px, py)) = on_map {
                app.zoom_at(px, py, false);
            }
        }
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = ui::sequence_hit(areas.sequence_inner, app.sequence.len(), mouse.column, mouse.row);
            match (hit, on_map) {
                (Some(SequenceHit::Retreat), _) => app.previous_year(),
                (Some(SequenceHit::Advance), _) => app.next_year(),
                (Some(SequenceHit::Seek(index)), _) => app.seek_year(index),
                (None, Some((px, py))) => {
                    app.select_at(px, py);
                    app.last_mouse = Some((mouse.column, mouse.row));
                }
                (None, None) => {}
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.last_mouse.is_some() {
                app.handle_drag(mouse.column, mouse.row);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, dataset: Dataset, basemap: Vec<LineString>, config: &Config) -> Result<()> {
    let size = terminal.size()?;
    let mut areas = ui::layout(Rect::new(0, 0, size.width, size.height));
    let mut app = App::new(
        dataset,
        basemap,
        config,
        areas.map_inner.width as usize * 2,
        areas.map_inner.height as usize * 4,
    )?;
    info!("{} years, starting at {}", app.sequence.len(), app.current_year());

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Nothing animates, so block on input for longer than a frame
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                // Year sequence
                KeyCode::Right | KeyCode::Char(']') | KeyCode::Char('.') => app.next_year(),
                KeyCode::Left | KeyCode::Char('[') | KeyCode::Char(',') => app.previous_year(),
                KeyCode::Home => app.seek_year(0),
                KeyCode::End => app.seek_year(app.sequence.len() - 1),
                KeyCode::Char(c @ '1'..='9') => app.seek_year(c as usize - '1' as usize),

                // Pan with hjkl
                KeyCode::Char('h') => app.pan(-10, 0),
                KeyCode::Char('l') => app.pan(10, 0),
                KeyCode::Char('k') | KeyCode::Up => app.pan(0, -6),
                KeyCode::Char('j') | KeyCode::Down => app.pan(0, 6),

                KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                KeyCode::Char('b') | KeyCode::Char('B') => {
                    app.map_renderer.settings.show_basemap = !app.map_renderer.settings.show_basemap;
                }
                KeyCode::Char('L') => {
                    app.map_renderer.settings.show_labels = !app.map_renderer.settings.show_labels;
                }
                KeyCode::Char('i') | KeyCode::Char('I') => app.show_details = !app.show_details,

                KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
                _ => {}
            },
            Event::Mouse(mouse) => handle_mouse(&mut app, &areas, mouse),
            Event::Resize(width, height) => {
                areas = ui::layout(Rect::new(0, 0, width, height));
                app.resize(areas.map_inner);
            }
            _ => {}
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
