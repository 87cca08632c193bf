//! # Life History
//!
//! A terminal front-end for the `life_history` simulation core, built on
//! `ratatui` for the interface and `crossterm` for terminal manipulation.
//!
//! ## Features
//!
//! * Interactive terminal interface with mouse editing
//! * Undo/redo through generations and edits
//! * Finite or toroidal boundaries, switchable while running
//! * Real-time statistics and system memory readout
//! * RLE pattern loading or a random start
//! * Headless mode for scripted runs

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use life_history::{
    load_pattern, BoundaryPolicy, GenerationDiff, Grid, SimulationConfig, SimulationController,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};
use sysinfo::{System, SystemExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

const MIN_FPS: f64 = 0.5;
const MAX_FPS: f64 = 240.0;
/// Cells the viewport moves per pan key press.
const PAN_STEP: isize = 4;

fn parse_fps(value: &str) -> Result<f64, String> {
    let fps: f64 = value.parse().map_err(|err| format!("{err}"))?;
    if !fps.is_finite() || fps <= 0.0 {
        return Err(format!("expected a positive frame rate, got `{value}`"));
    }
    Ok(fps)
}

/// Command-line arguments for the terminal simulation.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Rows in a randomly seeded grid. Ignored with --pattern.
    #[arg(long, value_name = "ROWS", default_value_t = 40, value_parser = clap::value_parser!(u32).range(1..))]
    rows: u32,
    /// Columns in a randomly seeded grid. Ignored with --pattern.
    #[arg(long, value_name = "COLUMNS", default_value_t = 80, value_parser = clap::value_parser!(u32).range(1..))]
    cols: u32,
    /// RLE file to start from instead of a random grid.
    #[arg(short, long, value_name = "FILE")]
    pattern: Option<PathBuf>,
    /// Edge handling: `finite` or `toroidal`.
    #[arg(long, value_name = "POLICY", default_value = "toroidal")]
    policy: BoundaryPolicy,
    /// Snapshots kept for undo and for redo.
    #[arg(long = "history", value_name = "COUNT", default_value_t = life_history::DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,
    /// Fraction of cells alive in a random start.
    #[arg(long, value_name = "FRACTION", default_value_t = 0.3)]
    density: f64,
    /// Seed for the random start.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Frames per second while running.
    #[arg(long, value_name = "FPS", default_value_t = 10.0, value_parser = parse_fps)]
    fps: f64,
    /// Generations advanced per frame while running.
    #[arg(long, value_name = "COUNT", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    steps_per_frame: u32,
    /// Run this many generations without a terminal UI and print the result.
    #[arg(long, value_name = "GENERATIONS")]
    headless: Option<usize>,
    /// Write logs to this file. The interactive UI otherwise discards them.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Statistics about the most recent change to the grid.
#[derive(Debug, Default)]
struct Stats {
    /// Generations advanced since start, through steps or redo fallbacks
    steps_taken: u64,
    /// Cells born and killed by the last operation
    last_change: GenerationDiff,
    /// Name of the last operation
    last_action: &'static str,
}

/// Main application state container for the terminal front-end.
struct App {
    sim: SimulationController,
    /// Indicates whether the simulation is currently running
    running: bool,
    fps: f64,
    steps_per_frame: u32,
    stats: Stats,
    /// System information for resource monitoring
    sys: System,
    /// Screen area the grid was last drawn into, borders excluded
    grid_area: Rect,
    /// Grid cell shown in the top-left corner of `grid_area`; centered
    /// until the first draw
    origin: Option<(usize, usize)>,
    /// Cell under the pointer during a drag
    stroke: Option<(usize, usize)>,
    /// Screen position of the last right-drag sample
    pan_anchor: Option<(u16, u16)>,
}

impl App {
    fn new(sim: SimulationController, fps: f64, steps_per_frame: u32) -> App {
        App {
            sim,
            running: false,
            fps: fps.clamp(MIN_FPS, MAX_FPS),
            steps_per_frame,
            stats: Stats {
                last_action: "start",
                ..Stats::default()
            },
            sys: System::new_all(),
            grid_area: Rect::default(),
            origin: None,
            stroke: None,
            pan_anchor: None,
        }
    }

    fn tick_rate(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }

    /// Runs one operation against the simulation and records what changed.
    fn apply(&mut self, action: &'static str, op: impl FnOnce(&mut SimulationController)) {
        let before = self.sim.current_grid().clone();
        op(&mut self.sim);
        self.stats.last_change = GenerationDiff::between(&before, self.sim.current_grid());
        self.stats.last_action = action;
        self.sys.refresh_memory();
    }

    fn advance(&mut self, generations: u32) {
        self.apply("step", |sim| sim.step_many(generations as usize));
        self.stats.steps_taken += u64::from(generations);
    }

    fn redo(&mut self) {
        let stepping = !self.sim.history().can_redo();
        self.apply("redo", SimulationController::redo);
        if stepping {
            self.stats.steps_taken += 1;
        }
    }

    /// Moves the viewport. Clamping to the grid happens on the next draw.
    fn pan(&mut self, rows: isize, cols: isize) {
        let (row, col) = self.origin.unwrap_or((0, 0));
        self.origin = Some((row.saturating_add_signed(rows), col.saturating_add_signed(cols)));
    }

    fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Char(' ') => self.toggle_running(),
            KeyCode::Enter => {
                if !self.running {
                    self.advance(1);
                }
            }
            KeyCode::Left if key.modifiers.contains(KeyModifiers::SHIFT) => self.pan(0, -PAN_STEP),
            KeyCode::Right if key.modifiers.contains(KeyModifiers::SHIFT) => self.pan(0, PAN_STEP),
            KeyCode::Up => self.pan(-PAN_STEP, 0),
            KeyCode::Down => self.pan(PAN_STEP, 0),
            KeyCode::Right => self.redo(),
            KeyCode::Left => self.apply("undo", |sim| {
                sim.undo();
            }),
            KeyCode::Esc => self.apply("reset", SimulationController::reset),
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'i' => {
                    let policy = self.sim.toggle_boundary_policy();
                    info!(%policy, "boundary policy switched");
                }
                'z' => self.fps = (self.fps / 1.1).max(MIN_FPS),
                'x' => self.fps = (self.fps * 1.1).min(MAX_FPS),
                'a' => self.steps_per_frame = self.steps_per_frame.saturating_sub(1).max(1),
                's' => self.steps_per_frame += 1,
                _ => {}
            },
            _ => {}
        }
        true
    }

    /// Maps a terminal position to a grid cell through the last drawn viewport.
    fn cell_at(&self, column: u16, row: u16) -> Option<(usize, usize)> {
        let origin = self.origin.unwrap_or((0, 0));
        let cell = screen_to_cell(self.grid_area, origin, column, row)?;
        self.sim.current_grid().contains(cell.0, cell.1).then_some(cell)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.stroke = self.cell_at(mouse.column, mouse.row);
                if let Some((r, c)) = self.stroke {
                    self.apply("edit", |sim| {
                        sim.toggle_cell(r, c);
                    });
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(cell) = self.cell_at(mouse.column, mouse.row) else {
                    return;
                };
                if self.stroke != Some(cell) {
                    // A drag that began outside the grid starts its own checkpoint.
                    let started = self.stroke.is_some();
                    self.stroke = Some(cell);
                    self.apply("edit", |sim| {
                        if started {
                            sim.continue_edit(cell.0, cell.1);
                        } else {
                            sim.toggle_cell(cell.0, cell.1);
                        }
                    });
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.stroke = None,
            MouseEventKind::Down(MouseButton::Right) => {
                self.pan_anchor = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Drag(MouseButton::Right) => {
                if let Some((column, row)) = self.pan_anchor {
                    // The grid follows the pointer.
                    self.pan(
                        row as isize - mouse.row as isize,
                        column as isize - mouse.column as isize,
                    );
                }
                self.pan_anchor = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Up(MouseButton::Right) => self.pan_anchor = None,
            _ => {}
        }
    }
}

/// Maps a terminal position inside `area` to the grid cell drawn there.
fn screen_to_cell(area: Rect, origin: (usize, usize), column: u16, row: u16) -> Option<(usize, usize)> {
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }
    Some((
        origin.0 + usize::from(row - area.y),
        origin.1 + usize::from(column - area.x),
    ))
}

/// Keeps a viewport of `visible` cells at `origin` inside a grid of `size`.
fn clamp_origin(
    origin: (usize, usize),
    size: (usize, usize),
    visible: (usize, usize),
) -> (usize, usize) {
    (
        origin.0.min(size.0.saturating_sub(visible.0)),
        origin.1.min(size.1.saturating_sub(visible.1)),
    )
}

/// Draws the visible part of the grid. The viewport starts centered and
/// follows the pan controls afterwards.
fn draw_grid(f: &mut ratatui::Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(
        "Game of Life [Space: Play/Pause | Enter: Step | ←/→: Undo/Redo | ↑/↓, Shift+←/→, Right-drag: Pan | Esc: Reset | i: Edges | q: Quit]",
    );
    let inner = block.inner(area);
    let grid = app.sim.current_grid();

    let visible_rows = grid.rows().min(usize::from(inner.height));
    let visible_cols = grid.cols().min(usize::from(inner.width));
    let centered = (
        (grid.rows() - visible_rows) / 2,
        (grid.cols() - visible_cols) / 2,
    );
    let origin = clamp_origin(
        app.origin.unwrap_or(centered),
        grid.dimensions(),
        (visible_rows, visible_cols),
    );

    let mut cells = String::with_capacity((visible_cols + 1) * visible_rows);
    for row in grid.iter_rows().skip(origin.0).take(visible_rows) {
        for &cell in &row[origin.1..origin.1 + visible_cols] {
            cells.push(if cell { '█' } else { ' ' });
        }
        cells.push('\n');
    }

    let paragraph = Paragraph::new(cells)
        .style(Style::default().fg(Color::White))
        .block(block);

    f.render_widget(paragraph, area);
    app.grid_area = inner;
    app.origin = Some(origin);
}

/// Draws the statistics panel to the terminal interface.
fn draw_stats(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let memory_used = app.sys.used_memory() / 1024; // Convert to KB
    let memory_total = app.sys.total_memory() / 1024;
    let grid = app.sim.current_grid();
    let history = app.sim.history();

    let stats_text = format!(
        "Statistics:\n\
        Grid: {}x{}\n\
        Population: {}\n\
        Generations Stepped: {}\n\
        Last Action: {}\n\
        Births: {}\n\
        Deaths: {}\n\
        Undo Depth: {}/{}\n\
        Redo Depth: {}/{}\n\
        Edges: {}\n\
        FPS: {:.1}\n\
        Steps/Frame: {}\n\
        Memory Usage: {}KB/{:.2}MB\n\
        Status: {}\n",
        grid.rows(),
        grid.cols(),
        grid.population(),
        app.stats.steps_taken,
        app.stats.last_action,
        app.stats.last_change.births,
        app.stats.last_change.deaths,
        history.past_len(),
        history.capacity(),
        history.future_len(),
        history.capacity(),
        app.sim.boundary_policy(),
        app.fps,
        app.steps_per_frame,
        memory_used,
        memory_total as f64 / 1024.0,
        if app.running { "Running" } else { "Paused" }
    );

    let stats_widget = Paragraph::new(stats_text)
        .block(Block::default().borders(Borders::ALL).title("Statistics"))
        .wrap(Wrap { trim: true });

    f.render_widget(stats_widget, area);
}

fn init_tracing(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|err| anyhow!(err))?;
        }
        None if headless => {
            builder
                .with_writer(io::stderr)
                .try_init()
                .map_err(|err| anyhow!(err))?;
        }
        // The UI owns the terminal; without a log file there is nowhere to write.
        None => {}
    }
    Ok(())
}

fn initial_grid(args: &Args) -> Result<Grid> {
    if let Some(path) = &args.pattern {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read pattern {}", path.display()))?;
        return load_pattern(&text)
            .with_context(|| format!("failed to load pattern {}", path.display()));
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Grid::random(args.rows as usize, args.cols as usize, args.density, &mut rng)
        .context("failed to create random grid")
}

fn run_headless(mut sim: SimulationController, generations: usize) {
    let start = sim.current_grid().population();
    sim.step_many(generations);
    let grid = sim.current_grid();
    print!("{grid}");
    println!(
        "generations={generations} edges={} population={start}->{}",
        sim.boundary_policy(),
        grid.population()
    );
    info!(
        generations,
        initial_population = start,
        final_population = grid.population(),
        "headless run completed"
    );
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(75), Constraint::Percentage(25)].as_ref())
                .split(f.size());

            draw_grid(f, app, chunks[0]);
            draw_stats(f, app, chunks[1]);
        })?;

        let tick_rate = app.tick_rate();
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !app.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if app.running {
                app.advance(app.steps_per_frame);
            }
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Main entry point.
///
/// Builds the simulation from the command line, then either runs it headless
/// or hands it to the interactive terminal loop.
///
/// # Controls
///
/// * Space: Play/Pause the simulation
/// * Enter: Step forward one generation (when paused)
/// * Left / Right: Undo / Redo (redo steps when there is nothing to redo)
/// * Up / Down, Shift+Left / Shift+Right: Pan the view
/// * Right mouse drag: Pan the view
/// * Esc: Reset to the starting grid
/// * i: Switch between finite and toroidal edges
/// * z / x: Lower / raise the frame rate
/// * a / s: Fewer / more generations per frame
/// * Left mouse: Toggle cells, one undo entry per click-and-drag
/// * q: Quit the application
///
/// # Errors
///
/// Returns an error if the configuration is rejected, the pattern cannot be
/// loaded, or terminal manipulation fails.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref(), args.headless.is_some())?;

    let config = SimulationConfig::default()
        .with_policy(args.policy)
        .with_history_capacity(args.history_capacity);
    let sim = SimulationController::new(initial_grid(&args)?, config)
        .context("failed to start simulation")?;

    if let Some(generations) = args.headless {
        run_headless(sim, generations);
        return Ok(());
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to build terminal backend")?;

    let mut app = App::new(sim, args.fps, args.steps_per_frame);
    let result = run_event_loop(&mut terminal, &mut app);

    if let Err(err) = disable_raw_mode() {
        tracing::error!(?err, "failed to disable raw mode");
    }
    if let Err(err) = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    ) {
        tracing::error!(?err, "failed to leave alternate screen");
    }
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fps() {
        assert_eq!(parse_fps("12.5"), Ok(12.5));
        assert!(parse_fps("nan").is_err());
        assert!(parse_fps("inf").is_err());
        assert!(parse_fps("0").is_err());
        assert!(parse_fps("-3").is_err());
        assert!(parse_fps("fast").is_err());
    }

    #[test]
    fn test_fps_flag_rejects_nan() {
        assert!(Args::try_parse_from(["life_history", "--fps", "NaN"]).is_err());
        let args = Args::try_parse_from(["life_history", "--fps", "30"]).unwrap();
        assert_eq!(args.fps, 30.0);
    }

    #[test]
    fn test_clamp_origin() {
        assert_eq!(clamp_origin((0, 0), (101, 103), (20, 60)), (0, 0));
        assert_eq!(clamp_origin((90, 10), (101, 103), (20, 60)), (81, 10));
        assert_eq!(clamp_origin((500, 500), (101, 103), (20, 60)), (81, 43));
        // A grid smaller than the view never scrolls.
        assert_eq!(clamp_origin((7, 7), (10, 10), (10, 10)), (0, 0));
    }

    #[test]
    fn test_screen_to_cell_follows_origin() {
        let area = Rect::new(1, 1, 30, 10);
        assert_eq!(screen_to_cell(area, (0, 0), 1, 1), Some((0, 0)));
        assert_eq!(screen_to_cell(area, (40, 25), 4, 3), Some((42, 28)));
        assert_eq!(screen_to_cell(area, (40, 25), 0, 3), None);
        assert_eq!(screen_to_cell(area, (40, 25), 31, 3), None);
        assert_eq!(screen_to_cell(area, (40, 25), 4, 11), None);
    }
}
