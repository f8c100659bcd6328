mod app;
mod canvas;
mod color;
mod config;
mod export;
mod field;
mod particle;
mod presets;
mod settings;
mod ui;

use app::{App, Focus};
use clap::Parser;
use config::AppConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use particle::MovementType;
use presets::PresetManager;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "particle-flow")]
#[command(about = "Particle trail animations in the terminal")]
struct Args {
    // === Basic Parameters ===
    /// Number of particles (1-20000)
    #[arg(short = 'p', long, default_value = "800")]
    particles: usize,

    /// Motion pattern (circle, noise, sin1, sin2, tau, perlinflow, wave)
    #[arg(short = 'm', long, default_value = "circle")]
    movement: String,

    /// Simulation speed (steps per frame, 1-10)
    #[arg(long, default_value = "2")]
    speed: usize,

    // === Motion Parameters ===
    /// Speed cap for velocity-driven patterns (0.5-10.0)
    #[arg(long = "max-speed", default_value = "2.0")]
    max_speed: f32,

    /// Pull strength toward the nearest attractor (0.0-5.0)
    #[arg(long, default_value = "1.0")]
    attraction: f32,

    /// Flow-field cell size in dots (4.0-40.0)
    #[arg(long = "field-scale", default_value = "10.0")]
    field_scale: f32,

    /// Flow-field force magnitude (0.1-2.0)
    #[arg(long = "field-force", default_value = "0.5")]
    field_force: f32,

    /// Seed for the noise generators
    #[arg(long, default_value = "0")]
    seed: u32,

    // === Visual Parameters ===
    /// Per-frame trail decay (0.80-0.99, higher = longer trails)
    #[arg(long, default_value = "0.92")]
    fade: f32,

    /// Hue rotation in degrees (0-360)
    #[arg(long = "hue-offset", default_value = "0.0")]
    hue_offset: f32,

    /// Invert the brightness gradient
    #[arg(long, default_value = "false")]
    invert: bool,

    // === Startup Sources ===
    /// Start from a named preset (builtin or saved)
    #[arg(long)]
    preset: Option<String>,

    /// Load a saved configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_movement_type(s: &str) -> MovementType {
    match s.to_lowercase().as_str() {
        "noise" | "flow" | "field" => MovementType::Noise,
        "sin1" | "ripple" => MovementType::Sin1,
        "sin2" | "dune" => MovementType::Sin2,
        "tau" | "spiral" => MovementType::Tau,
        "perlinflow" | "perlin" | "drift" => MovementType::PerlinFlow,
        "wave" | "waveinterference" | "interference" => MovementType::WaveInterference,
        _ => MovementType::Circle,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let movement_type = parse_movement_type(&args.movement);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let frame_rect = ratatui::layout::Rect {
        x: 0,
        y: 0,
        width: size.width,
        height: size.height,
    };
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, false);
    let mut app = App::new(canvas_width, canvas_height);

    // Startup sources take precedence over individual flags
    if let Some(path) = &args.config {
        match AppConfig::load_from_file(path) {
            Ok(loaded) => app.apply_config(loaded),
            Err(err) => app.status_note = Some(err),
        }
    } else if let Some(name) = &args.preset {
        let manager = PresetManager::new();
        match manager.find(name) {
            Some(preset) => app.apply_preset(preset),
            None => app.status_note = Some(format!("unknown preset: {}", name)),
        }
    } else {
        let mut config = AppConfig::default();
        config.settings.max_speed = args.max_speed.clamp(0.5, 10.0);
        config.settings.attraction_strength = args.attraction.clamp(0.0, 5.0);
        config.settings.field_scale = args.field_scale.clamp(4.0, 40.0);
        config.settings.field_strength = args.field_force.clamp(0.1, 2.0);
        config.settings.field_seed = args.seed;
        config.settings.trail_fade = args.fade.clamp(0.80, 0.99);
        config.settings.hue_offset = args.hue_offset.rem_euclid(360.0);
        config.settings.invert_colors = args.invert;
        config.movement_type = movement_type;
        config.num_particles = args.particles.clamp(1, 20_000);
        config.steps_per_frame = args.speed.clamp(1, 10);
        app.apply_config(config);
    }

    // Run the app
    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with timeout
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    // Handle Ctrl+C
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        // System controls
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.respawn(),
                        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_fullscreen(),
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }

                        // Motion patterns
                        KeyCode::Char('1') => app.set_movement_type(MovementType::Circle),
                        KeyCode::Char('2') => app.set_movement_type(MovementType::Noise),
                        KeyCode::Char('3') => app.set_movement_type(MovementType::Sin1),
                        KeyCode::Char('4') => app.set_movement_type(MovementType::Sin2),
                        KeyCode::Char('5') => app.set_movement_type(MovementType::Tau),
                        KeyCode::Char('6') => app.set_movement_type(MovementType::PerlinFlow),
                        KeyCode::Char('7') => {
                            app.set_movement_type(MovementType::WaveInterference)
                        }

                        // Attractors
                        KeyCode::Char('a') | KeyCode::Char('A') => app.add_attractor(),
                        KeyCode::Char('x') | KeyCode::Char('X') => app.clear_attractors(),

                        // Snapshot, config export and colors
                        KeyCode::Char('p') | KeyCode::Char('P') => app.snapshot(),
                        KeyCode::Char('c') | KeyCode::Char('C') => app.save_config(),
                        KeyCode::Char('i') | KeyCode::Char('I') => {
                            app.toggle_invert_colors();
                            app.focus = Focus::Invert;
                        }

                        KeyCode::Char('+') | KeyCode::Char('=') => {
                            app.increase_speed();
                            app.focus = Focus::Speed;
                        }
                        KeyCode::Char('-') | KeyCode::Char('_') => {
                            app.decrease_speed();
                            app.focus = Focus::Speed;
                        }

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_up();
                                } else {
                                    app.scroll_controls_up();
                                }
                            }
                        }
                        KeyCode::Down => {
                            if !app.show_help {
                                if app.focus.is_param() {
                                    app.adjust_focused_down();
                                } else {
                                    let term_size = terminal.size().unwrap_or_default();
                                    let visible = ui::get_controls_visible_lines(term_size.height);
                                    app.scroll_controls_down(
                                        ui::CONTROLS_CONTENT_LINES.saturating_sub(visible),
                                    );
                                }
                            }
                        }
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::Controls;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') => {
                            if app.show_help {
                                app.scroll_help_down(ui::HELP_CONTENT_LINES);
                            }
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') => {
                            if app.show_help {
                                app.scroll_help_up();
                            }
                        }
                        _ => {}
                    }
                }
                Event::Resize(width, height) => {
                    let (canvas_width, canvas_height) = ui::get_canvas_size(
                        ratatui::layout::Rect {
                            x: 0,
                            y: 0,
                            width,
                            height,
                        },
                        app.fullscreen_mode,
                    );
                    app.resize(canvas_width, canvas_height);
                }
                _ => {}
            }
        }

        // Run simulation tick
        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_aliases_parse() {
        assert_eq!(parse_movement_type("circle"), MovementType::Circle);
        assert_eq!(parse_movement_type("FLOW"), MovementType::Noise);
        assert_eq!(parse_movement_type("sin1"), MovementType::Sin1);
        assert_eq!(parse_movement_type("dune"), MovementType::Sin2);
        assert_eq!(parse_movement_type("spiral"), MovementType::Tau);
        assert_eq!(parse_movement_type("drift"), MovementType::PerlinFlow);
        assert_eq!(parse_movement_type("wave"), MovementType::WaveInterference);
        assert_eq!(parse_movement_type("garbage"), MovementType::Circle);
    }
}
