use crate::app::{App, Focus};
use crate::canvas;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 44;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 14;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        (frame_area.width.saturating_sub(2), frame_area.height.saturating_sub(2))
    } else {
        let canvas_width = frame_area.width.saturating_sub(SIDEBAR_WIDTH + 2);
        let canvas_height = frame_area.height.saturating_sub(2);
        (canvas_width, canvas_height)
    }
}

/// Visible controls-box lines for a given terminal height
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    // Status (5) + parameters (12) sections above, minus the box borders
    terminal_height.saturating_sub(5 + 12 + 2)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // Status
            Constraint::Length(12), // Parameters
            Constraint::Min(10),    // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Particle Flow ");

    let status_text = if app.paused { "PAUSED" } else { "RUNNING" };
    let status_color = if app.paused { HIGHLIGHT_COLOR } else { BORDER_COLOR };

    let note = app.status_note.as_deref().unwrap_or("");

    let content = vec![
        Line::from(Span::styled(
            format!("frame {}  ({} pts)", app.frame, app.particles.len()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(vec![
            Span::styled(status_text, Style::default().fg(status_color)),
            Span::styled(
                format!("  {} attractors", app.attractors.len()),
                Style::default().fg(DIM_TEXT_COLOR),
            ),
        ]),
        Line::from(Span::styled(note, Style::default().fg(DIM_TEXT_COLOR))),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let settings = &app.settings;

    // Lines in Focus::line_index order
    let content = vec![
        make_line(
            "Attract",
            format!("{:.2}", settings.attraction_strength),
            app.focus == Focus::Attraction,
        ),
        make_line(
            "Fade",
            format!("{:.2}", settings.trail_fade),
            app.focus == Focus::Fade,
        ),
        make_line(
            "F.Scale",
            format!("{:.0}", settings.field_scale),
            app.focus == Focus::FieldScale,
        ),
        make_line(
            "F.Force",
            format!("{:.1}", settings.field_strength),
            app.focus == Focus::FieldStrength,
        ),
        make_line(
            "Hue",
            format!("{:.0}", settings.hue_offset),
            app.focus == Focus::HueOffset,
        ),
        make_line(
            "Invert",
            if settings.invert_colors { "on" } else { "off" }.to_string(),
            app.focus == Focus::Invert,
        ),
        make_line(
            "MaxSpd",
            format!("{:.1}", settings.max_speed),
            app.focus == Focus::MaxSpeed,
        ),
        make_line(
            "Motion",
            app.movement_type.name().to_string(),
            app.focus == Focus::Movement,
        ),
        make_line(
            "Particles",
            format!("{}", app.num_particles),
            app.focus == Focus::Particles,
        ),
        make_line(
            "Speed",
            format!("{}", app.steps_per_frame),
            app.focus == Focus::Speed,
        ),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2); // minus borders
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0 // No scrolling needed
    } else if focus_line >= visible_height {
        // Scroll to show focused line at bottom of visible area
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0 // Focus is within first visible lines
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume".to_string()),
        make_control("H/?", "help".to_string()),
        make_control("R", "respawn".to_string()),
        make_control("1-7", "motion patterns".to_string()),
        make_control("A", "add attractor".to_string()),
        make_control("X", "clear attractors".to_string()),
        make_control("P", "save snapshot".to_string()),
        make_control("C", "save config".to_string()),
        make_control("I", "invert colors".to_string()),
        make_control("V", "fullscreen".to_string()),
        make_control("Tab", "focus params".to_string()),
        make_control("↑↓", "adjust param".to_string()),
        make_control("+/-", "speed".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let block = styled_block(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = canvas::render_to_braille(&app.canvas, inner.width, inner.height);

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            let paragraph = Paragraph::new(Line::from(span));
            frame.render_widget(paragraph, cell_rect);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(36);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("PARTICLE FLOW", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Thousands of particles trace glowing trails, each driven by one of seven motion patterns."),
        Line::from(""),
        Line::from(Span::styled("MOTION PATTERNS (1-7):", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("1=Circle, 2=Noise, 3=Sin1, 4=Sin2, 5=Tau, 6=PerlinFlow, 7=WaveInterference"),
        Line::from(""),
        Line::from(Span::styled("Circle", Style::default().fg(TEXT_COLOR))),
        Line::from("Rings orbiting a center that wanders with the frame count"),
        Line::from(Span::styled("Noise", Style::default().fg(TEXT_COLOR))),
        Line::from("Velocity-steered particles following an animated flow field"),
        Line::from(Span::styled("Sin1 / Sin2", Style::default().fg(TEXT_COLOR))),
        Line::from("Standing ripples around the center / traveling dunes drifting right"),
        Line::from(Span::styled("Tau", Style::default().fg(TEXT_COLOR))),
        Line::from("Spirals that tighten near the center and relax at the edges"),
        Line::from(Span::styled("PerlinFlow", Style::default().fg(TEXT_COLOR))),
        Line::from("Slow wander over two noise octaves"),
        Line::from(Span::styled("WaveInterference", Style::default().fg(TEXT_COLOR))),
        Line::from("Three sine waves of different frequency summed together"),
        Line::from(""),
        Line::from(Span::styled("ATTRACTORS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("A drops an attractor at a random spot; every particle is pulled toward its nearest one. X clears them."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Tab/Shift+Tab cycle focus, Up/Down adjust. Fade controls trail length; F.Scale and F.Force shape the flow field; Hue and Invert recolor everything."),
        Line::from(""),
        Line::from(Span::styled("SNAPSHOT & CONFIG:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("P writes a PNG of the current trails to the working directory. C writes the current settings as JSON, reloadable with --config."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, R=Respawn, V=Fullscreen, +/-=Speed, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}
