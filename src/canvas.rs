use crate::particle::TrailSegment;
use glam::Vec2;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Dots dimmer than this are dropped from the buffer
const MIN_INTENSITY: f32 = 0.02;
/// Dots dimmer than this are not drawn
const DRAW_THRESHOLD: f32 = 0.05;
/// Cap on line-walk steps per segment, in case a motion pattern produces a
/// degenerate jump
const MAX_STAMP_STEPS: usize = 4096;

/// A single lit dot: blended color plus accumulated intensity
#[derive(Clone, Copy)]
struct Dot {
    r: f32,
    g: f32,
    b: f32,
    intensity: f32,
}

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Persistent dot buffer at Braille resolution. Trails accumulate the way
/// a low-alpha stroke does on an uncleared canvas: each stamped segment
/// adds a little intensity, and `fade` decays everything once per frame.
pub struct TrailCanvas {
    width: usize,
    height: usize,
    dots: Vec<Option<Dot>>,
}

impl TrailCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![None; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.dots.fill(None);
    }

    /// Decay all dot intensities by `factor`, dropping the ones that have
    /// faded out
    pub fn fade(&mut self, factor: f32) {
        for slot in &mut self.dots {
            if let Some(dot) = slot {
                dot.intensity *= factor;
                if dot.intensity < MIN_INTENSITY {
                    *slot = None;
                }
            }
        }
    }

    /// Stamp a segment as a stepped line from its previous position to its
    /// current one. Weights of 0.5 and up get a second, adjacent dot per
    /// step (a thicker stroke).
    pub fn stamp_segment(&mut self, segment: &TrailSegment, rgb: (u8, u8, u8)) {
        let delta = segment.to - segment.from;
        let steps = (delta.x.abs().max(delta.y.abs()).ceil() as usize).min(MAX_STAMP_STEPS);
        let thick = segment.weight >= 0.5;

        // A zero-length segment gets exactly one stamp; looping over both
        // endpoints would deposit double alpha on the same dot.
        if steps == 0 {
            self.plot(segment.from, rgb, segment.alpha);
            if thick {
                self.plot(segment.from + Vec2::new(1.0, 0.0), rgb, segment.alpha);
            }
            return;
        }

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let point = segment.from.lerp(segment.to, t);
            self.plot(point, rgb, segment.alpha);
            if thick {
                self.plot(point + Vec2::new(1.0, 0.0), rgb, segment.alpha);
            }
        }
    }

    /// Blend a dot into the buffer. Out-of-bounds positions are ignored.
    fn plot(&mut self, point: Vec2, (r, g, b): (u8, u8, u8), alpha: f32) {
        if point.x < 0.0 || point.y < 0.0 {
            return;
        }
        let (x, y) = (point.x as usize, point.y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let slot = &mut self.dots[y * self.width + x];
        match slot {
            Some(dot) => {
                dot.intensity = (dot.intensity + alpha).min(1.0);
                dot.r += (r as f32 - dot.r) * alpha;
                dot.g += (g as f32 - dot.g) * alpha;
                dot.b += (b as f32 - dot.b) * alpha;
            }
            None => {
                *slot = Some(Dot {
                    r: r as f32,
                    g: g as f32,
                    b: b as f32,
                    intensity: alpha,
                });
            }
        }
    }

    /// Color and intensity of the dot at (x, y), for rendering and export
    pub fn dot_rgb(&self, x: usize, y: usize) -> Option<((u8, u8, u8), f32)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.dots[y * self.width + x].map(|dot| {
            (
                (dot.r.round() as u8, dot.g.round() as u8, dot.b.round() as u8),
                dot.intensity,
            )
        })
    }
}

/// Render the trail buffer to Braille characters. Dot intensity dims the
/// cell color, so old trails fade visibly before they disappear.
pub fn render_to_braille(canvas: &TrailCanvas, canvas_width: u16, canvas_height: u16) -> Vec<BrailleCell> {
    // Braille effective resolution
    let braille_width = canvas_width as usize * 2;
    let braille_height = canvas_height as usize * 4;

    let scale_x = canvas.width() as f32 / braille_width as f32;
    let scale_y = canvas.height() as f32 / braille_height as f32;

    let mut cells = Vec::with_capacity((canvas_width * canvas_height) as usize);

    for cy in 0..canvas_height {
        for cx in 0..canvas_width {
            let mut pattern: u8 = 0;
            let mut dot_count: usize = 0;
            let mut sum = (0.0f32, 0.0f32, 0.0f32);
            let mut total_intensity = 0.0f32;

            // Sample the 2x4 dots for this Braille character
            let base_bx = cx as usize * 2;
            let base_by = cy as usize * 4;

            for dx in 0..2 {
                for dy in 0..4 {
                    let buf_x = ((base_bx + dx) as f32 * scale_x) as usize;
                    let buf_y = ((base_by + dy) as f32 * scale_y) as usize;

                    if let Some(((r, g, b), intensity)) = canvas.dot_rgb(buf_x, buf_y) {
                        if intensity >= DRAW_THRESHOLD {
                            pattern |= BRAILLE_DOTS[dx][dy];
                            dot_count += 1;
                            sum.0 += r as f32 * intensity;
                            sum.1 += g as f32 * intensity;
                            sum.2 += b as f32 * intensity;
                            total_intensity += intensity;
                        }
                    }
                }
            }

            // Only emit cells that have at least one dot
            if pattern != 0 {
                let braille_char = char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' ');

                let brightness = (total_intensity / dot_count as f32).clamp(0.0, 1.0);
                let color = if total_intensity > 0.0 {
                    Color::Rgb(
                        ((sum.0 / total_intensity) * brightness) as u8,
                        ((sum.1 / total_intensity) * brightness) as u8,
                        ((sum.2 / total_intensity) * brightness) as u8,
                    )
                } else {
                    Color::White
                };

                cells.push(BrailleCell {
                    x: cx,
                    y: cy,
                    char: braille_char,
                    color,
                });
            }
        }
    }

    cells
}

/// Dot-buffer dimensions for a given terminal canvas size. Braille gives
/// 2x4 dots per character cell.
pub fn calculate_dot_size(canvas_width: u16, canvas_height: u16) -> (usize, usize) {
    let width = (canvas_width as usize * 2).max(64);
    let height = (canvas_height as usize * 4).max(64);
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(from: Vec2, to: Vec2) -> TrailSegment {
        TrailSegment {
            from,
            to,
            hue: 0.0,
            saturation: 100.0,
            brightness: 100.0,
            alpha: 0.5,
            weight: 0.2,
        }
    }

    #[test]
    fn braille_dot_table_covers_all_bits() {
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn zero_length_segment_lights_one_dot() {
        let mut canvas = TrailCanvas::new(64, 64);
        canvas.stamp_segment(&segment(Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0)), (255, 0, 0));
        assert!(canvas.dot_rgb(10, 10).is_some());
        assert!(canvas.dot_rgb(11, 10).is_none());
    }

    #[test]
    fn segment_lights_a_continuous_line() {
        let mut canvas = TrailCanvas::new(64, 64);
        canvas.stamp_segment(&segment(Vec2::new(0.0, 5.0), Vec2::new(9.0, 5.0)), (0, 255, 0));
        for x in 0..=9 {
            assert!(canvas.dot_rgb(x, 5).is_some(), "missing dot at x={}", x);
        }
    }

    #[test]
    fn zero_length_stamp_deposits_alpha_once() {
        let mut canvas = TrailCanvas::new(16, 16);
        canvas.stamp_segment(&segment(Vec2::new(4.0, 4.0), Vec2::new(4.0, 4.0)), (255, 255, 255));
        let (_, intensity) = canvas.dot_rgb(4, 4).unwrap();
        assert!((intensity - 0.5).abs() < 1e-6, "expected one 0.5 stamp, got {}", intensity);
    }

    #[test]
    fn heavy_weight_thickens_the_stroke() {
        let mut canvas = TrailCanvas::new(64, 64);
        let mut thick = segment(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        thick.weight = 0.6;
        canvas.stamp_segment(&thick, (255, 255, 255));
        assert!(canvas.dot_rgb(5, 5).is_some());
        assert!(canvas.dot_rgb(6, 5).is_some());
    }

    #[test]
    fn out_of_bounds_stamp_is_ignored() {
        let mut canvas = TrailCanvas::new(32, 32);
        canvas.stamp_segment(&segment(Vec2::new(-10.0, -10.0), Vec2::new(-1.0, -1.0)), (1, 2, 3));
        for y in 0..32 {
            for x in 0..32 {
                assert!(canvas.dot_rgb(x, y).is_none());
            }
        }
    }

    #[test]
    fn fade_eventually_clears_dots() {
        let mut canvas = TrailCanvas::new(16, 16);
        canvas.stamp_segment(&segment(Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0)), (255, 255, 255));
        for _ in 0..100 {
            canvas.fade(0.8);
        }
        assert!(canvas.dot_rgb(3, 3).is_none());
    }

    #[test]
    fn render_emits_expected_braille_char() {
        // One dot at the buffer origin: top-left dot of cell (0,0) = U+2801
        let (w, h) = calculate_dot_size(32, 8);
        let mut canvas = TrailCanvas::new(w, h);
        canvas.stamp_segment(&segment(Vec2::ZERO, Vec2::ZERO), (255, 255, 255));
        let cells = render_to_braille(&canvas, 32, 8);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].x, 0);
        assert_eq!(cells[0].y, 0);
        assert_eq!(cells[0].char, '\u{2801}');
    }

    #[test]
    fn repeated_stamps_accumulate_intensity() {
        let mut canvas = TrailCanvas::new(16, 16);
        let s = segment(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0));
        canvas.stamp_segment(&s, (255, 0, 0));
        let (_, first) = canvas.dot_rgb(2, 2).unwrap();
        canvas.stamp_segment(&s, (255, 0, 0));
        let (_, second) = canvas.dot_rgb(2, 2).unwrap();
        assert!(second > first);
        assert!(second <= 1.0);
    }
}
