use crate::canvas::TrailCanvas;
use image::{Rgb, RgbImage};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Rasterize the trail buffer: one image pixel per dot, color scaled by
/// the dot's intensity over a black background
pub fn canvas_to_image(canvas: &TrailCanvas) -> RgbImage {
    let mut image = RgbImage::new(canvas.width() as u32, canvas.height() as u32);
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            if let Some(((r, g, b), intensity)) = canvas.dot_rgb(x, y) {
                let scale = intensity.clamp(0.0, 1.0);
                image.put_pixel(
                    x as u32,
                    y as u32,
                    Rgb([
                        (r as f32 * scale) as u8,
                        (g as f32 * scale) as u8,
                        (b as f32 * scale) as u8,
                    ]),
                );
            }
        }
    }
    image
}

/// Save a timestamped PNG of the canvas into the current directory
pub fn save_snapshot(canvas: &TrailCanvas) -> Result<PathBuf, String> {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| format!("clock error: {}", e))?
        .as_secs();
    let path = PathBuf::from(format!("particle-flow-{}.png", stamp));
    canvas_to_image(canvas)
        .save(&path)
        .map_err(|e| format!("failed to write {}: {}", path.display(), e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::TrailSegment;
    use glam::Vec2;

    #[test]
    fn image_matches_canvas_dimensions() {
        let canvas = TrailCanvas::new(64, 64);
        let image = canvas_to_image(&canvas);
        assert_eq!(image.width(), 64);
        assert_eq!(image.height(), 64);
    }

    #[test]
    fn lit_dot_becomes_a_colored_pixel() {
        let mut canvas = TrailCanvas::new(64, 64);
        canvas.stamp_segment(
            &TrailSegment {
                from: Vec2::new(10.0, 20.0),
                to: Vec2::new(10.0, 20.0),
                hue: 0.0,
                saturation: 100.0,
                brightness: 100.0,
                alpha: 1.0,
                weight: 0.2,
            },
            (255, 0, 0),
        );
        let image = canvas_to_image(&canvas);
        assert_eq!(image.get_pixel(10, 20), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }
}
