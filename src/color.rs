use crate::particle::TrailSegment;

/// Linear interpolation of `value` from one range to another. Unclamped,
/// so inputs outside the source range extrapolate.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span.abs() < f32::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// HSB to RGB. Hue in degrees (any value, wrapped), saturation and
/// brightness in 0-100.
pub fn hsb_to_rgb(hue: f32, saturation: f32, brightness: f32) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0);
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let v = (brightness / 100.0).clamp(0.0, 1.0);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Resolve a segment's style to a terminal RGB color, applying the user's
/// hue offset and optional brightness inversion. Brightness stays inside
/// the style's 50-100 band when inverted.
pub fn segment_color(segment: &TrailSegment, hue_offset: f32, invert: bool) -> (u8, u8, u8) {
    let hue = (segment.hue + hue_offset).rem_euclid(360.0);
    let brightness = if invert {
        150.0 - segment.brightness
    } else {
        segment.brightness
    };
    hsb_to_rgb(hue, segment.saturation, brightness)
}
