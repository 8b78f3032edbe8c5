//! Sequential color scales for the value encoding.

/// RGB anchor stops from light to dark, per named scheme.
const TEALBLUES: [(u8, u8, u8); 5] = [
    (188, 230, 219),
    (118, 191, 193),
    (69, 144, 173),
    (40, 100, 150),
    (23, 62, 110),
];

const BLUES: [(u8, u8, u8); 5] = [
    (207, 225, 242),
    (147, 195, 223),
    (75, 151, 201),
    (33, 103, 172),
    (8, 64, 129),
];

const ORANGES: [(u8, u8, u8); 5] = [
    (253, 216, 179),
    (253, 171, 103),
    (244, 122, 39),
    (216, 81, 9),
    (145, 48, 4),
];

pub const DEFAULT_SCHEME: &str = "tealblues";

fn stops(scheme: &str) -> &'static [(u8, u8, u8); 5] {
    match scheme {
        "blues" => &BLUES,
        "oranges" => &ORANGES,
        _ => &TEALBLUES,
    }
}

/// Color at position `t` in `[0, 1]` of a named scheme. Unknown schemes fall
/// back to tealblues; `t` is clamped.
pub fn sequential(scheme: &str, t: f64) -> (u8, u8, u8) {
    let stops = stops(scheme);
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let pos = t * (stops.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(stops.len() - 1);
    let frac = pos - lower as f64;

    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = stops[lower];
    let (r1, g1, b1) = stops[upper];
    (lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Color for `value` on a `[0, max]` domain.
pub fn color_for(scheme: &str, value: f64, max: f64) -> (u8, u8, u8) {
    let t = if max > 0.0 { value / max } else { 0.0 };
    sequential(scheme, t)
}
