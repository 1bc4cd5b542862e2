/// Hand-picked category colors, used in this order.
pub const BASE_COLORS: [&str; 16] = [
    "#7AC5CD", "#473C8B", "#FF6347", "#76EE00", "#6495ED", "#FF7F24", "#8B0000", "#FF3030",
    "#228B22", "#00CED1", "#A020F0", "#EEC900", "#595959", "#EE1289", "#CDB38B", "#FF0000",
];

const GOLDEN_ANGLE: f64 = 137.507_764_050_037_85;

/// Returns `n` distinct hex colors. The first sixteen come from
/// [`BASE_COLORS`]; the rest are spread around the hue circle by the golden
/// angle so the result is deterministic for a given `n`.
pub fn colors(n: usize) -> Vec<String> {
    (0..n).map(color).collect()
}

pub fn color(index: usize) -> String {
    match BASE_COLORS.get(index) {
        Some(c) => c.to_string(),
        None => {
            let step = (index - BASE_COLORS.len()) as f64;
            let hue = (step * GOLDEN_ANGLE) % 360.0;
            let lightness = if step as usize % 2 == 0 { 0.45 } else { 0.6 };
            hsl_to_hex(hue, 0.65, lightness)
        }
    }
}

fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02X}{:02X}{:02X}", channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_base_colors_first() {
        let palette = colors(3);
        assert_eq!(palette, vec!["#7AC5CD", "#473C8B", "#FF6347"]);
    }

    #[test]
    fn test_extends_beyond_base_colors() {
        let palette = colors(40);
        assert_eq!(palette.len(), 40);
        let unique: HashSet<&String> = palette.iter().collect();
        assert_eq!(unique.len(), 40);
        assert!(palette
            .iter()
            .all(|c| c.len() == 7 && c.starts_with('#')));
        assert_eq!(colors(40), palette);
    }

    #[test]
    fn test_hsl_to_hex() {
        assert_eq!(hsl_to_hex(0.0, 1.0, 0.5), "#FF0000");
        assert_eq!(hsl_to_hex(120.0, 1.0, 0.5), "#00FF00");
        assert_eq!(hsl_to_hex(240.0, 1.0, 0.5), "#0000FF");
    }
}
