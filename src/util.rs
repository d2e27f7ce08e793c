use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Formats a weight compactly for tick labels and tooltips (`950`, `1.2k`, `3.40M`).
pub fn format_weight(value: f64) -> String {
    const UNITS: [&str; 5] = ["", "k", "M", "G", "T"];

    if !value.is_finite() {
        return "0".to_owned();
    }

    let negative = value < 0.0;
    let mut scaled = value.abs();
    let mut unit = 0usize;
    while scaled >= 1000.0 && unit < UNITS.len() - 1 {
        scaled /= 1000.0;
        unit += 1;
    }

    let sign = if negative { "-" } else { "" };
    if unit == 0 {
        if scaled.fract().abs() < f64::EPSILON {
            format!("{sign}{scaled:.0}")
        } else {
            format!("{sign}{scaled:.2}")
        }
    } else if scaled >= 100.0 {
        format!("{sign}{scaled:.0}{}", UNITS[unit])
    } else if scaled >= 10.0 {
        format!("{sign}{scaled:.1}{}", UNITS[unit])
    } else {
        format!("{sign}{scaled:.2}{}", UNITS[unit])
    }
}

/// Deterministic pseudo-random pair in `[-1, 1]` derived from a label.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_small_and_large_weights() {
        assert_eq!(format_weight(0.0), "0");
        assert_eq!(format_weight(950.0), "950");
        assert_eq!(format_weight(2.5), "2.50");
        assert_eq!(format_weight(1200.0), "1.20k");
        assert_eq!(format_weight(34_000.0), "34.0k");
        assert_eq!(format_weight(-3_400_000.0), "-3.40M");
        assert_eq!(format_weight(f64::NAN), "0");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let first = stable_pair("node-a");
        let second = stable_pair("node-a");
        assert_eq!(first, second);
        assert!((-1.0..=1.0).contains(&first.0));
        assert!((-1.0..=1.0).contains(&first.1));
    }
}
