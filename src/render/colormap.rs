//! Continuous colormaps for count-colored markers.

use serde::{Deserialize, Serialize};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse a `#rrggbb` string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

const ICEFIRE: &[&str] = &[
    "#000000", "#001f4d", "#003786", "#0e58a8", "#217eb8", "#30a4ca", "#54c8df", "#9be4ef",
    "#e1e9d1", "#f3d573", "#e7b000", "#da8200", "#c65400", "#ac2301", "#820000", "#4c0000",
    "#000000",
];

/// Supported colormaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Red through orange to yellow
    #[default]
    Autumn,
    /// Cyclic dark-blue / light / dark-red scale
    IceFire,
}

impl Colormap {
    /// Color at position `t` in `0.0..=1.0` (clamped).
    pub fn color(self, t: f64) -> Rgb {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match self {
            Colormap::Autumn => Rgb(255, (t * 255.0).round() as u8, 0),
            Colormap::IceFire => {
                let stops: Vec<Rgb> = ICEFIRE.iter().filter_map(|h| Rgb::from_hex(h)).collect();
                let scaled = t * (stops.len() - 1) as f64;
                let lower = scaled.floor() as usize;
                if lower >= stops.len() - 1 {
                    return stops[stops.len() - 1];
                }
                stops[lower].lerp(stops[lower + 1], scaled - lower as f64)
            }
        }
    }

    /// Evenly spaced `(position, hex)` stops, usable for gradients and
    /// plotly colorscales.
    pub fn stops(self, n: usize) -> Vec<(f64, String)> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                (t, self.color(t).to_hex())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Rgb::from_hex("#0e58a8").unwrap();
        assert_eq!(c, Rgb(14, 88, 168));
        assert_eq!(c.to_hex(), "#0e58a8");
        assert!(Rgb::from_hex("0e58a8").is_none());
        assert!(Rgb::from_hex("#0e58").is_none());
    }

    #[test]
    fn test_autumn_endpoints() {
        assert_eq!(Colormap::Autumn.color(0.0), Rgb(255, 0, 0));
        assert_eq!(Colormap::Autumn.color(1.0), Rgb(255, 255, 0));
        assert_eq!(Colormap::Autumn.color(7.0), Rgb(255, 255, 0));
        assert_eq!(Colormap::Autumn.color(f64::NAN), Rgb(255, 0, 0));
    }

    #[test]
    fn test_icefire_is_cyclic() {
        assert_eq!(Colormap::IceFire.color(0.0), Rgb(0, 0, 0));
        assert_eq!(Colormap::IceFire.color(1.0), Rgb(0, 0, 0));
        assert_eq!(Colormap::IceFire.color(0.5), Rgb::from_hex("#e1e9d1").unwrap());
    }

    #[test]
    fn test_stops() {
        let stops = Colormap::Autumn.stops(3);
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0], (0.0, "#ff0000".to_string()));
        assert_eq!(stops[2], (1.0, "#ffff00".to_string()));
    }
}
