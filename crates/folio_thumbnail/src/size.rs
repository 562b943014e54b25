//! Thumbnail size classes.

/// A named thumbnail size class.
///
/// Ordered smallest to largest; iteration order via [`strum::IntoEnumIterator`]
/// matches that order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    derive_more::Display,
    serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailSize {
    /// 150×150 bounding box
    #[display("small")]
    Small,
    /// 300×300 bounding box
    #[display("medium")]
    Medium,
    /// 600×600 bounding box
    #[display("large")]
    Large,
}

impl ThumbnailSize {
    /// Name used in keys and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailSize::Small => "small",
            ThumbnailSize::Medium => "medium",
            ThumbnailSize::Large => "large",
        }
    }

    /// The fixed bounding box for this size class.
    pub fn spec(&self) -> ThumbnailSpec {
        let edge = match self {
            ThumbnailSize::Small => 150,
            ThumbnailSize::Medium => 300,
            ThumbnailSize::Large => 600,
        };
        ThumbnailSpec {
            size: *self,
            max_width: edge,
            max_height: edge,
        }
    }
}

impl std::str::FromStr for ThumbnailSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(ThumbnailSize::Small),
            "medium" => Ok(ThumbnailSize::Medium),
            "large" => Ok(ThumbnailSize::Large),
            _ => Err(format!("Unknown thumbnail size: {}", s)),
        }
    }
}

/// A size class bound to its pixel bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ThumbnailSpec {
    /// Size class
    pub size: ThumbnailSize,
    /// Maximum output width in pixels
    pub max_width: u32,
    /// Maximum output height in pixels
    pub max_height: u32,
}

impl ThumbnailSpec {
    /// Output dimensions for a `width`×`height` source.
    ///
    /// The result fits within the bounding box on both axes, keeps the source
    /// aspect ratio as closely as whole pixels allow, and is never larger than
    /// the source. Sources that already fit are returned unchanged.
    pub fn fit(&self, width: u32, height: u32) -> (u32, u32) {
        if width <= self.max_width && height <= self.max_height {
            return (width, height);
        }

        let aspect = f64::from(width) / f64::from(height);
        let box_w = f64::from(self.max_width);
        let box_h = f64::from(self.max_height);

        if box_w / box_h >= aspect {
            // Height is the constraining edge
            let w = round_aspect(box_h * aspect, |n| (aspect - n / box_h).abs());
            (w.min(self.max_width), self.max_height)
        } else {
            let h = round_aspect(box_w / aspect, |n| {
                if n == 0.0 { 0.0 } else { (aspect - box_w / n).abs() }
            });
            (self.max_width, h.min(self.max_height))
        }
    }
}

/// Pick floor or ceil of `n`, whichever distorts the aspect ratio less.
fn round_aspect(n: f64, distortion: impl Fn(f64) -> f64) -> u32 {
    let (lo, hi) = (n.floor(), n.ceil());
    let best = if distortion(lo) <= distortion(hi) { lo } else { hi };
    (best as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_spec_edges() {
        let edges: Vec<(u32, u32)> = ThumbnailSize::iter()
            .map(|size| (size.spec().max_width, size.spec().max_height))
            .collect();
        assert_eq!(edges, vec![(150, 150), (300, 300), (600, 600)]);
    }

    #[test]
    fn test_fit_landscape() {
        let spec = ThumbnailSize::Small.spec();
        assert_eq!(spec.fit(2000, 1000), (150, 75));
        assert_eq!(ThumbnailSize::Medium.spec().fit(2000, 1000), (300, 150));
        assert_eq!(ThumbnailSize::Large.spec().fit(2000, 1000), (600, 300));
    }

    #[test]
    fn test_fit_portrait() {
        assert_eq!(ThumbnailSize::Small.spec().fit(1000, 3000), (50, 150));
    }

    #[test]
    fn test_fit_never_upscales() {
        assert_eq!(ThumbnailSize::Large.spec().fit(120, 80), (120, 80));
        assert_eq!(ThumbnailSize::Small.spec().fit(150, 150), (150, 150));
    }

    #[test]
    fn test_fit_extreme_aspect_keeps_one_pixel() {
        assert_eq!(ThumbnailSize::Small.spec().fit(10_000, 10), (150, 1));
    }

    #[test]
    fn test_fit_odd_ratio_stays_in_box() {
        for (w, h) in [(1001, 999), (333, 777), (1920, 1080), (4000, 3)] {
            for spec in ThumbnailSize::iter().map(|size| size.spec()) {
                let (tw, th) = spec.fit(w, h);
                assert!(tw <= spec.max_width && th <= spec.max_height);
                assert!(tw <= w && th <= h);
                assert!(tw >= 1 && th >= 1);
            }
        }
    }
}
