use crate::core::normalize::{normalize, people};
use crate::domain::model::{Margins, ProjectedPoint, Starship, Viewport};
use serde::Serialize;

/// Top edge of the y range; keeps the tallest point clear of the border.
pub const PLOT_TOP: f64 = 20.0;

/// Approximate number of ticks drawn per axis.
pub const DEFAULT_TICK_COUNT: usize = 10;

/// Continuous linear map from `domain` to `range`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Maps `value` into the range. A zero-width domain maps every value to
    /// the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Round tick values (1, 2 or 5 times a power of ten) covering the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        let (lo, hi) = if d0 <= d1 { (d0, d1) } else { (d1, d0) };
        if lo == hi {
            return vec![lo];
        }
        if count == 0 || !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }

        let step = tick_step(lo, hi, count);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }

        if step >= 1.0 {
            let first = (lo / step).ceil() as i64;
            let last = (hi / step).floor() as i64;
            (first..=last).map(|i| i as f64 * step).collect()
        } else {
            // divide by the inverse so 0.1 steps land on exact decimals
            let inverse = (1.0 / step).round();
            let first = (lo * inverse).ceil() as i64;
            let last = (hi * inverse).floor() as i64;
            (first..=last).map(|i| i as f64 / inverse).collect()
        }
    }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    if error >= 50f64.sqrt() {
        power * 10.0
    } else if error >= 10f64.sqrt() {
        power * 5.0
    } else if error >= 2f64.sqrt() {
        power * 2.0
    } else {
        power
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scales {
    pub x: LinearScale,
    pub y: LinearScale,
    pub max_length: u64,
    /// Largest crew plus passengers of any single starship.
    pub max_people: u64,
}

/// Observed maximum plus 10% headroom, rounded down.
fn with_headroom(max: u64) -> f64 {
    max.saturating_add(max / 10) as f64
}

/// Scales for the current subset: length on x, crew plus passengers on y
/// (inverted so larger counts sit higher).
pub fn compute_scales(data: &[Starship], viewport_width: f64, viewport_height: f64, margins: Margins) -> Scales {
    let max_length = data
        .iter()
        .map(|s| normalize(&s.length_raw))
        .max()
        .unwrap_or(0);
    let max_people = data
        .iter()
        .map(|s| people(&s.crew_raw, &s.passengers_raw))
        .max()
        .unwrap_or(0);

    Scales {
        x: LinearScale::new(
            (0.0, with_headroom(max_length)),
            (0.0, viewport_width - margins.left),
        ),
        y: LinearScale::new(
            (0.0, with_headroom(max_people)),
            (viewport_height - margins.bottom, PLOT_TOP),
        ),
        max_length,
        max_people,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub scales: Scales,
    pub points: Vec<ProjectedPoint>,
}

/// Recomputes the full point set on every call; collections are small.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScatterProjector {
    margins: Margins,
}

impl ScatterProjector {
    pub fn new(margins: Margins) -> Self {
        Self { margins }
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    pub fn compute_scales(&self, data: &[Starship], viewport: Viewport) -> Scales {
        compute_scales(data, viewport.width, viewport.height, self.margins)
    }

    pub fn project(&self, data: &[Starship], viewport: Viewport) -> Projection {
        let scales = self.compute_scales(data, viewport);
        let points = data
            .iter()
            .map(|ship| ProjectedPoint {
                starship: ship.clone(),
                x: scales.x.apply(normalize(&ship.length_raw) as f64),
                y: scales.y.apply(people(&ship.crew_raw, &ship.passengers_raw) as f64),
            })
            .collect();

        Projection { scales, points }
    }
}
