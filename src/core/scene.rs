use crate::core::projection::{LinearScale, Projection, DEFAULT_TICK_COUNT};
use crate::core::tooltip::TooltipPlacer;
use crate::domain::model::{Margins, TooltipPlacement, Viewport, ViewportBounds};
use serde::Serialize;

pub const POINT_RADIUS: f64 = 5.0;
pub const HOVER_RADIUS: f64 = 7.0;
pub const X_AXIS_LABEL: &str = "Starship Length";
pub const Y_AXIS_LABEL: &str = "Max # Passengers";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub name: String,
    pub length_raw: String,
    pub passengers_raw: String,
    pub crew_raw: String,
    pub resource_url: String,
    /// Popup position for a pointer resting on the circle centre.
    pub tooltip: TooltipPlacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub label: String,
    pub ticks: Vec<Tick>,
}

impl Axis {
    fn from_scale(label: &str, scale: &LinearScale, offset: f64) -> Self {
        let ticks = scale
            .ticks(DEFAULT_TICK_COUNT)
            .into_iter()
            .map(|value| Tick {
                value,
                position: scale.apply(value) + offset,
            })
            .collect();
        Self {
            label: label.to_string(),
            ticks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub title: String,
    pub lines: Vec<String>,
    pub placement: TooltipPlacement,
}

/// Everything a renderer needs to draw one frame of the scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub circles: Vec<Circle>,
    pub x_axis: Axis,
    pub y_axis: Axis,
}

impl Scene {
    pub fn build(projection: &Projection, viewport: Viewport, margins: Margins, placer: &TooltipPlacer) -> Self {
        let bounds = viewport.bounds();
        let circles = projection
            .points
            .iter()
            .map(|point| {
                let cx = point.x + margins.left;
                let cy = point.y;
                let ship = &point.starship;
                Circle {
                    cx,
                    cy,
                    r: POINT_RADIUS,
                    name: ship.name.clone(),
                    length_raw: ship.length_raw.clone(),
                    passengers_raw: ship.passengers_raw.clone(),
                    crew_raw: ship.crew_raw.clone(),
                    resource_url: ship.resource_url.clone(),
                    tooltip: placer.place(cx, cy, &bounds),
                }
            })
            .collect();

        Self {
            width: viewport.width,
            height: viewport.height,
            margins,
            circles,
            x_axis: Axis::from_scale(X_AXIS_LABEL, &projection.scales.x, margins.left),
            y_axis: Axis::from_scale(Y_AXIS_LABEL, &projection.scales.y, 0.0),
        }
    }

    /// Index of the circle under the pointer, nearest first.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.circles
            .iter()
            .enumerate()
            .map(|(i, c)| (i, (c.cx - x).hypot(c.cy - y)))
            .filter(|(i, distance)| *distance <= self.circles[*i].r)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    /// Highlights one circle and describes it for the popup.
    pub fn hover(
        &mut self,
        index: usize,
        pointer_x: f64,
        pointer_y: f64,
        bounds: &ViewportBounds,
        placer: &TooltipPlacer,
    ) -> Option<Annotation> {
        self.leave();
        let circle = self.circles.get_mut(index)?;
        circle.r = HOVER_RADIUS;

        Some(Annotation {
            title: circle.name.clone(),
            lines: vec![
                format!("Length: {}", circle.length_raw),
                format!("Passengers: {}, Crew: {}", circle.passengers_raw, circle.crew_raw),
            ],
            placement: placer.place(pointer_x, pointer_y, bounds),
        })
    }

    pub fn leave(&mut self) {
        for circle in &mut self.circles {
            circle.r = POINT_RADIUS;
        }
    }

    pub fn to_svg(&self) -> String {
        let baseline = self.height - self.margins.bottom;
        let mut axes = String::new();

        axes.push_str(&format!(
            r##"<line class="x axis" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#6b7280"/>"##,
            self.margins.left,
            baseline,
            self.width,
            baseline
        ));
        for tick in &self.x_axis.ticks {
            axes.push_str(&format!(
                r##"<text class="tick" x="{:.1}" y="{:.1}" text-anchor="middle" font-size="10">{}</text>"##,
                tick.position,
                baseline + 15.0,
                tick.value
            ));
        }
        axes.push_str(&format!(
            r##"<line class="y axis" x1="{:.1}" y1="0" x2="{:.1}" y2="{:.1}" stroke="#6b7280"/>"##,
            self.margins.left, self.margins.left, baseline
        ));
        for tick in &self.y_axis.ticks {
            axes.push_str(&format!(
                r##"<text class="tick" x="{:.1}" y="{:.1}" text-anchor="end" font-size="10">{}</text>"##,
                self.margins.left - 4.0,
                tick.position + 3.0,
                tick.value
            ));
        }

        let mut circles = String::new();
        for c in &self.circles {
            circles.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" data-starship-name="{}" data-starship-length="{}" data-starship-passengers="{}" data-tooltip-left="{:.1}" data-tooltip-top="{:.1}"/>"##,
                c.cx,
                c.cy,
                c.r,
                escape_xml(&c.name),
                escape_xml(&c.length_raw),
                escape_xml(&c.passengers_raw),
                c.tooltip.left,
                c.tooltip.top
            ));
        }

        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">
  {}
  <text class="x label" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>
  <text class="y label" x="{:.1}" y="0" dy=".75em" transform="rotate(-90)" text-anchor="middle">{}</text>
  {}
</svg>"##,
            self.width,
            self.height,
            axes,
            self.width / 2.0,
            self.height - 10.0,
            self.x_axis.label,
            -self.height / 2.0,
            self.y_axis.label,
            circles
        )
    }
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
