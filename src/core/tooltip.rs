use crate::domain::model::{TooltipPlacement, ViewportBounds};

pub const ASSUMED_TOOLTIP_WIDTH: f64 = 400.0;
pub const ASSUMED_TOOLTIP_HEIGHT: f64 = 200.0;
/// Distance the popup keeps from the pointer, up and to the right.
pub const POINTER_OFFSET: f64 = 50.0;

/// Positions an annotation popup next to the pointer.
///
/// Single pass, no iteration. Only the top, bottom and right edges are
/// checked, so very small viewports can still overflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipPlacer {
    pub width: f64,
    pub height: f64,
}

impl Default for TooltipPlacer {
    fn default() -> Self {
        Self {
            width: ASSUMED_TOOLTIP_WIDTH,
            height: ASSUMED_TOOLTIP_HEIGHT,
        }
    }
}

impl TooltipPlacer {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn place(&self, pointer_x: f64, pointer_y: f64, bounds: &ViewportBounds) -> TooltipPlacement {
        let mut top = pointer_y - POINTER_OFFSET;
        let mut left = pointer_x + POINTER_OFFSET;

        if top < bounds.top {
            top += POINTER_OFFSET;
        } else if top + self.height > bounds.bottom {
            top -= self.height / 2.0;
        }

        if left + self.width > bounds.right {
            left -= self.width;
        }

        TooltipPlacement { left, top }
    }
}
