use crate::foundation::core::{Point, Vec2};
use crate::state::sign::{SignState, SignUpdate, clamp_scale};

/// Scale change per unit of wheel `delta_y`; scrolling up (negative delta) grows the sign.
pub const WHEEL_SCALE_PER_UNIT: f64 = 0.001;

/// Mouse `buttons` mask with only the primary button held.
const PRIMARY_BUTTON: u16 = 1;

/// Raw pointer event as delivered by the viewport surface, in screen pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    TouchStart { touches: Vec<Point> },
    TouchMove { touches: Vec<Point> },
    TouchEnd,
    MouseDown { at: Point },
    MouseMove {
        at: Point,
        /// Bitmask of held buttons, primary is bit 0.
        #[serde(default)]
        buttons: u16,
    },
    MouseUp,
    Wheel { delta_y: f64 },
}

/// Ephemeral per-interaction pointer state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSession {
    last_point: Option<Point>,
    last_distance: Option<f64>,
}

impl GestureSession {
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    pub fn last_distance(&self) -> Option<f64> {
        self.last_distance
    }

    pub fn is_idle(&self) -> bool {
        self.last_point.is_none() && self.last_distance.is_none()
    }
}

/// Translates pointer events into [`SignUpdate`]s.
///
/// Pans are applied 1:1 in screen pixels since the live preview renders in screen space; the
/// cover-fit multiplier is only needed later, when a capture bakes the sign into source pixels.
#[derive(Clone, Debug, Default)]
pub struct ViewportMapper {
    session: GestureSession,
}

impl ViewportMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    /// Dispatch one event; returns the update to apply, if any.
    pub fn handle(&mut self, event: &GestureEvent, sign: &SignState) -> Option<SignUpdate> {
        match event {
            GestureEvent::TouchStart { touches } => {
                self.touch_start(touches);
                None
            }
            GestureEvent::TouchMove { touches } => self.touch_move(touches, sign),
            GestureEvent::MouseDown { at } => {
                self.session.last_point = Some(*at);
                None
            }
            GestureEvent::MouseMove { at, buttons } => self.mouse_move(*at, *buttons, sign),
            GestureEvent::TouchEnd | GestureEvent::MouseUp => {
                self.end();
                None
            }
            GestureEvent::Wheel { delta_y } => {
                Some(SignUpdate::scale(wheel_scale(*delta_y, sign.scale)))
            }
        }
    }

    /// Record the starting pan point (one touch) or pinch distance (two touches).
    pub fn touch_start(&mut self, touches: &[Point]) {
        match touches {
            [p] => self.session.last_point = Some(*p),
            [a, b] => self.session.last_distance = Some(a.distance(*b)),
            _ => {}
        }
    }

    /// Pan or pinch; a no-op when the matching start was never seen.
    pub fn touch_move(&mut self, touches: &[Point], sign: &SignState) -> Option<SignUpdate> {
        match touches {
            [p] => self.pan_to(*p, sign),
            [a, b] => {
                let last = self.session.last_distance.filter(|d| *d > 0.0)?;
                let d = a.distance(*b);
                self.session.last_distance = Some(d);
                Some(SignUpdate::scale(pinch_scale(sign.scale, last, d)))
            }
            _ => None,
        }
    }

    fn mouse_move(&mut self, at: Point, buttons: u16, sign: &SignState) -> Option<SignUpdate> {
        if buttons != PRIMARY_BUTTON {
            return None;
        }
        self.pan_to(at, sign)
    }

    fn pan_to(&mut self, p: Point, sign: &SignState) -> Option<SignUpdate> {
        let last = self.session.last_point?;
        let delta: Vec2 = p - last;
        self.session.last_point = Some(p);
        Some(SignUpdate::position(sign.position + delta))
    }

    /// Clear the session at the end of an interaction.
    pub fn end(&mut self) {
        self.session = GestureSession::default();
    }
}

/// Scale after a pinch from `last_distance` to `distance`.
pub fn pinch_scale(current: f64, last_distance: f64, distance: f64) -> f64 {
    clamp_scale(current * (distance / last_distance))
}

/// Scale after a wheel step.
pub fn wheel_scale(delta_y: f64, current: f64) -> f64 {
    clamp_scale(current + (-delta_y * WHEEL_SCALE_PER_UNIT))
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/gesture.rs"]
mod tests;
