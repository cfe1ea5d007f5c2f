use crate::foundation::core::Vec2;

/// Smallest allowed uniform sign scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest allowed uniform sign scale.
pub const MAX_SCALE: f64 = 5.0;

/// Identifier given to the sign created on startup.
pub const DEFAULT_SIGN_ID: &str = "default";
/// Placeholder overlay shown before the user uploads or generates a sign.
pub const DEFAULT_SIGN_SRC: &str = "https://picsum.photos/400/200";

/// Clamp a scale value into `[MIN_SCALE, MAX_SCALE]`.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Wrap a rotation in degrees into `[0, 360)`.
pub fn wrap_rotation(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if r >= 360.0 { 0.0 } else { r }
}

/// Snapshot of the overlay sign.
///
/// `position` is an offset in screen pixels from the viewport center.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignState {
    /// Opaque identifier, only used as a render key.
    pub id: String,
    /// Bitmap source: data URI, local path or remote URL.
    pub image_src: String,
    /// Screen-pixel offset from the viewport center.
    #[serde(default)]
    pub position: Vec2,
    /// Uniform scale factor.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for SignState {
    fn default() -> Self {
        Self::with_image(DEFAULT_SIGN_ID, DEFAULT_SIGN_SRC)
    }
}

impl SignState {
    /// A sign with the given image and identity geometry.
    pub fn with_image(id: impl Into<String>, image_src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_src: image_src.into(),
            position: Vec2::ZERO,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    fn normalized(mut self) -> Self {
        if !self.position.x.is_finite() || !self.position.y.is_finite() {
            self.position = Vec2::ZERO;
        }
        self.scale = if self.scale.is_finite() {
            clamp_scale(self.scale)
        } else {
            1.0
        };
        self.rotation = if self.rotation.is_finite() {
            wrap_rotation(self.rotation)
        } else {
            0.0
        };
        self
    }
}

/// Partial update merged into the current [`SignState`].
///
/// Setting `image_src` to a new value replaces the sign wholesale and resets its
/// geometry; the geometry fields of the same update are then ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

impl SignUpdate {
    /// An update that only moves the sign.
    pub fn position(position: Vec2) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// An update that only rescales the sign.
    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    /// An update that only rotates the sign.
    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    /// Whether the update carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.image_src.is_none()
            && self.position.is_none()
            && self.scale.is_none()
            && self.rotation.is_none()
    }
}

/// Sole owner and mutator of the overlay [`SignState`].
///
/// Every mutation path (gestures, sliders, buttons, uploads) goes through this type, which
/// keeps `scale` within `[MIN_SCALE, MAX_SCALE]` and `rotation` within `[0, 360)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SignStateMachine {
    state: SignState,
}

impl Default for SignStateMachine {
    fn default() -> Self {
        Self::new(SignState::default())
    }
}

impl SignStateMachine {
    /// Take ownership of an initial state, normalizing out-of-range geometry.
    pub fn new(initial: SignState) -> Self {
        Self {
            state: initial.normalized(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &SignState {
        &self.state
    }

    /// Merge a partial update and return the resulting state.
    ///
    /// Non-finite numeric fields are ignored.
    pub fn apply_update(&mut self, update: SignUpdate) -> &SignState {
        if let Some(src) = update.image_src
            && src != self.state.image_src
        {
            return self.replace_image(src);
        }
        if let Some(p) = update.position
            && p.x.is_finite()
            && p.y.is_finite()
        {
            self.state.position = p;
        }
        if let Some(s) = update.scale
            && s.is_finite()
        {
            self.state.scale = clamp_scale(s);
        }
        if let Some(r) = update.rotation
            && r.is_finite()
        {
            self.state.rotation = wrap_rotation(r);
        }
        &self.state
    }

    /// Swap the overlay image and reset position, scale and rotation.
    pub fn replace_image(&mut self, image_src: impl Into<String>) -> &SignState {
        let image_src = image_src.into();
        tracing::debug!(id = %self.state.id, "replacing sign image");
        self.state = SignState::with_image(self.state.id.clone(), image_src);
        &self.state
    }

    /// Offset the sign by a screen-pixel delta.
    pub fn translate(&mut self, delta: Vec2) -> &SignState {
        let next = self.state.position + delta;
        self.apply_update(SignUpdate::position(next))
    }

    /// Set the scale directly (slider path).
    pub fn set_scale(&mut self, scale: f64) -> &SignState {
        self.apply_update(SignUpdate::scale(scale))
    }

    /// Add a fixed step to the scale (zoom buttons).
    pub fn nudge_scale(&mut self, step: f64) -> &SignState {
        let next = self.state.scale + step;
        self.apply_update(SignUpdate::scale(next))
    }

    /// Set the rotation in degrees (slider path).
    pub fn set_rotation(&mut self, rotation: f64) -> &SignState {
        self.apply_update(SignUpdate::rotation(rotation))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/sign.rs"]
mod tests;
