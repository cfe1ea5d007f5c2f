/// Convenience result type used across SignViz.
pub type SignVizResult<T> = Result<T, SignVizError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum SignVizError {
    /// Invalid caller-provided data (sizes, URIs, scene files).
    #[error("validation error: {0}")]
    Validation(String),

    /// An overlay or frame bitmap could not be loaded or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The camera stream collaborator rejected an operation.
    #[error("camera error: {0}")]
    Camera(String),

    /// The generation collaborator failed to produce an image.
    #[error("generation error: {0}")]
    Generation(String),

    /// Raster or encode failures inside the compositor.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SignVizError {
    /// Build a [`SignVizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SignVizError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`SignVizError::Camera`] value.
    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera(msg.into())
    }

    /// Build a [`SignVizError::Generation`] value.
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Build a [`SignVizError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
