/// Global day/night preset applied to the preview and to captures.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LightingMode {
    #[default]
    #[serde(alias = "DAY")]
    Day,
    #[serde(alias = "NIGHT")]
    Night,
}

impl LightingMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }

    /// Flip the mode in place and return the new value.
    pub fn toggle(&mut self) -> Self {
        *self = self.toggled();
        tracing::debug!(mode = ?*self, "lighting toggled");
        *self
    }

    pub fn is_night(self) -> bool {
        matches!(self, Self::Night)
    }

    /// Human-readable name shown in the mode badge.
    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Daylight",
            Self::Night => "Neon Night",
        }
    }

    /// CSS filter applied to the live video element.
    pub fn video_filter_css(self) -> &'static str {
        match self {
            Self::Day => "none",
            Self::Night => "brightness(0.6) contrast(1.1)",
        }
    }

    /// CSS drop-shadow applied to the live sign element.
    pub fn sign_filter_css(self) -> &'static str {
        match self {
            Self::Day => "drop-shadow(2px 4px 6px rgba(0,0,0,0.5))",
            Self::Night => "drop-shadow(0 0 20px #00eaff)",
        }
    }
}

impl std::str::FromStr for LightingMode {
    type Err = crate::foundation::error::SignVizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "night" => Ok(Self::Night),
            other => Err(crate::foundation::error::SignVizError::validation(format!(
                "unknown lighting mode '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/lighting.rs"]
mod tests;
