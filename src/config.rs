//! Gate settings with a build-time default and runtime overrides. The default
//! redirect target comes from `SESSION_GATE_REDIRECT_TARGET` at build time so
//! static deployments can bake it in; callers (the CLI, an embedding app) may
//! override it at runtime. Settings are public values; do not store secrets
//! here.

use crate::error::GateError;
use crate::gate::{GateConfig, RoutePath};

pub const DEFAULT_REDIRECT_TARGET: &str = "/login";

/// Settings a protected region is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateSettings {
    pub redirect_target: String,
}

/// Optional values layered over the build-time settings.
#[derive(Clone, Debug, Default)]
pub struct SettingsOverrides {
    pub redirect_target: Option<String>,
}

impl GateSettings {
    /// Loads the build-time settings and applies `overrides`.
    pub fn load(overrides: SettingsOverrides) -> Self {
        let redirect_target =
            option_env!("SESSION_GATE_REDIRECT_TARGET").unwrap_or(DEFAULT_REDIRECT_TARGET);

        let mut settings = Self {
            redirect_target: redirect_target.to_string(),
        };
        apply_overrides(&mut settings, overrides);
        settings
    }

    /// Validates the settings into a gate configuration.
    ///
    /// # Errors
    /// Returns an error if the redirect target is not an in-app path.
    pub fn gate_config(&self) -> Result<GateConfig, GateError> {
        Ok(GateConfig::new(RoutePath::parse(self.redirect_target.as_str())?))
    }
}

fn apply_overrides(settings: &mut GateSettings, overrides: SettingsOverrides) {
    if let Some(value) = overrides.redirect_target.as_deref().and_then(normalize_value) {
        settings.redirect_target = value;
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
