//! Host launch parameters.
//!
//! The init data is the auth side-channel for the notes API; platform and
//! appearance only affect presentation.

/// Launch parameters handed over by the host platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    /// Raw signed init data; empty when launched outside the host.
    pub init_data_raw: String,
    /// Host platform identifier such as `ios`, `android` or `tdesktop`.
    pub platform: String,
    /// Host reports a dark color scheme.
    pub dark: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance {
    Light,
    Dark,
}

/// Visual style family used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiPlatform {
    Ios,
    Base,
}

impl LaunchParams {
    pub fn has_init_data(&self) -> bool {
        !self.init_data_raw.trim().is_empty()
    }

    pub fn appearance(&self) -> Appearance {
        if self.dark {
            Appearance::Dark
        } else {
            Appearance::Light
        }
    }

    /// Apple hosts get the iOS style, everything else the base style.
    pub fn ui_platform(&self) -> UiPlatform {
        match self.platform.trim().to_ascii_lowercase().as_str() {
            "macos" | "ios" => UiPlatform::Ios,
            _ => UiPlatform::Base,
        }
    }
}
