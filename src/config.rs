//! Probe configuration

use crate::report::OutputFormat;
use crate::Backend;

/// Adapter power preference used when requesting a GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PowerPreference {
    /// Prefer the discrete GPU
    #[default]
    HighPerformance,
    /// Prefer the integrated GPU
    LowPower,
}

#[cfg(feature = "gpu")]
impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(power: PowerPreference) -> Self {
        match power {
            PowerPreference::HighPerformance => Self::HighPerformance,
            PowerPreference::LowPower => Self::LowPower,
        }
    }
}

/// Configuration for one probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Which kernel evaluates `sin()`
    pub backend: Backend,
    /// Adapter preference for the GPU kernel
    pub power: PowerPreference,
    /// Report format
    pub format: OutputFormat,
    /// Print the bitplane preview before the table
    pub show_plane: bool,
    /// Colorize text output
    pub color: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Auto,
            power: PowerPreference::HighPerformance,
            format: OutputFormat::Text,
            show_plane: false,
            color: true,
        }
    }
}

impl ProbeConfig {
    /// Set the backend
    #[must_use]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the adapter power preference
    #[must_use]
    pub fn with_power(mut self, power: PowerPreference) -> Self {
        self.power = power;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable the bitplane preview
    #[must_use]
    pub fn with_show_plane(mut self, show_plane: bool) -> Self {
        self.show_plane = show_plane;
        self
    }

    /// Enable or disable colored text
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProbeConfig::default();
        assert_eq!(config.backend, Backend::Auto);
        assert_eq!(config.power, PowerPreference::HighPerformance);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.show_plane);
        assert!(config.color);
    }

    #[test]
    fn test_builder_chain() {
        let config = ProbeConfig::default()
            .with_backend(Backend::Host)
            .with_power(PowerPreference::LowPower)
            .with_format(OutputFormat::Json)
            .with_show_plane(true)
            .with_color(false);
        assert_eq!(config.backend, Backend::Host);
        assert_eq!(config.power, PowerPreference::LowPower);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.show_plane);
        assert!(!config.color);
    }
}
