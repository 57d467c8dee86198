//! Configuration type definitions

/// Default debounce window in milliseconds
pub const DEFAULT_BOUNCE_WINDOW_MS: u32 = 250;

/// Default event queue capacity (entries)
pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

/// Largest usable bounce window
///
/// Wrapping timestamp differences are only meaningful below half the
/// counter range.
pub const MAX_BOUNCE_WINDOW_MS: u32 = u32::MAX / 2;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bounce window exceeds [`MAX_BOUNCE_WINDOW_MS`]
    BounceWindowTooLarge,
    /// Card store was given no cards
    NoCards,
}

/// Input pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    /// Minimum time between two accepted presses of the same button
    pub bounce_window_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNCE_WINDOW_MS)
    }
}

impl InputConfig {
    pub const fn new(bounce_window_ms: u32) -> Self {
        Self { bounce_window_ms }
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bounce_window_ms > MAX_BOUNCE_WINDOW_MS {
            return Err(ConfigError::BounceWindowTooLarge);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InputConfig::default();
        assert_eq!(config.bounce_window_ms, 250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_window_is_valid() {
        assert!(InputConfig::new(0).validate().is_ok());
    }

    #[test]
    fn test_window_too_large() {
        assert!(InputConfig::new(MAX_BOUNCE_WINDOW_MS).validate().is_ok());
        assert_eq!(
            InputConfig::new(MAX_BOUNCE_WINDOW_MS + 1).validate(),
            Err(ConfigError::BounceWindowTooLarge)
        );
    }
}
