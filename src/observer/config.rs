//! Configuration for the observer

use crate::capture::CaptureRegion;

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    /// Minimum similarity (0.0 to 1.0) for the template to count as found
    pub threshold: f64,
    /// Sub-area of the frame to capture; whole frame when `None`
    pub region: Option<CaptureRegion>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            region: None,
        }
    }
}

impl ObserverConfig {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: CaptureRegion) -> Self {
        self.region = Some(region);
        self
    }
}

/// Configuration preset for pixel-exact UI elements
pub fn strict_config() -> ObserverConfig {
    ObserverConfig::new(0.95)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_preset() {
        let config = strict_config();
        assert_eq!(config.threshold, 0.95);
        assert!(config.region.is_none());
        assert_eq!(ObserverConfig::default().threshold, 0.0);
    }
}
