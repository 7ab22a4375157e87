// common/src/models/viewport.rs
use serde::{Deserialize, Serialize};

/// Width thresholds separating the device classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoints {
    /// Widths below this are mobile
    pub mobile: u32,
    /// Widths at or above this are desktop
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 640,
            desktop: 1025,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub fn classify(width: u32, breakpoints: &Breakpoints) -> Self {
        if width < breakpoints.mobile {
            DeviceClass::Mobile
        } else if width < breakpoints.desktop {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self, DeviceClass::Mobile)
    }

    pub fn is_tablet(&self) -> bool {
        matches!(self, DeviceClass::Tablet)
    }

    pub fn is_desktop(&self) -> bool {
        matches!(self, DeviceClass::Desktop)
    }

    pub fn is_mobile_or_tablet(&self) -> bool {
        matches!(self, DeviceClass::Mobile | DeviceClass::Tablet)
    }
}

/// Window dimensions together with the class derived from them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSnapshot {
    pub width: u32,
    pub height: u32,
    pub device: DeviceClass,
}

impl ViewportSnapshot {
    pub fn new(width: u32, height: u32, breakpoints: &Breakpoints) -> Self {
        Self {
            width,
            height,
            device: DeviceClass::classify(width, breakpoints),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_boundaries() {
        let bp = Breakpoints::default();
        assert_eq!(DeviceClass::classify(639, &bp), DeviceClass::Mobile);
        assert_eq!(DeviceClass::classify(640, &bp), DeviceClass::Tablet);
        assert_eq!(DeviceClass::classify(1024, &bp), DeviceClass::Tablet);
        assert_eq!(DeviceClass::classify(1025, &bp), DeviceClass::Desktop);
        assert_eq!(DeviceClass::classify(0, &bp), DeviceClass::Mobile);
    }

    #[test]
    fn test_projections() {
        assert!(DeviceClass::Mobile.is_mobile_or_tablet());
        assert!(DeviceClass::Tablet.is_mobile_or_tablet());
        assert!(!DeviceClass::Desktop.is_mobile_or_tablet());
        assert!(DeviceClass::Desktop.is_desktop());
        assert!(!DeviceClass::Tablet.is_mobile());
    }
}
