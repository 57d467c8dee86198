//! Battery voltage scaling
//!
//! The badge measures VBAT through a 1/3 divider and compensates for a
//! sagging logic supply by also sampling the 1.24V reference. Both readings
//! come from the same ADC, so its full-scale value cancels out:
//!
//! ```text
//! vdd  = 1.24 * full_scale / vref_raw
//! vbat = vbat_raw / full_scale * 3 * vdd  =  3 * 1.24 * vbat_raw / vref_raw
//! ```

/// Reference voltage in millivolts
pub const VREF_MV: u32 = 1240;

/// VBAT divider gain
pub const VBAT_GAIN: u32 = 3;

/// Voltage shown as an empty battery
pub const BATTERY_MIN_MV: u16 = 3200;

/// Voltage shown as a full battery
pub const BATTERY_MAX_MV: u16 = 4000;

/// Number of bars in the battery glyph
pub const BATTERY_BARS: u8 = 4;

/// Convert raw VBAT and reference ADC samples to millivolts
///
/// Returns `None` if the reference reading is zero (reference disabled
/// or not settled).
pub fn battery_millivolts(vbat_raw: u16, vref_raw: u16) -> Option<u16> {
    if vref_raw == 0 {
        return None;
    }
    let mv = VBAT_GAIN * VREF_MV * vbat_raw as u32 / vref_raw as u32;
    Some(mv.min(u16::MAX as u32) as u16)
}

/// Charge level on the 0..=4 bar scale, in hundredths of a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryLevel(u16);

impl BatteryLevel {
    /// Full scale in hundredths of a bar
    pub const FULL: u16 = BATTERY_BARS as u16 * 100;

    /// Map a voltage linearly from [`BATTERY_MIN_MV`]..[`BATTERY_MAX_MV`]
    /// onto 0..=4 bars, clamping outside that range
    pub fn from_millivolts(mv: u16) -> Self {
        let span = (BATTERY_MAX_MV - BATTERY_MIN_MV) as u32;
        let above_min = mv.saturating_sub(BATTERY_MIN_MV) as u32;
        let scaled = above_min * Self::FULL as u32 / span;
        Self(scaled.min(Self::FULL as u32) as u16)
    }

    /// Level in hundredths of a bar (0..=400)
    pub fn hundredths(self) -> u16 {
        self.0
    }

    /// Number of bars to draw
    ///
    /// Bar `i` is lit when the level is strictly above `i`.
    pub fn bars(self) -> u8 {
        (0..BATTERY_BARS)
            .filter(|&i| self.0 > i as u16 * 100)
            .count() as u8
    }

    /// Less than one full bar left
    pub fn is_critical(self) -> bool {
        self.0 < 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millivolts_from_raw() {
        // vbat_raw == vref_raw means VBAT/3 == 1.24V
        assert_eq!(battery_millivolts(1000, 1000), Some(3720));
        // 16-bit readings scale the same way
        assert_eq!(battery_millivolts(35_000, 30_000), Some(4340));
    }

    #[test]
    fn test_millivolts_without_reference() {
        assert_eq!(battery_millivolts(1000, 0), None);
    }

    #[test]
    fn test_level_clamps() {
        assert_eq!(BatteryLevel::from_millivolts(2900).hundredths(), 0);
        assert_eq!(BatteryLevel::from_millivolts(4200).hundredths(), 400);
    }

    #[test]
    fn test_level_linear() {
        assert_eq!(BatteryLevel::from_millivolts(3600).hundredths(), 200);
        assert_eq!(BatteryLevel::from_millivolts(3300).hundredths(), 50);
    }

    #[test]
    fn test_bars() {
        assert_eq!(BatteryLevel::from_millivolts(3200).bars(), 0);
        assert_eq!(BatteryLevel::from_millivolts(3210).bars(), 1);
        assert_eq!(BatteryLevel::from_millivolts(3400).bars(), 1);
        assert_eq!(BatteryLevel::from_millivolts(3402).bars(), 2);
        assert_eq!(BatteryLevel::from_millivolts(4000).bars(), 4);
    }

    #[test]
    fn test_critical() {
        assert!(BatteryLevel::from_millivolts(3350).is_critical());
        assert!(!BatteryLevel::from_millivolts(3400).is_critical());
    }
}
