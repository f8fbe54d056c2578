//! Brightness curve and the two-channel LED split.
//!
//! The commanded level follows the dynamo voltage over three bands. The middle
//! band ends at the measured boost converter voltage instead of a fixed point,
//! so the curve follows the battery backup as it sags:
//!
//! ```text
//! level
//!  max |                                  /
//!      |                               /
//!  bbu |               /|           /
//!      |             /  |        /
//!      |           /    |     /
//!      |         /      |  /  <- bbu - offset
//!  min |________/
//!      +--------+-------+-----------------+---- alternator voltage
//!              min    boost               hi
//! ```
//!
//! Overdrive and overload bypass the curve.

use crate::config::{LevelConfig, Thresholds};
use crate::evaluator::ErrorLevel;

/// Levels before inversion. Higher is brighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelLevels {
    pub led1: u16,
    pub led2: u16,
}

/// Levels as written to the drivers: `dac_range` is off, 0 is full drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelOutput {
    pub led1: u16,
    pub led2: u16,
}

impl ChannelLevels {
    pub fn inverted(self, dac_range: u16) -> ChannelOutput {
        ChannelOutput {
            led1: dac_range.saturating_sub(self.led1),
            led2: dac_range.saturating_sub(self.led2),
        }
    }
}

/// Commanded system level in `[system_led_level_min, system_led_level_max]`.
pub fn map_brightness(
    alternator_voltage: f32,
    boost_voltage: f32,
    level: ErrorLevel,
    thresholds: &Thresholds,
    levels: &LevelConfig,
) -> u16 {
    match level {
        ErrorLevel::Overdrive => return levels.system_led_level_max,
        ErrorLevel::Overload => return levels.system_led_level_min,
        ErrorLevel::Ok | ErrorLevel::Warning => {}
    }

    let min = levels.system_led_level_min as f32;
    let max = levels.system_led_level_max as f32;
    let bbu = levels.bbu_led_level as f32;
    let top_start = levels.bbu_led_level.saturating_sub(levels.bbu_led_level_offset) as f32;

    let v = alternator_voltage;
    // NaN voltage lands here too.
    let target = if !(v >= thresholds.alternator_voltage_min) {
        min
    } else if v < boost_voltage {
        interpolate(v, thresholds.alternator_voltage_min, boost_voltage, min, bbu)
    } else {
        interpolate(v, boost_voltage, thresholds.alternator_voltage_hi, top_start, max)
    };

    clamp_level(target, levels)
}

/// Straight line through (x0, y0) and (x1, y1). An empty or inverted span
/// yields `y1`.
fn interpolate(x: f32, x0: f32, x1: f32, y0: f32, y1: f32) -> f32 {
    let span = x1 - x0;
    if !(span > 0.0) {
        return y1;
    }
    y0 + (x - x0) * (y1 - y0) / span
}

fn clamp_level(target: f32, levels: &LevelConfig) -> u16 {
    if target.is_nan() {
        return levels.system_led_level_min;
    }
    let clamped = target.clamp(
        levels.system_led_level_min as f32,
        levels.system_led_level_max as f32,
    );
    // Round to nearest; the clamp keeps this inside u16.
    ((clamped + 0.5) as u16).min(levels.system_led_level_max)
}

/// Split a system level over the two LED banks.
///
/// LED1 takes the level up to the DAC range. LED2 takes whatever lies above
/// `led2_offset` and sits on the dead-zone floor until the level clears
/// `led2_offset + led_dead_zone_low`.
pub fn split_channels(level: u16, levels: &LevelConfig) -> ChannelLevels {
    let led1 = level.min(levels.dac_range);
    let led2_threshold = levels.led2_offset.saturating_add(levels.led_dead_zone_low);
    let led2 = if level > led2_threshold {
        (level - levels.led2_offset).max(levels.led_dead_zone_low)
    } else {
        levels.led_dead_zone_low
    };
    ChannelLevels {
        led1,
        led2: led2.min(levels.dac_range),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn map(v: f32, boost: f32, level: ErrorLevel) -> u16 {
        map_brightness(v, boost, level, &Thresholds::default(), &LevelConfig::default())
    }

    fn levels() -> LevelConfig {
        LevelConfig::default()
    }

    #[test]
    fn zero_volts_is_minimum() {
        assert_eq!(map(0.0, 14.0, ErrorLevel::Ok), levels().system_led_level_min);
    }

    #[test]
    fn nan_voltage_is_minimum() {
        assert_eq!(map(f32::NAN, 14.0, ErrorLevel::Ok), levels().system_led_level_min);
    }

    #[test]
    fn nan_boost_voltage_stays_in_range() {
        let level = map(12.0, f32::NAN, ErrorLevel::Ok);
        assert!(level >= levels().system_led_level_min);
        assert!(level <= levels().system_led_level_max);
    }

    #[test]
    fn minimum_voltage_starts_middle_band_at_minimum() {
        assert_eq!(map(6.0, 14.0, ErrorLevel::Ok), levels().system_led_level_min);
    }

    #[test]
    fn middle_band_interpolates() {
        // Halfway between 6 V and 14 V: halfway between 400 and 2500.
        assert_eq!(map(10.0, 14.0, ErrorLevel::Ok), 1450);
    }

    #[test]
    fn top_band_starts_below_bbu_level() {
        assert_eq!(map(14.0, 14.0, ErrorLevel::Ok), 2200);
    }

    #[test]
    fn top_band_reaches_maximum_at_hi() {
        assert_eq!(map(30.0, 14.0, ErrorLevel::Ok), levels().system_led_level_max);
    }

    #[test]
    fn above_hi_is_clamped() {
        assert_eq!(map(32.0, 14.0, ErrorLevel::Ok), levels().system_led_level_max);
    }

    #[test]
    fn boost_below_minimum_skips_middle_band() {
        // Boost converter reads 0 V: everything usable is in the top band.
        let level = map(6.0, 0.0, ErrorLevel::Ok);
        assert!(level > 2200);
    }

    #[test]
    fn boost_above_hi_gives_maximum() {
        assert_eq!(map(36.0, 35.0, ErrorLevel::Ok), levels().system_led_level_max);
    }

    #[test]
    fn warning_follows_curve() {
        assert_eq!(map(10.0, 14.0, ErrorLevel::Warning), map(10.0, 14.0, ErrorLevel::Ok));
    }

    #[test]
    fn overdrive_and_overload_bypass_curve() {
        assert_eq!(map(0.0, 14.0, ErrorLevel::Overdrive), levels().system_led_level_max);
        assert_eq!(map(45.0, 14.0, ErrorLevel::Overload), levels().system_led_level_min);
    }

    #[test]
    fn led2_sits_on_dead_zone_until_threshold() {
        let l = levels();
        let threshold = l.led2_offset + l.led_dead_zone_low;
        assert_eq!(split_channels(l.system_led_level_min, &l).led2, l.led_dead_zone_low);
        assert_eq!(split_channels(threshold, &l).led2, l.led_dead_zone_low);
        assert_eq!(split_channels(threshold + 1, &l).led2, l.led_dead_zone_low + 1);
    }

    #[test]
    fn led1_saturates_at_dac_range() {
        let l = levels();
        let split = split_channels(l.system_led_level_max, &l);
        assert_eq!(split.led1, l.dac_range);
        assert_eq!(split.led2, l.dac_range);
    }

    #[test]
    fn inversion_turns_minimum_level_into_high_output() {
        let l = levels();
        let out = split_channels(l.system_led_level_min, &l).inverted(l.dac_range);
        assert_eq!(out.led1, l.dac_range - l.system_led_level_min);
        assert_eq!(out.led2, l.dac_range - l.led_dead_zone_low);

        let out = split_channels(l.system_led_level_max, &l).inverted(l.dac_range);
        assert_eq!(out, ChannelOutput { led1: 0, led2: 0 });
    }

    fn any_level() -> impl Strategy<Value = ErrorLevel> {
        prop_oneof![
            Just(ErrorLevel::Ok),
            Just(ErrorLevel::Warning),
            Just(ErrorLevel::Overdrive),
            Just(ErrorLevel::Overload),
        ]
    }

    fn any_reading() -> impl Strategy<Value = f32> {
        prop_oneof![
            -100.0f32..100.0,
            Just(f32::NAN),
            Just(f32::INFINITY),
            Just(f32::NEG_INFINITY),
        ]
    }

    proptest! {
        #[test]
        fn output_is_always_in_range(v in any_reading(), boost in any_reading(), level in any_level()) {
            let l = levels();
            let out = map(v, boost, level);
            prop_assert!(out >= l.system_led_level_min);
            prop_assert!(out <= l.system_led_level_max);
        }

        #[test]
        fn overdrive_is_always_max(v in any_reading(), boost in any_reading()) {
            prop_assert_eq!(map(v, boost, ErrorLevel::Overdrive), levels().system_led_level_max);
        }

        #[test]
        fn overload_is_always_min(v in any_reading(), boost in any_reading()) {
            prop_assert_eq!(map(v, boost, ErrorLevel::Overload), levels().system_led_level_min);
        }

        #[test]
        fn middle_band_is_non_decreasing(a in 6.0f32..14.0, b in 6.0f32..14.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(map(lo, 14.0, ErrorLevel::Ok) <= map(hi, 14.0, ErrorLevel::Ok));
        }

        #[test]
        fn top_band_is_non_decreasing(a in 14.0f32..60.0, b in 14.0f32..60.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(map(lo, 14.0, ErrorLevel::Warning) <= map(hi, 14.0, ErrorLevel::Warning));
        }

        #[test]
        fn led2_never_below_dead_zone(level in 0u16..=u16::MAX) {
            let l = levels();
            let split = split_channels(level, &l);
            prop_assert!(split.led2 >= l.led_dead_zone_low);
            prop_assert!(split.led1 <= l.dac_range);
            prop_assert!(split.led2 <= l.dac_range);
        }
    }
}
