//! Thresholds, brightness levels, timing and analog front-end constants.
//!
//! All values are compile-time constants. [`ControllerConfig::default`] packs
//! them into the structured configuration the [`Controller`](crate::Controller)
//! is built from, and [`ControllerConfig::validate`] rejects orderings that
//! would make a band empty or inverted.

use core::fmt;

// Alternator thresholds
pub const ALTERNATOR_VOLTAGE_MAX: f32 = 40.0; // V; overdrive above this
pub const ALTERNATOR_VOLTAGE_HI: f32 = 30.0; // V; top of the brightness curve
pub const ALTERNATOR_VOLTAGE_VPCC: f32 = 18.0; // V; dynamo is in its constant-current region above this
pub const ALTERNATOR_VOLTAGE_MIN: f32 = 6.0; // V; below this the LEDs are not driven from the dynamo
pub const ALTERNATOR_CURRENT_MAX: f32 = 2.0; // A; overdrive above this

// Battery thresholds (single Li-ion cell)
pub const BATTERY_VOLTAGE_MIN: f32 = 3.0; // V; overload below this
pub const BATTERY_VOLTAGE_MID: f32 = 3.7; // V
pub const BATTERY_VOLTAGE_MAX: f32 = 4.1; // V; considered full above this
// Positive battery current is discharge, negative is charge.
pub const BATTERY_CURRENT_MAX: f32 = 2500.0; // mA; overload above this

// LED temperature in raw ADC counts. Counts rise with temperature.
pub const LED_TEMPERATURE_HI: u16 = 2600; // warning above this
pub const LED_TEMPERATURE_MAX: u16 = 3100; // overload above this

const _: () = assert!(ALTERNATOR_VOLTAGE_MIN < ALTERNATOR_VOLTAGE_VPCC);
const _: () = assert!(ALTERNATOR_VOLTAGE_VPCC < ALTERNATOR_VOLTAGE_HI);
const _: () = assert!(ALTERNATOR_VOLTAGE_HI < ALTERNATOR_VOLTAGE_MAX);
const _: () = assert!(BATTERY_VOLTAGE_MIN < BATTERY_VOLTAGE_MID);
const _: () = assert!(BATTERY_VOLTAGE_MID < BATTERY_VOLTAGE_MAX);
const _: () = assert!(LED_TEMPERATURE_HI < LED_TEMPERATURE_MAX);

// Brightness levels. LED1 covers [0, DAC_RANGE], LED2 joins once LED1 is near
// its ceiling, so the system level spans both channels.
pub const DAC_RANGE: u16 = 4095; // 12-bit output, full scale = LED off
pub const LED_DEAD_ZONE_LOW: u16 = 400; // LED driver does not conduct below this
pub const LED2_OFFSET: u16 = 3500; // LED2 level = system level - offset
pub const SYSTEM_LED_LEVEL_MIN: u16 = LED_DEAD_ZONE_LOW;
pub const SYSTEM_LED_LEVEL_MAX: u16 = LED2_OFFSET + DAC_RANGE;
pub const BBU_LED_LEVEL: u16 = 2500; // level when the dynamo reaches the boost voltage
pub const BBU_LED_LEVEL_OFFSET: u16 = 300; // step back at the start of the top band

const _: () = assert!(LED_DEAD_ZONE_LOW < DAC_RANGE);
const _: () = assert!(SYSTEM_LED_LEVEL_MIN < BBU_LED_LEVEL - BBU_LED_LEVEL_OFFSET);
const _: () = assert!(BBU_LED_LEVEL < SYSTEM_LED_LEVEL_MAX);

// Timing
pub const MIN_AUDIBLE_DURATION_MS: u64 = 1000; // alarm stays on at least this long
pub const BLINK_INTERVAL_MS: u64 = 500; // half period of a blinking lamp
pub const DISPLAY_UPDATE_INTERVAL_MS: u64 = 250; // status indicator refresh

// Analog front end
pub const ADC_COUNTS: f32 = 4096.0; // 12-bit ADC
pub const ADC_REFERENCE_V: f32 = 3.3; // V
pub const ALTERNATOR_DIVIDER_RATIO: f32 = 15.7; // 100k / 6.8k divider
pub const BOOST_DIVIDER_RATIO: f32 = 6.0; // 100k / 20k divider
pub const ALTERNATOR_CURRENT_ZERO_MV: f32 = 1650.0; // mV; hall sensor output at 0 A
pub const ALTERNATOR_CURRENT_SENSITIVITY_MV_PER_A: f32 = 264.0; // mV/A at 3.3 V supply

// Battery power monitor (INA219 style)
pub const POWER_MONITOR_BUS_VOLTAGE_LSB_V: f32 = 0.004; // V per bus voltage bit
pub const POWER_MONITOR_CURRENT_LSB_MA: f32 = 0.1; // mA per current register bit

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Alternator voltages must satisfy min < vpcc < hi < max.
    AlternatorVoltageOrder,
    /// Alternator current limit must be positive.
    AlternatorCurrentLimit,
    /// Battery voltages must satisfy min < mid < max.
    BatteryVoltageOrder,
    /// Battery current limit must be positive.
    BatteryCurrentLimit,
    /// LED temperature warning must be below the overload limit.
    LedTemperatureOrder,
    /// Dead zone must lie inside the DAC range.
    DeadZone,
    /// Level range must be non-empty and reachable by the two channels.
    LevelRange,
    /// BBU level (after its offset) must lie inside the level range.
    BbuLevel,
    /// Blink and display intervals must be non-zero.
    Interval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::AlternatorVoltageOrder => "alternator voltage thresholds out of order",
            ConfigError::AlternatorCurrentLimit => "alternator current limit must be positive",
            ConfigError::BatteryVoltageOrder => "battery voltage thresholds out of order",
            ConfigError::BatteryCurrentLimit => "battery current limit must be positive",
            ConfigError::LedTemperatureOrder => "LED temperature thresholds out of order",
            ConfigError::DeadZone => "dead zone outside DAC range",
            ConfigError::LevelRange => "invalid system LED level range",
            ConfigError::BbuLevel => "BBU level outside level range",
            ConfigError::Interval => "timing interval must be non-zero",
        };
        f.write_str(msg)
    }
}

/// Safety thresholds the evaluator and status bands compare against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub alternator_voltage_max: f32,
    pub alternator_voltage_hi: f32,
    pub alternator_voltage_vpcc: f32,
    pub alternator_voltage_min: f32,
    pub alternator_current_max: f32,
    pub battery_voltage_min: f32,
    pub battery_voltage_mid: f32,
    pub battery_voltage_max: f32,
    pub battery_current_max: f32,
    pub led_temperature_hi: u16,
    pub led_temperature_max: u16,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            alternator_voltage_max: ALTERNATOR_VOLTAGE_MAX,
            alternator_voltage_hi: ALTERNATOR_VOLTAGE_HI,
            alternator_voltage_vpcc: ALTERNATOR_VOLTAGE_VPCC,
            alternator_voltage_min: ALTERNATOR_VOLTAGE_MIN,
            alternator_current_max: ALTERNATOR_CURRENT_MAX,
            battery_voltage_min: BATTERY_VOLTAGE_MIN,
            battery_voltage_mid: BATTERY_VOLTAGE_MID,
            battery_voltage_max: BATTERY_VOLTAGE_MAX,
            battery_current_max: BATTERY_CURRENT_MAX,
            led_temperature_hi: LED_TEMPERATURE_HI,
            led_temperature_max: LED_TEMPERATURE_MAX,
        }
    }
}

/// Brightness scale and the two-channel split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelConfig {
    pub system_led_level_min: u16,
    pub system_led_level_max: u16,
    pub bbu_led_level: u16,
    pub bbu_led_level_offset: u16,
    pub led2_offset: u16,
    pub led_dead_zone_low: u16,
    pub dac_range: u16,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            system_led_level_min: SYSTEM_LED_LEVEL_MIN,
            system_led_level_max: SYSTEM_LED_LEVEL_MAX,
            bbu_led_level: BBU_LED_LEVEL,
            bbu_led_level_offset: BBU_LED_LEVEL_OFFSET,
            led2_offset: LED2_OFFSET,
            led_dead_zone_low: LED_DEAD_ZONE_LOW,
            dac_range: DAC_RANGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub min_audible_duration_ms: u64,
    pub blink_interval_ms: u64,
    pub display_update_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_audible_duration_ms: MIN_AUDIBLE_DURATION_MS,
            blink_interval_ms: BLINK_INTERVAL_MS,
            display_update_interval_ms: DISPLAY_UPDATE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControllerConfig {
    pub thresholds: Thresholds,
    pub levels: LevelConfig,
    pub timing: TimingConfig,
}

impl ControllerConfig {
    /// Check threshold ordering and level ranges.
    ///
    /// Comparisons are written so that a NaN threshold fails validation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if !(t.alternator_voltage_min < t.alternator_voltage_vpcc
            && t.alternator_voltage_vpcc < t.alternator_voltage_hi
            && t.alternator_voltage_hi < t.alternator_voltage_max)
        {
            return Err(ConfigError::AlternatorVoltageOrder);
        }
        if !(t.alternator_current_max > 0.0) {
            return Err(ConfigError::AlternatorCurrentLimit);
        }
        if !(t.battery_voltage_min < t.battery_voltage_mid
            && t.battery_voltage_mid < t.battery_voltage_max)
        {
            return Err(ConfigError::BatteryVoltageOrder);
        }
        if !(t.battery_current_max > 0.0) {
            return Err(ConfigError::BatteryCurrentLimit);
        }
        if t.led_temperature_hi >= t.led_temperature_max {
            return Err(ConfigError::LedTemperatureOrder);
        }

        let l = &self.levels;
        if l.led_dead_zone_low >= l.dac_range {
            return Err(ConfigError::DeadZone);
        }
        let reachable = l.led2_offset as u32 + l.dac_range as u32;
        if l.system_led_level_min >= l.system_led_level_max
            || l.system_led_level_max as u32 > reachable
        {
            return Err(ConfigError::LevelRange);
        }
        let top_band_start = l.bbu_led_level.checked_sub(l.bbu_led_level_offset);
        match top_band_start {
            Some(start)
                if start > l.system_led_level_min
                    && l.bbu_led_level < l.system_led_level_max => {}
            _ => return Err(ConfigError::BbuLevel),
        }

        let timing = &self.timing;
        if timing.blink_interval_ms == 0 || timing.display_update_interval_ms == 0 {
            return Err(ConfigError::Interval);
        }

        Ok(())
    }
}
