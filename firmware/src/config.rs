use dynalight_controller::config::DAC_RANGE;

pub const CONTROL_LOOP_PERIOD_MS: u64 = 20; // ms; one control cycle
pub const ANALOG_SAMPLE_PERIOD_MS: u64 = 10; // ms
pub const DIGITAL_SAMPLE_PERIOD_MS: u64 = 10; // ms
pub const BATTERY_MONITOR_PERIOD_MS: u64 = 100; // ms

pub const WATCHDOG_TIMEOUT_MS: u64 = 8_000; // ms
pub const WATCHDOG_FEED_PERIOD_MS: u64 = 1_000; // ms

// Samples in each analog moving average; 40 ms of history at 10 ms per sample.
pub const AVERAGE_SAMPLES: usize = 4;

// Per-board ADC gain correction. 1.0 until calibrated against a bench supply.
pub const DEFAULT_ADC_CORRECTION_SCALE: f32 = 1.0;

pub const NUM_LEDS: usize = dynalight_controller::indicator::INDICATOR_LAMPS;
pub const DEFAULT_LED_BRIGHTNESS: u8 = 0x30; // Default indicator brightness value
pub const INDICATOR_QUEUE_DEPTH: usize = 4;

// Channel values are written to the compare registers unchanged. The counter
// wraps one below the DAC range, so compare == DAC_RANGE holds the output high
// for the whole period (driver fully off) and compare == 0 holds it low.
pub const PWM_FULL_SCALE: u16 = DAC_RANGE;
pub const PWM_TOP: u16 = PWM_FULL_SCALE - 1;

const _: () = assert!(PWM_FULL_SCALE > PWM_TOP);

// INA219 battery monitor
pub const POWER_MONITOR_ADDR: u8 = 0x40;
pub const POWER_MONITOR_REG_CONFIG: u8 = 0x00;
pub const POWER_MONITOR_REG_BUS_VOLTAGE: u8 = 0x02;
pub const POWER_MONITOR_REG_CURRENT: u8 = 0x04;
pub const POWER_MONITOR_REG_CALIBRATION: u8 = 0x05;
// 32 V bus, ±320 mV shunt, 12-bit continuous conversion.
pub const POWER_MONITOR_CONFIG: u16 = 0x399f;
// 0.1 mA current LSB with a 0.1 Ω shunt.
pub const POWER_MONITOR_CALIBRATION: u16 = 4096;
