//! Capability traits the controller reads sensors and drives outputs through.
//!
//! The firmware implements these on top of its ADC, I2C, PWM, GPIO and PIO
//! drivers; tests implement them with plain structs.

use crate::brightness::ChannelOutput;
use crate::indicator::IndicatorFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageChannel {
    Alternator,
    Battery,
    Boost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentChannel {
    /// Amperes, bidirectional.
    Alternator,
    /// Milliamperes, positive while discharging.
    Battery,
}

/// State of the charger status lines, already converted to asserted logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChargeLines {
    pub power: bool,
    pub charge: bool,
    pub done: bool,
}

pub trait VoltageSource {
    /// Latest voltage of `channel` in volts.
    fn voltage(&mut self, channel: VoltageChannel) -> f32;
}

pub trait CurrentSource {
    /// Latest current of `channel`, in the unit documented on [`CurrentChannel`].
    fn current(&mut self, channel: CurrentChannel) -> f32;
}

pub trait TemperatureSource {
    /// LED temperature in raw ADC counts.
    fn led_temperature_raw(&mut self) -> u16;
}

pub trait ChargeStatusSource {
    fn charge_lines(&mut self) -> ChargeLines;
}

/// Everything a control cycle reads.
pub trait SensorSource: VoltageSource + CurrentSource + TemperatureSource + ChargeStatusSource {}

impl<T> SensorSource for T where
    T: VoltageSource + CurrentSource + TemperatureSource + ChargeStatusSource
{
}

pub trait BrightnessSink {
    /// Apply inverted channel values: `dac_range` is off, 0 is full drive.
    fn set_brightness(&mut self, output: ChannelOutput);
}

pub trait AlarmSink {
    fn set_alarm(&mut self, sounding: bool);
}

pub trait IndicatorSink {
    fn show(&mut self, frame: &IndicatorFrame);
}

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// The output side of one control cycle.
pub struct OutputSinks<'a> {
    pub brightness: &'a mut dyn BrightnessSink,
    pub alarm: &'a mut dyn AlarmSink,
    pub indicator: &'a mut dyn IndicatorSink,
}
