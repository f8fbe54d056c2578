use crate::io::{ChargeLines, CurrentChannel, SensorSource, VoltageChannel};

/// One cycle's worth of sensor readings.
///
/// Readings are taken as delivered, glitches included. Nothing downstream
/// special-cases NaN or negative values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    /// V
    pub alternator_voltage: f32,
    /// A, negative when current flows back into the dynamo
    pub alternator_current: f32,
    /// V
    pub battery_voltage: f32,
    /// mA, positive while discharging
    pub battery_current: f32,
    /// V, boost converter output
    pub boost_voltage: f32,
    /// raw ADC counts
    pub led_temperature: u16,
    pub charge_power: bool,
    pub charge_charge: bool,
    pub charge_done: bool,
}

impl SensorSnapshot {
    /// Read every channel once.
    pub fn capture<S>(sources: &mut S) -> Self
    where
        S: SensorSource + ?Sized,
    {
        let ChargeLines {
            power,
            charge,
            done,
        } = sources.charge_lines();
        Self {
            alternator_voltage: sources.voltage(VoltageChannel::Alternator),
            alternator_current: sources.current(CurrentChannel::Alternator),
            battery_voltage: sources.voltage(VoltageChannel::Battery),
            battery_current: sources.current(CurrentChannel::Battery),
            boost_voltage: sources.voltage(VoltageChannel::Boost),
            led_temperature: sources.led_temperature_raw(),
            charge_power: power,
            charge_charge: charge,
            charge_done: done,
        }
    }

    pub fn charge_lines(&self) -> ChargeLines {
        ChargeLines {
            power: self.charge_power,
            charge: self.charge_charge,
            done: self.charge_done,
        }
    }
}
