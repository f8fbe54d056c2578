//! Status categories shown on the indicator.
//!
//! Each status is computed from raw readings by a chain of half-open range
//! checks. Every check that holds overwrites the previous result, so the
//! narrower, more extreme bands are checked last.

use crate::config::Thresholds;
use crate::io::ChargeLines;
use crate::snapshot::SensorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AlternatorStatus {
    /// Below the minimum usable voltage.
    Stalled = 0,
    /// [min, vpcc)
    Low = 1,
    /// [vpcc, hi)
    Nominal = 2,
    /// [hi, max]
    High = 3,
    /// Above max.
    Overvoltage = 4,
    /// Current above its limit, regardless of voltage.
    Overcurrent = 5,
}

impl AlternatorStatus {
    pub fn from_readings(voltage: f32, current: f32, t: &Thresholds) -> Self {
        let mut status = AlternatorStatus::Stalled;
        if voltage >= t.alternator_voltage_min {
            status = AlternatorStatus::Low;
        }
        if voltage >= t.alternator_voltage_vpcc {
            status = AlternatorStatus::Nominal;
        }
        if voltage >= t.alternator_voltage_hi {
            status = AlternatorStatus::High;
        }
        if voltage > t.alternator_voltage_max {
            status = AlternatorStatus::Overvoltage;
        }
        if current > t.alternator_current_max {
            status = AlternatorStatus::Overcurrent;
        }
        status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BatteryStatus {
    /// Below min.
    Empty = 0,
    /// [min, mid)
    Low = 1,
    /// [mid, max)
    Nominal = 2,
    /// max and above.
    Full = 3,
    /// Discharge current above its limit.
    Overcurrent = 4,
}

impl BatteryStatus {
    pub fn from_readings(voltage: f32, current_ma: f32, t: &Thresholds) -> Self {
        let mut status = BatteryStatus::Empty;
        if voltage >= t.battery_voltage_min {
            status = BatteryStatus::Low;
        }
        if voltage >= t.battery_voltage_mid {
            status = BatteryStatus::Nominal;
        }
        if voltage >= t.battery_voltage_max {
            status = BatteryStatus::Full;
        }
        if current_ma > t.battery_current_max {
            status = BatteryStatus::Overcurrent;
        }
        status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChargeStatus {
    /// Charger has no input power.
    Unpowered = 0,
    /// Powered, neither charging nor done.
    Standby = 1,
    Charging = 2,
    Done = 3,
    /// Charge and done asserted together: the charger reports a fault.
    Fault = 4,
}

impl ChargeStatus {
    pub fn from_lines(lines: ChargeLines) -> Self {
        let mut status = ChargeStatus::Unpowered;
        if lines.power {
            status = ChargeStatus::Standby;
        }
        if lines.power && lines.charge {
            status = ChargeStatus::Charging;
        }
        if lines.power && lines.done {
            status = ChargeStatus::Done;
        }
        if lines.charge && lines.done {
            status = ChargeStatus::Fault;
        }
        status
    }
}

/// The three statuses shown together on the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemStatus {
    pub alternator: AlternatorStatus,
    pub battery: BatteryStatus,
    pub charge: ChargeStatus,
}

impl SystemStatus {
    pub fn from_snapshot(s: &SensorSnapshot, t: &Thresholds) -> Self {
        Self {
            alternator: AlternatorStatus::from_readings(
                s.alternator_voltage,
                s.alternator_current,
                t,
            ),
            battery: BatteryStatus::from_readings(s.battery_voltage, s.battery_current, t),
            charge: ChargeStatus::from_lines(s.charge_lines()),
        }
    }
}
