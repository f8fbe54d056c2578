//! Conversions from raw converter values to engineering units.

use crate::config::{
    ADC_COUNTS, ADC_REFERENCE_V, ALTERNATOR_CURRENT_SENSITIVITY_MV_PER_A,
    ALTERNATOR_CURRENT_ZERO_MV, ALTERNATOR_DIVIDER_RATIO, BOOST_DIVIDER_RATIO,
    POWER_MONITOR_BUS_VOLTAGE_LSB_V, POWER_MONITOR_CURRENT_LSB_MA,
};

/// ADC counts to volts at the pin, with a per-board correction factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdcScale {
    pub reference_v: f32,
    pub counts: f32,
    pub correction: f32,
}

impl Default for AdcScale {
    fn default() -> Self {
        Self {
            reference_v: ADC_REFERENCE_V,
            counts: ADC_COUNTS,
            correction: 1.0,
        }
    }
}

impl AdcScale {
    pub fn pin_voltage(&self, raw: u16) -> f32 {
        raw as f32 * self.reference_v / self.counts * self.correction
    }
}

/// Scaling for every analog channel on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalogFrontEnd {
    pub adc: AdcScale,
    pub alternator_divider: f32,
    pub boost_divider: f32,
    pub current_zero_mv: f32,
    pub current_mv_per_a: f32,
}

impl Default for AnalogFrontEnd {
    fn default() -> Self {
        Self {
            adc: AdcScale::default(),
            alternator_divider: ALTERNATOR_DIVIDER_RATIO,
            boost_divider: BOOST_DIVIDER_RATIO,
            current_zero_mv: ALTERNATOR_CURRENT_ZERO_MV,
            current_mv_per_a: ALTERNATOR_CURRENT_SENSITIVITY_MV_PER_A,
        }
    }
}

impl AnalogFrontEnd {
    pub fn alternator_voltage(&self, raw: u16) -> f32 {
        self.adc.pin_voltage(raw) * self.alternator_divider
    }

    /// Hall sensor centered on `current_zero_mv`; negative below it.
    pub fn alternator_current(&self, raw: u16) -> f32 {
        let pin_mv = self.adc.pin_voltage(raw) * 1000.0;
        (pin_mv - self.current_zero_mv) / self.current_mv_per_a
    }

    pub fn boost_voltage(&self, raw: u16) -> f32 {
        self.adc.pin_voltage(raw) * self.boost_divider
    }
}

/// Charger status outputs pull low when asserted.
pub fn active_low(level_high: bool) -> bool {
    !level_high
}

/// Bus voltage register: bits 15..3 hold the voltage, bits 2..0 are flags.
pub fn bus_voltage_from_register(raw: u16) -> f32 {
    (raw >> 3) as f32 * POWER_MONITOR_BUS_VOLTAGE_LSB_V
}

/// Current register: signed, one LSB per `POWER_MONITOR_CURRENT_LSB_MA`.
pub fn current_ma_from_register(raw: u16) -> f32 {
    raw as i16 as f32 * POWER_MONITOR_CURRENT_LSB_MA
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-3 && d > -1e-3
    }

    #[test]
    fn pin_voltage_full_scale() {
        let adc = AdcScale::default();
        assert_eq!(adc.pin_voltage(0), 0.0);
        assert!(close(adc.pin_voltage(4096), 3.3));
    }

    #[test]
    fn correction_scales_reading() {
        let adc = AdcScale {
            correction: 1.1,
            ..AdcScale::default()
        };
        assert!(close(adc.pin_voltage(2048), 1.815));
    }

    #[test]
    fn alternator_voltage_applies_divider() {
        let afe = AnalogFrontEnd::default();
        assert!(close(afe.alternator_voltage(2048), 1.65 * ALTERNATOR_DIVIDER_RATIO));
    }

    #[test]
    fn alternator_current_is_bidirectional() {
        let afe = AnalogFrontEnd::default();
        assert!(close(afe.alternator_current(2048), 0.0));
        assert!(afe.alternator_current(3000) > 0.0);
        assert!(afe.alternator_current(1000) < 0.0);
    }

    #[test]
    fn charge_lines_are_active_low() {
        assert!(active_low(false));
        assert!(!active_low(true));
    }

    #[test]
    fn bus_voltage_register() {
        // 4.0 V = 1000 LSB, shifted past the three flag bits, with CNVR set.
        assert!(close(bus_voltage_from_register((1000 << 3) | 0b010), 4.0));
    }

    #[test]
    fn current_register_is_signed() {
        assert!(close(current_ma_from_register(1500), 150.0));
        assert!(close(current_ma_from_register((-1500i16) as u16), -150.0));
    }
}
