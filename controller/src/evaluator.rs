//! Maps a sensor snapshot to an error level.
//!
//! The rules in [`RULES`] are applied in order and every rule whose predicate
//! holds overwrites the running level. The result is therefore the level of the
//! *last* firing rule, not the highest one. With the default table the two
//! coincide, but the order is part of the behavior and must not be sorted or
//! reduced to a maximum.
//!
//! Predicates are plain float comparisons. A NaN reading makes its comparison
//! false, so a NaN channel never raises the level: a snapshot of all NaN
//! evaluates to [`ErrorLevel::Ok`].

use crate::config::Thresholds;
use crate::snapshot::SensorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorLevel {
    #[default]
    Ok = 0,
    /// Non-critical, e.g. LED running warm. Alarm only.
    Warning = 1,
    /// Alternator supplies too much. Brightness forced to maximum.
    Overdrive = 2,
    /// Battery or LED overloaded. Brightness forced to minimum.
    Overload = 3,
}

impl ErrorLevel {
    pub fn is_fault(self) -> bool {
        self != ErrorLevel::Ok
    }
}

pub type Predicate = fn(&SensorSnapshot, &Thresholds) -> bool;

pub struct Rule {
    pub name: &'static str,
    pub predicate: Predicate,
    pub level: ErrorLevel,
}

fn led_temperature_high(s: &SensorSnapshot, t: &Thresholds) -> bool {
    s.led_temperature > t.led_temperature_hi
}

fn alternator_overvoltage(s: &SensorSnapshot, t: &Thresholds) -> bool {
    s.alternator_voltage > t.alternator_voltage_max
}

fn alternator_overcurrent(s: &SensorSnapshot, t: &Thresholds) -> bool {
    s.alternator_current > t.alternator_current_max
}

fn battery_overcurrent(s: &SensorSnapshot, t: &Thresholds) -> bool {
    s.battery_current > t.battery_current_max
}

fn led_temperature_max(s: &SensorSnapshot, t: &Thresholds) -> bool {
    s.led_temperature > t.led_temperature_max
}

fn battery_undervoltage(s: &SensorSnapshot, t: &Thresholds) -> bool {
    s.battery_voltage < t.battery_voltage_min
}

pub const RULES: [Rule; 6] = [
    Rule {
        name: "led temperature high",
        predicate: led_temperature_high,
        level: ErrorLevel::Warning,
    },
    Rule {
        name: "alternator overvoltage",
        predicate: alternator_overvoltage,
        level: ErrorLevel::Overdrive,
    },
    Rule {
        name: "alternator overcurrent",
        predicate: alternator_overcurrent,
        level: ErrorLevel::Overdrive,
    },
    Rule {
        name: "battery overcurrent",
        predicate: battery_overcurrent,
        level: ErrorLevel::Overload,
    },
    Rule {
        name: "led temperature max",
        predicate: led_temperature_max,
        level: ErrorLevel::Overload,
    },
    Rule {
        name: "battery undervoltage",
        predicate: battery_undervoltage,
        level: ErrorLevel::Overload,
    },
];

pub fn evaluate(snapshot: &SensorSnapshot, thresholds: &Thresholds) -> ErrorLevel {
    evaluate_rules(&RULES, snapshot, thresholds)
}

/// Apply `rules` in order, last firing rule wins.
pub fn evaluate_rules(
    rules: &[Rule],
    snapshot: &SensorSnapshot,
    thresholds: &Thresholds,
) -> ErrorLevel {
    let mut level = ErrorLevel::Ok;
    for rule in rules {
        if (rule.predicate)(snapshot, thresholds) {
            trace!("rule fired: {}", rule.name);
            level = rule.level;
        }
    }
    level
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal() -> SensorSnapshot {
        SensorSnapshot {
            alternator_voltage: 20.0,
            alternator_current: 0.5,
            battery_voltage: 3.8,
            battery_current: 100.0,
            boost_voltage: 14.0,
            led_temperature: 1500,
            charge_power: true,
            charge_charge: true,
            charge_done: false,
        }
    }

    #[test]
    fn nominal_readings_are_ok() {
        assert_eq!(evaluate(&nominal(), &Thresholds::default()), ErrorLevel::Ok);
    }

    #[test]
    fn warm_led_is_warning() {
        let s = SensorSnapshot {
            led_temperature: 2700,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Warning);
    }

    #[test]
    fn threshold_itself_does_not_fire() {
        let t = Thresholds::default();
        let s = SensorSnapshot {
            led_temperature: t.led_temperature_hi,
            alternator_voltage: t.alternator_voltage_max,
            battery_voltage: t.battery_voltage_min,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &t), ErrorLevel::Ok);
    }

    #[test]
    fn alternator_overvoltage_is_overdrive() {
        let s = SensorSnapshot {
            alternator_voltage: 41.0,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Overdrive);
    }

    #[test]
    fn alternator_overcurrent_is_overdrive() {
        let s = SensorSnapshot {
            alternator_current: 2.5,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Overdrive);
    }

    #[test]
    fn battery_undervoltage_is_overload() {
        let s = SensorSnapshot {
            battery_voltage: 2.9,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Overload);
    }

    #[test]
    fn led_temperature_max_is_overload() {
        // Above both LED limits: the warning rule fires first, then overload.
        let s = SensorSnapshot {
            led_temperature: 3200,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Overload);
    }

    #[test]
    fn led_temperature_at_max_is_still_warning() {
        let t = Thresholds::default();
        let s = SensorSnapshot {
            led_temperature: t.led_temperature_max,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &t), ErrorLevel::Warning);
    }

    #[test]
    fn overheated_led_overrides_overdrive() {
        let s = SensorSnapshot {
            alternator_voltage: 45.0,
            led_temperature: 3200,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Overload);
    }

    #[test]
    fn overload_after_overdrive_wins() {
        let s = SensorSnapshot {
            alternator_voltage: 45.0,
            battery_current: 3000.0,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Overload);
    }

    #[test]
    fn overdrive_after_warning_wins() {
        let s = SensorSnapshot {
            led_temperature: 2700,
            alternator_current: 3.0,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Overdrive);
    }

    #[test]
    fn later_rule_overrides_higher_level() {
        fn always(_: &SensorSnapshot, _: &Thresholds) -> bool {
            true
        }
        let rules = [
            Rule {
                name: "first",
                predicate: always,
                level: ErrorLevel::Overload,
            },
            Rule {
                name: "second",
                predicate: always,
                level: ErrorLevel::Warning,
            },
        ];
        let level = evaluate_rules(&rules, &nominal(), &Thresholds::default());
        assert_eq!(level, ErrorLevel::Warning);
    }

    #[test]
    fn nan_readings_evaluate_ok() {
        let s = SensorSnapshot {
            alternator_voltage: f32::NAN,
            alternator_current: f32::NAN,
            battery_voltage: f32::NAN,
            battery_current: f32::NAN,
            boost_voltage: f32::NAN,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Ok);
    }

    #[test]
    fn negative_battery_voltage_is_overload() {
        let s = SensorSnapshot {
            battery_voltage: -0.2,
            ..nominal()
        };
        assert_eq!(evaluate(&s, &Thresholds::default()), ErrorLevel::Overload);
    }

    #[test]
    fn levels_have_stable_codes() {
        assert_eq!(ErrorLevel::Ok as u8, 0);
        assert_eq!(ErrorLevel::Warning as u8, 1);
        assert_eq!(ErrorLevel::Overdrive as u8, 2);
        assert_eq!(ErrorLevel::Overload as u8, 3);
    }
}
