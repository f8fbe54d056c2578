//! Status indicator: three addressable lamps, one per status category.
//!
//! Error statuses blink. All blinking lamps share one [`BlinkPhase`], which is
//! advanced once per display update, so they blink in step no matter how many
//! of them are blinking.

use smart_leds::RGB8;
use smart_leds::colors::*;

use crate::status::{AlternatorStatus, BatteryStatus, ChargeStatus, SystemStatus};

pub const INDICATOR_LAMPS: usize = 3;

pub const ALTERNATOR_LAMP: usize = 0;
pub const BATTERY_LAMP: usize = 1;
pub const CHARGE_LAMP: usize = 2;

pub type IndicatorFrame = [RGB8; INDICATOR_LAMPS];

/// Color and blink behavior of one lamp.
pub trait Lamp {
    fn color(&self) -> RGB8;
    fn blinks(&self) -> bool;
}

impl Lamp for AlternatorStatus {
    fn color(&self) -> RGB8 {
        match self {
            AlternatorStatus::Stalled => RED,
            AlternatorStatus::Low => YELLOW,
            AlternatorStatus::Nominal => GREEN,
            AlternatorStatus::High => BLUE,
            AlternatorStatus::Overvoltage => WHITE,
            AlternatorStatus::Overcurrent => MAGENTA,
        }
    }

    fn blinks(&self) -> bool {
        matches!(
            self,
            AlternatorStatus::Overvoltage | AlternatorStatus::Overcurrent
        )
    }
}

impl Lamp for BatteryStatus {
    fn color(&self) -> RGB8 {
        match self {
            BatteryStatus::Empty => RED,
            BatteryStatus::Low => ORANGE,
            BatteryStatus::Nominal => GREEN,
            BatteryStatus::Full => BLUE,
            BatteryStatus::Overcurrent => MAGENTA,
        }
    }

    fn blinks(&self) -> bool {
        matches!(self, BatteryStatus::Empty | BatteryStatus::Overcurrent)
    }
}

impl Lamp for ChargeStatus {
    fn color(&self) -> RGB8 {
        match self {
            ChargeStatus::Unpowered => BLACK,
            ChargeStatus::Standby => CYAN,
            ChargeStatus::Charging => ORANGE,
            ChargeStatus::Done => GREEN,
            ChargeStatus::Fault => RED,
        }
    }

    fn blinks(&self) -> bool {
        matches!(self, ChargeStatus::Fault)
    }
}

/// Shared on/off phase for blinking lamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlinkPhase {
    lit: bool,
    last_toggle_ms: u64,
}

impl BlinkPhase {
    pub const fn new() -> Self {
        Self {
            lit: false,
            last_toggle_ms: 0,
        }
    }

    /// Toggle once if `interval_ms` has elapsed since the last toggle.
    pub fn update(&mut self, now_ms: u64, interval_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_toggle_ms) >= interval_ms {
            self.lit = !self.lit;
            self.last_toggle_ms = now_ms;
        }
        self.lit
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

/// Opens once per `interval_ms`. The first call always opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGate {
    interval_ms: u64,
    last_update_ms: Option<u64>,
}

impl DisplayGate {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_update_ms: None,
        }
    }

    pub fn is_due(&mut self, now_ms: u64) -> bool {
        let due = match self.last_update_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        };
        if due {
            self.last_update_ms = Some(now_ms);
        }
        due
    }
}

fn lamp_output(lamp: &impl Lamp, lit: bool) -> RGB8 {
    if lamp.blinks() && !lit {
        BLACK
    } else {
        lamp.color()
    }
}

/// Colors for all lamps given the shared blink phase.
pub fn render(status: &SystemStatus, lit: bool) -> IndicatorFrame {
    let mut frame = [BLACK; INDICATOR_LAMPS];
    frame[ALTERNATOR_LAMP] = lamp_output(&status.alternator, lit);
    frame[BATTERY_LAMP] = lamp_output(&status.battery, lit);
    frame[CHARGE_LAMP] = lamp_output(&status.charge, lit);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(alternator: AlternatorStatus, battery: BatteryStatus, charge: ChargeStatus) -> SystemStatus {
        SystemStatus {
            alternator,
            battery,
            charge,
        }
    }

    #[test]
    fn steady_statuses_ignore_phase() {
        let s = status(AlternatorStatus::Nominal, BatteryStatus::Full, ChargeStatus::Done);
        assert_eq!(render(&s, true), render(&s, false));
        assert_eq!(render(&s, false), [GREEN, BLUE, GREEN]);
    }

    #[test]
    fn error_statuses_blink_together() {
        let s = status(
            AlternatorStatus::Overvoltage,
            BatteryStatus::Empty,
            ChargeStatus::Fault,
        );
        assert_eq!(render(&s, true), [WHITE, RED, RED]);
        assert_eq!(render(&s, false), [BLACK, BLACK, BLACK]);
    }

    #[test]
    fn blinking_lamp_next_to_steady_lamp() {
        let s = status(AlternatorStatus::Stalled, BatteryStatus::Empty, ChargeStatus::Standby);
        assert_eq!(render(&s, false), [RED, BLACK, CYAN]);
    }

    #[test]
    fn blink_toggles_once_per_interval() {
        let mut blink = BlinkPhase::new();
        assert!(!blink.update(499, 500));
        assert!(blink.update(500, 500));
        // Same instant, several lamps asking: no further toggle.
        assert!(blink.update(500, 500));
        assert!(blink.update(999, 500));
        assert!(!blink.update(1000, 500));
    }

    #[test]
    fn late_update_toggles_only_once() {
        let mut blink = BlinkPhase::new();
        assert!(blink.update(5000, 500));
        assert!(blink.update(5499, 500));
        assert!(!blink.update(5500, 500));
    }

    #[test]
    fn display_gate_opens_on_interval() {
        let mut gate = DisplayGate::new(250);
        assert!(gate.is_due(10));
        assert!(!gate.is_due(100));
        assert!(!gate.is_due(259));
        assert!(gate.is_due(260));
        assert!(!gate.is_due(261));
    }
}
