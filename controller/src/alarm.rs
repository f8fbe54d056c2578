//! Audible alarm latch.
//!
//! The alarm switches on as soon as the error level leaves `Ok` and stays on
//! while it remains faulted. Once the level is back to `Ok` the alarm is only
//! released after `min_audible_ms` have passed since the last faulted tick, so
//! a fault lasting a few milliseconds still produces a noticeable chirp.

use statig::prelude::*;

use crate::evaluator::ErrorLevel;

#[derive(Debug, Clone, Copy)]
pub enum Event {
    Tick { level: ErrorLevel, now_ms: u64 },
}

#[derive(Debug)]
pub struct AlarmTimer {
    min_audible_ms: u64,
}

impl AlarmTimer {
    pub fn new(min_audible_ms: u64) -> Self {
        Self { min_audible_ms }
    }
}

#[state_machine(
    initial = "State::silent()",
    before_transition = "Self::before_transition",
    state(derive(Debug, Clone, Copy, PartialEq))
)]
impl AlarmTimer {
    fn before_transition(&mut self, _source: &State, target: &State) {
        match target {
            State::Sounding { activated_at } => warn!("Alarm sounding at {} ms", activated_at),
            State::Silent {} => info!("Alarm silenced"),
        }
    }

    #[state]
    fn silent(event: &Event) -> Outcome<State> {
        match *event {
            Event::Tick { level, now_ms } if level.is_fault() => {
                Transition(State::sounding(now_ms))
            }
            Event::Tick { .. } => Handled,
        }
    }

    #[state]
    fn sounding(&mut self, activated_at: &mut u64, event: &Event) -> Outcome<State> {
        match *event {
            Event::Tick { level, now_ms } if level.is_fault() => {
                // Re-latch: hold for the full duration after the last fault.
                *activated_at = now_ms;
                Handled
            }
            Event::Tick { now_ms, .. } => {
                if now_ms.saturating_sub(*activated_at) >= self.min_audible_ms {
                    Transition(State::silent())
                } else {
                    Handled
                }
            }
        }
    }
}

/// Owns the alarm state machine and feeds it one tick per control cycle.
pub struct Alarm {
    machine: statig::blocking::StateMachine<AlarmTimer>,
}

impl Alarm {
    pub fn new(min_audible_ms: u64) -> Self {
        Self {
            machine: AlarmTimer::new(min_audible_ms).state_machine(),
        }
    }

    /// Advance the latch and return whether the alarm should sound.
    pub fn update(&mut self, level: ErrorLevel, now_ms: u64) -> bool {
        self.machine.handle(&Event::Tick { level, now_ms });
        self.is_sounding()
    }

    pub fn is_sounding(&self) -> bool {
        matches!(self.machine.state(), State::Sounding { .. })
    }

    /// Activation time of the current latch, if sounding.
    pub fn activated_at(&self) -> Option<u64> {
        match self.machine.state() {
            State::Sounding { activated_at } => Some(*activated_at),
            State::Silent {} => None,
        }
    }
}
