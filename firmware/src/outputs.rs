//! Board implementations of the controller's output sinks.

use defmt::{trace, warn};
use dynalight_controller::brightness::ChannelOutput;
use dynalight_controller::indicator::IndicatorFrame;
use dynalight_controller::io::{AlarmSink, BrightnessSink, Clock, IndicatorSink};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::pwm::{self, Pwm};
use embassy_time::Instant;

use crate::config::{PWM_FULL_SCALE, PWM_TOP};
use crate::config_resources::{AlarmResources, BrightnessResources};
use crate::tasks::indicator::{INDICATOR_EVENT_CHANNEL, IndicatorEvents};

/// Both headlight banks on one PWM slice: LED1 on channel A, LED2 on B.
///
/// The drivers dim on a high duty cycle, which is why the controller hands
/// over inverted values. They are written to the compare registers as is.
pub struct PwmBrightness {
    pwm: Pwm<'static>,
    config: pwm::Config,
}

impl PwmBrightness {
    pub fn new(r: BrightnessResources) -> Self {
        let mut config = pwm::Config::default();
        config.top = PWM_TOP;
        // Start dark until the first cycle runs
        config.compare_a = PWM_FULL_SCALE;
        config.compare_b = PWM_FULL_SCALE;
        let pwm = Pwm::new_output_ab(r.pwm, r.led1, r.led2, config.clone());
        Self { pwm, config }
    }
}

impl BrightnessSink for PwmBrightness {
    fn set_brightness(&mut self, output: ChannelOutput) {
        if self.config.compare_a == output.led1 && self.config.compare_b == output.led2 {
            return;
        }
        self.config.compare_a = output.led1;
        self.config.compare_b = output.led2;
        self.pwm.set_config(&self.config);
        trace!("PWM A: {}, B: {}", output.led1, output.led2);
    }
}

pub struct AlarmPin {
    pin: Output<'static>,
}

impl AlarmPin {
    pub fn new(r: AlarmResources) -> Self {
        Self {
            pin: Output::new(r.pin, Level::Low),
        }
    }
}

impl AlarmSink for AlarmPin {
    fn set_alarm(&mut self, sounding: bool) {
        self.pin.set_level(Level::from(sounding));
    }
}

/// Hands frames to the indicator task without waiting for the PIO write.
pub struct IndicatorChannel;

impl IndicatorSink for IndicatorChannel {
    fn show(&mut self, frame: &IndicatorFrame) {
        if INDICATOR_EVENT_CHANNEL
            .try_send(IndicatorEvents::Frame(*frame))
            .is_err()
        {
            warn!("Indicator queue full, dropping frame");
        }
    }
}

/// Milliseconds since boot from the embassy time driver.
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
