use crate::alarm::Alarm;
use crate::brightness::{ChannelLevels, ChannelOutput, map_brightness, split_channels};
use crate::config::{ConfigError, ControllerConfig};
use crate::evaluator::{ErrorLevel, evaluate};
use crate::indicator::{BlinkPhase, DisplayGate, IndicatorFrame, render};
use crate::io::{Clock, OutputSinks, SensorSource};
use crate::snapshot::SensorSnapshot;
use crate::status::SystemStatus;

/// Everything one control cycle decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleOutput {
    pub level: ErrorLevel,
    /// System level before the channel split.
    pub brightness: u16,
    pub channels: ChannelLevels,
    /// Inverted values handed to the brightness sink.
    pub output: ChannelOutput,
    pub alarm: bool,
    /// Present only on display update cycles.
    pub status: Option<SystemStatus>,
    pub indicator: Option<IndicatorFrame>,
}

/// Runtime state of the light controller.
///
/// Brightness and alarm are recomputed every cycle. The indicator is
/// recomputed only when the display interval has elapsed.
pub struct Controller {
    config: ControllerConfig,
    alarm: Alarm,
    blink: BlinkPhase,
    display: DisplayGate,
    last_level: ErrorLevel,
    last_status: Option<SystemStatus>,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            alarm: Alarm::new(config.timing.min_audible_duration_ms),
            blink: BlinkPhase::new(),
            display: DisplayGate::new(config.timing.display_update_interval_ms),
            last_level: ErrorLevel::Ok,
            last_status: None,
            config,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn error_level(&self) -> ErrorLevel {
        self.last_level
    }

    pub fn alarm_sounding(&self) -> bool {
        self.alarm.is_sounding()
    }

    /// Run one cycle on an already captured snapshot.
    pub fn step(&mut self, snapshot: &SensorSnapshot, now_ms: u64) -> CycleOutput {
        let thresholds = &self.config.thresholds;
        let levels = &self.config.levels;

        let level = evaluate(snapshot, thresholds);
        if level != self.last_level {
            if level.is_fault() {
                warn!("Error level {:?} -> {:?}", self.last_level, level);
            } else {
                info!("Error level {:?} -> {:?}", self.last_level, level);
            }
            self.last_level = level;
        }

        let alarm = self.alarm.update(level, now_ms);

        let brightness = map_brightness(
            snapshot.alternator_voltage,
            snapshot.boost_voltage,
            level,
            thresholds,
            levels,
        );
        let channels = split_channels(brightness, levels);
        let output = channels.inverted(levels.dac_range);
        trace!(
            "level {} led1 {} led2 {}",
            brightness, channels.led1, channels.led2
        );

        let (status, indicator) = if self.display.is_due(now_ms) {
            let status = SystemStatus::from_snapshot(snapshot, thresholds);
            if self.last_status != Some(status) {
                debug!(
                    "Status alternator {:?} battery {:?} charge {:?}",
                    status.alternator, status.battery, status.charge
                );
                self.last_status = Some(status);
            }
            let lit = self.blink.update(now_ms, self.config.timing.blink_interval_ms);
            (Some(status), Some(render(&status, lit)))
        } else {
            (None, None)
        };

        CycleOutput {
            level,
            brightness,
            channels,
            output,
            alarm,
            status,
            indicator,
        }
    }

    /// Read the sensors, run one cycle and drive the outputs.
    pub fn run_cycle<C, S>(
        &mut self,
        clock: &C,
        sensors: &mut S,
        sinks: &mut OutputSinks<'_>,
    ) -> CycleOutput
    where
        C: Clock + ?Sized,
        S: SensorSource + ?Sized,
    {
        let snapshot = SensorSnapshot::capture(sensors);
        let cycle = self.step(&snapshot, clock.now_ms());

        sinks.brightness.set_brightness(cycle.output);
        sinks.alarm.set_alarm(cycle.alarm);
        if let Some(frame) = &cycle.indicator {
            sinks.indicator.show(frame);
        }

        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(alternator_voltage: f32, battery_voltage: f32) -> SensorSnapshot {
        SensorSnapshot {
            alternator_voltage,
            alternator_current: 0.3,
            battery_voltage,
            battery_current: 200.0,
            boost_voltage: 14.0,
            led_temperature: 1200,
            charge_power: true,
            charge_charge: false,
            charge_done: false,
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = ControllerConfig::default();
        config.timing.display_update_interval_ms = 0;
        assert_eq!(Controller::new(config).err(), Some(ConfigError::Interval));
    }

    #[test]
    fn first_cycle_updates_display() {
        let mut controller = Controller::new(ControllerConfig::default()).unwrap();
        let cycle = controller.step(&snapshot(20.0, 3.8), 0);
        assert!(cycle.indicator.is_some());
        let cycle = controller.step(&snapshot(20.0, 3.8), 20);
        assert!(cycle.indicator.is_none());
        assert!(cycle.status.is_none());
    }

    #[test]
    fn dead_battery_forces_minimum_and_alarm() {
        let mut controller = Controller::new(ControllerConfig::default()).unwrap();
        let cycle = controller.step(&snapshot(25.0, 2.9), 0);
        let levels = controller.config().levels;
        assert_eq!(cycle.level, ErrorLevel::Overload);
        assert_eq!(cycle.brightness, levels.system_led_level_min);
        assert!(cycle.alarm);
        assert_eq!(
            cycle.status.map(|s| s.battery as u8),
            Some(0)
        );
    }

    #[test]
    fn overheated_led_forces_minimum() {
        let mut controller = Controller::new(ControllerConfig::default()).unwrap();
        let snapshot = SensorSnapshot {
            led_temperature: 3200,
            ..snapshot(25.0, 3.8)
        };
        let cycle = controller.step(&snapshot, 0);
        let levels = controller.config().levels;
        assert_eq!(cycle.level, ErrorLevel::Overload);
        assert_eq!(cycle.brightness, levels.system_led_level_min);
        assert!(cycle.alarm);
    }

    #[test]
    fn outputs_are_inverted_split() {
        let mut controller = Controller::new(ControllerConfig::default()).unwrap();
        let cycle = controller.step(&snapshot(30.0, 3.8), 0);
        let levels = controller.config().levels;
        assert_eq!(cycle.brightness, levels.system_led_level_max);
        assert_eq!(cycle.channels.led1, levels.dac_range);
        assert_eq!(cycle.output, ChannelOutput { led1: 0, led2: 0 });
    }

    #[cfg(feature = "log")]
    mod logging {
        use super::*;
        use std::sync::Mutex;

        static RECORDS: Mutex<Vec<String>> = Mutex::new(Vec::new());

        struct Capture;

        impl log::Log for Capture {
            fn enabled(&self, _: &log::Metadata) -> bool {
                true
            }

            fn log(&self, record: &log::Record) {
                if let Ok(mut records) = RECORDS.lock() {
                    records.push(record.args().to_string());
                }
            }

            fn flush(&self) {}
        }

        static CAPTURE: Capture = Capture;

        #[test]
        fn level_change_goes_through_log_facade() {
            let _ = log::set_logger(&CAPTURE);
            log::set_max_level(log::LevelFilter::Trace);

            let mut controller = Controller::new(ControllerConfig::default()).unwrap();
            controller.step(&snapshot(45.0, 3.8), 0);

            let records = RECORDS.lock().unwrap();
            assert!(records.iter().any(|r| r == "Error level Ok -> Overdrive"));
        }
    }

    #[test]
    fn tracks_error_level() {
        let mut controller = Controller::new(ControllerConfig::default()).unwrap();
        controller.step(&snapshot(45.0, 3.8), 0);
        assert_eq!(controller.error_level(), ErrorLevel::Overdrive);
        controller.step(&snapshot(20.0, 3.8), 10);
        assert_eq!(controller.error_level(), ErrorLevel::Ok);
        assert!(controller.alarm_sounding());
    }
}
