use defmt::*;
use dynalight_controller::io::OutputSinks;
use dynalight_controller::{Controller, ControllerConfig};
use embassy_executor::task;
use embassy_time::{Duration, Ticker};

use crate::config::CONTROL_LOOP_PERIOD_MS;
use crate::config_resources::{AlarmResources, BrightnessResources};
use crate::outputs::{AlarmPin, EmbassyClock, IndicatorChannel, PwmBrightness};
use crate::tasks::sensor_input::INPUTS;

#[task]
pub async fn control_loop_task(brightness: BrightnessResources, alarm: AlarmResources) {
    info!("Starting control loop task");

    let mut brightness = PwmBrightness::new(brightness);
    let mut alarm = AlarmPin::new(alarm);
    let mut indicator = IndicatorChannel;
    let clock = EmbassyClock;

    let mut controller = match Controller::new(ControllerConfig::default()) {
        Ok(controller) => controller,
        Err(e) => {
            // Outputs stay at their power-on state: headlight dark, alarm off
            error!("Invalid controller configuration: {:?}", e);
            return;
        }
    };

    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_LOOP_PERIOD_MS));

    info!("Control loop task initialized");

    loop {
        ticker.next().await;

        // Work on a copy so the input tasks are not blocked for the cycle
        let mut inputs = INPUTS.lock().await.clone();

        let mut sinks = OutputSinks {
            brightness: &mut brightness,
            alarm: &mut alarm,
            indicator: &mut indicator,
        };
        let cycle = controller.run_cycle(&clock, &mut inputs, &mut sinks);

        trace!(
            "level: {:?} | brightness: {} | alarm: {}",
            cycle.level, cycle.brightness, cycle.alarm
        );
    }
}
