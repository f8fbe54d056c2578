#![no_std]
#![no_main]

use defmt::{debug, info};
use embassy_executor::Spawner;
use embassy_rp::watchdog::Watchdog;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

mod config;
mod config_resources;
mod outputs;
mod tasks;

use crate::config_resources::{
    AlarmResources, AnalogInputResources, AssignedResources, BatteryMonitorResources,
    BrightnessResources, ChargeInputResources, RGBLEDResources,
};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    info!("Starting up...");

    let mut watchdog = Watchdog::new(p.WATCHDOG);
    watchdog.start(Duration::from_millis(config::WATCHDOG_TIMEOUT_MS));

    // Spawn the async tasks
    spawner
        .spawn(tasks::indicator::indicator_task(r.rgb_led))
        .unwrap();

    spawner
        .spawn(tasks::sensor_input::analog_input_task(r.analog_inputs))
        .unwrap();

    spawner
        .spawn(tasks::sensor_input::charge_input_task(r.charge_inputs))
        .unwrap();

    spawner
        .spawn(tasks::sensor_input::battery_monitor_task(r.battery_monitor))
        .unwrap();

    spawner
        .spawn(tasks::control_loop::control_loop_task(r.brightness, r.alarm))
        .unwrap();

    loop {
        Timer::after(Duration::from_millis(config::WATCHDOG_FEED_PERIOD_MS)).await;

        watchdog.feed();

        let inputs = tasks::sensor_input::INPUTS.lock().await;
        debug!(
            "valt: {:?} | ialt: {:?} | vboost: {:?} | tled: {:?} | vbat: {:?} | ibat: {:?} | chg: {:?}",
            inputs.alternator_voltage,
            inputs.alternator_current,
            inputs.boost_voltage,
            inputs.led_temperature,
            inputs.battery_voltage,
            inputs.battery_current,
            inputs.charge
        );
    }
}
