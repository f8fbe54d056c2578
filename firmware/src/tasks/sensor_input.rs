use defmt::*;
use dynalight_controller::averaging::AveragedInput;
use dynalight_controller::io::{
    ChargeLines, ChargeStatusSource, CurrentChannel, CurrentSource, TemperatureSource,
    VoltageChannel, VoltageSource,
};
use dynalight_controller::scaling::{
    AdcScale, AnalogFrontEnd, active_low, bus_voltage_from_register, current_ma_from_register,
};
use embassy_executor::task;
use embassy_rp::{
    adc::{self, Adc},
    bind_interrupts,
    gpio::{Input, Pull},
    i2c,
    peripherals::I2C0,
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use embassy_time::{Duration, Ticker};

use crate::config::{
    ANALOG_SAMPLE_PERIOD_MS, AVERAGE_SAMPLES, BATTERY_MONITOR_PERIOD_MS,
    DEFAULT_ADC_CORRECTION_SCALE, DIGITAL_SAMPLE_PERIOD_MS, POWER_MONITOR_ADDR,
    POWER_MONITOR_CALIBRATION, POWER_MONITOR_CONFIG, POWER_MONITOR_REG_BUS_VOLTAGE,
    POWER_MONITOR_REG_CALIBRATION, POWER_MONITOR_REG_CONFIG, POWER_MONITOR_REG_CURRENT,
};
use crate::config_resources::{AnalogInputResources, BatteryMonitorResources, ChargeInputResources};

/// Latest sensor values, written by the input tasks and read by the control loop.
#[derive(Clone, Format)]
pub struct Inputs {
    pub alternator_voltage: f32,
    pub alternator_current: f32,
    pub boost_voltage: f32,
    pub led_temperature: u16,
    pub battery_voltage: f32,
    pub battery_current: f32,
    pub charge: ChargeLines,
}

impl Inputs {
    const fn new() -> Self {
        Self {
            alternator_voltage: 0.,
            alternator_current: 0.,
            boost_voltage: 0.,
            led_temperature: 0,
            battery_voltage: 0.,
            battery_current: 0.,
            charge: ChargeLines {
                power: false,
                charge: false,
                done: false,
            },
        }
    }
}

impl VoltageSource for Inputs {
    fn voltage(&mut self, channel: VoltageChannel) -> f32 {
        match channel {
            VoltageChannel::Alternator => self.alternator_voltage,
            VoltageChannel::Battery => self.battery_voltage,
            VoltageChannel::Boost => self.boost_voltage,
        }
    }
}

impl CurrentSource for Inputs {
    fn current(&mut self, channel: CurrentChannel) -> f32 {
        match channel {
            CurrentChannel::Alternator => self.alternator_current,
            CurrentChannel::Battery => self.battery_current,
        }
    }
}

impl TemperatureSource for Inputs {
    fn led_temperature_raw(&mut self) -> u16 {
        self.led_temperature
    }
}

impl ChargeStatusSource for Inputs {
    fn charge_lines(&mut self) -> ChargeLines {
        self.charge
    }
}

/// Shared inputs protected by a mutex.
pub static INPUTS: Mutex<CriticalSectionRawMutex, Inputs> = Mutex::new(Inputs::new());

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => adc::InterruptHandler;
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

#[task]
pub async fn charge_input_task(r: ChargeInputResources) {
    info!("Starting charge input task");
    // Charger status outputs are open drain
    let power = Input::new(r.power, Pull::Up);
    let charge = Input::new(r.charge, Pull::Up);
    let done = Input::new(r.done, Pull::Up);

    let mut ticker = Ticker::every(Duration::from_millis(DIGITAL_SAMPLE_PERIOD_MS));

    info!("Charge input task initialized");

    loop {
        ticker.next().await;
        let lines = ChargeLines {
            power: active_low(power.is_high()),
            charge: active_low(charge.is_high()),
            done: active_low(done.is_high()),
        };

        let mut inputs = INPUTS.lock().await;
        inputs.charge = lines;
        trace!(
            "PG: {}, CHG: {}, DONE: {}",
            lines.power, lines.charge, lines.done
        );
    }
}

#[task]
pub async fn analog_input_task(r: AnalogInputResources) {
    info!("Starting analog input task");
    let mut adc = Adc::new(r.adc, Irqs, adc::Config::default());
    let mut alternator_voltage = adc::Channel::new_pin(r.alternator_voltage, Pull::None);
    let mut alternator_current = adc::Channel::new_pin(r.alternator_current, Pull::None);
    let mut boost_voltage = adc::Channel::new_pin(r.boost_voltage, Pull::None);
    let mut led_temperature = adc::Channel::new_pin(r.led_temperature, Pull::None);

    let front_end = AnalogFrontEnd {
        adc: AdcScale {
            correction: DEFAULT_ADC_CORRECTION_SCALE,
            ..AdcScale::default()
        },
        ..AnalogFrontEnd::default()
    };

    let mut ticker = Ticker::every(Duration::from_millis(ANALOG_SAMPLE_PERIOD_MS));

    info!("Analog input task initialized");

    let mut alternator_voltage_avg = AveragedInput::<AVERAGE_SAMPLES>::new();
    let mut alternator_current_avg = AveragedInput::<AVERAGE_SAMPLES>::new();
    let mut boost_voltage_avg = AveragedInput::<AVERAGE_SAMPLES>::new();
    let mut led_temperature_avg = AveragedInput::<AVERAGE_SAMPLES>::new();

    loop {
        ticker.next().await;

        trace!("Reading analog inputs");

        let alternator_voltage_raw = adc.read(&mut alternator_voltage).await.unwrap_or(0);
        let alternator_current_raw = adc.read(&mut alternator_current).await.unwrap_or(0);
        let boost_voltage_raw = adc.read(&mut boost_voltage).await.unwrap_or(0);
        let led_temperature_raw = adc.read(&mut led_temperature).await.unwrap_or(0);

        alternator_voltage_avg.add_sample(front_end.alternator_voltage(alternator_voltage_raw));
        alternator_current_avg.add_sample(front_end.alternator_current(alternator_current_raw));
        boost_voltage_avg.add_sample(front_end.boost_voltage(boost_voltage_raw));
        led_temperature_avg.add_sample(led_temperature_raw as f32);

        let mut inputs = INPUTS.lock().await;
        inputs.alternator_voltage = alternator_voltage_avg.average();
        inputs.alternator_current = alternator_current_avg.average();
        inputs.boost_voltage = boost_voltage_avg.average();
        inputs.led_temperature = (led_temperature_avg.average() + 0.5) as u16;

        trace!(
            "VALT: {}, IALT: {}, VBOOST: {}, TLED: {}",
            inputs.alternator_voltage,
            inputs.alternator_current,
            inputs.boost_voltage,
            inputs.led_temperature
        );
    }
}

async fn write_register(
    bus: &mut i2c::I2c<'static, I2C0, i2c::Async>,
    register: u8,
    value: u16,
) -> Result<(), i2c::Error> {
    let [hi, lo] = value.to_be_bytes();
    bus.write_async(POWER_MONITOR_ADDR, [register, hi, lo]).await
}

async fn read_register(
    bus: &mut i2c::I2c<'static, I2C0, i2c::Async>,
    register: u8,
) -> Result<u16, i2c::Error> {
    let mut response = [0u8; 2];
    bus.write_read_async(POWER_MONITOR_ADDR, [register], &mut response)
        .await?;
    Ok(u16::from_be_bytes(response))
}

#[task]
pub async fn battery_monitor_task(r: BatteryMonitorResources) {
    info!("Starting battery monitor task");
    let config = i2c::Config::default();
    let mut bus = i2c::I2c::new_async(r.i2c, r.scl, r.sda, Irqs, config);

    if let Err(e) = write_register(&mut bus, POWER_MONITOR_REG_CONFIG, POWER_MONITOR_CONFIG).await {
        error!("Battery monitor config write failed: {:?}", e);
    }

    let mut ticker = Ticker::every(Duration::from_millis(BATTERY_MONITOR_PERIOD_MS));

    info!("Battery monitor task initialized");

    loop {
        ticker.next().await;

        // The calibration register is lost on a monitor brown-out, so it is
        // rewritten before every current read.
        if let Err(e) = write_register(
            &mut bus,
            POWER_MONITOR_REG_CALIBRATION,
            POWER_MONITOR_CALIBRATION,
        )
        .await
        {
            error!("Battery monitor calibration failed: {:?}", e);
            continue;
        }

        let bus_voltage = match read_register(&mut bus, POWER_MONITOR_REG_BUS_VOLTAGE).await {
            Ok(raw) => bus_voltage_from_register(raw),
            Err(e) => {
                error!("Battery voltage read failed: {:?}", e);
                continue;
            }
        };
        let current = match read_register(&mut bus, POWER_MONITOR_REG_CURRENT).await {
            Ok(raw) => current_ma_from_register(raw),
            Err(e) => {
                error!("Battery current read failed: {:?}", e);
                continue;
            }
        };

        // The shunt sits in the battery's discharge path: positive is discharge.
        let mut inputs = INPUTS.lock().await;
        inputs.battery_voltage = bus_voltage;
        inputs.battery_current = current;
        trace!("VBAT: {}, IBAT: {}", inputs.battery_voltage, inputs.battery_current);
    }
}
