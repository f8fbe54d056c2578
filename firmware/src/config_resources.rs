// Provide a mapping for the controller GPIO pins

//
//| GPIO # | Name        | Description                                                    |
//| ------ | ----------- | -------------------------------------------------------------- |
//| 0      | RGBLED      | Data output for the three WS2812 status lamps.                 |
//| 1      | N/C         | Not connected.                                                 |
//| 2      | LED1_PWM    | PWM1 A. Headlight LED bank 1 driver dimming input. Inverted.   |
//| 3      | LED2_PWM    | PWM1 B. Headlight LED bank 2 driver dimming input. Inverted.   |
//| 4      | BUZZER      | Alarm buzzer enable. Active high.                              |
//| 5-9    | N/C         | Not connected.                                                 |
//| 10     | CHG_PG      | Charger power good. Active low.                                |
//| 11     | CHG_STAT    | Charger charging. Active low.                                  |
//| 12     | CHG_DONE    | Charger done. Active low.                                      |
//| 13-19  | N/C         | Not connected.                                                 |
//| 20     | I2Cm_SDA    | I2C0 data line to the INA219 battery monitor.                  |
//| 21     | I2Cm_SCL    | I2C0 clock line to the INA219 battery monitor.                 |
//| 22-25  | N/C         | Not connected.                                                 |
//| 26     | ValtS       | Analog: Scaled dynamo voltage.                                 |
//| 27     | IaltS       | Analog: Hall sensor output for the dynamo current.             |
//| 28     | VboostS     | Analog: Scaled boost converter output voltage.                 |
//| 29     | LED_TEMP    | Analog: LED thermistor divider.                                |

use assign_resources::assign_resources;
use embassy_rp::peripherals;

assign_resources! {
  rgb_led: RGBLEDResources {
    dma_ch: DMA_CH0,
    pin: PIN_0,
    pio: PIO0,
  },
  brightness: BrightnessResources {
    pwm: PWM_SLICE1,
    led1: PIN_2,
    led2: PIN_3,
  },
  alarm: AlarmResources {
    pin: PIN_4,
  },
  charge_inputs: ChargeInputResources {
    power: PIN_10,
    charge: PIN_11,
    done: PIN_12,
  },
  battery_monitor: BatteryMonitorResources {
    sda: PIN_20,
    scl: PIN_21,
    i2c: I2C0,
  },
  analog_inputs: AnalogInputResources {
    adc: ADC,
    alternator_voltage: PIN_26,
    alternator_current: PIN_27,
    boost_voltage: PIN_28,
    led_temperature: PIN_29,
  },
}
