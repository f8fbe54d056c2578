use defmt::{info, trace};
use dynalight_controller::indicator::IndicatorFrame;
use embassy_executor::task;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{Instance, InterruptHandler, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel;
use smart_leds::{RGB8, brightness, gamma};

use crate::config::{DEFAULT_LED_BRIGHTNESS, INDICATOR_QUEUE_DEPTH, NUM_LEDS};
use crate::config_resources::RGBLEDResources;

pub enum IndicatorEvents {
    Frame(IndicatorFrame),
}

pub type IndicatorChannelType =
    channel::Channel<CriticalSectionRawMutex, IndicatorEvents, INDICATOR_QUEUE_DEPTH>;
pub static INDICATOR_EVENT_CHANNEL: IndicatorChannelType = channel::Channel::new();

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

struct Indicator<'d, P: Instance, const S: usize> {
    ws2812: PioWs2812<'d, P, S, NUM_LEDS>,
    frame: IndicatorFrame,
    brightness: u8,
}

impl<'d, P: Instance, const S: usize> Indicator<'d, P, S> {
    fn new(ws2812: PioWs2812<'d, P, S, NUM_LEDS>, brightness: u8) -> Self {
        Self {
            ws2812,
            frame: [RGB8::default(); NUM_LEDS],
            brightness,
        }
    }

    async fn show(&mut self, frame: IndicatorFrame) {
        self.frame = frame;
        self.refresh().await;
    }

    async fn refresh(&mut self) {
        let mut output = [RGB8::default(); NUM_LEDS];
        let corrected = brightness(gamma(self.frame.iter().cloned()), self.brightness);
        for (led, color) in output.iter_mut().zip(corrected) {
            *led = color;
        }
        self.ws2812.write(&output).await;
    }
}

#[task]
pub async fn indicator_task(r: RGBLEDResources) {
    info!("Initializing indicator task");
    let Pio {
        mut common, sm0, ..
    } = Pio::new(r.pio, Irqs);

    let program = PioWs2812Program::new(&mut common);
    let ws2812 = PioWs2812::new(&mut common, sm0, r.dma_ch, r.pin, &program);

    let mut indicator = Indicator::new(ws2812, DEFAULT_LED_BRIGHTNESS);
    // Lamps off until the controller sends its first frame
    indicator.refresh().await;

    let receiver = INDICATOR_EVENT_CHANNEL.receiver();

    info!("Indicator task initialized");

    loop {
        match receiver.receive().await {
            IndicatorEvents::Frame(frame) => {
                trace!("Indicator frame received");
                indicator.show(frame).await;
            }
        }
    }
}
