//! Status LEDs and the factory reset jumper. Pin numbers depend on the board revision, boards
//! built before the I2C bus was moved need the `old-pins` feature.
//! 
use esp_hal::gpio::{Input, Level, Output};
use tracker::{Board, Indicator};

pub struct Pins
{
    /// Indexed by [`Indicator`].
    indicators: [Output<'static>; 3],

    /// Pulled up, shorted to ground to request a factory reset at boot.
    factory_reset: Input<'static>,
}

impl Pins {
    pub fn new(device: Output<'static>, network: Output<'static>, imu: Output<'static>, factory_reset: Input<'static>) -> Self {
        Pins {
            indicators: [device, network, imu],
            factory_reset,
        }
    }
}

impl Board for Pins {
    fn factory_reset_requested(&mut self) -> bool {
        self.factory_reset.is_low()
    }

    fn set_indicator(&mut self, indicator: Indicator, on: bool) {
        self.indicators[indicator as usize].set_level(Level::from(on));
    }
}
