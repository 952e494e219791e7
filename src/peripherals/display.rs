//! Display control module for PineTime

use embassy_nrf::{
    gpio::{Output, Pin},
    peripherals::{P0_14, P0_18, P0_22, P0_23, P0_25, P0_26, SPI2},
    spim::Spim,
};

use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use mipidsi::{models::ST7789, Builder, Orientation};

pub const LCD_W: u16 = 240;
pub const LCD_H: u16 = 240;

/// ST7789 panel on the PineTime SPI bus
pub type Lcd = mipidsi::Display<
    SPIInterface<Spim<'static, SPI2>, Output<'static, P0_18>, Output<'static, P0_25>>,
    ST7789,
    Output<'static, P0_26>,
>;

#[allow(unused)]
#[derive(Clone, Copy)]
pub enum Brightness {
    LEVEL0 = 0,
    LEVEL1 = 1,
    LEVEL2 = 2,
    LEVEL3 = 3,
    LEVEL4 = 4,
    LEVEL5 = 5,
    LEVEL6 = 6,
    LEVEL7 = 7,
}

/// Active-low backlight pins, each switching a FET through a different resistor.
///
/// Combinations of the three give 7 brightness levels plus off.
pub struct BacklightPins<'a> {
    low: Output<'a, P0_14>,
    mid: Output<'a, P0_22>,
    high: Output<'a, P0_23>,
}

impl BacklightPins<'_> {
    /// Configure backlight pins on boot
    pub fn init(
        low: Output<'static, P0_14>,
        mid: Output<'static, P0_22>,
        high: Output<'static, P0_23>,
    ) -> BacklightPins<'static> {
        BacklightPins { low, mid, high }
    }
}

pub struct Display {
    /// Panel driver
    lcd: Lcd,
    /// Backlight pins
    backlight: BacklightPins<'static>,
}

impl Display {
    /// Configure display settings on boot
    pub fn init(
        spim: Spim<'static, SPI2>,
        cs_pin: Output<'static, P0_25>,
        dc_pin: Output<'static, P0_18>,
        rst_pin: Output<'static, P0_26>,
        backlight: BacklightPins<'static>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd, backlight };
        display.set_brightness(Brightness::LEVEL0);
        Ok(display)
    }

    /// Draw target of the panel
    pub fn lcd(&mut self) -> &mut Lcd {
        &mut self.lcd
    }

    /// Set the backlight brightness
    pub fn set_brightness(&mut self, level: Brightness) {
        let bits = level as u8;
        debug!("Backlight level {}", bits);

        // Each set bit switches on one of the FETs
        let BacklightPins { low, mid, high } = &mut self.backlight;
        drive(low, bits & 0b001 != 0);
        drive(mid, bits & 0b010 != 0);
        drive(high, bits & 0b100 != 0);
    }
}

/// Drive an active-low backlight pin
fn drive<P: Pin>(pin: &mut Output<'_, P>, on: bool) {
    if on {
        pin.set_low();
    } else {
        pin.set_high();
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    Init,
}
