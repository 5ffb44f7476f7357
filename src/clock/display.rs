//! # Seven-segment clock display.
//!
//! [`ClockDisplay`] is the sink interface; [`Ht16k33Display`] drives a
//! four-digit HT16K33 backpack over an [`I2cBus`].
//!
//! ## Display RAM layout
//! ```text
//! address: 0x00  0x02  0x04  0x06  0x08
//! digit:   H1    H2    :     M1    M2
//! ```
//! Each position holds one segment byte. Writes are cached per position and
//! skipped when the byte would not change.

use crate::clock::i2c::I2cBus;
use crate::error::BusError;

/// Sink that renders the time of day.
pub trait ClockDisplay: Send + 'static {
    /// Renders `hour:minute` (24-hour input).
    fn set_time(&mut self, hour: u32, minute: u32) -> Result<(), BusError>;

    /// Sets brightness, 0 (dimmest) to 15 (full).
    fn set_brightness(&mut self, level: u8) -> Result<(), BusError>;

    /// Blanks every position.
    fn clear(&mut self) -> Result<(), BusError>;
}

/// Maximum brightness level.
pub const MAX_BRIGHTNESS: u8 = 0x0F;

const CMD_OSCILLATOR_ON: u8 = 0x21;
const CMD_DISPLAY_ON: u8 = 0x81;
const CMD_BRIGHTNESS: u8 = 0xE0;

const POS_H1: u8 = 0x00;
const POS_H2: u8 = 0x02;
const POS_COLON: u8 = 0x04;
const POS_M1: u8 = 0x06;
const POS_M2: u8 = 0x08;
const POSITIONS: [u8; 5] = [POS_H1, POS_H2, POS_COLON, POS_M1, POS_M2];

const CHAR_CLEAR: u8 = 0x00;
const CHAR_COLON: u8 = 0x02;

/// Segment patterns for 0-9.
const DIGITS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// HT16K33-backed four-digit display.
pub struct Ht16k33Display<B> {
    bus: B,
    twelve_hour: bool,
    cache: [Option<u8>; 5],
    brightness: Option<u8>,
}

impl<B: I2cBus> Ht16k33Display<B> {
    /// Powers the controller up at full brightness and blanks the display.
    pub fn new(bus: B, twelve_hour: bool) -> Result<Self, BusError> {
        let mut display = Self {
            bus,
            twelve_hour,
            cache: [None; 5],
            brightness: None,
        };
        display.bus.write(&[CMD_OSCILLATOR_ON])?;
        display.bus.write(&[CMD_DISPLAY_ON])?;
        display.set_brightness(MAX_BRIGHTNESS)?;
        display.clear()?;
        Ok(display)
    }

    /// Segment byte currently shown at `pos`, if known.
    pub fn cached(&self, pos: u8) -> Option<u8> {
        self.cache.get(usize::from(pos / 2)).copied().flatten()
    }

    fn set_character(&mut self, pos: u8, ch: u8) -> Result<(), BusError> {
        let slot = usize::from(pos / 2);
        if self.cache[slot] == Some(ch) {
            return Ok(());
        }
        self.bus.write(&[pos, ch])?;
        self.cache[slot] = Some(ch);
        Ok(())
    }

    fn set_digit(&mut self, pos: u8, n: u32) -> Result<(), BusError> {
        match DIGITS.get(n as usize) {
            Some(&ch) if pos != POS_COLON => self.set_character(pos, ch),
            _ => Ok(()),
        }
    }
}

impl<B: I2cBus> ClockDisplay for Ht16k33Display<B> {
    fn set_time(&mut self, hour: u32, minute: u32) -> Result<(), BusError> {
        let hours = if self.twelve_hour { hour % 12 } else { hour % 24 };
        let minutes = minute % 60;

        if hours / 10 == 0 {
            self.set_character(POS_H1, CHAR_CLEAR)?;
        } else {
            self.set_digit(POS_H1, hours / 10)?;
        }
        self.set_digit(POS_H2, hours % 10)?;
        self.set_character(POS_COLON, CHAR_COLON)?;
        self.set_digit(POS_M1, minutes / 10)?;
        self.set_digit(POS_M2, minutes % 10)
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), BusError> {
        let level = level.min(MAX_BRIGHTNESS);
        if self.brightness == Some(level) {
            return Ok(());
        }
        self.bus.write(&[CMD_BRIGHTNESS | level])?;
        self.brightness = Some(level);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BusError> {
        for pos in POSITIONS {
            self.set_character(pos, CHAR_CLEAR)?;
        }
        Ok(())
    }
}
