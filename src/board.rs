//! Raspberry Pi Pico bring-up and pin map.
//!
//! | Signal             | Columns | Rows |
//! |--------------------|---------|------|
//! | SER                | GP2     | GP6  |
//! | SRCLK              | GP3     | GP7  |
//! | RCLK               | GP4     | GP8  |
//! | SRCLR (active low) | GP5     | GP9  |
//!
//! Buttons (pull-up, active low): left GP10, up GP11, down GP12, right GP13.
//! Dials: row on GP26/ADC0, column on GP27/ADC1. Heartbeat LED on GP25.

use core::convert::Infallible;

use rp_pico::hal::{
    adc::{Adc, AdcPin},
    clocks::init_clocks_and_plls,
    gpio::{
        bank0::{Gpio25, Gpio26, Gpio27},
        DynPinId, FunctionSioInput, FunctionSioOutput, Pin, PullDown, PullNone, PullUp,
    },
    pac,
    sio::Sio,
    timer::{Alarm0, Alarm1, Timer},
    watchdog::Watchdog,
};

use crate::driver::MatrixDriver;
use crate::error::{Error, Result};
use crate::lines::ShiftChain;

const XTAL_FREQ_HZ: u32 = 12_000_000;

pub type OutPin = Pin<DynPinId, FunctionSioOutput, PullDown>;
pub type ButtonPin = Pin<DynPinId, FunctionSioInput, PullUp>;
pub type LedPin = Pin<Gpio25, FunctionSioOutput, PullDown>;
pub type RowDial = AdcPin<Pin<Gpio26, FunctionSioInput, PullNone>>;
pub type ColDial = AdcPin<Pin<Gpio27, FunctionSioInput, PullNone>>;

pub type Chain = ShiftChain<OutPin, OutPin, OutPin, OutPin>;
pub type Driver = MatrixDriver<Chain, Chain, Timer>;

/// Everything the firmware variants use; each takes what it needs.
pub struct Board {
    pub row: Chain,
    pub column: Chain,
    /// Also the delay provider, it is `Copy`.
    pub timer: Timer,
    pub alarm0: Alarm0,
    pub alarm1: Alarm1,
    pub led: LedPin,
    /// Indexed by `Direction::index`.
    pub buttons: [ButtonPin; 4],
    pub adc: Adc,
    pub row_dial: RowDial,
    pub col_dial: ColDial,
}

impl Board {
    pub fn new(mut pac: pac::Peripherals) -> Self {
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let clocks = init_clocks_and_plls(
            XTAL_FREQ_HZ,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let alarm0 = timer.alarm_0().unwrap();
        let alarm1 = timer.alarm_1().unwrap();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let column = infallible(ShiftChain::new(
            pins.gpio2.into_push_pull_output().into_dyn_pin(),
            pins.gpio3.into_push_pull_output().into_dyn_pin(),
            pins.gpio4.into_push_pull_output().into_dyn_pin(),
            pins.gpio5.into_push_pull_output().into_dyn_pin(),
        ));
        let row = infallible(ShiftChain::new(
            pins.gpio6.into_push_pull_output().into_dyn_pin(),
            pins.gpio7.into_push_pull_output().into_dyn_pin(),
            pins.gpio8.into_push_pull_output().into_dyn_pin(),
            pins.gpio9.into_push_pull_output().into_dyn_pin(),
        ));

        let buttons = [
            pins.gpio10.into_pull_up_input().into_dyn_pin(),
            pins.gpio11.into_pull_up_input().into_dyn_pin(),
            pins.gpio12.into_pull_up_input().into_dyn_pin(),
            pins.gpio13.into_pull_up_input().into_dyn_pin(),
        ];

        let adc = Adc::new(pac.ADC, &mut pac.RESETS);
        let row_dial = AdcPin::new(pins.gpio26.into_floating_input()).unwrap();
        let col_dial = AdcPin::new(pins.gpio27.into_floating_input()).unwrap();

        defmt::debug!("board up");

        Self {
            row,
            column,
            timer,
            alarm0,
            alarm1,
            led: pins.led.into_push_pull_output(),
            buttons,
            adc,
            row_dial,
            col_dial,
        }
    }
}

fn infallible<T>(res: Result<T, Infallible>) -> T {
    match res {
        Ok(value) => value,
        Err(Error::Line { source, .. }) => match source {},
    }
}
