//! Etch-a-sketch: four buttons move a cursor that lights every cell it visits.
#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;
use rtic::app;

use rp_pico::hal::timer::Alarm1;
use shift_matrix::board::ButtonPin;
use shift_matrix::input::ButtonPad;

/// Button pins, their debounce state and the alarm that ends a bounce window.
pub struct Keys {
    pins: [ButtonPin; 4],
    pad: ButtonPad,
    alarm: Alarm1,
}

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::Keys;
    use embedded_hal::digital::v2::InputPin;
    use rp_pico::hal::fugit::ExtU32;
    use rp_pico::hal::gpio::Interrupt;
    use rp_pico::hal::timer::Alarm;
    use shift_matrix::board::{Board, ButtonPin, Driver};
    use shift_matrix::config::{DriverConfig, DEBOUNCE_MS};
    use shift_matrix::input::{table, ButtonPad, Cursor, Direction};
    use shift_matrix::{MatrixDriver, PatternBuffer};

    #[shared]
    struct Shared {
        pattern: PatternBuffer,
        keys: Keys,
    }

    #[local]
    struct Local {
        driver: Driver,
        cursor: Cursor,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let board = Board::new(ctx.device);

        let mut driver =
            MatrixDriver::new(board.row, board.column, board.timer, DriverConfig::SPLIT);
        driver.clear().unwrap();

        let mut alarm = board.alarm1;
        alarm.enable_interrupt();

        let pins = board.buttons;
        for pin in pins.iter() {
            watch(pin, true);
        }

        let cursor = Cursor::TOP_LEFT;
        defmt::info!("{} cursor at {}", driver.config(), cursor);

        (
            Shared {
                pattern: table::pattern(table::CURSOR_START),
                keys: Keys {
                    pins,
                    pad: ButtonPad::new(),
                    alarm,
                },
            },
            Local { driver, cursor },
            init::Monotonics(),
        )
    }

    fn watch(pin: &ButtonPin, enabled: bool) {
        pin.set_interrupt_enabled(Interrupt::EdgeLow, enabled);
        pin.set_interrupt_enabled(Interrupt::EdgeHigh, enabled);
    }

    fn clear_edges(pin: &mut ButtonPin) {
        pin.clear_interrupt(Interrupt::EdgeLow);
        pin.clear_interrupt(Interrupt::EdgeHigh);
    }

    // Hardware Task: a button changed level. Arms its debouncer and starts the
    // bounce window; the button stays masked until the window ends.
    #[task(binds = IO_IRQ_BANK0, priority = 1, shared = [keys])]
    fn button_edge(mut ctx: button_edge::Context) {
        ctx.shared.keys.lock(|keys| {
            let mut armed = false;
            for direction in Direction::ALL {
                let pin = &mut keys.pins[direction.index()];
                if !pin.interrupt_status(Interrupt::EdgeLow)
                    && !pin.interrupt_status(Interrupt::EdgeHigh)
                {
                    continue;
                }
                clear_edges(pin);

                let pressed = pin.is_low().unwrap_or(false);
                if keys.pad.on_edge(direction, pressed) {
                    watch(pin, false);
                    armed = true;
                }
            }

            if armed {
                keys.alarm.clear_interrupt();
                keys.alarm.schedule((DEBOUNCE_MS * 1_000).micros()).ok();
            }
        });
    }

    // Hardware Task: bounce window over. Re-samples the armed buttons and
    // applies the presses that held.
    #[task(binds = TIMER_IRQ_1, priority = 1, shared = [keys, pattern], local = [cursor])]
    fn debounce(mut ctx: debounce::Context) {
        let presses = ctx.shared.keys.lock(|keys| {
            keys.alarm.clear_interrupt();

            let armed = Direction::ALL.map(|direction| keys.pad.is_armed(direction));
            let Keys { pins, pad, .. } = keys;
            let presses =
                pad.confirm(|direction| pins[direction.index()].is_low().unwrap_or(false));

            for direction in Direction::ALL {
                if armed[direction.index()] {
                    let pin = &mut pins[direction.index()];
                    // Drop the edges latched while bouncing.
                    clear_edges(pin);
                    watch(pin, true);
                }
            }
            presses
        });

        let cursor = ctx.local.cursor;
        for direction in presses {
            ctx.shared.pattern.lock(|pattern| cursor.press(direction, pattern));
            defmt::debug!("{} -> {}", direction, *cursor);
        }
    }

    #[idle(shared = [pattern], local = [driver])]
    fn idle(mut ctx: idle::Context) -> ! {
        loop {
            let pattern = &mut ctx.shared.pattern;
            ctx.local
                .driver
                .refresh_with(|row| pattern.lock(|p| p.row(row)))
                .ok();
        }
    }
}
