//! Two dials pick a cell, a periodic timer blinks it. Leaving a cell while it
//! is lit keeps it lit, so turning the dials draws.
#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;
use rtic::app;

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use embedded_hal::adc::OneShot;
    use embedded_hal::digital::v2::ToggleableOutputPin;
    use rp_pico::hal::adc::Adc;
    use rp_pico::hal::fugit::ExtU32;
    use rp_pico::hal::timer::{Alarm, Alarm0};
    use shift_matrix::board::{Board, ColDial, Driver, LedPin, RowDial};
    use shift_matrix::config::{DriverConfig, TOGGLE_PERIOD_US};
    use shift_matrix::input::{table, Dials};
    use shift_matrix::{MatrixDriver, PatternBuffer};

    #[shared]
    struct Shared {
        pattern: PatternBuffer,
        dials: Dials,
    }

    #[local]
    struct Local {
        driver: Driver,
        adc: Adc,
        row_dial: RowDial,
        col_dial: ColDial,
        alarm: Alarm0,
        led: LedPin,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let board = Board::new(ctx.device);

        let mut driver =
            MatrixDriver::new(board.row, board.column, board.timer, DriverConfig::BLANKING);
        driver.clear().unwrap();

        let mut alarm = board.alarm0;
        alarm.schedule(TOGGLE_PERIOD_US.micros()).unwrap();
        alarm.enable_interrupt();

        defmt::info!("{} toggling every {}us", driver.config(), TOGGLE_PERIOD_US);

        (
            Shared {
                pattern: table::pattern(table::DARK),
                dials: Dials::TWELVE_BIT,
            },
            Local {
                driver,
                adc: board.adc,
                row_dial: board.row_dial,
                col_dial: board.col_dial,
                alarm,
                led: board.led,
            },
            init::Monotonics(),
        )
    }

    // Hardware Task: Timer Interrupt. Blinks the cell under the cursor no
    // matter where the refresh loop is; a cycle in progress may show the old
    // value for the rows it already drew.
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [pattern, dials], local = [alarm, led])]
    fn toggle(mut ctx: toggle::Context) {
        ctx.local.alarm.clear_interrupt();
        ctx.local.alarm.schedule(TOGGLE_PERIOD_US.micros()).ok();

        ctx.local.led.toggle().ok();

        let dials = ctx.shared.dials.lock(|d| *d);
        let lit = ctx.shared.pattern.lock(|p| dials.toggle(p));
        defmt::trace!("{} lit={}", dials.cursor(), lit);
    }

    #[idle(shared = [pattern, dials], local = [driver, adc, row_dial, col_dial])]
    fn idle(mut ctx: idle::Context) -> ! {
        loop {
            // Nothing lit while the converter runs.
            ctx.local.driver.blank().ok();

            let row: u16 = ctx.local.adc.read(ctx.local.row_dial).unwrap_or(0);
            let col: u16 = ctx.local.adc.read(ctx.local.col_dial).unwrap_or(0);
            ctx.shared.dials.lock(|d| d.update(row, col));

            let pattern = &mut ctx.shared.pattern;
            ctx.local
                .driver
                .refresh_with(|r| pattern.lock(|p| p.row(r)))
                .ok();
        }
    }
}
