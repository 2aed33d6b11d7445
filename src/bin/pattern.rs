//! Display test: refreshes a fixed pattern forever.
#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;
use rtic::app;

use shift_matrix::input::table;
use shift_matrix::PatternBuffer;

const PATTERN: PatternBuffer = table::pattern(table::MONOGRAM);

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use super::PATTERN;
    use shift_matrix::board::{Board, Driver};
    use shift_matrix::config::DriverConfig;
    use shift_matrix::MatrixDriver;

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        driver: Driver,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let board = Board::new(ctx.device);

        // This board ties SRCLK and RCLK of the row register together.
        let mut driver =
            MatrixDriver::new(board.row, board.column, board.timer, DriverConfig::TIED);
        driver.clear().unwrap();
        defmt::info!("{} showing {}", driver.config(), PATTERN);

        (Shared {}, Local { driver }, init::Monotonics())
    }

    #[idle(local = [driver])]
    fn idle(ctx: idle::Context) -> ! {
        loop {
            ctx.local.driver.refresh(&PATTERN).ok();
        }
    }
}
