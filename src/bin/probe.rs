//! Wiring check: walks the column register, then the row register, slowly
//! enough to follow each output by eye.
#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_halt as _;
use rtic::app;

#[app(device = rp_pico::hal::pac, peripherals = true)]
mod app {
    use rp_pico::hal::timer::Timer;
    use shift_matrix::board::{Board, Chain};
    use shift_matrix::probe::{RegisterProbe, Walk};

    #[shared]
    struct Shared {}

    #[local]
    struct Local {
        columns: RegisterProbe<Chain, Timer>,
        rows: RegisterProbe<Chain, Timer>,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let board = Board::new(ctx.device);

        let mut columns = RegisterProbe::new(board.column, board.timer, Walk::FillDrain);
        let mut rows = RegisterProbe::new(board.row, board.timer, Walk::OneHot);
        columns.clear().unwrap();
        rows.clear().unwrap();

        (Shared {}, Local { columns, rows }, init::Monotonics())
    }

    #[idle(local = [columns, rows])]
    fn idle(ctx: idle::Context) -> ! {
        loop {
            defmt::info!("columns: fill then drain");
            ctx.local.columns.cycle().ok();
            defmt::info!("rows: one at a time");
            ctx.local.rows.cycle().ok();
        }
    }
}
