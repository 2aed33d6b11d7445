//! Host-level tests: full refresh cycles observed through the register model.

use core::cell::RefCell;

use shift_matrix::config::{DriverConfig, DWELL_US};
use shift_matrix::input::{table, ButtonPad, Cursor, Dials, Direction};
use shift_matrix::sim::{Frame, MatrixSim};
use shift_matrix::PatternBuffer;

fn frames(sim: &RefCell<MatrixSim>) -> Vec<Frame> {
    sim.borrow().frames().collect()
}

fn shown(sim: &RefCell<MatrixSim>) -> Vec<(usize, String)> {
    frames(sim)
        .iter()
        .map(|f| (f.row.unwrap(), format!("{:08b}", f.columns)))
        .collect()
}

fn monogram_cycle(config: DriverConfig) {
    let sim = RefCell::new(MatrixSim::new());
    let mut driver = MatrixSim::driver(&sim, config);
    driver.clear().unwrap();
    sim.borrow_mut().clear_log();

    driver.refresh(&table::pattern(table::MONOGRAM)).unwrap();

    assert_eq!(
        shown(&sim),
        [
            (0, "11000110"),
            (1, "01101100"),
            (2, "01010100"),
            (3, "01000100"),
            (4, "01000100"),
            (5, "01000100"),
            (6, "01000100"),
            (7, "11000110"),
        ]
        .map(|(row, cols)| (row, cols.to_string()))
    );

    // Every row stays up for at least the dwell before the next one replaces it.
    let frames = frames(&sim);
    for pair in frames.windows(2) {
        assert!(pair[1].at_us - pair[0].at_us >= u64::from(DWELL_US));
    }
    assert!(sim.borrow().now_us() - frames[7].at_us >= u64::from(DWELL_US));
}

#[test]
fn monogram_with_tied_row_clocks() {
    monogram_cycle(DriverConfig::TIED);
}

#[test]
fn monogram_with_split_row_clocks() {
    monogram_cycle(DriverConfig::SPLIT);
}

#[test]
fn monogram_with_blanking() {
    monogram_cycle(DriverConfig::BLANKING);
}

#[test]
fn clear_after_power_up_garbage_is_dark() {
    for config in [DriverConfig::TIED, DriverConfig::SPLIT, DriverConfig::BLANKING] {
        let sim = RefCell::new(MatrixSim::new());
        sim.borrow_mut().preload(0b1011_0110, 0xff);
        let mut driver = MatrixSim::driver(&sim, config);

        driver.clear().unwrap();
        assert!(sim.borrow().is_dark());
        assert_eq!(sim.borrow().visible(), None);
    }
}

#[test]
fn many_cycles_never_skip_or_repeat_a_row() {
    let sim = RefCell::new(MatrixSim::new());
    let mut driver = MatrixSim::driver(&sim, DriverConfig::TIED);
    let pattern = PatternBuffer::from_rows([0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80]);
    driver.clear().unwrap();
    sim.borrow_mut().clear_log();

    for _ in 0..5 {
        driver.refresh(&pattern).unwrap();
    }

    let frames = frames(&sim);
    assert_eq!(frames.len(), 40);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(frame.row, Some(i % 8));
        assert_eq!(frame.columns, pattern.row(i % 8));
    }
    assert_eq!(sim.borrow().dropped(), 0);
}

#[test]
fn each_cycle_shows_the_buffer_as_it_was_at_commit() {
    let sim = RefCell::new(MatrixSim::new());
    let mut driver = MatrixSim::driver(&sim, DriverConfig::SPLIT);
    let mut pattern = PatternBuffer::new();
    driver.clear().unwrap();

    for cycle in 0..4u8 {
        pattern.set(cycle, cycle);
        sim.borrow_mut().clear_log();
        driver.refresh(&pattern).unwrap();

        let frames = frames(&sim);
        for frame in &frames {
            let row = frame.row.unwrap();
            assert_eq!(frame.columns, pattern.row(row));
        }
    }
}

#[test]
fn change_mid_cycle_tears_one_cycle_only() {
    let sim = RefCell::new(MatrixSim::new());
    let mut driver = MatrixSim::driver(&sim, DriverConfig::SPLIT);
    let shared = RefCell::new(PatternBuffer::from_rows([0xff; 8]));
    driver.clear().unwrap();
    sim.borrow_mut().clear_log();

    // A "timer tick" lands after row 3 has been drawn.
    driver
        .refresh_with(|row| {
            if row == 4 {
                shared.borrow_mut().fill(false);
            }
            shared.borrow().row(row)
        })
        .unwrap();
    let torn: Vec<u8> = frames(&sim).iter().map(|f| f.columns).collect();
    assert_eq!(torn, [0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0]);

    sim.borrow_mut().clear_log();
    driver.refresh_with(|row| shared.borrow().row(row)).unwrap();
    assert!(frames(&sim).iter().all(|f| f.columns == 0));
}

#[test]
fn confirmed_button_presses_draw_on_the_matrix() {
    let sim = RefCell::new(MatrixSim::new());
    let mut driver = MatrixSim::driver(&sim, DriverConfig::SPLIT);
    let mut pattern = table::pattern(table::CURSOR_START);
    let mut cursor = Cursor::default();
    let mut pad = ButtonPad::new();
    driver.clear().unwrap();

    // Down held through the window, right bounced and let go.
    pad.on_edge(Direction::Down, true);
    pad.on_edge(Direction::Right, true);
    for direction in pad.confirm(|direction| direction == Direction::Down) {
        cursor.press(direction, &mut pattern);
    }

    sim.borrow_mut().clear_log();
    driver.refresh(&pattern).unwrap();

    let lit: Vec<(usize, u8)> = frames(&sim)
        .iter()
        .filter(|f| f.columns != 0)
        .map(|f| (f.row.unwrap(), f.columns))
        .collect();
    assert_eq!(lit, [(0, 0x80), (1, 0x80)]);
    assert_eq!(cursor, Cursor::new(1, 7));
}

#[test]
fn dial_blink_shows_on_alternate_cycles() {
    let sim = RefCell::new(MatrixSim::new());
    let mut driver = MatrixSim::driver(&sim, DriverConfig::BLANKING);
    let mut dials = Dials::TEN_BIT;
    let mut pattern = PatternBuffer::new();
    driver.clear().unwrap();

    dials.update(5 << 7, 2 << 7);
    let mut seen = Vec::new();
    for _ in 0..4 {
        dials.toggle(&mut pattern);
        sim.borrow_mut().clear_log();
        driver.refresh(&pattern).unwrap();
        seen.push(frames(&sim)[5].columns);
    }
    assert_eq!(seen, [0b100, 0, 0b100, 0]);
    assert!(pattern.is_dark());
}
