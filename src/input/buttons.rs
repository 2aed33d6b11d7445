//! Four debounced direction buttons moving a drawing cursor.
//!
//! The buttons are active low. An edge only arms a button; the level is
//! sampled again once the bounce window has passed and the transition is
//! accepted only if that second sample still disagrees with the stable state.

use heapless::Vec;

use crate::pattern::PatternBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Left,
    Up,
    Down,
    Right,
}

impl Direction {
    /// Also the order in which presses confirmed together are applied.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Down,
        Direction::Right,
    ];

    pub const fn index(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Right => 3,
        }
    }
}

/// Cell the buttons draw at. Row 0 is the top, column 7 the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    row: u8,
    col: u8,
}

impl Cursor {
    pub const TOP_LEFT: Self = Self { row: 0, col: 7 };

    /// Out-of-range coordinates are clamped to the edge.
    pub const fn new(row: u8, col: u8) -> Self {
        Self {
            row: if row > 7 { 7 } else { row },
            col: if col > 7 { 7 } else { col },
        }
    }

    pub const fn row(&self) -> u8 {
        self.row
    }

    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Moves one cell, staying put at the edge. Returns whether it moved.
    pub fn step(&mut self, direction: Direction) -> bool {
        let before = *self;
        match direction {
            // The MSB is the leftmost LED, so left is a higher column.
            Direction::Left if self.col < 7 => self.col += 1,
            Direction::Right if self.col > 0 => self.col -= 1,
            Direction::Up if self.row > 0 => self.row -= 1,
            Direction::Down if self.row < 7 => self.row += 1,
            _ => {}
        }
        *self != before
    }

    /// Handles one confirmed press: step, then light the cell under the
    /// cursor. Cells are never turned off by moving.
    pub fn press(&mut self, direction: Direction, pattern: &mut PatternBuffer) {
        self.step(direction);
        pattern.set(self.row, self.col);
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Released,
    Pressed,
}

impl ButtonState {
    fn sampled(pressed: bool) -> Self {
        if pressed {
            ButtonState::Pressed
        } else {
            ButtonState::Released
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    state: ButtonState,
    armed: bool,
}

impl Debouncer {
    pub const fn new() -> Self {
        Self {
            state: ButtonState::Released,
            armed: false,
        }
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feeds the level seen right after an edge. Returns true when this edge
    /// armed the button, i.e. a confirmation sample is now due.
    pub fn on_edge(&mut self, pressed: bool) -> bool {
        if self.armed || ButtonState::sampled(pressed) == self.state {
            return false;
        }
        self.armed = true;
        true
    }

    /// Feeds the sample taken after the bounce window. Returns the new state
    /// if the change held, `None` if the edge was noise or nothing was armed.
    pub fn confirm(&mut self, pressed: bool) -> Option<ButtonState> {
        if !core::mem::replace(&mut self.armed, false) {
            return None;
        }
        let sampled = ButtonState::sampled(pressed);
        if sampled == self.state {
            return None;
        }
        self.state = sampled;
        Some(sampled)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Debouncers for the four buttons, indexed by [`Direction`].
#[derive(Debug, Clone, Default)]
pub struct ButtonPad {
    buttons: [Debouncer; 4],
}

impl ButtonPad {
    pub const fn new() -> Self {
        Self {
            buttons: [Debouncer::new(); 4],
        }
    }

    pub fn state(&self, direction: Direction) -> ButtonState {
        self.buttons[direction.index()].state()
    }

    pub fn is_armed(&self, direction: Direction) -> bool {
        self.buttons[direction.index()].is_armed()
    }

    pub fn any_armed(&self) -> bool {
        self.buttons.iter().any(Debouncer::is_armed)
    }

    /// See [`Debouncer::on_edge`].
    pub fn on_edge(&mut self, direction: Direction, pressed: bool) -> bool {
        self.buttons[direction.index()].on_edge(pressed)
    }

    /// Samples every armed button through `is_pressed` and returns the
    /// confirmed presses. Confirmed releases only update state.
    pub fn confirm<F>(&mut self, mut is_pressed: F) -> Vec<Direction, 4>
    where
        F: FnMut(Direction) -> bool,
    {
        let mut presses = Vec::new();
        for direction in Direction::ALL {
            let button = &mut self.buttons[direction.index()];
            if !button.is_armed() {
                continue;
            }
            if button.confirm(is_pressed(direction)) == Some(ButtonState::Pressed) {
                // At most one entry per direction, so this cannot overflow.
                let _ = presses.push(direction);
            }
        }
        presses
    }
}
