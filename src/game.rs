//! Game controller: the spawn → fall → lock → clear state machine and the
//! tick-countdown fall timer.

use crate::matrix::TetrisMatrix;
use crate::pieces::{PIECE_SIZE, Piece};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Rows to clear before the level rises by one.
const ROWS_CLEARED_PER_LEVEL: u32 = 30;

/// Discrete input commands. Debouncing and key repeat are the input
/// layer's concern; the controller only sees committed presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateLeft,
    RotateRight,
}

/// Infinite cycle over a fixed number of ticks, resetting itself each time
/// it completes. Drives the fall timer.
#[derive(Debug, Clone)]
pub struct Cycle {
    count: u32,
    ticks_per_cycle: u32,
}

impl Cycle {
    pub fn new(ticks_per_cycle: u32) -> Self {
        Self {
            count: 0,
            ticks_per_cycle: ticks_per_cycle.max(1),
        }
    }

    /// Advance one tick; true when the cycle just completed.
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.ticks_per_cycle {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

/// What a single `tick()` did, for the front end (animations) and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub spawned: bool,
    pub locked: bool,
    pub rows_cleared: u32,
}

/// One game session. Single-threaded: `tick` is driven by an external
/// fixed-cadence clock and `handle_input` is applied synchronously between
/// ticks, so every lift → test → (commit|revert) → place sequence runs to
/// completion before the next event is seen.
pub struct Game {
    matrix: TetrisMatrix,
    curr_piece: Option<Piece>,
    next_piece: Piece,
    curr_row: i32,
    curr_col: i32,
    cycle: Cycle,
    level: u32,
    level_offset: u32,
    total_rows_cleared: u32,
    game_over: bool,
    rng: StdRng,
}

impl Game {
    /// A fresh session on an empty board. The seed fixes the piece stream,
    /// which keeps games reproducible.
    pub fn new(num_rows: usize, num_cols: usize, starting_level: u32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let next_piece = Piece::random(&mut rng);
        Self {
            matrix: TetrisMatrix::new(num_rows, num_cols),
            curr_piece: None,
            next_piece,
            curr_row: 0,
            curr_col: 0,
            cycle: Cycle::new(1),
            level: starting_level,
            level_offset: starting_level,
            total_rows_cleared: 0,
            game_over: false,
            rng,
        }
    }

    /// Reinitialize the board, pieces and counters for a new game at the
    /// given starting level. The matrix is rebuilt rather than scrubbed so
    /// no stale state can leak across games.
    pub fn reset(&mut self, starting_level: u32) {
        self.matrix = TetrisMatrix::new(self.matrix.num_rows(), self.matrix.num_cols());
        self.curr_piece = None;
        self.next_piece = Piece::random(&mut self.rng);
        self.curr_row = 0;
        self.curr_col = 0;
        self.cycle = Cycle::new(1);
        self.level_offset = starting_level;
        self.level = starting_level;
        self.total_rows_cleared = 0;
        self.game_over = false;
    }

    pub fn matrix(&self) -> &TetrisMatrix {
        &self.matrix
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn total_rows_cleared(&self) -> u32 {
        self.total_rows_cleared
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.curr_piece.as_ref()
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    fn spawn_col(&self) -> i32 {
        self.matrix.num_cols() as i32 / 2 - PIECE_SIZE as i32 / 2
    }

    /// Ticks the piece waits between row drops; shrinks with the level
    /// down to a floor of one tick per row.
    fn countdown_ticks(&self) -> u32 {
        (60 - i64::from(self.level) * 3).max(1) as u32
    }

    fn level_from_rows_cleared(&self) -> u32 {
        self.total_rows_cleared / ROWS_CLEARED_PER_LEVEL + self.level_offset
    }

    /// Advance one game step. With no active piece, promotes the on-deck
    /// piece to the board (top row, horizontally centered) and restocks
    /// the next-piece slot; otherwise counts the fall timer down and, on
    /// expiry, drops the piece one row or locks it where it rests.
    pub fn tick(&mut self) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if self.game_over {
            return outcome;
        }

        if self.curr_piece.is_none() {
            let piece = std::mem::replace(&mut self.next_piece, Piece::random(&mut self.rng));
            self.curr_row = 0;
            self.curr_col = self.spawn_col();
            self.cycle = Cycle::new(self.countdown_ticks());
            if !self.matrix.is_valid_piece(self.curr_row, self.curr_col, &piece) {
                // Topped out: the stack reaches the spawn cells.
                self.game_over = true;
                return outcome;
            }
            self.matrix.set_piece(self.curr_row, self.curr_col, &piece);
            self.curr_piece = Some(piece);
            outcome.spawned = true;
        }

        if self.cycle.tick() {
            if let Some(piece) = self.curr_piece.take() {
                self.matrix.remove_piece(self.curr_row, self.curr_col, &piece);
                if self.matrix.is_valid_piece(self.curr_row + 1, self.curr_col, &piece) {
                    self.curr_row += 1;
                    self.matrix.set_piece(self.curr_row, self.curr_col, &piece);
                    self.curr_piece = Some(piece);
                } else {
                    // Hit the ground; lock at the last valid row.
                    self.matrix.set_piece(self.curr_row, self.curr_col, &piece);
                    let below_row = (self.curr_row + PIECE_SIZE as i32).max(0) as usize;
                    let rows_cleared = self.matrix.check_and_clear(below_row);
                    if rows_cleared > 0 {
                        self.total_rows_cleared += rows_cleared;
                        if self.level < self.level_from_rows_cleared() {
                            self.level = self.level_from_rows_cleared();
                        }
                    }
                    outcome.locked = true;
                    outcome.rows_cleared = rows_cleared;
                }
            }
        }
        outcome
    }

    /// Apply one discrete input command to the active piece. Each command
    /// is a complete lift → test → (commit|revert) → re-place sequence, so
    /// an impossible move leaves both the board and the piece untouched.
    /// No-op between lock and the next spawn.
    pub fn handle_input(&mut self, command: Command) {
        if self.game_over {
            return;
        }
        let Some(mut piece) = self.curr_piece.take() else {
            return;
        };
        self.matrix.remove_piece(self.curr_row, self.curr_col, &piece);
        match command {
            Command::MoveLeft | Command::MoveRight | Command::SoftDrop => {
                let (row, col) = match command {
                    Command::MoveLeft => (self.curr_row, self.curr_col - 1),
                    Command::MoveRight => (self.curr_row, self.curr_col + 1),
                    _ => (self.curr_row + 1, self.curr_col),
                };
                if self.matrix.is_valid_piece(row, col, &piece) {
                    self.curr_row = row;
                    self.curr_col = col;
                }
            }
            Command::RotateLeft => {
                piece.rotate_left();
                if !self.matrix.is_valid_piece(self.curr_row, self.curr_col, &piece) {
                    piece.rotate_right();
                }
            }
            Command::RotateRight => {
                piece.rotate_right();
                if !self.matrix.is_valid_piece(self.curr_row, self.curr_col, &piece) {
                    piece.rotate_left();
                }
            }
        }
        self.matrix.set_piece(self.curr_row, self.curr_col, &piece);
        self.curr_piece = Some(piece);
    }
}
