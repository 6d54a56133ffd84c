use rand::{Rng, seq::SliceRandom};

use super::settings::{Settings, SettingsError};
use super::tile::Tile;

/// What a player activation did to the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActivationResult {
    /// A covered tile turned face-up. `countdown_started` is set when this
    /// was the first reveal of a turn on a board with a turn clock.
    Revealed { countdown_started: bool },
    /// The active set was already complete, so this activation resolved it
    /// instead of revealing anything.
    GuessFinalized(GuessOutcome),
    /// Nothing to do: the tile cannot be revealed right now.
    Ignored,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GuessOutcome {
    /// All tiles in the set carried the same symbol. `summary` is present
    /// when this group was the last one and the game just ended.
    Matched { summary: Option<GameSummary> },
    /// The set was mixed and went back face-down.
    Failed,
}

/// What one second on the clock did to the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    /// Time advanced, nothing else happened.
    Clock,
    /// The turn clock ran out: the active set went back face-down and the
    /// guess was counted as failed. `covered` tiles were turned over.
    TurnExpired { covered: usize },
    /// The game is over, clocks no longer run.
    Idle,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GameSummary {
    pub total_groups: u32,
    pub guess_count: u32,
}

impl GameSummary {
    /// Share of guesses that found a group, as a percentage with two
    /// decimal places. A perfect game scores 100.
    pub fn success_percent(&self) -> f64 {
        let ratio = f64::from(self.total_groups) / f64::from(self.guess_count);
        (ratio * 10_000.0).round() / 100.0
    }
}

/// A dealt memory board and everything that happens on it.
///
/// The board never resolves a guess on the activation that completed the
/// set: the tiles stay face-up for studying and the *next* activation,
/// wherever it lands, commits the guess. That activation itself reveals
/// nothing.
pub struct Board {
    settings: Settings,
    tiles: Vec<Tile>,
    guess_count: u32,
    elapsed_seconds: u32,
    countdown: Option<u32>,
    finished: bool,
}

impl Board {
    pub fn new<R: Rng + ?Sized>(settings: Settings, rng: &mut R) -> Result<Self, SettingsError> {
        settings.validate()?;
        let mut deck = settings.deck();
        deck.shuffle(rng);
        Ok(Self {
            settings,
            tiles: deck.into_iter().map(Tile::new).collect(),
            guess_count: 0,
            elapsed_seconds: 0,
            countdown: None,
            finished: false,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn guess_count(&self) -> u32 {
        self.guess_count
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    /// Seconds left on the turn clock, when one is running.
    pub fn countdown(&self) -> Option<u32> {
        self.countdown
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// A board with any tile still unmatched holds a game worth keeping.
    pub fn in_progress(&self) -> bool {
        self.tiles.iter().any(|tile| !tile.is_matched())
    }

    pub fn revealed_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_revealed()).count()
    }

    pub fn matched_groups(&self) -> u32 {
        let matched = self.tiles.iter().filter(|tile| tile.is_matched()).count();
        (matched / self.settings.group_size as usize) as u32
    }

    /// A player pressed the tile at `index`.
    ///
    /// With a complete active set on the table this commits the pending
    /// guess and consumes the press. Otherwise it reveals the tile if it
    /// is covered, starting the turn clock on the first reveal of a turn.
    pub fn activate(&mut self, index: usize) -> ActivationResult {
        if self.finished || index >= self.tiles.len() {
            return ActivationResult::Ignored;
        }
        let active = self.revealed_indices();
        if active.len() == self.settings.group_size as usize {
            return ActivationResult::GuessFinalized(self.finalize_guess(&active));
        }
        if !self.tiles[index].is_covered() {
            return ActivationResult::Ignored;
        }
        let countdown_started = active.is_empty() && self.settings.turn_seconds > 0;
        self.tiles[index].reveal();
        if countdown_started {
            self.countdown = Some(self.settings.turn_seconds);
        }
        ActivationResult::Revealed { countdown_started }
    }

    /// One second passed. Advances the elapsed clock and, when a turn
    /// clock is running, burns it down until the turn expires.
    pub fn tick(&mut self) -> TickResult {
        if self.finished {
            return TickResult::Idle;
        }
        self.elapsed_seconds += 1;
        match self.countdown {
            Some(remaining) if remaining <= 1 => TickResult::TurnExpired {
                covered: self.expire_turn(),
            },
            Some(remaining) => {
                self.countdown = Some(remaining - 1);
                TickResult::Clock
            }
            None => TickResult::Clock,
        }
    }

    fn finalize_guess(&mut self, active: &[usize]) -> GuessOutcome {
        self.guess_count += 1;
        self.countdown = None;
        if self.is_matching_group(active) {
            for &index in active {
                self.tiles[index].mark_matched();
            }
            GuessOutcome::Matched {
                summary: self.check_end(),
            }
        } else {
            for &index in active {
                self.tiles[index].cover();
            }
            GuessOutcome::Failed
        }
    }

    fn is_matching_group(&self, active: &[usize]) -> bool {
        let Some((&first, rest)) = active.split_first() else {
            return false;
        };
        let symbol = self.tiles[first].symbol();
        rest.iter().all(|&index| self.tiles[index].symbol() == symbol)
    }

    fn expire_turn(&mut self) -> usize {
        self.countdown = None;
        self.guess_count += 1;
        let mut covered = 0;
        for tile in &mut self.tiles {
            if tile.is_revealed() {
                tile.cover();
                covered += 1;
            }
        }
        covered
    }

    fn check_end(&mut self) -> Option<GameSummary> {
        if self.tiles.iter().all(Tile::is_matched) {
            self.finished = true;
            self.countdown = None;
            Some(GameSummary {
                total_groups: self.settings.total_groups(),
                guess_count: self.guess_count,
            })
        } else {
            None
        }
    }

    fn revealed_indices(&self) -> Vec<usize> {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.is_revealed())
            .map(|(index, _)| index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn settings(rows: u32, columns: u32, group_size: u32, turn_seconds: u32) -> Settings {
        Settings {
            rows,
            columns,
            group_size,
            start_symbol: 65,
            turn_seconds,
        }
    }

    fn board(rows: u32, columns: u32, group_size: u32, turn_seconds: u32) -> Board {
        let mut rng = StdRng::seed_from_u64(42);
        Board::new(settings(rows, columns, group_size, turn_seconds), &mut rng).unwrap()
    }

    fn positions_by_symbol(board: &Board) -> HashMap<u32, Vec<usize>> {
        let mut positions: HashMap<u32, Vec<usize>> = HashMap::new();
        for (index, tile) in board.tiles().iter().enumerate() {
            positions.entry(tile.symbol()).or_default().push(index);
        }
        positions
    }

    /// Some covered tile outside `taken`, for committing a pending guess.
    fn covered_outside(board: &Board, taken: &[usize]) -> usize {
        board
            .tiles()
            .iter()
            .enumerate()
            .find(|(index, tile)| tile.is_covered() && !taken.contains(index))
            .map(|(index, _)| index)
            .unwrap()
    }

    #[test]
    fn new_board_deals_the_whole_shuffled_deck() {
        let board = board(3, 3, 3, 0);
        assert_eq!(board.tiles().len(), 9);
        assert!(board.tiles().iter().all(Tile::is_covered));
        assert_eq!(board.guess_count(), 0);
        assert_eq!(board.elapsed_seconds(), 0);
        assert_eq!(board.countdown(), None);
        assert!(!board.is_finished());

        let positions = positions_by_symbol(&board);
        assert_eq!(positions.len(), 3, "three groups of three");
        assert!(positions.values().all(|group| group.len() == 3));
    }

    #[test]
    fn same_seed_deals_the_same_board() {
        let mut first_rng = StdRng::seed_from_u64(7);
        let mut second_rng = StdRng::seed_from_u64(7);
        let first = Board::new(settings(4, 5, 2, 0), &mut first_rng).unwrap();
        let second = Board::new(settings(4, 5, 2, 0), &mut second_rng).unwrap();
        let first_symbols: Vec<u32> = first.tiles().iter().map(Tile::symbol).collect();
        let second_symbols: Vec<u32> = second.tiles().iter().map(Tile::symbol).collect();
        assert_eq!(first_symbols, second_symbols);
    }

    #[test]
    fn invalid_settings_never_deal_a_board() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = Board::new(settings(1, 3, 2, 0), &mut rng);
        assert_eq!(
            result.err(),
            Some(SettingsError::NotDivisible {
                cells: 3,
                group_size: 2
            })
        );
    }

    #[test]
    fn first_reveal_starts_the_turn_clock() {
        let mut board = board(3, 3, 3, 5);
        let result = board.activate(0);
        assert_eq!(
            result,
            ActivationResult::Revealed {
                countdown_started: true
            }
        );
        assert_eq!(board.countdown(), Some(5));
    }

    #[test]
    fn no_turn_clock_when_disabled() {
        let mut board = board(3, 3, 3, 0);
        let result = board.activate(0);
        assert_eq!(
            result,
            ActivationResult::Revealed {
                countdown_started: false
            }
        );
        assert_eq!(board.countdown(), None);
    }

    #[test]
    fn completing_the_set_does_not_resolve_it() {
        let mut board = board(3, 3, 3, 0);
        let positions = positions_by_symbol(&board);
        let group = positions[&65].clone();
        for &index in &group {
            board.activate(index);
        }
        assert_eq!(board.revealed_count(), 3);
        assert!(group.iter().all(|&index| board.tiles()[index].is_revealed()));
        assert_eq!(board.guess_count(), 0, "resolution waits for the next press");
    }

    #[test]
    fn next_activation_commits_a_match_without_revealing() {
        let mut board = board(3, 3, 3, 0);
        let positions = positions_by_symbol(&board);
        let group = positions[&65].clone();
        for &index in &group {
            board.activate(index);
        }
        let committing = covered_outside(&board, &group);
        let result = board.activate(committing);
        assert_eq!(
            result,
            ActivationResult::GuessFinalized(GuessOutcome::Matched { summary: None })
        );
        assert!(group.iter().all(|&index| board.tiles()[index].is_matched()));
        assert!(
            board.tiles()[committing].is_covered(),
            "the committing press reveals nothing"
        );
        assert_eq!(board.guess_count(), 1);
        assert_eq!(board.matched_groups(), 1);
    }

    #[test]
    fn next_activation_commits_a_mismatch_and_covers_the_set() {
        let mut board = board(2, 3, 2, 0);
        let positions = positions_by_symbol(&board);
        let mixed = [positions[&65][0], positions[&66][0]];
        for &index in &mixed {
            board.activate(index);
        }
        let committing = covered_outside(&board, &mixed);
        let result = board.activate(committing);
        assert_eq!(
            result,
            ActivationResult::GuessFinalized(GuessOutcome::Failed)
        );
        assert!(mixed.iter().all(|&index| board.tiles()[index].is_covered()));
        assert!(board.tiles()[committing].is_covered());
        assert_eq!(board.guess_count(), 1);
        assert_eq!(board.matched_groups(), 0);
    }

    #[test]
    fn mismatch_leaves_earlier_matches_alone() {
        let mut board = board(3, 3, 3, 0);
        let positions = positions_by_symbol(&board);
        let group = positions[&65].clone();
        for &index in &group {
            board.activate(index);
        }
        board.activate(covered_outside(&board, &group));
        assert_eq!(board.matched_groups(), 1);

        let mixed = [positions[&66][0], positions[&66][1], positions[&67][0]];
        for &index in &mixed {
            board.activate(index);
        }
        let committing = covered_outside(&board, &mixed);
        assert_eq!(
            board.activate(committing),
            ActivationResult::GuessFinalized(GuessOutcome::Failed)
        );
        assert!(group.iter().all(|&index| board.tiles()[index].is_matched()));
        assert_eq!(board.matched_groups(), 1);
    }

    #[test]
    fn revealed_tiles_cannot_be_revealed_again() {
        let mut board = board(3, 3, 3, 5);
        board.activate(0);
        board.tick();
        assert_eq!(board.countdown(), Some(4));

        let result = board.activate(0);
        assert_eq!(result, ActivationResult::Ignored);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.countdown(), Some(4), "a stray press must not touch the clock");
    }

    #[test]
    fn matched_tiles_are_inert_and_start_no_clock() {
        let mut board = board(3, 3, 3, 5);
        let positions = positions_by_symbol(&board);
        let group = positions[&65].clone();
        for &index in &group {
            board.activate(index);
        }
        board.activate(covered_outside(&board, &group));
        assert_eq!(board.countdown(), None);

        let result = board.activate(group[0]);
        assert_eq!(result, ActivationResult::Ignored);
        assert_eq!(board.countdown(), None, "pressing a matched tile is not a turn");
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn out_of_range_presses_are_ignored() {
        let mut board = board(3, 3, 3, 0);
        assert_eq!(board.activate(9), ActivationResult::Ignored);
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn later_reveals_do_not_restart_the_clock() {
        let mut board = board(3, 3, 3, 4);
        board.activate(0);
        board.tick();
        assert_eq!(board.countdown(), Some(3));

        let second = covered_outside(&board, &[0]);
        let result = board.activate(second);
        assert_eq!(
            result,
            ActivationResult::Revealed {
                countdown_started: false
            }
        );
        assert_eq!(board.countdown(), Some(3));
    }

    #[test]
    fn turn_clock_expiry_covers_the_set_and_counts_a_failure() {
        let mut board = board(3, 3, 3, 2);
        board.activate(0);
        let second = covered_outside(&board, &[0]);
        board.activate(second);

        assert_eq!(board.tick(), TickResult::Clock);
        assert_eq!(board.countdown(), Some(1));
        assert_eq!(board.tick(), TickResult::TurnExpired { covered: 2 });
        assert_eq!(board.countdown(), None);
        assert_eq!(board.revealed_count(), 0);
        assert_eq!(board.guess_count(), 1);
        assert_eq!(board.elapsed_seconds(), 2);

        assert_eq!(board.tick(), TickResult::Clock, "the game clock keeps running");
        assert_eq!(board.elapsed_seconds(), 3);
    }

    #[test]
    fn expiry_discards_even_a_complete_matching_set() {
        let mut board = board(3, 3, 3, 1);
        let positions = positions_by_symbol(&board);
        let group = positions[&65].clone();
        for &index in &group {
            board.activate(index);
        }
        assert_eq!(board.tick(), TickResult::TurnExpired { covered: 3 });
        assert!(group.iter().all(|&index| board.tiles()[index].is_covered()));
        assert_eq!(board.guess_count(), 1);
        assert_eq!(board.matched_groups(), 0, "an uncommitted match is lost");
    }

    #[test]
    fn finishing_the_last_group_reports_a_summary() {
        let mut board = board(2, 1, 2, 0);
        board.activate(0);
        board.activate(1);
        assert_eq!(board.guess_count(), 0);

        let result = board.activate(0);
        let ActivationResult::GuessFinalized(GuessOutcome::Matched {
            summary: Some(summary),
        }) = result
        else {
            panic!("expected the finishing guess to carry a summary, got {result:?}");
        };
        assert_eq!(summary.total_groups, 1);
        assert_eq!(summary.guess_count, 1);
        assert!(board.is_finished());
        assert!(!board.in_progress());
    }

    #[test]
    fn finished_boards_ignore_presses_and_ticks() {
        let mut board = board(2, 1, 2, 3);
        board.activate(0);
        board.activate(1);
        board.activate(0);
        assert!(board.is_finished());

        let elapsed = board.elapsed_seconds();
        assert_eq!(board.tick(), TickResult::Idle);
        assert_eq!(board.elapsed_seconds(), elapsed);
        assert_eq!(board.activate(0), ActivationResult::Ignored);
    }

    #[test]
    fn success_percent_keeps_two_decimals() {
        let perfect = GameSummary {
            total_groups: 3,
            guess_count: 3,
        };
        assert_eq!(perfect.success_percent(), 100.0);

        let decent = GameSummary {
            total_groups: 3,
            guess_count: 4,
        };
        assert_eq!(decent.success_percent(), 75.0);

        let rough = GameSummary {
            total_groups: 3,
            guess_count: 7,
        };
        assert_eq!(rough.success_percent(), 42.86);

        let third = GameSummary {
            total_groups: 1,
            guess_count: 3,
        };
        assert_eq!(third.success_percent(), 33.33);

        let two_thirds = GameSummary {
            total_groups: 2,
            guess_count: 3,
        };
        assert_eq!(two_thirds.success_percent(), 66.67);
    }

    #[test]
    fn elapsed_clock_counts_every_second_of_play() {
        let mut board = board(3, 3, 3, 0);
        board.tick();
        board.tick();
        board.activate(0);
        board.tick();
        assert_eq!(board.elapsed_seconds(), 3);
        assert_eq!(board.countdown(), None);
    }
}
