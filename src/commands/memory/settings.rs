use std::fmt;

pub(super) const DEFAULT_ROWS: u32 = 3;
pub(super) const DEFAULT_COLUMNS: u32 = 3;
pub(super) const DEFAULT_GROUP_SIZE: u32 = 3;
// U+1F639, the cat with tears of joy. The rest of the deck counts up from here.
pub(super) const DEFAULT_START_SYMBOL: u32 = 128_569;
pub(super) const DEFAULT_TURN_SECONDS: u32 = 0;

/// Board configuration. A value of this type may describe an impossible
/// board, so [`Settings::validate`] must pass before it reaches [`super::board::Board`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Settings {
    pub rows: u32,
    pub columns: u32,
    /// How many identical tiles form one group. At least 2.
    pub group_size: u32,
    /// Codepoint of the first symbol; each further group uses the next one.
    pub start_symbol: u32,
    /// Seconds the player has to finish a started turn. 0 disables the clock.
    pub turn_seconds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            group_size: DEFAULT_GROUP_SIZE,
            start_symbol: DEFAULT_START_SYMBOL,
            turn_seconds: DEFAULT_TURN_SECONDS,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SettingsError {
    EmptyBoard,
    GroupTooSmall { group_size: u32 },
    NotDivisible { cells: u64, group_size: u32 },
    SymbolRunOverflow,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBoard => {
                write!(formatter, "O tabuleiro precisa de pelo menos uma linha e uma coluna.")
            }
            Self::GroupTooSmall { group_size } => write!(
                formatter,
                "Um grupo precisa de pelo menos 2 peças iguais, mas você pediu {group_size}."
            ),
            Self::NotDivisible { cells, group_size } => write!(
                formatter,
                "Um tabuleiro de {cells} peça(s) não pode ser dividido em grupos de {group_size}."
            ),
            Self::SymbolRunOverflow => {
                write!(formatter, "O símbolo inicial é alto demais para esse número de grupos.")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl Settings {
    pub fn total_cells(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }

    pub fn total_groups(&self) -> u32 {
        (self.total_cells() / u64::from(self.group_size)) as u32
    }

    /// Checks that the board can actually be dealt. The grid must be
    /// non-empty and divide evenly into groups of at least 2, and the
    /// symbol run must stay inside the codepoint space.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(SettingsError::EmptyBoard);
        }
        if self.group_size < 2 {
            return Err(SettingsError::GroupTooSmall {
                group_size: self.group_size,
            });
        }
        let cells = self.total_cells();
        if cells % u64::from(self.group_size) != 0 {
            return Err(SettingsError::NotDivisible {
                cells,
                group_size: self.group_size,
            });
        }
        let groups = cells / u64::from(self.group_size);
        if u64::from(self.start_symbol) + (groups - 1) > u64::from(u32::MAX) {
            return Err(SettingsError::SymbolRunOverflow);
        }
        Ok(())
    }

    /// One codepoint per group, counting up from `start_symbol`.
    /// Only meaningful after [`Self::validate`].
    pub fn symbols(&self) -> Vec<u32> {
        (0..self.total_groups())
            .map(|offset| self.start_symbol + offset)
            .collect()
    }

    /// The symbols again, each repeated `group_size` times, in board order
    /// before shuffling.
    pub fn deck(&self) -> Vec<u32> {
        self.symbols()
            .into_iter()
            .flat_map(|symbol| std::iter::repeat_n(symbol, self.group_size as usize))
            .collect()
    }
}

/// Printable form of a tile symbol. Codepoints that do not map to a
/// visible character fall back to their `U+XXXX` name, since Discord
/// rejects button labels made of blanks.
pub fn symbol_text(code: u32) -> String {
    match char::from_u32(code) {
        Some(symbol) if !symbol.is_control() && !symbol.is_whitespace() => symbol.to_string(),
        _ => format!("U+{code:04X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_classic_board() {
        let settings = Settings::default();
        assert_eq!(settings.rows, 3);
        assert_eq!(settings.columns, 3);
        assert_eq!(settings.group_size, 3);
        assert_eq!(settings.start_symbol, 128_569);
        assert_eq!(settings.turn_seconds, 0);
        assert!(settings.validate().is_ok());
        assert_eq!(settings.total_groups(), 3);
    }

    #[test]
    fn rejects_empty_boards() {
        let settings = Settings {
            rows: 0,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::EmptyBoard));
    }

    #[test]
    fn rejects_groups_smaller_than_two() {
        let settings = Settings {
            group_size: 1,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::GroupTooSmall { group_size: 1 })
        );
    }

    #[test]
    fn rejects_grids_that_do_not_divide_into_groups() {
        let settings = Settings {
            rows: 1,
            columns: 3,
            group_size: 2,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::NotDivisible {
                cells: 3,
                group_size: 2
            })
        );
    }

    #[test]
    fn rejects_symbol_runs_past_the_codepoint_space() {
        let settings = Settings {
            rows: 2,
            columns: 3,
            group_size: 2,
            start_symbol: u32::MAX - 1,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::SymbolRunOverflow));
    }

    #[test]
    fn symbols_are_a_contiguous_run() {
        let settings = Settings {
            rows: 2,
            columns: 4,
            group_size: 2,
            start_symbol: 65,
            ..Settings::default()
        };
        assert_eq!(settings.symbols(), vec![65, 66, 67, 68]);
    }

    #[test]
    fn deck_repeats_each_symbol_group_size_times() {
        let settings = Settings {
            rows: 2,
            columns: 3,
            group_size: 3,
            start_symbol: 65,
            ..Settings::default()
        };
        let deck = settings.deck();
        assert_eq!(deck.len(), 6);
        assert_eq!(deck.iter().filter(|&&symbol| symbol == 65).count(), 3);
        assert_eq!(deck.iter().filter(|&&symbol| symbol == 66).count(), 3);
    }

    #[test]
    fn symbol_text_prefers_the_glyph() {
        assert_eq!(symbol_text(128_569), "😹");
        assert_eq!(symbol_text(65), "A");
    }

    #[test]
    fn symbol_text_falls_back_to_the_codepoint_name() {
        assert_eq!(symbol_text(0xD800), "U+D800");
        assert_eq!(symbol_text(9), "U+0009");
        assert_eq!(symbol_text(32), "U+0020");
    }
}
