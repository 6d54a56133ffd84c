/// Reveal state of a single board cell. `Matched` is terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TileState {
    Covered,
    Revealed,
    Matched,
}

#[derive(Clone, Copy, Debug)]
pub struct Tile {
    symbol: u32,
    state: TileState,
}

impl Tile {
    pub const fn new(symbol: u32) -> Self {
        Self {
            symbol,
            state: TileState::Covered,
        }
    }

    /// The Unicode codepoint this tile must share with its group.
    pub fn symbol(&self) -> u32 {
        self.symbol
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    /// Back to face-down, from any state. Idempotent.
    pub fn cover(&mut self) {
        self.state = TileState::Covered;
    }

    /// Face-up, only from `Covered`. Re-revealing a revealed or matched
    /// tile is a no-op so stray presses cannot corrupt a turn.
    pub fn reveal(&mut self) {
        if self.state == TileState::Covered {
            self.state = TileState::Revealed;
        }
    }

    pub fn mark_matched(&mut self) {
        self.state = TileState::Matched;
    }

    pub fn is_covered(&self) -> bool {
        self.state == TileState::Covered
    }

    pub fn is_revealed(&self) -> bool {
        self.state == TileState::Revealed
    }

    pub fn is_matched(&self) -> bool {
        self.state == TileState::Matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_covered() {
        let tile = Tile::new(65);
        assert_eq!(tile.state(), TileState::Covered);
        assert_eq!(tile.symbol(), 65);
        assert!(tile.is_covered());
    }

    #[test]
    fn reveal_only_works_from_covered() {
        let mut tile = Tile::new(65);
        tile.reveal();
        assert!(tile.is_revealed());

        tile.mark_matched();
        tile.reveal();
        assert!(tile.is_matched(), "a matched tile must stay matched");
    }

    #[test]
    fn cover_is_idempotent() {
        let mut tile = Tile::new(65);
        tile.reveal();
        tile.cover();
        tile.cover();
        assert!(tile.is_covered());
    }

    #[test]
    fn cover_resets_a_revealed_tile() {
        let mut tile = Tile::new(65);
        tile.reveal();
        assert!(tile.is_revealed());
        tile.cover();
        assert!(tile.is_covered());
        assert_eq!(tile.symbol(), 65, "the symbol survives covering");
    }
}
