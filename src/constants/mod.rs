pub mod color;
pub mod emoji;

pub mod colors {
    pub use super::color::{BLUEBERRY, MATCHA};
}

pub use emoji::{CustomEmoji, icon};
