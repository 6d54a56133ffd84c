use serenity::all::{EmojiId, ReactionType};
use std::fmt;

/// A custom emoji uploaded to the bot's application, addressed by id only.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CustomEmoji {
    id: u64,
}

impl CustomEmoji {
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    pub fn emoji_id(&self) -> EmojiId {
        EmojiId::new(self.id)
    }

    pub fn as_reaction(&self) -> ReactionType {
        ReactionType::Custom {
            animated: false,
            id: self.emoji_id(),
            name: None,
        }
    }

    pub fn as_str(&self) -> String {
        format!("<:_:{}>", self.id)
    }
}

impl fmt::Display for CustomEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

pub mod icon {
    use super::CustomEmoji;

    pub const CHECK: CustomEmoji = CustomEmoji::new(1438912734615113788);
    pub const ERROR: CustomEmoji = CustomEmoji::new(1438912737102327851);
    pub const BELL: CustomEmoji = CustomEmoji::new(1438912739413250128);
    pub const GEAR: CustomEmoji = CustomEmoji::new(1438912741711737013);
    pub const PLUS: CustomEmoji = CustomEmoji::new(1438912744070123596);
    pub const ALARM: CustomEmoji = CustomEmoji::new(1438912746376990861);
    pub const TIMER: CustomEmoji = CustomEmoji::new(1438912748608358437);
    pub const HASH: CustomEmoji = CustomEmoji::new(1438912750938542186);
    pub const TROPHY: CustomEmoji = CustomEmoji::new(1438912753367037972);
}
