use serenity::all::Colour;

pub const BLUEBERRY: Colour = Colour::new(0x8FA8E8);
pub const MATCHA: Colour = Colour::new(0x9CCF8A);
