use crate::{Data, Error};

pub mod memory;
pub mod ping;
pub mod util;

pub fn load_all() -> Vec<poise::Command<Data, Error>> {
    vec![memory::memory(), ping::ping()]
}
