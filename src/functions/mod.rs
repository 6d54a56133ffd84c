pub mod time;
pub mod ui;
