pub mod draw;
pub mod grid;
