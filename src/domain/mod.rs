pub mod entity;
pub mod error;
pub mod grid;
pub mod path;
pub mod rules;
pub mod tile;
