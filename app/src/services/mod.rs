//! Application services: card generation, gallery persistence, fonts.

pub mod fonts;
pub mod gallery;
pub mod generator;
