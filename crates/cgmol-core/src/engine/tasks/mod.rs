//! Pure topology tasks. Each task takes the structure by reference and returns a
//! freshly built, sorted edge list.

pub mod constraints;
pub mod contacts;
