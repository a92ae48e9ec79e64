//! Table cleaning and quality analysis.

pub mod logic;
