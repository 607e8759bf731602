//! Helpers shared by the fuzz binary and the randomized tests.
pub mod generator;
