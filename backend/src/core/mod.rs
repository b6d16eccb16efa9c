//! Simulation calendar

pub mod time;
