//! Bloodtide library - ripple physics on a sinusoidal ocean with reactive audio

pub mod audio;
pub mod cli;
pub mod error;
pub mod ocean;
pub mod params;
pub mod session;
