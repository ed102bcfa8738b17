//! Namelist generation and run orchestration for the WAVEWATCH III
//! preprocessing, model and postprocessing executables.

pub mod dataset;
pub mod domain;
pub mod namelist;
pub mod programs;
pub mod runner;
pub mod serialization;
pub mod validation;
