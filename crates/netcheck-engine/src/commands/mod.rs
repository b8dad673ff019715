//! Command orchestration layer.
//!
//! `device` runs one device through segmentation, parsing, snapshot build and
//! comparison; `run` schedules many devices and rolls up the outcome.

pub mod device;
pub mod run;
