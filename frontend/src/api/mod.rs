mod admin;
mod appointments;
mod auth;
mod barbers;
pub mod client;
pub mod types;
pub mod working_hours;

pub use client::*;
pub use types::*;
pub use working_hours::{DayHours, WorkingHours};

#[cfg(test)]
mod tests;
