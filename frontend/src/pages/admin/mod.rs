pub mod analytics;
pub mod appointments;
pub mod repository;
pub mod utils;
pub mod view_model;

pub use view_model::AdminViewModel;
