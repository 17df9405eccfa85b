pub mod repository;
pub mod utils;
pub mod view_model;

pub use view_model::BookingViewModel;
