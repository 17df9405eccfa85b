pub mod admin;
pub mod admin_barbers;
pub mod booking;
pub mod cancel;
pub mod confirm;
pub mod login;
