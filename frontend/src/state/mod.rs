pub mod load;
pub mod notifications;
pub mod session;
