pub mod listing;
pub mod notification;
