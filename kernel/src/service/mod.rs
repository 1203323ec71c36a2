pub mod lifecycle;
pub mod notification;
pub mod place;
