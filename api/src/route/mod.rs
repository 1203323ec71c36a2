pub mod admin;
pub mod health;
pub mod reservation;
pub mod v1;
pub mod venue;
