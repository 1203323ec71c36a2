pub mod database;
pub mod memory;
pub mod notification;
pub mod redis;
pub mod repository;
