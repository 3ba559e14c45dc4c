pub mod access;
pub mod catalog;
pub mod models;
pub mod progress;
