pub mod service;
pub mod session;
pub mod views;
