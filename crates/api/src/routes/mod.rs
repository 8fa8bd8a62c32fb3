//! HTTP routes

pub mod predictions;
pub mod readings;
pub mod sensors;
