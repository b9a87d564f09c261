// src/handlers/mod.rs

pub mod assessment;
pub mod auth;
pub mod learning;
pub mod profile;
