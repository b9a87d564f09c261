// src/models/mod.rs

pub mod assessment;
pub mod chapter;
pub mod lesson;
pub mod progress;
pub mod question;
pub mod user;
