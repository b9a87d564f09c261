// src/lib.rs

pub mod config;
pub mod error;
pub mod feedback;
pub mod handlers;
pub mod harness;
pub mod models;
pub mod routes;
pub mod sandbox;
pub mod scoring;
pub mod seed;
pub mod state;
pub mod unlock;
pub mod utils;

pub use routes::create_router;
