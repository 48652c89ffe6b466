// src/lib.rs

//! Bookstock Inventory Library

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod storage;
pub mod store;
pub mod utils;
