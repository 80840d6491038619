// src/lib.rs

//! Hacker News Crawler Library

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod storage;
