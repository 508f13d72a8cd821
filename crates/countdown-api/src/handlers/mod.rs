//! HTTP handlers

pub mod archive;
pub mod countdown;
pub mod health;
pub mod settings;
