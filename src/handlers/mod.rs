//! HTTP handlers

pub mod access;
pub mod asset;
pub mod auth;
pub mod health;
pub mod history;
pub mod lookup;
pub mod metrics;
pub mod preference;
pub mod tag;
pub mod user;
