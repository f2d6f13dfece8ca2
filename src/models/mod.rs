//! Domain models

pub mod access;
pub mod asset;
pub mod auth;
pub mod history;
pub mod lookup;
pub mod preference;
pub mod repair;
pub mod tag;
pub mod user;
