//! Business logic layer

pub mod access_service;
pub mod asset_service;
pub mod auth_service;
pub mod history_service;
pub mod lifecycle;
pub mod tag_allocator;

pub use access_service::AccessService;
pub use asset_service::AssetService;
pub use auth_service::AuthService;
pub use history_service::HistoryService;
pub use tag_allocator::TagService;
