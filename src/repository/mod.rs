//! Data access layer

pub mod access_repo;
pub mod asset_repo;
pub mod auth_repo;
pub mod history_repo;
pub mod lookup_repo;
pub mod tag_repo;
pub mod user_repo;

pub use access_repo::AccessRepository;
pub use asset_repo::AssetRepository;
pub use auth_repo::AuthRepository;
pub use history_repo::HistoryRepository;
pub use lookup_repo::LookupRepository;
pub use tag_repo::TagRepository;
pub use user_repo::UserRepository;
