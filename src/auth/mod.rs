//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, JwtService, TokenPair};
pub use middleware::{
    extract_token, jwt_auth_middleware, require_admin_middleware, ActorContext,
};
pub use password::PasswordHasher;
