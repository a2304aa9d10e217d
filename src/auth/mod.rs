pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod principal;

pub use identity::RequestIdentity;
pub use jwt::{Claims, TokenError, TokenKind, TokenService};
pub use middleware::require_bearer;
pub use password::{HashError, PasswordHasher};
pub use principal::CurrentUser;
