pub mod jwt;
pub mod middleware;

pub use jwt::{AuthError, Claims, JwtService};
pub use middleware::{require_auth, AuthState, AuthenticatedUser};
