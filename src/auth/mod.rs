pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::CurrentUser;
pub use password::{hash_password, verify_password};
pub use token::TokenService;
