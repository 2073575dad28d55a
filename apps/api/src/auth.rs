mod session;
mod token;

pub use session::{login_handler, logout_handler, me_handler};
pub use token::token_handler;

/// Session key holding the signed-in user's id.
pub const SESSION_USER_KEY: &str = "user_id";
