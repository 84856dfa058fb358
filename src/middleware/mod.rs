mod auth;
mod guard;

pub use auth::*;
pub use guard::*;
