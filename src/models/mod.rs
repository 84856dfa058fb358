mod access;
mod blog_post;
mod role;
mod user;

pub use access::*;
pub use blog_post::*;
pub use role::*;
pub use user::*;
