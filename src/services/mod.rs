mod access_service;
mod auth_service;
mod blog_service;
mod page_registry;
mod user_service;

pub use access_service::*;
pub use auth_service::*;
pub use blog_service::*;
pub use page_registry::*;
pub use user_service::*;
