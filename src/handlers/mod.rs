//! Command Handlers module
//!
//! Command handlers that orchestrate business operations. Each handler
//! validates its command, talks to the database, and returns a result struct
//! for the routes layer to serialize.

mod commands;
mod user_handler;
mod login_handler;
mod blog_handler;
mod update_blog_handler;
mod delete_blog_handler;


pub use commands::*;
pub use user_handler::CreateUserHandler;
pub use login_handler::LoginHandler;
pub use blog_handler::CreateBlogHandler;
pub use update_blog_handler::UpdateBlogHandler;
pub use delete_blog_handler::DeleteBlogHandler;
