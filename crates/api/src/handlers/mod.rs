pub mod artifacts;
pub mod comments;
pub mod files;
pub mod upload;
pub mod users;
