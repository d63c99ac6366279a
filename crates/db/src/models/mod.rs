pub mod annotation_tag;
pub mod user;
pub mod video;
