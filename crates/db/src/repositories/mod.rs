pub mod annotation_tag_repo;
pub mod user_repo;
pub mod video_repo;

pub use annotation_tag_repo::AnalysisTagRepo;
pub use user_repo::UserRepo;
pub use video_repo::VideoRepo;
