//! Repository layer.
//!
//! Each repository wraps a shared database connection and exposes the
//! queries the services need.

pub mod artwork;
pub mod category;
pub mod comment;
pub mod like;
pub mod report;
pub mod user;

pub use artwork::ArtworkRepository;
pub use category::CategoryRepository;
pub use comment::CommentRepository;
pub use like::LikeRepository;
pub use report::ReportRepository;
pub use user::UserRepository;
