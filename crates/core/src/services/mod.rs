//! Business logic services.

#![allow(missing_docs)]

pub mod account;
pub mod artwork;
pub mod category;
pub mod curator;
pub mod engagement;
pub mod feed;
pub mod media;
pub mod moderation;

pub use account::{
    AccountService, AuthResponse, LoginInput, ProfileResponse, RegisterInput, UpdateProfileInput,
    UserResponse,
};
pub use artwork::{
    ArtworkResponse, ArtworkService, CurationContext, UpdateArtworkInput, UploadArtworkInput,
    ARTWORK_STYLES,
};
pub use category::{CategoryResponse, CategoryService};
pub use curator::CuratorService;
pub use engagement::{AddCommentInput, CommentResponse, EngagementService, LikeToggleResponse};
pub use feed::{
    ArtistRef, ArtworkDetail, ArtworkSummary, FeedRequest, FeedService, FeedSort,
};
pub use media::MediaService;
pub use moderation::{
    ModerationService, ReportActionInput, ReportResponse, StatsResponse, SubmitReportInput,
};
