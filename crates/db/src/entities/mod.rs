//! Database entities.

pub mod artwork;
pub mod category;
pub mod comment;
pub mod like;
pub mod report;
pub mod user;
pub mod user_profile;

pub use artwork::Entity as Artwork;
pub use category::Entity as Category;
pub use comment::Entity as Comment;
pub use like::Entity as Like;
pub use report::Entity as Report;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
