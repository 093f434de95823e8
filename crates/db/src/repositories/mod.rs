//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod activity_repo;
pub mod campaign_repo;
pub mod review_repo;
pub mod user_repo;

pub use activity_repo::ActivityRepo;
pub use campaign_repo::CampaignRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;
