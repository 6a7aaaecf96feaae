//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod result_repo;
pub mod stream_algorithm_repo;
pub mod stream_job_repo;
pub mod user_repo;

pub use result_repo::ResultRepo;
pub use stream_algorithm_repo::StreamAlgorithmRepo;
pub use stream_job_repo::StreamJobRepo;
pub use user_repo::UserRepo;
