//! Row types and DTOs for the studio schema.

pub mod result;
pub mod stream_algorithm;
pub mod stream_job;
pub mod user;

pub use result::{
    MacroResult, MacroResultRow, MicroResult, MicroResultRow, NewMacroResult, NewMicroResult,
    NewUserResult, NewWindowResult, UserResult, UserResultRow, WindowResult, WindowResultRow,
};
pub use stream_algorithm::{AddAlgorithm, StreamAlgorithm};
pub use stream_job::{CreateStreamJob, StreamJob};
pub use user::StreamUser;
