pub mod etl;
pub mod pipeline;
pub mod process;
pub mod scratch;
pub mod transform;

pub use crate::domain::model::{Fund, ParsedData, Transaction};
pub use crate::domain::ports::{ConfigProvider, PasswordTransport, Pipeline, StatementParser};
pub use crate::domain::raw::RawParseResult;
pub use crate::utils::error::Result;
