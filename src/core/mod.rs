pub mod decode;
pub mod dedup;
pub mod etl;
pub mod expander;
pub mod normalizer;
pub mod pipeline;
pub mod projector;
pub mod resolver;
pub mod schema;
pub mod slug;

pub use crate::domain::model::{SourceRecord, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Extractor, Pipeline, Storage};
pub use crate::utils::error::Result;
