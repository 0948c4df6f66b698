pub mod assembler;
pub mod emitter;
pub mod etl;
pub mod filter;
pub mod loaders;

pub use crate::domain::model::{Circuit, ReferenceData};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SplynxApi, Storage};
pub use crate::utils::error::Result;
