//! nodemap core library
//!
//! Maps typed entities onto graph nodes: fetch a node by internal id into an
//! entity, and overwrite a node's properties from an entity. Every operation
//! runs through a [`GraphSession`], in async form via [`NodeSessionExt`] or in
//! blocking form via [`BlockingSession`].

pub mod blocking;
pub mod entity;
pub mod error;
pub mod mapper;
pub mod memory;
pub mod property;
pub mod record;
pub mod session;
pub mod statement;

pub use blocking::BlockingSession;
pub use entity::NodeEntity;
pub use error::{MapperError, MapperResult};
pub use mapper::NodeSessionExt;
pub use memory::MemorySession;
pub use property::{PropertyMap, PropertyValue};
pub use record::{NodeRecord, QueryResult, Record};
pub use session::GraphSession;
pub use statement::{Parameters, Statement};
