//! # Message Layer
//!
//! Message types, their descriptor tables and the dynamic representation the
//! codec operates on.
//!
//! ## Components
//! - **Descriptor**: Static field and enum tables
//! - **Value / Instance**: Dynamically typed message values
//! - **Message**: The `MessageType` contract and field type mapping
//! - **Macros**: `message!`, `proto_enum!` and `message_registry!`
//! - **Format / JSON**: Human-readable and dictionary views of instances

pub mod descriptor;
pub mod format;
pub mod instance;
pub mod json;
mod macros;
pub mod message;
pub mod registry;
pub mod value;

pub use descriptor::{Cardinality, EnumDescriptor, FieldDescriptor, FieldType, MessageDescriptor, ScalarKind};
pub use instance::MessageInstance;
pub use message::{Fixed32, Fixed64, MessageType, ProtoValue, WireMessage};
pub use value::{FieldValue, Value};
