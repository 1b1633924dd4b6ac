//! Operation registry and invocation
//!
//! - [`catalog`]: static descriptors for every game-data resource
//! - [`binding`]: parameter validation against a descriptor
//! - [`plan`]: bound arguments to path and query
//! - [`auction`]: the two-phase auction snapshot fetch
//! - [`invoker`]: the invoker seam and its executor-backed implementation

pub mod auction;
pub mod binding;
pub mod catalog;
pub mod invoker;
pub mod plan;
pub mod registry;

pub use binding::{bind, BoundArgs};
pub use catalog::{
    ArgValue, Execution, OperationDescriptor, OperationId, ParamKind, ParamSpec, Placement,
};
pub use invoker::{OperationInvoker, Operations};
pub use plan::{filter_fields, plan, RequestPlan};
pub use registry::OperationRegistry;
