//! # Document Model
//!
//! Clean DTOs for stored documents. These types cross every boundary:
//! mapping ↔ conversion ↔ proxies ↔ user.
//!
//! Design rule: pure data — no I/O, no metadata lookups, no interior state.

pub mod value;
pub mod document;
pub mod object_id;
pub mod doc_ref;

pub use value::Value;
pub use document::Document;
pub use object_id::ObjectId;
pub use doc_ref::DocRef;
