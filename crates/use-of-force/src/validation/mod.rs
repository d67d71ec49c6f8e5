//! Schema-driven processing of submitted form sections.
//!
//! A [`Schema`] is compiled once into a [`ValidationSpec`]: a deep
//! [`Sanitiser`], an [`ErrorDetailAdapter`] and a [`FieldTypeSplitter`], all
//! derived from the schema's [`SchemaDescription`]. [`process_input`] then
//! runs sanitise, validate, adapt and split for each submission.

pub mod description;
pub mod error_adapter;
pub mod metadata;
pub mod pipeline;
pub mod sanitiser;
pub mod schema;
pub mod spec;
pub mod splitter;
pub mod transforms;
pub mod values;

pub use description::{DescriptionKind, SchemaDescription, WhenDescription};
pub use error_adapter::{ErrorDetailAdapter, UiError};
pub use metadata::{FieldType, MergedMetadata, Metadata, MetadataBag, Transform};
pub use pipeline::{process_input, process_input_with, ProcessedInput};
pub use sanitiser::Sanitiser;
pub use schema::{
    Comparator, Condition, ErrorDetail, RuleContext, Schema, Validated, ValidationPolicy,
    Violation,
};
pub use spec::ValidationSpec;
pub use splitter::{FieldTypeSplitter, SplitResult};
pub use values::{is_nil_or_empty, PathSegment};

/// Misconfigured schemas, raised while compiling a section at startup.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("expected an {expected} schema, found {found}")]
    InvalidSchemaKind {
        expected: DescriptionKind,
        found: DescriptionKind,
    },
    #[error("unknown form section '{0}'")]
    UnknownSection(String),
}
