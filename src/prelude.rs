//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the flowform crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowform::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/export.json")?;
//! let conversion = Converter::builder(ExportBundle::from_json(&json)?)
//!     .skip_dependencies()
//!     .build()
//!     .convert()?;
//! std::fs::write("main.tf", &conversion.output)?;
//! # Ok(())
//! # }
//! ```

// Conversion pipeline
pub use crate::converter::{Conversion, ConvertOptions, Converter, ConverterBuilder, aggregate};

// Input model
pub use crate::model::{EntityKind, ExportBundle, ExportedEntity, IntoExport, ValueNode};

// Core services
pub use crate::emit::{EmitContext, Emission, EmittedBlock, EntityEmitter, SettingsAllowList, Tier};
pub use crate::encoder::{Block, Expr, encode};
pub use crate::extract::{
    EligibleAttribute, ExtractionMode, ParameterType, PropertyClassifier, VariableExtractor,
};
pub use crate::registry::IdentityRegistry;
pub use crate::resolver::{
    PlaceholderReason, ReferenceRequest, ReferenceResolver, ResolutionMode, ResolvedReference,
};

// Error types
pub use crate::error::{ConvertError, ParseError, RegistryError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
