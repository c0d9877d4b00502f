//! # flowform - DaVinci Export to Terraform Converter
//!
//! **flowform** turns an exported DaVinci configuration graph (flows, connector
//! instances, variables, applications and flow policies) into Terraform HCL.
//! The output is deterministic: converting the same export twice, in any input
//! order, produces byte-identical text.
//!
//! ## Core Workflow
//!
//! 1.  **Load the Export**: Parse the export JSON into an `ExportBundle`, or implement `IntoExport` for your own format.
//! 2.  **Configure**: Use `Converter::builder` to pick the resolution mode (cross-block references or inlined raw values), the extraction mode and any excluded kinds.
//! 3.  **Convert**: `convert()` registers a unique block name for every entity, emits one resource block per entity (plus enable/deploy blocks per flow), and aggregates everything in dependency order.
//! 4.  **Inspect**: The returned `Conversion` lists the references that could not be resolved; each one is also left in the output as a commented placeholder.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowform::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let json = std::fs::read_to_string("export.json")?;
//!     let bundle = ExportBundle::from_json(&json)?;
//!
//!     let conversion = Converter::builder(bundle)
//!         .with_extraction(ExtractionMode::SecretsOnly)
//!         .build()
//!         .convert()?;
//!
//!     for gap in &conversion.unresolved {
//!         eprintln!(
//!             "unresolved {} '{}': {}",
//!             gap.request.target_kind, gap.request.target_source_id, gap.reason
//!         );
//!     }
//!     print!("{}", conversion.output);
//!     Ok(())
//! }
//! ```

pub mod converter;
pub mod emit;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod model;
pub mod naming;
pub mod prelude;
pub mod registry;
pub mod resolver;
