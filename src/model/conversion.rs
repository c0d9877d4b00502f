use super::ExportBundle;
use crate::error::ParseError;

/// A trait for source documents that can be turned into an `ExportBundle`.
///
/// This is the extension point for feeding the converter from something other
/// than the standard export JSON. Implement it on your own payload type and hand
/// the result to `Converter::builder`.
///
/// # Example
///
/// ```rust,no_run
/// use flowform::error::ParseError;
/// use flowform::model::{EntityKind, ExportBundle, ExportedEntity, IntoExport, ValueNode};
///
/// struct ConnectorDump { rows: Vec<(String, String)> }
///
/// impl IntoExport for ConnectorDump {
///     fn into_export(self) -> Result<ExportBundle, ParseError> {
///         let entities = self
///             .rows
///             .into_iter()
///             .map(|(id, name)| {
///                 ExportedEntity::new(EntityKind::ConnectorInstance, id, name, ValueNode::Null)
///             })
///             .collect();
///         Ok(ExportBundle::new(entities))
///     }
/// }
/// ```
pub trait IntoExport {
    /// Consumes the document and converts it into parsed entities.
    fn into_export(self) -> Result<ExportBundle, ParseError>;
}
