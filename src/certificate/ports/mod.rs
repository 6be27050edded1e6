//! Contracts for the external document collaborators.

mod collaborators;

#[cfg(test)]
pub use collaborators::{MockDocumentRecognizer, MockFieldExtractor};
pub use collaborators::{CollaboratorError, DocumentRecognizer, FieldExtractor, SourceDocument};
