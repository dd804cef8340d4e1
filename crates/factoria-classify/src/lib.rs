//! Field classification for factoria.
//!
//! Given a model's column descriptors and association signals, the
//! [`ClassificationEngine`] produces the ordered [`FactorySpec`] that the
//! output assembler renders into a factory definition.
//!
//! [`FactorySpec`]: factoria_core::FactorySpec

pub mod associations;
pub mod engine;
pub mod registry;

pub use associations::{
    AssociationScanner, AssociationSet, DeclaredAssociations, ForeignKeyAssociations,
    ScannerChain, qualify,
};
pub use engine::{ClassificationEngine, relation_expression};
pub use registry::{GeneratorRegistry, quote_list};
