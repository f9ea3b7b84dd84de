#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core value models for capacity allocation.
///
/// Every model in this module is an immutable value object. Models are built
/// either through a validating constructor or by converting from their DTO,
/// and the conversion is the single place where input is checked. Downstream
/// code (the solver) can therefore assume that prices are positive, that
/// demand parameters are well-formed, and that ranked fare classes really are
/// ranked.
pub mod models;
