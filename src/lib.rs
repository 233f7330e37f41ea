// ==============================================================================
// lib.rs - Association Browser Library
// ==============================================================================
// Description: Query core for brain-volume GWAS, TWAS and clinical association
//              tables
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod config;
pub mod error;
pub mod join_index;
pub mod limits;
pub mod models;
pub mod parsers;
pub mod query;
pub mod state;
pub mod store;
pub mod table;
pub mod views;

pub use config::SourcePaths;
pub use error::{LoadError, NotFoundError, QueryError, SchemaError};
pub use join_index::JoinIndex;
pub use limits::QueryLimits;
pub use query::{PageRequest, Predicate, SortDirection, SortKey};
pub use state::AssociationBrowser;
pub use store::DatasetStore;
pub use table::{Record, Table, TableName};
