// ==============================================================================
// parsers/mod.rs - Source parser modules
// ==============================================================================
// Description: Parsers for the association source files
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod association_csv;

pub use association_csv::AssociationCsvParser;
