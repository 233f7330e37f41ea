// ==============================================================================
// join_index.rs - Gene Join Index
// ==============================================================================
// Description: Gene -> variants, gene -> Ensembl ID and (gene, region) -> count
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::error::NotFoundError;
use crate::models::{GeneExternalId, VariantGeneLink};
use crate::table::Table;

/// Lookups derived once from the JTI map and the identifier map.
#[derive(Debug, Clone, Default)]
pub struct JoinIndex {
    /// Variants per gene, first-seen order, no repeats
    gene_to_variants: HashMap<String, Vec<String>>,
    /// Map rows per gene and region
    gene_region_counts: HashMap<String, HashMap<String, usize>>,
    gene_to_external_id: HashMap<String, String>,
}

impl JoinIndex {
    pub fn build(variant_gene_map: &Table<VariantGeneLink>, external_ids: &Table<GeneExternalId>) -> Self {
        let mut gene_to_variants: HashMap<String, Vec<String>> = HashMap::new();
        let mut gene_region_counts: HashMap<String, HashMap<String, usize>> = HashMap::new();
        let mut seen: HashSet<(&str, &str)> = HashSet::new();

        for link in variant_gene_map {
            if seen.insert((link.symbol.as_str(), link.snp.as_str())) {
                gene_to_variants
                    .entry(link.symbol.clone())
                    .or_default()
                    .push(link.snp.clone());
            }

            *gene_region_counts
                .entry(link.symbol.clone())
                .or_default()
                .entry(link.region.clone())
                .or_insert(0) += 1;
        }

        let mut gene_to_external_id = HashMap::with_capacity(external_ids.len());
        for entry in external_ids {
            // Last entry wins for a repeated symbol
            if let Some(previous) =
                gene_to_external_id.insert(entry.symbol.clone(), entry.ensembl_id.clone())
            {
                warn!(
                    "Gene {} listed more than once in identifier map ({} replaced by {})",
                    entry.symbol, previous, entry.ensembl_id
                );
            }
        }

        debug!(
            "Join index built: {} mapped genes, {} identifiers",
            gene_to_variants.len(),
            gene_to_external_id.len()
        );

        Self {
            gene_to_variants,
            gene_region_counts,
            gene_to_external_id,
        }
    }

    /// Variant IDs mapped to `gene`; empty for unmapped genes
    pub fn variants_of(&self, gene: &str) -> &[String] {
        self.gene_to_variants
            .get(gene)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn external_id(&self, gene: &str) -> Result<&str, NotFoundError> {
        self.gene_to_external_id
            .get(gene)
            .map(String::as_str)
            .ok_or_else(|| NotFoundError {
                gene: gene.to_string(),
            })
    }

    /// Total over every (gene, region) pair; unseen pairs count zero.
    pub fn count_of(&self, gene: &str, region: &str) -> usize {
        self.gene_region_counts
            .get(gene)
            .and_then(|regions| regions.get(region))
            .copied()
            .unwrap_or(0)
    }

    pub fn mapped_gene_count(&self) -> usize {
        self.gene_to_variants.len()
    }
}
