// ==============================================================================
// state.rs - Shared Browser State
// ==============================================================================
// Description: Cheaply cloneable handle over the loaded store, join index
//              and query limits
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use std::sync::Arc;
use tracing::info;

use crate::config::SourcePaths;
use crate::error::{LoadError, NotFoundError, QueryError};
use crate::join_index::JoinIndex;
use crate::limits::QueryLimits;
use crate::models::{ClinicalAssociation, GeneAssociation, VariantAssociation};
use crate::store::DatasetStore;
use crate::views::{
    self, BrowseRequest, GeneHeader, GenePage, GenePageRequest, RegionCount, TableRequest,
    ViewResponse,
};

/// Shared browser state
#[derive(Clone)]
pub struct AssociationBrowser {
    inner: Arc<BrowserInner>,
}

struct BrowserInner {
    store: DatasetStore,
    index: JoinIndex,
    limits: QueryLimits,
}

impl AssociationBrowser {
    /// Load every source and build the join index
    pub fn load(paths: &SourcePaths, limits: QueryLimits) -> Result<Self, LoadError> {
        let store = DatasetStore::load(paths)?;
        Ok(Self::new(store, limits))
    }

    pub fn new(store: DatasetStore, limits: QueryLimits) -> Self {
        let index = JoinIndex::build(store.variant_gene_map(), store.gene_external_ids());
        info!(
            "Association browser ready ({} TWAS rows, {} mapped genes)",
            store.gene_associations().len(),
            index.mapped_gene_count()
        );

        Self {
            inner: Arc::new(BrowserInner { store, index, limits }),
        }
    }

    pub fn store(&self) -> &DatasetStore {
        &self.inner.store
    }

    pub fn index(&self) -> &JoinIndex {
        &self.inner.index
    }

    pub fn limits(&self) -> &QueryLimits {
        &self.inner.limits
    }

    /// Gene dropdown options
    pub fn gene_options(&self) -> Vec<&str> {
        self.inner.store.gene_symbols()
    }

    pub fn gene_header(&self, gene: &str) -> Result<GeneHeader, NotFoundError> {
        views::gene_header(&self.inner.index, gene)
    }

    pub fn twas(&self, gene: Option<&str>, request: &TableRequest) -> Result<ViewResponse<GeneAssociation>, QueryError> {
        views::twas_view(&self.inner.store, gene, request, &self.inner.limits)
    }

    pub fn gwas(
        &self,
        gene: Option<&str>,
        request: &TableRequest,
    ) -> Result<ViewResponse<VariantAssociation>, QueryError> {
        views::gwas_view(&self.inner.store, &self.inner.index, gene, request, &self.inner.limits)
    }

    pub fn clinical(&self, gene: Option<&str>) -> Result<ViewResponse<ClinicalAssociation>, QueryError> {
        views::clinical_view(&self.inner.store, gene)
    }

    pub fn jti_counts(&self, gene: Option<&str>) -> Vec<RegionCount> {
        views::jti_counts(&self.inner.index, gene)
    }

    pub fn browse(&self, request: &BrowseRequest) -> Result<ViewResponse<GeneAssociation>, QueryError> {
        views::browse_view(&self.inner.store, request, &self.inner.limits)
    }

    pub fn gene_page(&self, request: &GenePageRequest) -> Result<GenePage, QueryError> {
        views::gene_page(&self.inner.store, &self.inner.index, request, &self.inner.limits)
    }
}
