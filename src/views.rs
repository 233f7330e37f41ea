// ==============================================================================
// views.rs - Dashboard Views
// ==============================================================================
// Description: One pure function per dashboard table, composing join lookups
//              with the query engine
// Author: Association Browser Maintainers
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Views never mutate the store or the index, so they are safe to call from
// any number of request workers at once.
// ==============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{NotFoundError, QueryError, SchemaError};
use crate::join_index::JoinIndex;
use crate::limits::QueryLimits;
use crate::models::{ClinicalAssociation, GeneAssociation, VariantAssociation, REGIONS};
use crate::query::{self, PageRequest, Predicate, SortKey};
use crate::store::DatasetStore;
use crate::table::{Record, Table};

/// Paging, sorting and threshold options of one table widget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRequest {
    pub page_current: usize,
    /// Falls back to the view's default page size
    pub page_size: Option<usize>,
    pub sort_by: Vec<SortKey>,
    pub pvalue_column: Option<String>,
    pub pvalue_threshold: Option<f64>,
}

/// TWAS browse table request; empty selections do not filter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseRequest {
    #[serde(default)]
    pub phenotypes: Vec<String>,
    #[serde(default)]
    pub gene_models: Vec<String>,
    #[serde(default)]
    pub genes: Vec<String>,
    #[serde(flatten)]
    pub table: TableRequest,
}

/// Everything the gene summary page shows for one gene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenePageRequest {
    #[serde(default)]
    pub gene: Option<String>,
    #[serde(default)]
    pub gwas: TableRequest,
    #[serde(default)]
    pub twas: TableRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    Gwas,
    Twas,
    Clinical,
    Browse,
}

impl ViewKind {
    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Gwas => "Neuroimaging GWAS",
            ViewKind::Twas => "Neuroimaging TWAS",
            ViewKind::Clinical => "Clinical TWAS",
            ViewKind::Browse => "TWAS Table",
        }
    }

    /// Count line shown above the table
    pub fn headline(&self, total_matching: usize) -> String {
        match self {
            ViewKind::Browse => summary_text(total_matching),
            _ => format!("{}: {} results", self.title(), total_matching),
        }
    }
}

/// One page of a view plus its counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResponse<R> {
    pub rows: Vec<R>,
    pub total_matching: usize,
    pub page_count: usize,
    pub summary_text: String,
    pub headline: String,
}

impl<R> ViewResponse<R> {
    fn new(kind: ViewKind, rows: Vec<R>, total_matching: usize, page_count: usize) -> Self {
        Self {
            rows,
            total_matching,
            page_count,
            summary_text: summary_text(total_matching),
            headline: kind.headline(total_matching),
        }
    }

    fn empty(kind: ViewKind, page: PageRequest) -> Self {
        Self::new(kind, Vec::new(), 0, page.page_count(0))
    }
}

/// JTI SNP count for one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCount {
    pub region: String,
    pub num_snps: usize,
}

/// Gene name with its Ensembl identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneHeader {
    pub symbol: String,
    pub external_id: String,
    /// "(ENSG...)"
    pub label: String,
}

/// Composite gene summary. `header` is `None` for genes without an identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenePage {
    pub gene: Option<String>,
    pub header: Option<GeneHeader>,
    pub jti_counts: Vec<RegionCount>,
    pub gwas: ViewResponse<VariantAssociation>,
    pub twas: ViewResponse<GeneAssociation>,
    pub clinical: ViewResponse<ClinicalAssociation>,
}

pub fn summary_text(total_matching: usize) -> String {
    format!("{} results found", total_matching)
}

/// TWAS rows of one gene
pub fn twas_view(
    store: &DatasetStore,
    gene: Option<&str>,
    request: &TableRequest,
    limits: &QueryLimits,
) -> Result<ViewResponse<GeneAssociation>, QueryError> {
    let page = page_for(request, limits.default_page_size, limits)?;
    let Some(gene) = selected_gene(gene) else {
        return Ok(ViewResponse::empty(ViewKind::Twas, page));
    };

    let mut predicates = vec![Predicate::equals("Gene", gene)];
    predicates.extend(threshold_predicate::<GeneAssociation>(request)?);

    paged(ViewKind::Twas, store.gene_associations(), &predicates, &request.sort_by, page)
}

/// GWAS rows of the variants JTI maps to one gene
pub fn gwas_view(
    store: &DatasetStore,
    index: &JoinIndex,
    gene: Option<&str>,
    request: &TableRequest,
    limits: &QueryLimits,
) -> Result<ViewResponse<VariantAssociation>, QueryError> {
    let page = page_for(request, limits.default_page_size, limits)?;
    let Some(gene) = selected_gene(gene) else {
        return Ok(ViewResponse::empty(ViewKind::Gwas, page));
    };

    // Variant membership goes first, ahead of any user filter
    let mut predicates = vec![Predicate::is_in("SNP", index.variants_of(gene))];
    predicates.extend(threshold_predicate::<VariantAssociation>(request)?);

    paged(
        ViewKind::Gwas,
        store.variant_associations(),
        &predicates,
        &request.sort_by,
        page,
    )
}

/// All BioVU rows of one gene, ordered by tissue, phenotype label and volume
pub fn clinical_view(
    store: &DatasetStore,
    gene: Option<&str>,
) -> Result<ViewResponse<ClinicalAssociation>, QueryError> {
    let Some(gene) = selected_gene(gene) else {
        return Ok(ViewResponse::new(ViewKind::Clinical, Vec::new(), 0, 1));
    };

    let predicates = [Predicate::equals("sym", gene)];
    let order = [
        SortKey::asc("tissue"),
        SortKey::asc("phename"),
        SortKey::asc("volume"),
    ];
    let rows: Vec<ClinicalAssociation> = query::select(store.clinical_associations(), &predicates, &order)?
        .into_iter()
        .cloned()
        .collect();
    let total = rows.len();

    // Unpaginated: everything fits on one page
    Ok(ViewResponse::new(ViewKind::Clinical, rows, total, 1))
}

/// JTI SNP counts per canonical region, in region order
pub fn jti_counts(index: &JoinIndex, gene: Option<&str>) -> Vec<RegionCount> {
    let Some(gene) = selected_gene(gene) else {
        return Vec::new();
    };

    REGIONS
        .iter()
        .map(|region| RegionCount {
            region: region.to_string(),
            num_snps: index.count_of(gene, region),
        })
        .collect()
}

pub fn gene_header(index: &JoinIndex, gene: &str) -> Result<GeneHeader, NotFoundError> {
    let external_id = index.external_id(gene)?;
    Ok(GeneHeader {
        symbol: gene.to_string(),
        external_id: external_id.to_string(),
        label: format!("({})", external_id),
    })
}

/// Whole TWAS table with phenotype, gene model and gene selections
pub fn browse_view(
    store: &DatasetStore,
    request: &BrowseRequest,
    limits: &QueryLimits,
) -> Result<ViewResponse<GeneAssociation>, QueryError> {
    let page = page_for(&request.table, limits.browse_page_size, limits)?;

    let mut predicates = Vec::new();
    if !request.phenotypes.is_empty() {
        predicates.push(Predicate::is_in("Predicted Volume", &request.phenotypes));
    }
    if !request.gene_models.is_empty() {
        predicates.push(Predicate::is_in("gr-Expression Site", &request.gene_models));
    }
    if !request.genes.is_empty() {
        predicates.push(Predicate::is_in("Gene", &request.genes));
    }
    predicates.extend(threshold_predicate::<GeneAssociation>(&request.table)?);

    paged(
        ViewKind::Browse,
        store.gene_associations(),
        &predicates,
        &request.table.sort_by,
        page,
    )
}

/// Header, JTI counts and the three association tables for one gene
pub fn gene_page(
    store: &DatasetStore,
    index: &JoinIndex,
    request: &GenePageRequest,
    limits: &QueryLimits,
) -> Result<GenePage, QueryError> {
    let gene = selected_gene(request.gene.as_deref());

    let header = match gene.map(|g| gene_header(index, g)) {
        Some(Ok(header)) => Some(header),
        Some(Err(NotFoundError { .. })) | None => None,
    };

    Ok(GenePage {
        gene: gene.map(str::to_string),
        header,
        jti_counts: jti_counts(index, gene),
        gwas: gwas_view(store, index, gene, &request.gwas, limits)?,
        twas: twas_view(store, gene, &request.twas, limits)?,
        clinical: clinical_view(store, gene)?,
    })
}

fn selected_gene(gene: Option<&str>) -> Option<&str> {
    gene.map(str::trim).filter(|g| !g.is_empty())
}

fn page_for(request: &TableRequest, default_size: usize, limits: &QueryLimits) -> Result<PageRequest, QueryError> {
    limits.page(request.page_current, request.page_size.unwrap_or(default_size))
}

/// `column < threshold` when both a column and a threshold were chosen
fn threshold_predicate<T: Record>(request: &TableRequest) -> Result<Option<Predicate>, QueryError> {
    let column = request.pvalue_column.as_deref().filter(|c| !c.is_empty());
    let (Some(column), Some(threshold)) = (column, request.pvalue_threshold) else {
        return Ok(None);
    };

    if T::column_index(column).is_none() {
        return Err(SchemaError::UnknownColumn {
            table: T::TABLE,
            column: column.to_string(),
        }
        .into());
    }
    if !T::THRESHOLD_COLUMNS.contains(&column) {
        return Err(SchemaError::NotThresholdColumn {
            table: T::TABLE,
            column: column.to_string(),
        }
        .into());
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(QueryError::InvalidRequest(format!(
            "pvalue_threshold {} outside [0, 1]",
            threshold
        )));
    }

    Ok(Some(Predicate::less_than(column, threshold)))
}

fn paged<T: Record>(
    kind: ViewKind,
    table: &Table<T>,
    predicates: &[Predicate],
    sort_by: &[SortKey],
    page: PageRequest,
) -> Result<ViewResponse<T>, QueryError> {
    let result = query::execute(table, predicates, sort_by, page)?;
    let page_count = page.page_count(result.total_matching);
    let rows = result.rows.into_iter().cloned().collect();
    Ok(ViewResponse::new(kind, rows, result.total_matching, page_count))
}
