//! Care product endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Datelike;
use dbc_core::{DetailOptions, FactDbc, FactDbcProfiel, Lookups, ProductDetail, RefZorgproduct};
use serde::Deserialize;

use crate::db::repos::{DiagnoseRepo, FactDbcRepo, SpecialismeRepo, ZorgproductRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidCode, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Paginated, Pagination, PaginationParams, SearchTerm};

/// Query string for the product list
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListParams {
    fn pagination(&self) -> Pagination {
        Pagination::from(PaginationParams {
            page: self.page,
            per_page: self.per_page,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    pub jaar: Option<i32>,
}

/// GET /api/zorgproducten - paged list, filtered by `search`
async fn list_products(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ListParams>,
) -> Result<Json<Paginated<RefZorgproduct>>, ApiError> {
    let search = SearchTerm::parse(params.search.as_deref())?;
    let page = ZorgproductRepo::new(&state.pool)
        .list(search.as_ref(), params.pagination())
        .await?;

    tracing::debug!(
        search = search.as_ref().map(SearchTerm::as_str),
        total = page.total,
        "product list"
    );
    Ok(Json(page))
}

/// GET /api/zorgproducten/{code}
async fn get_product(
    State(state): State<Arc<AppState>>,
    ValidCode(code): ValidCode,
) -> Result<Json<RefZorgproduct>, ApiError> {
    let product = ZorgproductRepo::new(&state.pool).get(code.as_str()).await?;
    Ok(Json(product))
}

/// GET /api/zorgproducten/{code}/facts
async fn product_facts(
    State(state): State<Arc<AppState>>,
    ValidCode(code): ValidCode,
) -> Result<Json<Vec<FactDbc>>, ApiError> {
    let facts = FactDbcRepo::new(&state.pool).by_product(code.as_str()).await?;
    Ok(Json(facts))
}

/// GET /api/zorgproducten/{code}/profiel
async fn product_profiel(
    State(state): State<Arc<AppState>>,
    ValidCode(code): ValidCode,
) -> Result<Json<Vec<FactDbcProfiel>>, ApiError> {
    let rows = FactDbcRepo::new(&state.pool)
        .profiel_by_product(code.as_str())
        .await?;
    Ok(Json(rows))
}

/// GET /api/zorgproducten/{code}/detail?jaar= - everything the product page shows
async fn product_detail(
    State(state): State<Arc<AppState>>,
    ValidCode(code): ValidCode,
    ValidQuery(params): ValidQuery<DetailParams>,
) -> Result<Json<ProductDetail>, ApiError> {
    let pool = &state.pool;
    let product = ZorgproductRepo::new(pool).get(code.as_str()).await?;

    let (fact_repo, specialisme_repo, diagnose_repo) = (
        FactDbcRepo::new(pool),
        SpecialismeRepo::new(pool),
        DiagnoseRepo::new(pool),
    );
    let (facts, specialismen, diagnoses) = tokio::try_join!(
        fact_repo.by_product(code.as_str()),
        specialisme_repo.all(),
        diagnose_repo.all(),
    )?;

    let lookups = Lookups::new(&specialismen, &diagnoses);
    let options = DetailOptions {
        requested_year: params.jaar,
        provisional_year: state.provisional_year,
        current_year: chrono::Local::now().year(),
    };

    Ok(Json(ProductDetail::build(product, &facts, &lookups, options)))
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/zorgproducten", get(list_products))
        .route("/api/zorgproducten/{code}", get(get_product))
        .route("/api/zorgproducten/{code}/facts", get(product_facts))
        .route("/api/zorgproducten/{code}/profiel", get(product_profiel))
        .route("/api/zorgproducten/{code}/detail", get(product_detail))
}
