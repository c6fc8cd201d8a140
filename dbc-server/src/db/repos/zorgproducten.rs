//! Care product repository
//!
//! - list: ordered by code, optionally filtered by a search term
//! - get: single product by code

use dbc_core::RefZorgproduct;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::DbError;
use crate::models::{Paginated, Pagination, SearchTerm};

const COLUMNS: &str = "zorgproduct_cd, latijn_oms, consument_oms, declaratie_verzekerd_cd, \
                       declaratie_onverzekerd_cd, versie, datum_bestand, peildatum";

/// Matches on code or consumer description, case-insensitive.
const SEARCH_FILTER: &str = "WHERE zorgproduct_cd ILIKE $1 OR consument_oms ILIKE $1";

pub(crate) fn from_row(row: &PgRow) -> Result<RefZorgproduct, sqlx::Error> {
    Ok(RefZorgproduct {
        zorgproduct_cd: row.try_get("zorgproduct_cd")?,
        latijn_oms: row.try_get("latijn_oms")?,
        consument_oms: row.try_get("consument_oms")?,
        declaratie_verzekerd_cd: row.try_get("declaratie_verzekerd_cd")?,
        declaratie_onverzekerd_cd: row.try_get("declaratie_onverzekerd_cd")?,
        versie: row.try_get("versie")?,
        datum_bestand: row.try_get("datum_bestand")?,
        peildatum: row.try_get("peildatum")?,
    })
}

/// Care product repository
pub struct ZorgproductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ZorgproductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of products, filtered when a search term is given.
    pub async fn list(
        &self,
        search: Option<&SearchTerm>,
        page: Pagination,
    ) -> Result<Paginated<RefZorgproduct>, DbError> {
        let (filter, pattern) = match search {
            Some(term) => (SEARCH_FILTER, Some(term.like_pattern())),
            None => ("", None),
        };
        // $1 is only referenced when filtering
        let (limit_idx, offset_idx) = if pattern.is_some() { (2, 3) } else { (1, 2) };

        let count_sql = format!("SELECT COUNT(*) FROM ref_zorgproduct {filter}");
        let page_sql = format!(
            "SELECT {COLUMNS} FROM ref_zorgproduct {filter} \
             ORDER BY zorgproduct_cd ASC LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut page_query = sqlx::query(&page_sql);
        if let Some(pattern) = pattern.as_deref() {
            count_query = count_query.bind(pattern);
            page_query = page_query.bind(pattern);
        }

        let total = count_query.fetch_one(self.pool).await?;
        let rows = page_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(self.pool)
            .await?;

        let items = rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(items, total, page))
    }

    /// Every matching product, unpaged.
    pub async fn all(&self, search: Option<&SearchTerm>) -> Result<Vec<RefZorgproduct>, DbError> {
        let rows = match search {
            Some(term) => {
                let sql = format!(
                    "SELECT {COLUMNS} FROM ref_zorgproduct {SEARCH_FILTER} ORDER BY zorgproduct_cd ASC"
                );
                sqlx::query(&sql)
                    .bind(term.like_pattern())
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {COLUMNS} FROM ref_zorgproduct ORDER BY zorgproduct_cd ASC");
                sqlx::query(&sql).fetch_all(self.pool).await?
            }
        };

        Ok(rows.iter().map(from_row).collect::<Result<Vec<_>, _>>()?)
    }

    pub async fn find(&self, code: &str) -> Result<Option<RefZorgproduct>, DbError> {
        let sql = format!("SELECT {COLUMNS} FROM ref_zorgproduct WHERE zorgproduct_cd = $1");
        let row = sqlx::query(&sql)
            .bind(code)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.as_ref().map(from_row).transpose()?)
    }

    pub async fn get(&self, code: &str) -> Result<RefZorgproduct, DbError> {
        self.find(code)
            .await?
            .ok_or_else(|| DbError::not_found("zorgproduct", code))
    }
}
