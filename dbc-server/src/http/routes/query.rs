//! Named query endpoint
//!
//! The frontend addresses its data through a small set of named queries
//! (`zorgproducten.search`, `factDbc.byProduct`, ...). POST /api/query takes
//! `{name, args}` and answers with the rows, or `null` for single-row
//! queries that match nothing.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::db::repos::{DiagnoseRepo, FactDbcRepo, SpecialismeRepo, ZorgproductRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{SearchTerm, ValidationError};

/// POST body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArgs {
    search: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductArgs {
    zorgproduct_cd: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiagnoseArgs {
    diagnose_cd: String,
    specialisme_cd: String,
}

/// A parsed, validated named query
#[derive(Debug, Clone, PartialEq)]
pub enum NamedQuery {
    AllProducts,
    SearchProducts(Option<SearchTerm>),
    ProductByCode(String),
    FactsByProduct(String),
    AllSpecialismen,
    SpecialismeByCode(String),
    AllDiagnoses,
    DiagnoseByCodes {
        diagnose_cd: String,
        specialisme_cd: String,
    },
}

fn typed_args<T: DeserializeOwned>(query: &'static str, args: Value) -> Result<T, ValidationError> {
    serde_json::from_value(args).map_err(|e| ValidationError::InvalidArgs {
        query,
        reason: e.to_string(),
    })
}

/// Queries without parameters accept a missing, empty or null `args`.
fn no_args(query: &'static str, args: &Value) -> Result<(), ValidationError> {
    let empty = match args {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        Ok(())
    } else {
        Err(ValidationError::InvalidArgs {
            query,
            reason: "takes no arguments".into(),
        })
    }
}

impl NamedQuery {
    pub fn parse(name: &str, args: Value) -> Result<Self, ValidationError> {
        let query = match name {
            "zorgproducten.all" | "zorgproducten.dbcZorgproducten" => {
                no_args("zorgproducten.all", &args)?;
                Self::AllProducts
            }
            "zorgproducten.search" => {
                let SearchArgs { search } = typed_args("zorgproducten.search", args)?;
                Self::SearchProducts(SearchTerm::parse(Some(&search))?)
            }
            "zorgproducten.byCode" => Self::ProductByCode(typed_args("zorgproducten.byCode", args)?),
            "factDbc.byProduct" => {
                let ProductArgs { zorgproduct_cd } = typed_args("factDbc.byProduct", args)?;
                Self::FactsByProduct(zorgproduct_cd)
            }
            "refSpecialisme.all" => {
                no_args("refSpecialisme.all", &args)?;
                Self::AllSpecialismen
            }
            "refSpecialisme.byCode" => {
                Self::SpecialismeByCode(typed_args("refSpecialisme.byCode", args)?)
            }
            "refDiagnose.all" => {
                no_args("refDiagnose.all", &args)?;
                Self::AllDiagnoses
            }
            "refDiagnose.byCodes" => {
                let DiagnoseArgs {
                    diagnose_cd,
                    specialisme_cd,
                } = typed_args("refDiagnose.byCodes", args)?;
                Self::DiagnoseByCodes {
                    diagnose_cd,
                    specialisme_cd,
                }
            }
            other => {
                return Err(ValidationError::UnknownQuery {
                    name: other.to_string(),
                })
            }
        };
        Ok(query)
    }

    /// Run against the database and serialize the result.
    pub async fn run(self, pool: &PgPool) -> Result<Value, ApiError> {
        let value = match self {
            Self::AllProducts => serde_json::to_value(ZorgproductRepo::new(pool).all(None).await?)?,
            Self::SearchProducts(term) => {
                serde_json::to_value(ZorgproductRepo::new(pool).all(term.as_ref()).await?)?
            }
            Self::ProductByCode(code) => {
                serde_json::to_value(ZorgproductRepo::new(pool).find(&code).await?)?
            }
            Self::FactsByProduct(code) => {
                serde_json::to_value(FactDbcRepo::new(pool).by_product(&code).await?)?
            }
            Self::AllSpecialismen => serde_json::to_value(SpecialismeRepo::new(pool).all().await?)?,
            Self::SpecialismeByCode(code) => {
                serde_json::to_value(SpecialismeRepo::new(pool).find(&code).await?)?
            }
            Self::AllDiagnoses => serde_json::to_value(DiagnoseRepo::new(pool).all().await?)?,
            Self::DiagnoseByCodes {
                diagnose_cd,
                specialisme_cd,
            } => serde_json::to_value(
                DiagnoseRepo::new(pool)
                    .find(&diagnose_cd, &specialisme_cd)
                    .await?,
            )?,
        };
        Ok(value)
    }
}

/// POST /api/query
async fn run_query(
    State(state): State<Arc<AppState>>,
    body: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = body.map_err(|_| {
        ApiError::Validation(ValidationError::InvalidFormat {
            field: "body",
            reason: "expected a JSON object with 'name' and optional 'args'",
        })
    })?;

    let query = NamedQuery::parse(&req.name, req.args)?;
    tracing::debug!(name = %req.name, "named query");

    Ok(Json(query.run(&state.pool).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/query", post(run_query))
}
