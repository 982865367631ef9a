use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    Json,
};
use serde::de::DeserializeOwned;

use super::ApiResult;
use crate::app::AppState;
use crate::database::Company;
use crate::error::ApiError;
use crate::filter::FilterCriteria;

/// GET /companies - List companies matching the query-string criteria
pub async fn list(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Vec<Company>> {
    let criteria = FilterCriteria::from_query(query.as_deref().unwrap_or_default())?;
    let companies = state.store.list(&criteria).await?;
    Ok(Json(companies))
}

/// GET /companies/:id - Get a single company by ID
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Company> {
    let id = parse_id(&id)?;
    let company = state.store.get(id).await?;
    Ok(Json(company))
}

/// POST /companies - Create a company; any client-supplied id is ignored
pub async fn create(State(state): State<AppState>, body: Bytes) -> ApiResult<Company> {
    let company: Company = parse_body(&body)?;
    let created = state.store.create(company.with_id(0)).await?;
    tracing::info!("Created company {}", created.id);
    Ok(Json(created))
}

/// PUT /companies/:id - Replace every attribute of an existing company
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Company> {
    let id = parse_id(&id)?;
    let existing = state.store.get(id).await?;

    let replacement: Company = parse_body(&body)?;
    let replacement = replacement.with_id(existing.id);

    state.store.update(&replacement).await?;
    tracing::info!("Updated company {}", replacement.id);
    Ok(Json(replacement))
}

/// DELETE /companies/:id - Delete a company and return what was removed
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Company> {
    let id = parse_id(&id)?;
    let company = state.store.get(id).await?;

    state.store.delete(&company).await?;
    tracing::info!("Deleted company {}", company.id);
    Ok(Json(company))
}

fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>()
        .map_err(|_| ApiError::bad_request(format!("company id {:?} is not a number", raw)))
}

/// Decode a JSON body regardless of the declared content type
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::invalid_json(e.to_string()))
}
