use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::{
    error::{AppError, StoreError},
    records::{
        LanguageRow, LanguageSample, MedicalTopic, PersonalInfo, PersonalInfoCreate,
        PersonalInfoStatus, SearchQuery, SearchResponse, TOPIC_COLUMNS,
    },
    state::AppState,
    store::{PERSONAL_INFO_TABLE, TOPICS_TABLE},
};

pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Medical History Search API" }))
}

/// Preflight responses are produced by the CORS layer; this keeps the
/// explicit OPTIONS body the frontend expects.
pub async fn search_options_handler() -> Json<Value> {
    Json(json!({ "message": "OK" }))
}

pub async fn get_personal_info_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PersonalInfoStatus>, AppError> {
    let rows: Vec<PersonalInfo> = state
        .store
        .table(PERSONAL_INFO_TABLE)
        .select("*")
        .eq("user_id", &user_id)
        .execute()
        .await
        .inspect_err(|e| error!("Error getting personal info: {e}"))?;

    Ok(Json(PersonalInfoStatus {
        has_completed_form: !rows.is_empty(),
        data: rows.into_iter().next(),
    }))
}

pub async fn create_personal_info_handler(
    State(state): State<Arc<AppState>>,
    Json(info): Json<PersonalInfoCreate>,
) -> Result<Json<PersonalInfo>, AppError> {
    let existing: Vec<Value> = state
        .store
        .table(PERSONAL_INFO_TABLE)
        .select("id")
        .eq("user_id", &info.user_id)
        .execute()
        .await
        .inspect_err(|e| error!("Error creating personal info: {e}"))?;

    if !existing.is_empty() {
        return Err(AppError::Conflict);
    }

    // Check-then-insert is not atomic: two racing creates for the same user
    // can both pass the check. The store schema carries no uniqueness
    // constraint for this path, so the gap is accepted and documented.
    let created: Vec<PersonalInfo> = state
        .store
        .table(PERSONAL_INFO_TABLE)
        .insert(&info)
        .await
        .inspect_err(|e| error!("Error creating personal info: {e}"))?;

    let record = created
        .into_iter()
        .next()
        .ok_or(StoreError::NoRepresentation)?;

    Ok(Json(record))
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(search_query): Json<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    info!(
        "Searching for query: {} in language: {}",
        search_query.query, search_query.language
    );

    let results: Vec<MedicalTopic> = state
        .store
        .table(TOPICS_TABLE)
        .select(TOPIC_COLUMNS)
        .ilike("title", &search_query.query)
        .eq("language", &search_query.language)
        .limit(search_query.n_results)
        .execute()
        .await
        .inspect_err(|e| error!("Store search error: {e}"))?;

    debug!("Full search results: {results:?}");

    if results.is_empty() {
        // Diagnostic only. A failure here must not turn an empty result set
        // into an error response.
        match state
            .store
            .table(TOPICS_TABLE)
            .select("*")
            .limit(5)
            .execute::<Value>()
            .await
        {
            Ok(sample) => info!("Sample of database contents: {sample:?}"),
            Err(e) => warn!("Failed to fetch diagnostic sample: {e}"),
        }
    }

    Ok(Json(SearchResponse {
        source: "store",
        results,
    }))
}

/// Introspection endpoint: one extra round trip per distinct language, so
/// cost is O(languages). Failures come back as a 200 with an `error` field.
pub async fn test_db_language_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    match available_languages(&state).await {
        Ok(body) => Json(body),
        Err(e) => {
            error!("Database language test error: {e}");
            Json(json!({ "error": e.to_string() }))
        }
    }
}

async fn available_languages(state: &AppState) -> Result<Value, StoreError> {
    let rows: Vec<LanguageRow> = state
        .store
        .table(TOPICS_TABLE)
        .select("language")
        .execute()
        .await?;

    let languages: BTreeSet<String> = rows
        .into_iter()
        .filter_map(|row| row.language)
        .filter(|language| !language.is_empty())
        .collect();

    let mut samples: BTreeMap<String, Vec<LanguageSample>> = BTreeMap::new();
    for language in &languages {
        let sample: Vec<LanguageSample> = state
            .store
            .table(TOPICS_TABLE)
            .select("topic_id,title,language")
            .eq("language", language)
            .limit(1)
            .execute()
            .await?;

        samples.insert(language.clone(), sample);
    }

    Ok(json!({
        "available_languages": languages,
        "sample_by_language": samples,
    }))
}

/// Connectivity probe: a 1-row select, reported as a soft result either way.
pub async fn test_connection_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state
        .store
        .table(TOPICS_TABLE)
        .select("topic_id,title")
        .limit(1)
        .execute::<Value>()
        .await
    {
        Ok(sample) => Json(json!({
            "status": "success",
            "connection": "valid",
            "sample_data": sample,
        })),
        Err(e) => {
            error!("Store connection test error: {e}");
            Json(json!({
                "status": "error",
                "connection": "invalid",
                "error": e.to_string(),
            }))
        }
    }
}
