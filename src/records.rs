//! Wire and row shapes shared by the handlers and the store.

use serde::{Deserialize, Serialize};

/// Columns fetched for a full search result row.
pub const TOPIC_COLUMNS: &str = "topic_id,title,language,url,meta_desc,full_summary,aliases,\
                                 mesh_headings,groups,primary_institute,date_created";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PersonalInfoCreate {
    pub user_id: String,
    pub age_range: String,
    pub gender: String,
    pub language: String,
}

/// A stored profile row. `id` is assigned by the store.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: String,
    pub age_range: String,
    pub gender: String,
    pub language: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoStatus {
    pub has_completed_form: bool,
    pub data: Option<PersonalInfo>,
}

#[derive(Deserialize, Debug)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_n_results")]
    pub n_results: u32,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_n_results() -> u32 {
    5
}

fn default_language() -> String {
    "English".to_string()
}

/// A reference-content row. The catalog columns are nullable upstream.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MedicalTopic {
    pub topic_id: i64,
    pub title: String,
    pub language: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub meta_desc: Option<String>,
    #[serde(default)]
    pub full_summary: Option<String>,
    #[serde(default)]
    pub aliases: Option<String>,
    #[serde(default)]
    pub mesh_headings: Option<String>,
    #[serde(default)]
    pub groups: Option<String>,
    #[serde(default)]
    pub primary_institute: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct SearchResponse {
    pub source: &'static str,
    pub results: Vec<MedicalTopic>,
}

/// Projection used when enumerating the `language` column.
#[derive(Deserialize, Debug)]
pub struct LanguageRow {
    #[serde(default)]
    pub language: Option<String>,
}

/// One-row sample fetched per distinct language.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LanguageSample {
    pub topic_id: i64,
    pub title: String,
    pub language: String,
}
