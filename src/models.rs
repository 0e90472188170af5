use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Quote {
    pub id: u64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_ko: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_ja: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_es: Option<String>,
    pub source: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "authorUrl", default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
}
