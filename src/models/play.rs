use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub id: i64,
    pub title: String,
    pub duration: i32,
    pub price: f64,
    pub genre: String,
    #[serde(default)]
    pub synopsis: Option<String>,
}

/// Create/update payload; the server assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct PlayDraft {
    pub title: String,
    pub duration: i32,
    pub price: f64,
    pub genre: String,
    pub synopsis: Option<String>,
}
