use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub date_of_birth: Option<i32>,
    #[serde(default)]
    pub citizenship: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectorDraft {
    pub name: String,
    pub date_of_birth: Option<i32>,
    pub citizenship: Option<String>,
}
