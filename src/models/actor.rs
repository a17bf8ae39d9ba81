use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    // The API stores only the year of birth
    #[serde(default)]
    pub date_of_birth: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorDraft {
    pub name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<i32>,
}
