use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub telephone_no: Option<String>,
    pub role: String,
}

/// Admin-side customer creation payload. The field is called
/// `hashed_password` on the wire even though the client sends it in the
/// clear; the server hashes it on arrival.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub telephone_no: Option<String>,
    pub hashed_password: String,
}
