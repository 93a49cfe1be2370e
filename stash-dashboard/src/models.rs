use serde::Serialize;

// GET /
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageParams {
    pub code: Option<String>,
}

impl PageParams {
    /// Picks the known parameters out of the raw query. A repeated
    /// parameter keeps its last value.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            if key == "code" {
                params.code = Some(value);
            }
        }
        params
    }
}

// Health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
