use serde::Deserialize;
use serde_json::Value;

/// One page of `GET /builds`. Items stay as raw JSON so every field the API
/// returns survives into the saved file.
#[derive(Debug, Deserialize)]
pub struct BuildListPage {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Paging {
    pub next: Option<String>,
    pub page_item_limit: Option<u32>,
    pub total_item_count: Option<u64>,
}

impl BuildListPage {
    pub fn next_cursor(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .filter(|next| !next.is_empty())
    }
}
