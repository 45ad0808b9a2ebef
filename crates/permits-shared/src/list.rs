//! Query parameters and response shapes shared by all list endpoints

use serde::de::DeserializeOwned;

use crate::{const_config::display::DISPLAY_NOT_AVAILABLE, id::DbId};

/// Filters and pagination sent as query parameters to list endpoints
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub offset: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::with_limit(crate::const_config::client::CLIENT_DEFAULT_PAGE_SIZE)
    }
}

impl ListQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            offset: 0,
            limit: limit.max(1),
            search: None,
            status: None,
            authority: None,
        }
    }

    /// Changing a filter always returns to the first page
    pub fn set_search(&mut self, search: &str) {
        self.search = non_blank(search);
        self.offset = 0;
    }

    pub fn set_status(&mut self, status: Option<&str>) {
        self.status = status.and_then(non_blank);
        self.offset = 0;
    }

    pub fn set_authority(&mut self, authority: Option<&str>) {
        self.authority = authority.and_then(non_blank);
        self.offset = 0;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit.max(1);
        self.offset = 0;
    }

    pub fn next_page(&mut self) {
        self.offset = self.offset.saturating_add(self.limit);
    }

    pub fn previous_page(&mut self) {
        self.offset = self.offset.saturating_sub(self.limit);
    }

    pub fn is_first_page(&self) -> bool {
        self.offset == 0
    }

    /// One based page number for display
    pub fn page_number(&self) -> u32 {
        self.offset / self.limit + 1
    }

    /// Uses the total from the backend if known otherwise assumes there is
    /// another page when the current one was full
    pub fn has_next_page<T>(&self, page: &Page<T>) -> bool {
        match page.total {
            Some(total) => u64::from(self.offset) + (page.items.len() as u64) < total,
            None => page.items.len() as u64 >= u64::from(self.limit),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One page of results from a list endpoint
///
/// The backend may reply with either a bare array or an object with the rows
/// under `results`. Any other shape is treated as no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of rows matching the query if the backend reported it
    pub total: Option<u64>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: None,
        }
    }
}

impl<T: DeserializeOwned> Page<T> {
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::Array(_) => Ok(Self {
                items: serde_json::from_value(value)?,
                total: None,
            }),
            serde_json::Value::Object(mut map) => {
                let Some(results) = map.remove("results") else {
                    tracing::warn!("list response object without results");
                    return Ok(Self::default());
                };
                if !results.is_array() {
                    tracing::warn!("list response results is not an array");
                    return Ok(Self::default());
                }
                let total = map.get("count").and_then(serde_json::Value::as_u64);
                Ok(Self {
                    items: serde_json::from_value(results)?,
                    total,
                })
            }
            other => {
                tracing::warn!(?other, "unexpected list response shape");
                Ok(Self::default())
            }
        }
    }
}

impl<'de, T: DeserializeOwned> serde::Deserialize<'de> for Page<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Records that can be referred to from another record by id
pub trait Lookup {
    fn lookup_id(&self) -> DbId;
    fn lookup_label(&self) -> &str;
}

/// Finds the label of the record with `id` in a locally fetched list
pub fn lookup_name<T: Lookup>(items: &[T], id: Option<DbId>) -> &str {
    id.and_then(|id| items.iter().find(|x| x.lookup_id() == id))
        .map(Lookup::lookup_label)
        .unwrap_or(DISPLAY_NOT_AVAILABLE)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Row {
        id: u64,
    }

    #[rstest]
    #[case::bare(r#"[{"id": 1}, {"id": 2}]"#, vec![1, 2], None)]
    #[case::envelope(r#"{"count": 7, "next": null, "results": [{"id": 3}]}"#, vec![3], Some(7))]
    #[case::envelope_no_count(r#"{"results": []}"#, vec![], None)]
    #[case::other_object(r#"{"detail": "weird"}"#, vec![], None)]
    #[case::results_not_list(r#"{"results": 5}"#, vec![], None)]
    #[case::scalar("42", vec![], None)]
    #[case::null("null", vec![], None)]
    fn list_shapes(#[case] body: &str, #[case] ids: Vec<u64>, #[case] total: Option<u64>) {
        // Act
        let page: Page<Row> = serde_json::from_str(body).unwrap();

        // Assert
        assert_eq!(page.items.iter().map(|x| x.id).collect::<Vec<_>>(), ids);
        assert_eq!(page.total, total);
    }

    #[test]
    fn malformed_rows_are_an_error() {
        let actual: Result<Page<Row>, _> = serde_json::from_str(r#"[{"id": "x"}]"#);
        assert!(actual.is_err());
    }

    #[test]
    fn query_serializes_only_set_filters() {
        // Arrange
        let mut query = ListQuery::with_limit(20);
        query.set_search("  ABC-123 ");
        query.set_status(Some(""));

        // Act
        let actual = serde_json::to_value(&query).unwrap();

        // Assert
        assert_eq!(
            actual,
            serde_json::json!({"offset": 0, "limit": 20, "search": "ABC-123"})
        );
    }

    #[test]
    fn changing_filters_resets_to_first_page() {
        let mut query = ListQuery::with_limit(10);
        query.next_page();
        query.next_page();
        assert_eq!(query.page_number(), 3);
        query.set_status(Some("paid"));
        assert!(query.is_first_page());
        query.previous_page();
        assert_eq!(query.offset, 0);
    }

    #[rstest]
    #[case::known_more(0, 10, Some(25), true)]
    #[case::known_last(20, 5, Some(25), false)]
    #[case::unknown_full(0, 10, None, true)]
    #[case::unknown_partial(0, 3, None, false)]
    fn next_page_detection(
        #[case] offset: u32,
        #[case] rows: usize,
        #[case] total: Option<u64>,
        #[case] expected: bool,
    ) {
        let mut query = ListQuery::with_limit(10);
        query.offset = offset;
        let page = Page {
            items: vec![(); rows],
            total,
        };
        assert_eq!(query.has_next_page(&page), expected);
    }

    struct Named(u64, &'static str);

    impl Lookup for Named {
        fn lookup_id(&self) -> DbId {
            self.0.into()
        }

        fn lookup_label(&self) -> &str {
            self.1
        }
    }

    #[test]
    fn lookup_falls_back_to_not_available() {
        let items = [Named(1, "Car"), Named(2, "Bus")];
        assert_eq!(lookup_name(&items, Some(2.into())), "Bus");
        assert_eq!(lookup_name(&items, Some(9.into())), "N/A");
        assert_eq!(lookup_name(&items, None), "N/A");
    }
}
