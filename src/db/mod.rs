pub mod products;
pub mod roles;
pub mod shipping_addresses;
pub mod users;

/// Pagination and ordering for admin list queries.
#[derive(Debug, Clone)]
pub struct ListParams {
    pub limit: i64,
    pub offset: i64,
    pub sort_by: Option<String>,
    pub descending: bool,
}

impl ListParams {
    pub fn new(page: i64, per_page: i64) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        Self {
            limit: per_page,
            offset: (page - 1).saturating_mul(per_page),
            sort_by: None,
            descending: false,
        }
    }

    pub fn sorted(mut self, sort_by: Option<String>, descending: bool) -> Self {
        self.sort_by = sort_by;
        self.descending = descending;
        self
    }

    /// Build an `ORDER BY` body from a whitelist of `(key, column)` pairs.
    /// Unknown keys fall back to `default`. The id is appended so paging is stable.
    pub fn order_by(&self, allowed: &[(&str, &'static str)], default: &'static str, id_column: &str) -> String {
        let column = self
            .sort_by
            .as_deref()
            .and_then(|key| allowed.iter().find(|(k, _)| *k == key).map(|(_, c)| *c))
            .unwrap_or(default);
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("{column} {direction}, {id_column} ASC")
    }
}
