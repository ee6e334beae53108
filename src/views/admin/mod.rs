//! Generic CRUD pages over the four models.
//!
//! Each model module builds its rows and form fields; the list and form
//! templates here are shared.

pub mod products;
pub mod roles;
pub mod shipping_addresses;
pub mod users;

use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::auth::extractor::AdminUser;
use crate::db::{self, ListParams};
use crate::error::AppError;
use crate::search::AddressQuery;
use crate::state::SharedState;
use crate::views::render;

#[derive(Template)]
#[template(path = "admin/index.html")]
struct IndexTemplate {
    current_email: String,
    entity: &'static str,
    cards: Vec<Card>,
}

struct Card {
    slug: &'static str,
    title: &'static str,
    count: i64,
}

pub async fn index(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let cards = vec![
        Card {
            slug: roles::ENTITY,
            title: roles::TITLE,
            count: db::roles::count(&state.pool).await?,
        },
        Card {
            slug: users::ENTITY,
            title: users::TITLE,
            count: db::users::count_all(&state.pool).await?,
        },
        Card {
            slug: products::ENTITY,
            title: products::TITLE,
            count: db::products::count(&state.pool).await?,
        },
        Card {
            slug: shipping_addresses::ENTITY,
            title: shipping_addresses::TITLE,
            count: db::shipping_addresses::count(&state.pool, &AddressQuery::default()).await?,
        },
    ];

    render(&IndexTemplate {
        current_email: admin.email,
        entity: "",
        cards,
    })
}

// ── Lists ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub sort: Option<String>,
    pub desc: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn descending(&self) -> bool {
        matches!(self.desc.as_deref(), Some("1" | "true" | "y"))
    }

    pub fn params(&self, per_page: i64) -> ListParams {
        ListParams::new(self.page(), per_page).sorted(self.sort.clone(), self.descending())
    }
}

/// A list column: the sort key (if sortable) and its header.
pub struct Column {
    pub sort_key: Option<&'static str>,
    pub label: &'static str,
}

impl Column {
    pub const fn sortable(key: &'static str, label: &'static str) -> Self {
        Self {
            sort_key: Some(key),
            label,
        }
    }

    pub const fn plain(label: &'static str) -> Self {
        Self {
            sort_key: None,
            label,
        }
    }
}

pub struct ColumnView {
    pub label: &'static str,
    pub sort_href: Option<String>,
    pub sorted: bool,
    pub arrow: &'static str,
}

pub struct Row {
    pub id: String,
    pub cells: Vec<String>,
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

pub struct FilterView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub ops: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "admin/list.html")]
pub struct ListTemplate {
    pub current_email: String,
    pub entity: &'static str,
    pub title: &'static str,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<Row>,
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub searchable: bool,
    pub search: String,
    pub filters: Vec<FilterView>,
    pub notice: Option<String>,
}

/// Everything a model module hands over to get a list page.
pub struct ListPage {
    pub entity: &'static str,
    pub title: &'static str,
    pub columns: &'static [Column],
    pub rows: Vec<Row>,
    pub total: i64,
    pub per_page: i64,
    /// Query pairs (search, filters) every generated link must keep.
    pub carry: Vec<(String, String)>,
}

impl ListPage {
    pub fn into_template(self, current_email: String, query: &ListQuery) -> ListTemplate {
        let page = query.page();
        let total_pages = ((self.total + self.per_page - 1) / self.per_page).max(1);
        let sort = query.sort.as_deref();
        let descending = query.descending();
        let base = format!("/admin/{}/", self.entity);

        let columns = self
            .columns
            .iter()
            .map(|column| {
                let sorted = column.sort_key.is_some() && column.sort_key == sort;
                let sort_href = column.sort_key.map(|key| {
                    let mut pairs = vec![("sort".to_string(), key.to_string())];
                    if sorted && !descending {
                        pairs.push(("desc".to_string(), "1".to_string()));
                    }
                    pairs.extend(self.carry.iter().cloned());
                    href(&base, &pairs)
                });
                ColumnView {
                    label: column.label,
                    sort_href,
                    sorted,
                    arrow: if descending { "▼" } else { "▲" },
                }
            })
            .collect();

        let page_href = |n: i64| {
            let mut pairs = vec![("page".to_string(), n.to_string())];
            if let Some(key) = sort {
                pairs.push(("sort".to_string(), key.to_string()));
            }
            if descending {
                pairs.push(("desc".to_string(), "1".to_string()));
            }
            pairs.extend(self.carry.iter().cloned());
            href(&base, &pairs)
        };

        ListTemplate {
            current_email,
            entity: self.entity,
            title: self.title,
            columns,
            rows: self.rows,
            total: self.total,
            page,
            total_pages,
            prev_href: (page > 1).then(|| page_href(page - 1)),
            next_href: (page < total_pages).then(|| page_href(page + 1)),
            searchable: false,
            search: String::new(),
            filters: Vec::new(),
            notice: None,
        }
    }
}

fn href(base: &str, pairs: &[(String, String)]) -> String {
    if pairs.is_empty() {
        return base.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish();
    format!("{base}?{query}")
}

// ── Forms ───────────────────────────────────────────────────────

pub struct Field {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub value: String,
    pub required: bool,
    pub max_length: usize,
    pub checked: bool,
    pub options: Vec<SelectOption>,
    pub help: Option<&'static str>,
}

impl Field {
    fn base(name: &'static str, label: &'static str, kind: &'static str) -> Self {
        Self {
            name,
            label,
            kind,
            value: String::new(),
            required: false,
            max_length: 0,
            checked: false,
            options: Vec::new(),
            help: None,
        }
    }

    pub fn text(name: &'static str, label: &'static str, value: &str, max_length: usize, required: bool) -> Self {
        Self {
            value: value.to_string(),
            required,
            max_length,
            ..Self::base(name, label, "text")
        }
    }

    pub fn email(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            value: value.to_string(),
            required: true,
            max_length: 255,
            ..Self::base(name, label, "email")
        }
    }

    pub fn password(name: &'static str, label: &'static str, required: bool) -> Self {
        Self {
            required,
            ..Self::base(name, label, "password")
        }
    }

    pub fn checkbox(name: &'static str, label: &'static str, checked: bool) -> Self {
        Self {
            checked,
            ..Self::base(name, label, "checkbox")
        }
    }

    pub fn datetime(name: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            value: value.to_string(),
            ..Self::base(name, label, "datetime-local")
        }
    }

    pub fn select(name: &'static str, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            required: true,
            options,
            ..Self::base(name, label, "select")
        }
    }

    pub fn checkboxes(name: &'static str, label: &'static str, options: Vec<SelectOption>) -> Self {
        Self {
            options,
            ..Self::base(name, label, "checkboxes")
        }
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

#[derive(Template)]
#[template(path = "admin/form.html")]
pub struct FormTemplate {
    pub current_email: String,
    pub entity: &'static str,
    pub heading: String,
    pub action: String,
    pub fields: Vec<Field>,
    pub error: Option<String>,
}

impl FormTemplate {
    pub fn create(current_email: String, entity: &'static str, title: &str, fields: Vec<Field>) -> Self {
        Self {
            current_email,
            entity,
            heading: format!("{title}: create"),
            action: format!("/admin/{entity}/new"),
            fields,
            error: None,
        }
    }

    pub fn edit(
        current_email: String,
        entity: &'static str,
        title: &str,
        id: &uuid::Uuid,
        fields: Vec<Field>,
    ) -> Self {
        Self {
            current_email,
            entity,
            heading: format!("{title}: edit"),
            action: format!("/admin/{entity}/{id}/edit"),
            fields,
            error: None,
        }
    }
}

/// After a failed submit: validation and constraint errors re-render the
/// form with the message and the matching status; anything else propagates.
pub fn form_rejected(err: AppError, mut form: FormTemplate) -> Result<Response, AppError> {
    match err {
        AppError::BadRequest(_) | AppError::Conflict(_) => {
            let status = err.status();
            form.error = Some(err.public_message());
            Ok((status, render(&form)?).into_response())
        }
        other => Err(other),
    }
}

/// A refused delete shows the list again with the reason.
pub fn delete_rejected(err: AppError, mut list: ListTemplate) -> Result<Response, AppError> {
    match err {
        AppError::BadRequest(_) | AppError::Conflict(_) => {
            let status = err.status();
            list.notice = Some(err.public_message());
            Ok((status, render(&list)?).into_response())
        }
        other => Err(other),
    }
}

pub fn back_to_list(entity: &str) -> Response {
    Redirect::to(&format!("/admin/{entity}/")).into_response()
}

/// Parse a select box value; blank means nothing was chosen.
pub fn parse_choice(label: &str, value: &str) -> Result<uuid::Uuid, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{label} is required")));
    }
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{label} is not a valid choice")))
}

pub(crate) use crate::services::not_found;
