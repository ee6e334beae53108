use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AdminUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Product, ShippingAddress, ShippingAddressInput};
use crate::search::{AddressColumn, AddressQuery, AddressSearchParams, FilterOp};
use crate::services;
use crate::state::SharedState;
use crate::views::admin::{
    back_to_list, delete_rejected, form_rejected, not_found, parse_choice, Column, Field,
    FilterView, FormTemplate, ListPage, ListQuery, ListTemplate, Row, SelectOption,
};
use crate::views::render;

pub const ENTITY: &str = "shippingaddress";
pub const TITLE: &str = "Shipping addresses";

const COLUMNS: &[Column] = &[
    Column::sortable("country", "Country"),
    Column::sortable("city", "City"),
    Column::sortable("street", "Street"),
    Column::sortable("building", "Building"),
    Column::sortable("product", "Product"),
];

#[derive(Debug, Default, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub product_id: String,
}

impl TryFrom<AddressForm> for ShippingAddressInput {
    type Error = AppError;

    fn try_from(form: AddressForm) -> Result<Self, Self::Error> {
        Ok(ShippingAddressInput {
            product_id: parse_choice("Product", &form.product_id)?,
            country: form.country,
            city: form.city,
            street: form.street,
            building: form.building,
        })
    }
}

fn fields(form: &AddressForm, products: &[Product]) -> Vec<Field> {
    let options = products
        .iter()
        .map(|product| {
            let value = product.id.to_string();
            SelectOption {
                selected: value == form.product_id,
                label: product.to_string(),
                value,
            }
        })
        .collect();

    vec![
        Field::text("country", "Country", &form.country, 100, true),
        Field::text("city", "City", &form.city, 100, true),
        Field::text("street", "Street", &form.street, 100, true),
        Field::text("building", "Building", &form.building, 100, true),
        Field::select("product_id", "Product", options),
    ]
}

fn form_from(address: &ShippingAddress) -> AddressForm {
    AddressForm {
        country: address.country.clone(),
        city: address.city.clone(),
        street: address.street.clone(),
        building: address.building.clone(),
        product_id: address.product_id.to_string(),
    }
}

/// Search and filter pairs to keep on pagination and sort links.
fn carried_pairs(search: &AddressQuery) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Some(term) = &search.search {
        pairs.push(("search".to_string(), term.clone()));
    }
    for filter in &search.filters {
        pairs.push((format!("flt_{}", filter.column.key()), filter.value.clone()));
        pairs.push((format!("op_{}", filter.column.key()), filter.op.key().to_string()));
    }
    pairs
}

fn filter_views(search: &AddressQuery) -> Vec<FilterView> {
    AddressColumn::ALL
        .into_iter()
        .map(|column| {
            let active = search.filters.iter().find(|f| f.column == column);
            let current = active.map(|f| f.op).unwrap_or(FilterOp::Contains);
            FilterView {
                key: column.key(),
                label: column.label(),
                value: active.map(|f| f.value.clone()).unwrap_or_default(),
                ops: FilterOp::ALL
                    .into_iter()
                    .map(|op| SelectOption {
                        value: op.key().to_string(),
                        label: op.label().to_string(),
                        selected: op == current,
                    })
                    .collect(),
            }
        })
        .collect()
}

async fn build_list(
    state: &SharedState,
    current_email: String,
    query: &ListQuery,
    search: &AddressQuery,
) -> Result<ListTemplate, AppError> {
    let params = query.params(state.config.page_size);
    let addresses = db::shipping_addresses::list(&state.pool, search, &params).await?;
    let total = db::shipping_addresses::count(&state.pool, search).await?;

    let rows = addresses
        .into_iter()
        .map(|a| {
            let product = a.product_label();
            Row {
                id: a.id.to_string(),
                cells: vec![a.country, a.city, a.street, a.building, product],
            }
        })
        .collect();

    let page = ListPage {
        entity: ENTITY,
        title: TITLE,
        columns: COLUMNS,
        rows,
        total,
        per_page: state.config.page_size,
        carry: carried_pairs(search),
    };

    let mut template = page.into_template(current_email, query);
    template.searchable = true;
    template.search = search.search.clone().unwrap_or_default();
    template.filters = filter_views(search);
    Ok(template)
}

pub async fn list(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
    Query(search): Query<AddressSearchParams>,
) -> Result<impl IntoResponse, AppError> {
    let search = AddressQuery::from_params(&search)?;
    render(&build_list(&state, admin.email, &query, &search).await?)
}

pub async fn new_form(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let products = db::products::list_all(&state.pool).await?;
    render(&FormTemplate::create(
        admin.email,
        ENTITY,
        TITLE,
        fields(&AddressForm::default(), &products),
    ))
}

pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Form(form): Form<AddressForm>,
) -> Result<Response, AppError> {
    let products = db::products::list_all(&state.pool).await?;
    let page = FormTemplate::create(admin.email, ENTITY, TITLE, fields(&form, &products));

    let saved = match ShippingAddressInput::try_from(form) {
        Ok(input) => services::shipping_addresses::save(&state, None, input).await,
        Err(e) => Err(e),
    };
    match saved {
        Ok(_) => Ok(back_to_list(ENTITY)),
        Err(e) => form_rejected(e, page),
    }
}

pub async fn edit_form(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let address = db::shipping_addresses::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Shipping address"))?;
    let products = db::products::list_all(&state.pool).await?;

    render(&FormTemplate::edit(
        admin.email,
        ENTITY,
        TITLE,
        &id,
        fields(&form_from(&address), &products),
    ))
}

pub async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Form(form): Form<AddressForm>,
) -> Result<Response, AppError> {
    let products = db::products::list_all(&state.pool).await?;
    let page = FormTemplate::edit(admin.email, ENTITY, TITLE, &id, fields(&form, &products));

    let saved = match ShippingAddressInput::try_from(form) {
        Ok(input) => services::shipping_addresses::save(&state, Some(id), input).await,
        Err(e) => Err(e),
    };
    match saved {
        Ok(_) => Ok(back_to_list(ENTITY)),
        Err(e) => form_rejected(e, page),
    }
}

pub async fn delete(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    match services::shipping_addresses::remove(&state, id).await {
        Ok(()) => Ok(back_to_list(ENTITY)),
        Err(e) => {
            let list =
                build_list(&state, admin.email, &ListQuery::default(), &AddressQuery::default())
                    .await?;
            delete_rejected(e, list)
        }
    }
}
