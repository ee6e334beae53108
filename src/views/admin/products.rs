use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AdminUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Product, ProductInput, User};
use crate::services;
use crate::state::SharedState;
use crate::views::admin::{
    back_to_list, delete_rejected, form_rejected, not_found, parse_choice, Column, Field,
    FormTemplate, ListPage, ListQuery, ListTemplate, Row, SelectOption,
};
use crate::views::render;

pub const ENTITY: &str = "product";
pub const TITLE: &str = "Products";

const COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::sortable("color", "Color"),
    Column::sortable("weight", "Weight"),
    Column::sortable("price", "Price"),
    Column::sortable("created_at", "Created at"),
    Column::sortable("owner", "User"),
    Column::plain("Shipping address"),
];

#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub user_id: String,
}

impl TryFrom<ProductForm> for ProductInput {
    type Error = AppError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        Ok(ProductInput {
            user_id: parse_choice("User", &form.user_id)?,
            name: form.name,
            color: form.color,
            weight: form.weight,
            price: form.price,
        })
    }
}

fn fields(form: &ProductForm, users: &[User]) -> Vec<Field> {
    let owners = users
        .iter()
        .map(|user| {
            let value = user.id.to_string();
            SelectOption {
                selected: value == form.user_id,
                label: user.to_string(),
                value,
            }
        })
        .collect();

    vec![
        Field::text("name", "Name", &form.name, 255, true),
        Field::text("color", "Color", &form.color, 100, true),
        Field::text("weight", "Weight", &form.weight, 100, true),
        Field::text("price", "Price", &form.price, 100, true),
        Field::select("user_id", "User", owners),
    ]
}

fn form_from(product: &Product) -> ProductForm {
    ProductForm {
        name: product.name.clone(),
        color: product.color.clone(),
        weight: product.weight.clone(),
        price: product.price.clone(),
        user_id: product.user_id.to_string(),
    }
}

async fn build_list(
    state: &SharedState,
    current_email: String,
    query: &ListQuery,
) -> Result<ListTemplate, AppError> {
    let params = query.params(state.config.page_size);
    let products = db::products::list(&state.pool, &params).await?;
    let total = db::products::count(&state.pool).await?;

    let rows = products
        .into_iter()
        .map(|p| Row {
            id: p.id.to_string(),
            cells: vec![
                p.name,
                p.color,
                p.weight,
                p.price,
                p.created_at.format("%Y-%m-%d %H:%M").to_string(),
                p.owner_email,
                if p.shipping_address_id.is_some() { "yes" } else { "" }.to_string(),
            ],
        })
        .collect();

    let page = ListPage {
        entity: ENTITY,
        title: TITLE,
        columns: COLUMNS,
        rows,
        total,
        per_page: state.config.page_size,
        carry: Vec::new(),
    };
    Ok(page.into_template(current_email, query))
}

pub async fn list(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    render(&build_list(&state, admin.email, &query).await?)
}

pub async fn new_form(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let users = db::users::list_all(&state.pool).await?;
    render(&FormTemplate::create(
        admin.email,
        ENTITY,
        TITLE,
        fields(&ProductForm::default(), &users),
    ))
}

pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let users = db::users::list_all(&state.pool).await?;
    let page = FormTemplate::create(admin.email, ENTITY, TITLE, fields(&form, &users));

    let saved = match ProductInput::try_from(form) {
        Ok(input) => services::products::save(&state, None, input).await,
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
    let product = db::products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Product"))?;
    let users = db::users::list_all(&state.pool).await?;

    render(&FormTemplate::edit(
        admin.email,
        ENTITY,
        TITLE,
        &id,
        fields(&form_from(&product), &users),
    ))
}

pub async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Form(form): Form<ProductForm>,
) -> Result<Response, AppError> {
    let users = db::users::list_all(&state.pool).await?;
    let page = FormTemplate::edit(admin.email, ENTITY, TITLE, &id, fields(&form, &users));

    let saved = match ProductInput::try_from(form) {
        Ok(input) => services::products::save(&state, Some(id), input).await,
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
    match services::products::remove(&state, id).await {
        Ok(()) => Ok(back_to_list(ENTITY)),
        Err(e) => {
            let list = build_list(&state, admin.email, &ListQuery::default()).await?;
            delete_rejected(e, list)
        }
    }
}
