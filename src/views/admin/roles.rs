use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AdminUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Role, RoleInput};
use crate::services;
use crate::state::SharedState;
use crate::views::admin::{
    back_to_list, delete_rejected, form_rejected, not_found, Column, Field, FormTemplate,
    ListPage, ListQuery, ListTemplate, Row,
};
use crate::views::render;

pub const ENTITY: &str = "role";
pub const TITLE: &str = "Roles";

const COLUMNS: &[Column] = &[
    Column::sortable("name", "Name"),
    Column::sortable("description", "Description"),
];

#[derive(Debug, Default, Deserialize)]
pub struct RoleForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl From<RoleForm> for RoleInput {
    fn from(form: RoleForm) -> Self {
        RoleInput {
            name: form.name,
            description: Some(form.description),
        }
    }
}

fn fields(form: &RoleForm) -> Vec<Field> {
    vec![
        Field::text("name", "Name", &form.name, 80, true),
        Field::text("description", "Description", &form.description, 255, false),
    ]
}

fn form_from(role: &Role) -> RoleForm {
    RoleForm {
        name: role.name.clone(),
        description: role.description.clone().unwrap_or_default(),
    }
}

async fn build_list(
    state: &SharedState,
    current_email: String,
    query: &ListQuery,
) -> Result<ListTemplate, AppError> {
    let params = query.params(state.config.page_size);
    let roles = db::roles::list(&state.pool, &params).await?;
    let total = db::roles::count(&state.pool).await?;

    let rows = roles
        .into_iter()
        .map(|role| Row {
            id: role.id.to_string(),
            cells: vec![role.name, role.description.unwrap_or_default()],
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

pub async fn new_form(AdminUser(admin): AdminUser) -> Result<impl IntoResponse, AppError> {
    render(&FormTemplate::create(
        admin.email,
        ENTITY,
        TITLE,
        fields(&RoleForm::default()),
    ))
}

pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Form(form): Form<RoleForm>,
) -> Result<Response, AppError> {
    let page = FormTemplate::create(admin.email, ENTITY, TITLE, fields(&form));

    match services::roles::save(&state, None, form.into()).await {
        Ok(_) => Ok(back_to_list(ENTITY)),
        Err(e) => form_rejected(e, page),
    }
}

pub async fn edit_form(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let role = db::roles::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Role"))?;

    render(&FormTemplate::edit(
        admin.email,
        ENTITY,
        TITLE,
        &id,
        fields(&form_from(&role)),
    ))
}

pub async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Form(form): Form<RoleForm>,
) -> Result<Response, AppError> {
    let page = FormTemplate::edit(admin.email, ENTITY, TITLE, &id, fields(&form));

    match services::roles::save(&state, Some(id), form.into()).await {
        Ok(_) => Ok(back_to_list(ENTITY)),
        Err(e) => form_rejected(e, page),
    }
}

pub async fn delete(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    match services::roles::remove(&state, id).await {
        Ok(()) => Ok(back_to_list(ENTITY)),
        Err(e) => {
            let list = build_list(&state, admin.email, &ListQuery::default()).await?;
            delete_rejected(e, list)
        }
    }
}
