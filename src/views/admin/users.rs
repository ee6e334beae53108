use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AdminUser;
use crate::db;
use crate::error::AppError;
use crate::models::{Role, UserInput, UserSummary};
use crate::services;
use crate::state::SharedState;
use crate::validation;
use crate::views::admin::{
    back_to_list, delete_rejected, form_rejected, not_found, Column, Field, FormTemplate,
    ListPage, ListQuery, ListTemplate, Row, SelectOption,
};
use crate::views::render;

pub const ENTITY: &str = "user";
pub const TITLE: &str = "Users";

const COLUMNS: &[Column] = &[
    Column::sortable("email", "Email"),
    Column::sortable("active", "Active"),
    Column::sortable("confirmed_at", "Confirmed at"),
    Column::plain("Roles"),
    Column::plain("Products"),
];

const DATETIME_LOCAL: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub active: Option<String>,
    #[serde(default)]
    pub confirmed_at: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserForm {
    fn blank() -> Self {
        UserForm {
            active: Some("y".to_string()),
            ..Default::default()
        }
    }
}

impl TryFrom<UserForm> for UserInput {
    type Error = AppError;

    fn try_from(form: UserForm) -> Result<Self, Self::Error> {
        Ok(UserInput {
            email: form.email,
            password: Some(form.password).filter(|p| !p.is_empty()),
            active: form.active.is_some(),
            confirmed_at: validation::datetime_local("Confirmed at", &form.confirmed_at)?,
            roles: form.roles,
        })
    }
}

fn fields(form: &UserForm, roles: &[Role], creating: bool) -> Vec<Field> {
    let role_options = roles
        .iter()
        .map(|role| SelectOption {
            value: role.name.clone(),
            label: role.to_string(),
            selected: form.roles.contains(&role.name),
        })
        .collect();

    let password = if creating {
        Field::password("password", "Password", true)
    } else {
        Field::password("password", "Password", false).with_help("Leave blank to keep the current password")
    };

    vec![
        Field::email("email", "Email", &form.email),
        password,
        Field::checkbox("active", "Active", form.active.is_some()),
        Field::datetime("confirmed_at", "Confirmed at", &form.confirmed_at).with_help("UTC"),
        Field::checkboxes("roles", "Roles", role_options),
    ]
}

fn form_from(user: &UserSummary) -> UserForm {
    UserForm {
        email: user.email.clone(),
        password: String::new(),
        active: user.active.then(|| "y".to_string()),
        confirmed_at: user
            .confirmed_at
            .map(|t| t.format(DATETIME_LOCAL).to_string())
            .unwrap_or_default(),
        roles: user.roles.clone(),
    }
}

async fn build_list(
    state: &SharedState,
    current_email: String,
    query: &ListQuery,
) -> Result<ListTemplate, AppError> {
    let params = query.params(state.config.page_size);
    let users = db::users::list(&state.pool, &params).await?;
    let total = db::users::count_all(&state.pool).await?;

    let rows = users
        .into_iter()
        .map(|user| Row {
            id: user.id.to_string(),
            cells: vec![
                user.email,
                if user.active { "yes" } else { "no" }.to_string(),
                user.confirmed_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
                user.roles.join(", "),
                user.product_count.to_string(),
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
    let roles = db::roles::list_all(&state.pool).await?;
    render(&FormTemplate::create(
        admin.email,
        ENTITY,
        TITLE,
        fields(&UserForm::blank(), &roles, true),
    ))
}

pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    let roles = db::roles::list_all(&state.pool).await?;
    let page = FormTemplate::create(admin.email, ENTITY, TITLE, fields(&form, &roles, true));

    let saved = match UserInput::try_from(form) {
        Ok(input) => services::users::save(&state, None, input).await,
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
    let user = db::users::find_summary(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("User"))?;
    let roles = db::roles::list_all(&state.pool).await?;

    render(&FormTemplate::edit(
        admin.email,
        ENTITY,
        TITLE,
        &id,
        fields(&form_from(&user), &roles, false),
    ))
}

pub async fn update(
    AdminUser(admin): AdminUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Form(form): Form<UserForm>,
) -> Result<Response, AppError> {
    let roles = db::roles::list_all(&state.pool).await?;
    let page = FormTemplate::edit(admin.email, ENTITY, TITLE, &id, fields(&form, &roles, false));

    let saved = match UserInput::try_from(form) {
        Ok(input) => services::users::save(&state, Some(id), input).await,
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
    match services::users::remove(&state, admin.user_id, id).await {
        Ok(()) => Ok(back_to_list(ENTITY)),
        Err(e) => {
            let list = build_list(&state, admin.email, &ListQuery::default()).await?;
            delete_rejected(e, list)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchecked_box_means_inactive_and_blank_password_is_none() {
        let form = UserForm {
            email: "clerk@shop.example".to_string(),
            password: String::new(),
            active: None,
            confirmed_at: "2024-02-03T04:05".to_string(),
            roles: vec!["superuser".to_string()],
        };
        let input = UserInput::try_from(form).unwrap();
        assert!(!input.active);
        assert!(input.password.is_none());
        assert!(input.confirmed_at.is_some());
        assert_eq!(input.roles, vec!["superuser".to_string()]);
    }

    #[test]
    fn bad_confirmation_time_is_rejected() {
        let form = UserForm {
            confirmed_at: "soon".to_string(),
            ..UserForm::blank()
        };
        assert!(matches!(UserInput::try_from(form), Err(AppError::BadRequest(_))));
    }
}
