mod common;

use reqwest::StatusCode;
use serde_json::json;

// ── Roles ───────────────────────────────────────────────────────

#[tokio::test]
async fn role_crud_via_api() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (role, status) = app
        .post_auth(
            "/api/v1/admin/roles",
            &token,
            &json!({ "name": "  editor ", "description": "Edits products" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(role["name"], "editor");
    let id = role["id"].as_str().unwrap();

    let (list, status) = app.get_auth("/api/v1/admin/roles?sort=name", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 2);
    assert_eq!(list["items"][0]["name"], "editor");
    assert_eq!(list["items"][1]["name"], "superuser");

    let (updated, status) = app
        .put_auth(
            &format!("/api/v1/admin/roles/{id}"),
            &token,
            &json!({ "name": "writer" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "writer");
    assert!(updated["description"].is_null());

    let (body, status) = app.delete_auth(&format!("/api/v1/admin/roles/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Deleted");

    let (_, status) = app.get_auth(&format!("/api/v1/admin/roles/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn duplicate_role_name_conflicts() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (_, status) = app
        .post_auth("/api/v1/admin/roles", &token, &json!({ "name": "superuser" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, status) = app
        .post_auth("/api/v1/admin/roles", &token, &json!({ "name": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn deleting_a_role_unlinks_its_users() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (role, _) = app
        .post_auth("/api/v1/admin/roles", &token, &json!({ "name": "editor" }))
        .await;
    let user = app.create_user(&token, "ed@shop.test", true, &["editor"]).await;
    assert_eq!(user["roles"], json!(["editor"]));

    let (_, status) = app
        .delete_auth(&format!("/api/v1/admin/roles/{}", role["id"].as_str().unwrap()), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (user, _) = app
        .get_auth(&format!("/api/v1/admin/users/{}", user["id"].as_str().unwrap()), &token)
        .await;
    assert_eq!(user["roles"], json!([]));

    common::cleanup(app).await;
}

// ── Users ───────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    app.create_user(&token, "clerk@shop.test", true, &[]).await;

    let (body, status) = app
        .post_auth(
            "/api/v1/admin/users",
            &token,
            &json!({ "email": "CLERK@shop.test", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn user_create_validates_input() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (_, status) = app
        .post_auth("/api/v1/admin/users", &token, &json!({ "email": "new@shop.test" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "password is required on create");

    let (_, status) = app
        .post_auth(
            "/api/v1/admin/users",
            &token,
            &json!({ "email": "new@shop.test", "password": "password123", "roles": ["nope"] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unknown role");

    // The failed write left nothing behind.
    let (list, _) = app.get_auth("/api/v1/admin/users", &token).await;
    assert_eq!(list["total"], 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn user_update_keeps_password_when_blank() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let user = app.create_user(&token, "clerk@shop.test", true, &[]).await;
    let id = user["id"].as_str().unwrap();

    let (updated, status) = app
        .put_auth(
            &format!("/api/v1/admin/users/{id}"),
            &token,
            &json!({
                "email": "clerk2@shop.test",
                "confirmed_at": "2024-05-01T10:30:00Z",
                "roles": ["superuser"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "clerk2@shop.test");
    assert_eq!(updated["roles"], json!(["superuser"]));
    assert!(updated["confirmed_at"].as_str().unwrap().starts_with("2024-05-01T10:30:00"));

    let (_, status) = app.login("clerk2@shop.test", "password123").await;
    assert_eq!(status, StatusCode::OK);

    common::cleanup(app).await;
}

#[tokio::test]
async fn user_delete_blocked_while_owning_products() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let user = app.create_user(&token, "seller@shop.test", true, &[]).await;
    let user_id = user["id"].as_str().unwrap();
    let product = app.create_product(&token, "Lamp", user_id).await;

    let (body, status) = app
        .delete_auth(&format!("/api/v1/admin/users/{user_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("owns products"));

    let (_, status) = app
        .delete_auth(
            &format!("/api/v1/admin/products/{}", product["id"].as_str().unwrap()),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, status) = app
        .delete_auth(&format!("/api/v1/admin/users/{user_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    common::cleanup(app).await;
}

#[tokio::test]
async fn admin_cannot_delete_themselves() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let admin_id = app.admin_id().await;

    let (_, status) = app
        .delete_auth(&format!("/api/v1/admin/users/{admin_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

// ── Products & shipping addresses ───────────────────────────────

#[tokio::test]
async fn product_requires_existing_owner() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (_, status) = app
        .post_auth(
            "/api/v1/admin/products",
            &token,
            &json!({
                "name": "Lamp",
                "color": "red",
                "weight": "1kg",
                "price": "9.99",
                "user_id": uuid::Uuid::now_v7(),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn product_listing_shows_owner_and_address() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let owner = app.admin_id().await;
    let product = app.create_product(&token, "Lamp", &owner).await;
    assert_eq!(product["owner_email"], common::ADMIN_EMAIL);
    assert!(product["shipping_address_id"].is_null());
    assert!(product["created_at"].is_string());

    let address = app
        .create_address(&token, product["id"].as_str().unwrap(), "France", "Paris")
        .await;
    assert_eq!(address["product_name"], "Lamp");

    let (product, _) = app
        .get_auth(&format!("/api/v1/admin/products/{}", product["id"].as_str().unwrap()), &token)
        .await;
    assert_eq!(product["shipping_address_id"], address["id"]);

    common::cleanup(app).await;
}

#[tokio::test]
async fn product_delete_blocked_while_address_exists() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let owner = app.admin_id().await;
    let product = app.create_product(&token, "Lamp", &owner).await;
    let product_id = product["id"].as_str().unwrap();
    let address = app.create_address(&token, product_id, "France", "Paris").await;

    let (body, status) = app
        .delete_auth(&format!("/api/v1/admin/products/{product_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("shipping address"));

    let (_, status) = app
        .delete_auth(
            &format!("/api/v1/admin/shipping-addresses/{}", address["id"].as_str().unwrap()),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, status) = app
        .delete_auth(&format!("/api/v1/admin/products/{product_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    common::cleanup(app).await;
}

#[tokio::test]
async fn one_address_per_product() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let owner = app.admin_id().await;
    let product = app.create_product(&token, "Lamp", &owner).await;
    let product_id = product["id"].as_str().unwrap();
    app.create_address(&token, product_id, "France", "Paris").await;

    let (body, status) = app
        .post_auth(
            "/api/v1/admin/shipping-addresses",
            &token,
            &json!({
                "country": "Spain",
                "city": "Madrid",
                "street": "Gran Via",
                "building": "2",
                "product_id": product_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "This product already has a shipping address");

    common::cleanup(app).await;
}

#[tokio::test]
async fn address_search_and_filters() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let owner = app.admin_id().await;

    for (name, country, city) in [
        ("Lamp", "France", "Paris"),
        ("Desk", "France", "Lyon"),
        ("Chair", "Spain", "Madrid"),
    ] {
        let product = app.create_product(&token, name, &owner).await;
        app.create_address(&token, product["id"].as_str().unwrap(), country, city)
            .await;
    }

    let (list, status) = app
        .get_auth("/api/v1/admin/shipping-addresses?search=fran", &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 2);

    let (list, _) = app
        .get_auth(
            "/api/v1/admin/shipping-addresses?flt_country=France&op_country=not_equals",
            &token,
        )
        .await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["items"][0]["city"], "Madrid");

    let (list, _) = app
        .get_auth(
            "/api/v1/admin/shipping-addresses?search=france&flt_city=ly&sort=city",
            &token,
        )
        .await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["items"][0]["product_name"], "Desk");

    let (_, status) = app
        .get_auth("/api/v1/admin/shipping-addresses?flt_city=x&op_city=like", &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

// ── HTML admin ──────────────────────────────────────────────────

#[tokio::test]
async fn html_role_create_and_edit() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let page = app.get_page("/admin/role/new", Some(&token)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains(r#"name="name""#));

    let page = app
        .post_form(
            "/admin/role/new",
            Some(&token),
            &[("name", "editor"), ("description", "Edits things")],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some("/admin/role/"));

    let page = app.get_page("/admin/role/", Some(&token)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("editor"));
    assert!(page.body.contains("Edits things"));

    // Duplicate name re-renders the form with the message.
    let page = app
        .post_form("/admin/role/new", Some(&token), &[("name", "editor")])
        .await;
    assert_eq!(page.status, StatusCode::CONFLICT);
    assert!(page.body.contains("already exists"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn html_user_form_assigns_roles() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    app.post_auth("/api/v1/admin/roles", &token, &json!({ "name": "editor" }))
        .await;

    let page = app
        .post_form(
            "/admin/user/new",
            Some(&token),
            &[
                ("email", "clerk@shop.test"),
                ("password", "password123"),
                ("active", "y"),
                ("confirmed_at", "2024-05-01T10:30"),
                ("roles", "editor"),
                ("roles", "superuser"),
            ],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);

    let (list, _) = app.get_auth("/api/v1/admin/users?sort=email", &token).await;
    let clerk = &list["items"][1];
    assert_eq!(clerk["email"], "clerk@shop.test");
    assert_eq!(clerk["active"], true);
    assert_eq!(clerk["roles"], json!(["editor", "superuser"]));

    // Short password is a validation error, not a server error.
    let page = app
        .post_form(
            "/admin/user/new",
            Some(&token),
            &[("email", "other@shop.test"), ("password", "short")],
        )
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("at least 8"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn html_product_delete_conflict_shows_notice() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let owner = app.admin_id().await;
    let product = app.create_product(&token, "Lamp", &owner).await;
    let product_id = product["id"].as_str().unwrap();
    app.create_address(&token, product_id, "France", "Paris").await;

    let page = app
        .post_form(&format!("/admin/product/{product_id}/delete"), Some(&token), &[])
        .await;
    assert_eq!(page.status, StatusCode::CONFLICT);
    assert!(page.body.contains("delete the address first"));
    assert!(page.body.contains("Lamp"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn html_address_list_filters_and_keeps_query_in_links() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let owner = app.admin_id().await;

    for (name, city) in [("Lamp", "Paris"), ("Desk", "Lyon")] {
        let product = app.create_product(&token, name, &owner).await;
        app.create_address(&token, product["id"].as_str().unwrap(), "France", city)
            .await;
    }

    let page = app
        .get_page("/admin/shippingaddress/?flt_city=Lyon&op_city=equals", Some(&token))
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Lyon"));
    assert!(!page.body.contains("Paris"));
    assert!(page.body.contains("Desk: red, 1kg (9.99)"));
    // Sort links carry the active filter.
    assert!(page.body.contains("flt_city=Lyon"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn html_edit_of_missing_record_is_not_found() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let page = app
        .get_page(
            &format!("/admin/product/{}/edit", uuid::Uuid::now_v7()),
            Some(&token),
        )
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("<h1>Not found</h1>"));
    assert!(!page.body.contains(r#""error""#));

    // The JSON surface keeps its JSON error.
    let (body, status) = app
        .get_auth(&format!("/api/v1/admin/products/{}", uuid::Uuid::now_v7()), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    common::cleanup(app).await;
}

#[tokio::test]
async fn list_paginates() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    for i in 0..25 {
        app.post_auth(
            "/api/v1/admin/roles",
            &token,
            &json!({ "name": format!("role-{i:02}") }),
        )
        .await;
    }

    let (list, _) = app.get_auth("/api/v1/admin/roles?page=2", &token).await;
    assert_eq!(list["total"], 26);
    assert_eq!(list["total_pages"], 2);
    assert_eq!(list["items"].as_array().unwrap().len(), 6);

    let page = app.get_page("/admin/role/?page=2", Some(&token)).await;
    assert!(page.body.contains("Page 2 of 2"));
    assert!(page.body.contains("page=1"));

    common::cleanup(app).await;
}
