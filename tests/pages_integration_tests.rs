//! Integration tests for the localized public pages

use axum::http::{
    StatusCode,
    header::{CONTENT_LANGUAGE, LOCATION},
};
use corpsite::{
    models::{
        notice::{self, NoticeForm},
        notice_category::{self, NoticeCategoryForm},
        partner::{self, PartnerForm},
        product::{ProductFields, ProductForm},
    },
    repositories::{ContentRepository, ProductRepository},
};

#[path = "test_utils/mod.rs"]
mod test_utils;

use test_utils::{TestApp, body_json, get};

async fn seed_notice(app: &TestApp, title: &str, body: &str, published: bool) -> notice::Model {
    ContentRepository::<notice::Entity>::new(&app.db)
        .create(NoticeForm {
            title: title.to_string(),
            body: body.to_string(),
            category_id: None,
            published,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn root_redirects_to_default_locale_home() {
    let app = TestApp::new().await.unwrap();

    let response = app.send(get("/")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/ko");

    let response = app.send(get("/ko")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_LANGUAGE], "ko");
    let page = body_json(response).await;
    assert_eq!(page["locale"], "ko");
    assert_eq!(page["home"]["id"], 1);
    assert_eq!(page["company"]["id"], 1);
}

#[tokio::test]
async fn unprefixed_paths_keep_their_query_on_redirect() {
    let app = TestApp::new().await.unwrap();

    let response = app.send(get("/notices?category_id=3")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[LOCATION], "/ko/notices?category_id=3");

    let response = app.send(get("/products/7")).await;
    assert_eq!(response.headers()[LOCATION], "/ko/products/7");
}

#[tokio::test]
async fn path_locale_wins_over_accept_language() {
    let app = TestApp::new().await.unwrap();

    let request = axum::http::Request::builder()
        .uri("/en/notices")
        .header("accept-language", "ko-KR,ko;q=0.9")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_LANGUAGE], "en");
    assert_eq!(body_json(response).await["locale"], "en");
}

#[tokio::test]
async fn notice_listing_hides_drafts_and_sanitizes_bodies() {
    let app = TestApp::new().await.unwrap();
    seed_notice(&app, "Draft", "<p>hidden</p>", false).await;
    seed_notice(
        &app,
        "Opening",
        "<p>Welcome</p><script>alert(1)</script>",
        true,
    )
    .await;

    let page = body_json(app.send(get("/en/notices")).await).await;
    let notices = page["notices"].as_array().unwrap();

    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["title"], "Opening");
    let body = notices[0]["body"].as_str().unwrap();
    assert!(body.contains("Welcome"));
    assert!(!body.contains("alert(1)"));
}

#[tokio::test]
async fn notice_listing_filters_by_category() {
    let app = TestApp::new().await.unwrap();
    let category = ContentRepository::<notice_category::Entity>::new(&app.db)
        .create(NoticeCategoryForm {
            name: "Press".to_string(),
        })
        .await
        .unwrap();
    seed_notice(&app, "Uncategorized", "", true).await;
    ContentRepository::<notice::Entity>::new(&app.db)
        .create(NoticeForm {
            title: "Press release".to_string(),
            body: String::new(),
            category_id: Some(category.id),
            published: true,
        })
        .await
        .unwrap();

    let uri = format!("/ko/notices?category_id={}", category.id);
    let page = body_json(app.send(get(&uri)).await).await;

    assert_eq!(page["category_id"], category.id);
    assert_eq!(page["categories"][0]["name"], "Press");
    let notices = page["notices"].as_array().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["title"], "Press release");
}

#[tokio::test]
async fn notice_detail_is_404_for_drafts_and_unknown_ids() {
    let app = TestApp::new().await.unwrap();
    let draft = seed_notice(&app, "Draft", "", false).await;
    let live = seed_notice(&app, "Live", "<b>hi</b>", true).await;

    let response = app.send(get(&format!("/ko/notices/{}", live.id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["notice"]["title"], "Live");

    for id in [draft.id, 9999] {
        let response = app.send(get(&format!("/ko/notices/{id}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn product_detail_resolves_partners_and_published_notices() {
    let app = TestApp::new().await.unwrap();
    let partner = ContentRepository::<partner::Entity>::new(&app.db)
        .create(PartnerForm {
            name: "Acme".to_string(),
            logo_url: None,
            website_url: None,
            metadata: None,
            sort_order: 0,
        })
        .await
        .unwrap();
    let draft = seed_notice(&app, "Draft", "", false).await;
    let live = seed_notice(&app, "Launch", "", true).await;
    let product = ProductRepository::new(&app.db)
        .create(ProductForm {
            fields: ProductFields {
                name: "Sensor".to_string(),
                description: "<p onclick=\"x()\">Precise</p>".to_string(),
                category: None,
                images: vec!["sensor.png".to_string()],
                sort_order: 0,
            },
            partner_ids: vec![partner.id],
            notice_ids: vec![draft.id, live.id],
        })
        .await
        .unwrap();

    let response = app
        .send(get(&format!("/en/products/{}", product.product.id)))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;

    assert_eq!(page["product"]["name"], "Sensor");
    assert!(!page["product"]["description"].as_str().unwrap().contains("onclick"));
    assert_eq!(page["partners"][0]["name"], "Acme");
    let notices = page["notices"].as_array().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["title"], "Launch");

    let response = app.send(get("/en/products/4242")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn static_listings_render_on_an_empty_store() {
    let app = TestApp::new().await.unwrap();

    for (uri, key) in [
        ("/ko/products", "products"),
        ("/ko/partners", "partners"),
        ("/ko/facilities", "facilities"),
    ] {
        let response = app.send(get(uri)).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert_eq!(body_json(response).await[key], serde_json::json!([]));
    }

    let company = body_json(app.send(get("/en/company")).await).await;
    assert_eq!(company["company"]["id"], 1);
}

#[tokio::test]
async fn api_prefixes_are_never_redirected() {
    let app = TestApp::new().await.unwrap();

    let response = app.send(get("/api/unknown")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(get("/healthz")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-trace-id"));
}
