//! Account lifecycle and donor search over HTTP.

// Shared harness has helpers unused in this suite.
#[allow(dead_code)]
#[path = "support/app.rs"]
mod support;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use saveablood::domain::BloodBank;
use saveablood::inbound::http::redirect::LOGIN_PATH;
use serde_json::{Value, json};

use support::{app, get_json, session_cookie, sign_up, state_with_banks};

fn no_banks() -> Vec<BloodBank> {
    Vec::new()
}

#[actix_web::test]
async fn register_logout_and_login_again() {
    let app = test::init_service(app(state_with_banks(no_banks()))).await;
    let cookie = sign_up(&app, "ada", "AB+", "North", "donor").await;

    let me = get_json(&app, &cookie, "/api/v1/me").await;
    assert_eq!(me["username"], "ada");
    assert_eq!(me["bloodType"], "AB+");
    assert_eq!(me["role"], "donor");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some(LOGIN_PATH)
    );

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_form([("username", "ada"), ("password", "wrong")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_form([("username", "ada"), ("password", "correct horse")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&res);
    let me_again = get_json(&app, &cookie, "/api/v1/me").await;
    assert_eq!(me_again["id"], me["id"]);
}

#[actix_web::test]
async fn usernames_are_unique() {
    let app = test::init_service(app(state_with_banks(no_banks()))).await;
    sign_up(&app, "ada", "AB+", "North", "donor").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_form([
                ("username", "ada"),
                ("password", "another"),
                ("blood_type", "O-"),
                ("location", "South"),
                ("role", "recipient"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "conflict");
}

#[actix_web::test]
async fn unknown_type_labels_are_rejected_at_registration() {
    let app = test::init_service(app(state_with_banks(no_banks()))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_form([
                ("username", "ada"),
                ("password", "pw"),
                ("blood_type", "AB"),
                ("location", "North"),
                ("role", "donor"),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body["details"],
        json!({ "field": "blood_type", "code": "invalid_type_label", "value": "AB" })
    );
}

#[actix_web::test]
async fn donor_search_matches_type_and_location_exactly() {
    let app = test::init_service(app(state_with_banks(no_banks()))).await;
    sign_up(&app, "ada", "O-", "Downtown", "donor").await;
    sign_up(&app, "cy", "O-", "downtown", "donor").await;
    sign_up(&app, "di", "O+", "Downtown", "donor").await;
    sign_up(&app, "ed", "O-", "Downtown", "recipient").await;
    let searcher = sign_up(&app, "bo", "A+", "Downtown", "recipient").await;

    let donors = get_json(
        &app,
        &searcher,
        "/api/v1/donors?blood_type=O-&location=Downtown",
    )
    .await;
    let names: Vec<&str> = donors
        .as_array()
        .expect("donors")
        .iter()
        .filter_map(|donor| donor["username"].as_str())
        .collect();
    assert_eq!(names, ["ada"]);
}
