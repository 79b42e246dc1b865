//! Donor search.
//!
//! ```text
//! GET /api/v1/donors?blood_type=O-&location=Downtown
//! ```
//!
//! Matching is exact on both the type label and the location string, so
//! `Downtown` and `downtown` are different places.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::DonorSearch;
use crate::domain::{Error, Location, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    BLOOD_TYPE, extracted, map_user_validation_error, parse_blood_type,
};

/// Query parameters for `GET /api/v1/donors`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DonorSearchQuery {
    /// One of the eight type labels, e.g. `AB+`.
    pub blood_type: String,
    pub location: String,
}

impl DonorSearchQuery {
    fn parse(&self) -> Result<DonorSearch, Error> {
        let blood_type = parse_blood_type(BLOOD_TYPE, &self.blood_type)?;
        let location = Location::new(&self.location).map_err(map_user_validation_error)?;
        Ok(DonorSearch {
            blood_type,
            location,
        })
    }
}

/// Donors with exactly the requested type at exactly the requested location.
#[utoipa::path(
    get,
    path = "/api/v1/donors",
    params(DonorSearchQuery),
    responses(
        (status = 200, description = "Matching donors ordered by username", body = [User]),
        (status = 303, description = "Not logged in; redirect to login", body = Error),
        (status = 400, description = "Invalid type label or location", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["donors"],
    operation_id = "searchDonors"
)]
#[get("/donors")]
pub async fn search_donors(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: Result<web::Query<DonorSearchQuery>, actix_web::Error>,
) -> ApiResult<web::Json<Vec<User>>> {
    session.require_user(state.identity_query.as_ref()).await?;
    let search = extracted(query)?.parse()?;
    let donors = state.identity_query.search_donors(&search).await?;
    Ok(web::Json(donors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BloodType, Role};
    use crate::inbound::http::test_utils::{
        MockPorts, login_as, sign_in, test_session_middleware, user,
    };
    use crate::inbound::http::redirect::LOGIN_PATH;
    use crate::inbound::http::validation::query_config;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::Value;

    fn app(
        caller: &User,
        ports: MockPorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .wrap(test_session_middleware())
            .app_data(ports.with_session_user(caller).into_state())
            .app_data(query_config())
            .service(login_as(*caller.id()))
            .service(web::scope("/api/v1").service(search_donors))
    }

    #[actix_web::test]
    async fn search_forwards_exact_criteria() {
        let caller = user("bo", BloodType::ONegative, "Downtown", Role::Recipient);
        let donor = user("ada", BloodType::ONegative, "Downtown", Role::Donor);
        let mut ports = MockPorts::default();
        ports
            .identity_query
            .expect_search_donors()
            .withf(|search| {
                search.blood_type == BloodType::ONegative && search.location.as_ref() == "Downtown"
            })
            .times(1)
            .return_once(move |_| Ok(vec![donor]));
        let app = test::init_service(app(&caller, ports)).await;
        let cookie = sign_in!(&app);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/donors?blood_type=O-&location=Downtown")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body[0]["username"], "ada");
        assert_eq!(body[0]["bloodType"], "O-");
    }

    #[rstest]
    #[case("/api/v1/donors?blood_type=O%3F&location=Downtown", "blood_type")]
    #[case("/api/v1/donors?blood_type=O-&location=%20", "location")]
    #[actix_web::test]
    async fn invalid_criteria_name_the_field(#[case] uri: &str, #[case] field: &str) {
        let caller = user("bo", BloodType::ONegative, "Downtown", Role::Recipient);
        let mut ports = MockPorts::default();
        ports.identity_query.expect_search_donors().never();
        let app = test::init_service(app(&caller, ports)).await;
        let cookie = sign_in!(&app);

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn missing_parameters_are_malformed() {
        let caller = user("bo", BloodType::ONegative, "Downtown", Role::Recipient);
        let app = test::init_service(app(&caller, MockPorts::default())).await;
        let cookie = sign_in!(&app);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/donors?blood_type=O-")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "malformed_form");
    }

    #[rstest]
    #[case("/api/v1/donors")]
    #[case("/api/v1/donors?blood_type=O-")]
    #[case("/api/v1/donors?blood_type=O-&location=Downtown")]
    #[actix_web::test]
    async fn anonymous_searches_redirect_to_login(#[case] uri: &str) {
        let caller = user("bo", BloodType::ONegative, "Downtown", Role::Recipient);
        let mut ports = MockPorts::default();
        ports.identity_query.expect_search_donors().never();
        let app = test::init_service(app(&caller, ports)).await;

        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()
                .get(actix_web::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some(LOGIN_PATH)
        );
    }
}
