//! Screening prediction API handler.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::ClassifierError;
use crate::domain::{Error, FeatureInputs, FeatureVector, FeatureVectorError, RiskLabel};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Prediction request body for `POST /api/v1/predictions`.
///
/// Field order in the underlying model artifact is fixed; the JSON shape is
/// named so clients cannot get the order wrong.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    /// Number of pregnancies.
    pub pregnancies: f64,
    /// Plasma glucose concentration.
    pub glucose: f64,
    /// Diastolic blood pressure (mm Hg).
    pub blood_pressure: f64,
    /// Triceps skin fold thickness (mm).
    pub skin_thickness: f64,
    /// Two-hour serum insulin (mu U/ml).
    pub insulin: f64,
    /// Body mass index.
    pub bmi: f64,
    /// Diabetes pedigree function.
    pub diabetes_pedigree_function: f64,
    /// Age in years.
    pub age: f64,
}

impl From<PredictionRequest> for FeatureInputs {
    fn from(value: PredictionRequest) -> Self {
        Self {
            pregnancies: value.pregnancies,
            glucose: value.glucose,
            blood_pressure: value.blood_pressure,
            skin_thickness: value.skin_thickness,
            insulin: value.insulin,
            bmi: value.bmi,
            diabetes_pedigree: value.diabetes_pedigree_function,
            age: value.age,
        }
    }
}

/// Prediction response for `POST /api/v1/predictions`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    /// Binary label emitted by the model: `0` low risk, `1` elevated risk.
    pub label: u8,
    /// Advisory text matching the label.
    pub advice: String,
}

fn advice_for(label: RiskLabel) -> &'static str {
    match label {
        RiskLabel::Positive => "You have high chances of Diabetes! Please consult a Doctor",
        RiskLabel::Negative => "You have low chances of Diabetes. Please maintain a healthy life style",
    }
}

fn map_classifier_error(err: ClassifierError) -> Error {
    match err {
        ClassifierError::InvalidFeatures { message } => Error::invalid_request(message),
        ClassifierError::Artifact { message } => Error::internal(message),
    }
}

/// Evaluate the pre-trained classifier over the submitted features.
#[utoipa::path(
    post,
    path = "/api/v1/predictions",
    request_body = PredictionRequest,
    responses(
        (status = 200, description = "Prediction", body = PredictionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["predictions"],
    operation_id = "predict",
    security([])
)]
#[post("/predictions")]
pub async fn predict(
    state: web::Data<HttpState>,
    payload: web::Json<PredictionRequest>,
) -> ApiResult<web::Json<PredictionResponse>> {
    let features = FeatureVector::try_from_inputs(payload.into_inner().into()).map_err(|err| {
        let FeatureVectorError::NotFinite { field } = &err;
        Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
    })?;
    let label = state
        .classifier
        .predict(&features)
        .map_err(map_classifier_error)?;
    Ok(web::Json(PredictionResponse {
        label: label.as_index(),
        advice: advice_for(label).to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test as actix_test, web};

    use super::*;
    use crate::domain::ports::{
        AuthService, ContactIntake, CredentialRepository, InMemoryCredentialRepository,
        PasswordHashError, PasswordHasher, RiskClassifier,
    };
    use crate::domain::{ContactMessage, CredentialAuthService, PasswordHash};

    struct StubHasher;
    impl PasswordHasher for StubHasher {
        fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
            PasswordHash::new(format!("stub${plaintext}"))
                .map_err(|err| PasswordHashError::hash(err.to_string()))
        }
        fn verify(&self, _: &str, _: &PasswordHash) -> Result<bool, PasswordHashError> {
            Ok(false)
        }
    }

    struct StubContact;
    #[async_trait::async_trait]
    impl ContactIntake for StubContact {
        async fn submit(&self, _: ContactMessage) -> Result<(), Error> {
            Ok(())
        }
    }

    /// Flags every vector whose glucose reading is 140 or above.
    struct ThresholdClassifier;
    impl RiskClassifier for ThresholdClassifier {
        fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ClassifierError> {
            let [_, glucose, ..] = features.as_array();
            Ok(if glucose >= 140.0 {
                RiskLabel::Positive
            } else {
                RiskLabel::Negative
            })
        }
    }

    fn test_state() -> web::Data<HttpState> {
        let credentials: Arc<dyn CredentialRepository> =
            Arc::new(InMemoryCredentialRepository::new());
        let auth: Arc<dyn AuthService> = Arc::new(CredentialAuthService::new(
            credentials.clone(),
            Arc::new(StubHasher),
        ));
        web::Data::new(HttpState::new(
            auth,
            credentials,
            Arc::new(StubContact),
            Arc::new(ThresholdClassifier),
        ))
    }

    fn request_body(glucose: f64) -> PredictionRequest {
        PredictionRequest {
            pregnancies: 2.0,
            glucose,
            blood_pressure: 70.0,
            skin_thickness: 25.0,
            insulin: 80.0,
            bmi: 28.5,
            diabetes_pedigree_function: 0.45,
            age: 33.0,
        }
    }

    #[actix_web::test]
    async fn prediction_returns_label_and_matching_advice() {
        let app = actix_test::init_service(
            App::new()
                .app_data(test_state())
                .service(web::scope("/api/v1").service(predict)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/predictions")
                .set_json(request_body(180.0))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = actix_test::read_body(res).await;
        let value: serde_json::Value = serde_json::from_slice(&body).expect("JSON body");
        assert_eq!(value["label"], serde_json::json!(1));
        assert!(
            value["advice"]
                .as_str()
                .expect("advice text")
                .contains("consult a Doctor")
        );

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/predictions")
                .set_json(request_body(95.0))
                .to_request(),
        )
        .await;
        let body = actix_test::read_body(res).await;
        let value: serde_json::Value = serde_json::from_slice(&body).expect("JSON body");
        assert_eq!(value["label"], serde_json::json!(0));
    }

    #[actix_web::test]
    async fn non_finite_features_are_rejected() {
        let app = actix_test::init_service(
            App::new()
                .app_data(test_state())
                .service(web::scope("/api/v1").service(predict)),
        )
        .await;

        // serde_json cannot represent NaN, so a string sneaks through only as
        // a type error; send a JSON null to exercise the 400 path instead.
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/predictions")
                .set_json(serde_json::json!({
                    "pregnancies": 2.0,
                    "glucose": null,
                    "bloodPressure": 70.0,
                    "skinThickness": 25.0,
                    "insulin": 80.0,
                    "bmi": 28.5,
                    "diabetesPedigreeFunction": 0.45,
                    "age": 33.0
                }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
