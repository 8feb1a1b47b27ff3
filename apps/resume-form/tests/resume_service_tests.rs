//! Resume service client against a wiremock server.

use resume_form::form::SectionKind;
use resume_form::{ResumeForm, ResumeService, ResumeServiceClient, SubmitError};

use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn sample_form() -> ResumeForm {
    let mut form = ResumeForm::new();
    form.set_field("fullName", "Ada Lovelace").unwrap();
    form.set_field("email", "ada@example.com").unwrap();
    form.add_entry(SectionKind::Education).unwrap();
    form.set_field("education[0][school]", "A").unwrap();
    form
}

#[tokio::test]
async fn test_posts_payload_with_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prod/generate-resume"))
        .and(header("authorization", "Bearer id-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "fullName": "Ada Lovelace",
            "email": "ada@example.com",
            "education": [{"school": "A"}],
            "experience": [],
            "projects": []
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "OK",
            "downloadUrl": "https://x/y.pdf"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResumeServiceClient::new(format!("{}/prod/generate-resume", mock_server.uri()));
    let receipt = client
        .submit("id-token", &sample_form().to_payload())
        .await
        .unwrap();

    assert_eq!(receipt.message, "OK");
    assert_eq!(receipt.download_url.as_deref(), Some("https://x/y.pdf"));
}

#[tokio::test]
async fn test_success_without_message_uses_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let client = ResumeServiceClient::new(mock_server.uri());
    let receipt = client
        .submit("id-token", &sample_form().to_payload())
        .await
        .unwrap();

    assert_eq!(receipt.message, "Resume generated successfully!");
    assert_eq!(receipt.download_url, None);
}

#[tokio::test]
async fn test_failure_status_carries_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Invalid data"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = ResumeServiceClient::new(mock_server.uri());
    let err = client
        .submit("id-token", &sample_form().to_payload())
        .await
        .unwrap_err();

    match err {
        SubmitError::Remote { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid data");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_status_with_non_json_body_uses_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = ResumeServiceClient::new(mock_server.uri());
    let err = client
        .submit("id-token", &sample_form().to_payload())
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "Failed to generate resume. Please try again."
    );
}

#[tokio::test]
async fn test_success_status_with_non_json_body_is_network_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&mock_server)
        .await;

    let client = ResumeServiceClient::new(mock_server.uri());
    let err = client
        .submit("id-token", &sample_form().to_payload())
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::InvalidResponse(_)));
    assert_eq!(
        err.user_message(),
        "An unexpected network error occurred. Please try again later."
    );
}

#[tokio::test]
async fn test_unreachable_service_is_network_error_without_retry() {
    // Bind then drop a listener so the port refuses connections.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let client = ResumeServiceClient::new(uri);
    let err = client
        .submit("id-token", &sample_form().to_payload())
        .await
        .unwrap_err();

    assert!(matches!(err, SubmitError::Network(_)));
    assert_eq!(
        err.user_message(),
        "An unexpected network error occurred. Please try again later."
    );
}
