//! Unit tests for the github_protection crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Test Constants ---
const TEST_OWNER: &str = "test-owner";
const TEST_REPO: &str = "test-repo";
const TEST_BRANCH: &str = "main";

async fn client_for(mock_server: &MockServer) -> GitHubProtectionClient {
    let octocrab = octocrab::Octocrab::builder()
        .base_uri(mock_server.uri())
        .unwrap()
        .build()
        .unwrap();
    GitHubProtectionClient::new(octocrab)
}

fn protection_path() -> String {
    format!(
        "/repos/{TEST_OWNER}/{TEST_REPO}/branches/{TEST_BRANCH}/protection"
    )
}

fn review_protection_path() -> String {
    format!(
        "/repos/{TEST_OWNER}/{TEST_REPO}/branches/{TEST_BRANCH}/protection/required_pull_request_reviews"
    )
}

#[tokio::test]
async fn test_get_review_protection_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(protection_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://api.github.com/repos/test-owner/test-repo/branches/main/protection",
            "required_pull_request_reviews": {
                "dismiss_stale_reviews": true,
                "require_code_owner_reviews": false,
                "required_approving_review_count": 2,
                "dismissal_restrictions": {
                    "users": [{ "login": "alice", "id": 1 }],
                    "teams": [{ "slug": "core", "id": 10 }]
                }
            },
            "enforce_admins": { "enabled": false }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .get_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH)
        .await;

    let status = result.expect("Expected the query to succeed");
    assert_eq!(
        status,
        ReviewProtectionStatus::Configured(ReviewProtection {
            dismiss_stale_reviews: true,
            require_code_owner_reviews: false,
            required_approving_review_count: 2,
            dismissal_restrictions: Some(DismissalRestrictions {
                users: vec!["alice".to_string()],
                teams: vec!["core".to_string()],
            }),
        })
    );
}

#[tokio::test]
async fn test_get_review_protection_unprotected_branch() {
    let mock_server = MockServer::start().await;

    // GitHub reports an unprotected branch as a 404.
    Mock::given(method("GET"))
        .and(path(protection_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Branch not protected",
            "documentation_url": "https://docs.github.com/rest/branches/branch-protection"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .get_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH)
        .await;

    assert_eq!(
        result.expect("Expected the query to succeed"),
        ReviewProtectionStatus::NotConfigured
    );
}

#[tokio::test]
async fn test_get_review_protection_without_review_settings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(protection_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://api.github.com/repos/test-owner/test-repo/branches/main/protection",
            "required_status_checks": { "strict": true, "contexts": ["ci"] }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .get_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH)
        .await;

    assert_eq!(
        result.expect("Expected the query to succeed"),
        ReviewProtectionStatus::NotConfigured
    );
}

#[tokio::test]
async fn test_get_review_protection_legacy_disabled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(protection_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "required_pull_request_reviews": { "enabled": false }
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .get_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH)
        .await;

    assert_eq!(
        result.expect("Expected the query to succeed"),
        ReviewProtectionStatus::Disabled
    );
}

#[tokio::test]
async fn test_get_review_protection_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(protection_path()))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Server Error"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .get_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH)
        .await;

    assert!(matches!(result, Err(Error::InvalidResponse)));
}

#[tokio::test]
async fn test_delete_review_protection_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(review_protection_path()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .delete_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_review_protection_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(review_protection_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .delete_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH)
        .await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_delete_review_protection_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(review_protection_path()))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Server Error"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .delete_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH)
        .await;

    assert!(matches!(result, Err(Error::ApiError())));
}

#[tokio::test]
async fn test_update_review_protection_sends_captured_settings() {
    let mock_server = MockServer::start().await;

    let settings = ReviewProtectionUpdate {
        dismiss_stale_reviews: true,
        require_code_owner_reviews: false,
        required_approving_review_count: 2,
        dismissal_restrictions: DismissalRestrictionsUpdate {
            users: vec!["alice".to_string()],
            teams: vec!["core".to_string()],
        },
    };

    Mock::given(method("PATCH"))
        .and(path(review_protection_path()))
        .and(body_json(json!({
            "dismiss_stale_reviews": true,
            "require_code_owner_reviews": false,
            "required_approving_review_count": 2,
            "dismissal_restrictions": {
                "users": ["alice"],
                "teams": ["core"]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dismiss_stale_reviews": true,
            "require_code_owner_reviews": false,
            "required_approving_review_count": 2
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client
        .update_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH, &settings)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_update_review_protection_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(review_protection_path()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let settings = ReviewProtectionUpdate {
        dismiss_stale_reviews: false,
        require_code_owner_reviews: false,
        required_approving_review_count: 1,
        dismissal_restrictions: DismissalRestrictionsUpdate::default(),
    };
    let result = client
        .update_review_protection(TEST_OWNER, TEST_REPO, TEST_BRANCH, &settings)
        .await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_create_token_client() {
    let result = create_token_client("ghp_test_token");

    assert!(result.is_ok());
}
