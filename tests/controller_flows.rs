// Integration tests for the session controller state machine
use idporten_session::testing::mock::MockIdentityClient;
use idporten_session::testing::{
    assert_default_record, assert_markers, assert_rejected, assert_settled_cleanly, TestFixtures,
    TestRecordBuilder,
};
use idporten_session::{
    AuthStatus, FlowStatus, IdentityError, LoginMethod, LogoutMethod, SessionController,
    SessionRecord,
};
use std::sync::Arc;
use tokio::sync::Notify;

fn login_pending() -> SessionRecord {
    TestRecordBuilder::new().login_pending().build()
}

#[tokio::test]
async fn test_pending_login_completes_with_signin_response() {
    let client = MockIdentityClient::new()
        .with_signin_response(Ok(Some(TestFixtures::signin_response())));
    let (controller, store) = TestFixtures::controller(Arc::new(client), &login_pending());

    controller.initialize().await;

    assert_settled_cleanly(&controller);
    assert!(controller.is_authenticated());
    assert_eq!(controller.token().as_deref(), Some("test_access_token"));
    assert_eq!(controller.id_token().as_deref(), Some("test_id_token"));
    assert_eq!(controller.user().unwrap()["sub"], "u1");

    let persisted = TestFixtures::persisted_record(store.as_ref());
    assert_eq!(persisted, controller.record());
    assert!(persisted.is_authenticated);
}

#[tokio::test]
async fn test_pending_login_with_expired_token_is_not_authenticated() {
    let client = MockIdentityClient::new()
        .with_signin_response(Ok(Some(TestFixtures::expired_signin_response())));
    let (controller, _store) = TestFixtures::controller(Arc::new(client), &login_pending());

    controller.initialize().await;

    assert_settled_cleanly(&controller);
    assert!(!controller.is_authenticated());
    assert!(controller.token().is_some());
}

#[tokio::test]
async fn test_benign_signin_errors_settle_without_error() {
    for message in ["No state in response", "No matching state found in storage"] {
        let client = MockIdentityClient::new().with_signin_failure(message);
        let (controller, _store) = TestFixtures::controller(Arc::new(client), &login_pending());

        controller.initialize().await;

        assert_settled_cleanly(&controller);
        assert!(!controller.is_authenticated());
    }
}

#[tokio::test]
async fn test_unexpected_signin_error_rejects_session() {
    let client = MockIdentityClient::new().with_signin_failure("boom");
    let (controller, store) = TestFixtures::controller(Arc::new(client), &login_pending());

    controller.initialize().await;

    assert_rejected(&controller);
    assert_eq!(controller.login_error().unwrap().message(), "boom");
    assert_markers(
        &TestFixtures::persisted_record(store.as_ref()),
        AuthStatus::Rejected,
        FlowStatus::Finished,
    );
}

#[tokio::test]
async fn test_signin_error_message_must_match_exactly() {
    let client = MockIdentityClient::new().with_signin_failure("No state in response!");
    let (controller, _store) = TestFixtures::controller(Arc::new(client), &login_pending());

    controller.initialize().await;

    assert_rejected(&controller);
}

#[tokio::test]
async fn test_pending_logout_resets_to_default() {
    let record = TestRecordBuilder::signed_in().logout_pending().build();
    let client = Arc::new(MockIdentityClient::new());
    let (controller, store) = TestFixtures::controller(client.clone(), &record);

    controller.initialize().await;

    assert_default_record(&controller.record());
    assert_default_record(&TestFixtures::persisted_record(store.as_ref()));
    assert!(!controller.is_authenticated());
    assert!(controller.login_error().is_none());
    assert_eq!(client.calls(), vec!["process_signout_response"]);
}

#[tokio::test]
async fn test_signout_protocol_error_rejects_and_keeps_tokens() {
    let record = TestRecordBuilder::signed_in().logout_pending().build();
    let client =
        MockIdentityClient::new().with_signout_response(Ok(TestFixtures::rejected_signout()));
    let (controller, _store) = TestFixtures::controller(Arc::new(client), &record);

    controller.initialize().await;

    assert_rejected(&controller);
    assert!(controller.token().is_some());
    assert_eq!(
        controller.login_error(),
        Some(IdentityError::SignoutRejected {
            error: "access_denied".to_string(),
            description: Some("End-user cancelled the logout".to_string()),
        })
    );
}

#[tokio::test]
async fn test_signout_processing_failure_rejects() {
    let record = TestRecordBuilder::signed_in().logout_pending().build();
    let client = MockIdentityClient::new()
        .with_signout_response(Err(IdentityError::Signout("network down".to_string())));
    let (controller, _store) = TestFixtures::controller(Arc::new(client), &record);

    controller.initialize().await;

    assert_rejected(&controller);
    assert_eq!(controller.login_error().unwrap().kind(), "signout");
}

#[tokio::test]
async fn test_initialize_twice_is_idempotent() {
    let client = Arc::new(MockIdentityClient::new());
    let (controller, _store) =
        TestFixtures::controller(client.clone(), &SessionRecord::default());

    controller.initialize().await;
    let first = controller.record();
    controller.initialize().await;

    assert_eq!(controller.record(), first);
    assert_markers(&first, AuthStatus::Finished, FlowStatus::Unknown);
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_settled_session_is_not_reprocessed() {
    let record = TestRecordBuilder::signed_in().build();
    let client = Arc::new(MockIdentityClient::new().with_signin_failure("boom"));
    let (controller, _store) = TestFixtures::controller(client.clone(), &record);

    controller.initialize().await;

    assert_settled_cleanly(&controller);
    assert!(controller.is_authenticated());
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn test_redirect_login_persists_pending_flow() {
    let client = Arc::new(MockIdentityClient::new());
    let (controller, store) =
        TestFixtures::controller(client.clone(), &SessionRecord::default());

    controller.login(LoginMethod::Redirect).await;

    assert_eq!(controller.status(), FlowStatus::LoginPending);
    assert_eq!(
        TestFixtures::persisted_record(store.as_ref()).status,
        FlowStatus::LoginPending
    );
    assert_eq!(client.calls(), vec!["signin_redirect"]);
}

#[tokio::test]
async fn test_popup_login_stores_session_immediately() {
    let client = Arc::new(
        MockIdentityClient::new().with_signin_popup(Ok(TestFixtures::signin_response())),
    );
    let (controller, _store) =
        TestFixtures::controller(client.clone(), &SessionRecord::default());

    controller.login(LoginMethod::Popup).await;

    assert_settled_cleanly(&controller);
    assert!(controller.is_authenticated());
    assert_eq!(client.calls(), vec!["signin_popup", "signin_popup_callback"]);
}

#[tokio::test]
async fn test_popup_login_failure_sets_error_only() {
    let client = MockIdentityClient::new()
        .with_signin_popup(Err(IdentityError::Popup("Popup window closed".to_string())));
    let (controller, _store) =
        TestFixtures::controller(Arc::new(client), &SessionRecord::default());

    controller.login(LoginMethod::Popup).await;

    assert_eq!(controller.record(), SessionRecord::default());
    assert_eq!(controller.login_error().unwrap().kind(), "popup");
}

#[tokio::test]
async fn test_redirect_logout_persists_pending_flow() {
    let record = TestRecordBuilder::signed_in().build();
    let client = Arc::new(MockIdentityClient::new());
    let (controller, store) = TestFixtures::controller(client.clone(), &record);

    controller.logout(LogoutMethod::Redirect).await;

    let persisted = TestFixtures::persisted_record(store.as_ref());
    assert_eq!(persisted.status, FlowStatus::LogoutPending);
    assert!(persisted.token.is_some());
    assert_eq!(client.calls(), vec!["signout_redirect"]);
}

#[tokio::test]
async fn test_popup_logout_leaves_record_untouched() {
    let record = TestRecordBuilder::signed_in().build();
    let client = Arc::new(MockIdentityClient::new());
    let (controller, _store) = TestFixtures::controller(client.clone(), &record);

    controller.logout(LogoutMethod::Popup).await;

    assert_eq!(controller.record(), record);
    assert!(controller.login_error().is_none());
    assert_eq!(client.calls(), vec!["signout_popup"]);
}

#[tokio::test]
async fn test_subscriber_sees_popup_login() {
    let client = MockIdentityClient::new().with_signin_popup(Ok(TestFixtures::signin_response()));
    let (controller, _store) =
        TestFixtures::controller(Arc::new(client), &SessionRecord::default());
    let mut subscription = controller.subscribe();
    assert!(!subscription.current().is_authenticated);

    controller.login(LoginMethod::Popup).await;

    let snapshot = subscription.changed().await.unwrap();
    assert!(snapshot.is_authenticated);
    assert_eq!(snapshot.auth_status, AuthStatus::Finished);
    assert!(snapshot.login_error.is_none());
}

#[tokio::test]
async fn test_subscriber_sees_login_error() {
    let client = MockIdentityClient::new().with_signin_failure("boom");
    let (controller, _store) = TestFixtures::controller(Arc::new(client), &login_pending());
    let mut subscription = controller.subscribe();

    controller.initialize().await;

    let latest = subscription.refresh();
    assert_eq!(latest.auth_status, AuthStatus::Rejected);
    assert_eq!(latest.login_error.as_ref().unwrap().message(), "boom");
}

#[tokio::test]
async fn test_login_waits_for_running_initialize() {
    let gate = Arc::new(Notify::new());
    let client = Arc::new(
        MockIdentityClient::new()
            .with_signin_gate(gate.clone())
            .with_signin_response(Ok(None))
            .with_signin_popup(Ok(TestFixtures::signin_response())),
    );
    let (controller, _store) = TestFixtures::controller(client.clone(), &login_pending());
    let controller: Arc<SessionController> = Arc::new(controller);

    let initializing = tokio::spawn({
        let controller = controller.clone();
        async move { controller.initialize().await }
    });
    while controller.auth_status() != AuthStatus::Pending {
        tokio::task::yield_now().await;
    }

    let logging_in = tokio::spawn({
        let controller = controller.clone();
        async move { controller.login(LoginMethod::Popup).await }
    });
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(client.calls().is_empty());

    gate.notify_one();
    initializing.await.unwrap();
    logging_in.await.unwrap();

    assert_eq!(
        client.calls(),
        vec!["process_signin_response", "signin_popup", "signin_popup_callback"]
    );
    assert_settled_cleanly(&controller);
    assert!(controller.is_authenticated());
}

#[tokio::test]
async fn test_preferred_methods_follow_options() {
    let client = Arc::new(MockIdentityClient::new());
    let store = TestFixtures::store_with(&SessionRecord::default());
    let options = idporten_session::ControllerOptions {
        login_method: LoginMethod::Popup,
        logout_method: LogoutMethod::Popup,
        ..Default::default()
    };
    let controller = SessionController::new(client.clone(), store, options);

    controller.login_preferred().await;
    controller.logout_preferred().await;

    assert_eq!(
        client.calls(),
        vec!["signin_popup", "signin_popup_callback", "signout_popup"]
    );
}
