//! Custom assertion helpers for common session checks

use crate::models::{AuthStatus, FlowStatus, SessionRecord};
use crate::session::SessionController;

/// Assert both lifecycle markers of a record
///
/// # Panics
///
/// Panics if either marker differs.
pub fn assert_markers(record: &SessionRecord, auth_status: AuthStatus, status: FlowStatus) {
    assert_eq!(
        (record.auth_status, record.status),
        (auth_status, status),
        "Expected authStatus={auth_status} status={status}, got authStatus={} status={}",
        record.auth_status,
        record.status
    );
}

/// Assert the controller settled successfully without surfacing an error
///
/// # Panics
///
/// Panics if the session is not `finished`/`finished` or a login error is set.
pub fn assert_settled_cleanly(controller: &SessionController) {
    assert_markers(&controller.record(), AuthStatus::Finished, FlowStatus::Finished);
    assert!(
        controller.login_error().is_none(),
        "Expected no login error, got {:?}",
        controller.login_error()
    );
}

/// Assert the controller settled as rejected with a login error
///
/// # Panics
///
/// Panics if the session is not `rejected`/`finished` or no login error is set.
pub fn assert_rejected(controller: &SessionController) {
    assert_markers(&controller.record(), AuthStatus::Rejected, FlowStatus::Finished);
    assert!(
        controller.login_error().is_some(),
        "Expected a login error after rejection"
    );
}

/// Assert the record is the default, unauthenticated one
///
/// # Panics
///
/// Panics if any field differs from `SessionRecord::default()`.
pub fn assert_default_record(record: &SessionRecord) {
    assert_eq!(record, &SessionRecord::default(), "Expected the default session record");
}
