//! End-to-end flows through the public API, the way a view layer drives it.

use std::time::Duration;

use portal_core::{
    CurrentUser, Decision, NotificationInput, PortalState, Role, SessionUpdate, ViewGroup,
};
use uuid::Uuid;

#[tokio::test(start_paused = true)]
async fn sign_in_flow_notifies_and_redirects() {
    let state = PortalState::default();
    let mut toasts = state.notifications.subscribe();

    // Signed out: the login view renders, the creator area bounces to it.
    assert_eq!(state.decide(ViewGroup::Auth), Decision::Allow);
    assert_eq!(state.check_path("/creator/uploads").redirect_target(), Some("/login"));

    // Login form submits with a bad payload first.
    let bad = state.session.set_session(SessionUpdate { is_authenticated: true, current_user: None });
    assert!(bad.is_err());
    state
        .notifications
        .show(NotificationInput::error("Sign-in failed").with_title("Login").persistent())
        .unwrap();

    // Then succeeds.
    let user = CurrentUser::new(Uuid::new_v4(), Role::Creator);
    state.session.set_session(SessionUpdate::signed_in(user)).unwrap();
    state.notifications.dismiss_all();
    let welcome = state.notifications.show(NotificationInput::success("Welcome back")).unwrap();

    assert_eq!(state.decide(ViewGroup::Auth).redirect_target(), Some("/creator/dashboard"));
    assert!(state.check_path("/creator/uploads").is_allowed());
    assert_eq!(state.check_path("/consumer/library").redirect_target(), Some("/creator/dashboard"));
    assert!(state.check_path("/terms").is_allowed());

    toasts.mark_unchanged();
    assert_eq!(state.notifications.list().len(), 1);

    // Default lifetime is five seconds.
    tokio::time::sleep(Duration::from_millis(4999)).await;
    assert!(state.notifications.get(welcome).is_some());
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(state.notifications.is_empty());
    assert!(toasts.has_changed().unwrap());

    state.session.sign_out();
    assert!(state.decide(ViewGroup::Auth).is_allowed());
    state.shutdown();
}

#[tokio::test(start_paused = true)]
async fn toast_close_button_races_expiry() {
    let state = PortalState::default();
    let id = state.notifications.show(NotificationInput::info("Draft saved").with_duration_ms(200)).unwrap();

    // Close clicked just before expiry; the timer must not fire afterwards.
    tokio::time::sleep(Duration::from_millis(199)).await;
    assert!(state.notifications.dismiss(id));
    let later = state.notifications.show(NotificationInput::info("Published").persistent()).unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    let ids: Vec<_> = state.notifications.list().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![later]);
    assert!(!state.notifications.dismiss(id));
}

#[test]
fn dark_mode_is_independent_of_auth() {
    let state = PortalState::default();
    assert!(state.session.toggle_dark_mode());
    state.session.sign_in(CurrentUser::new(Uuid::new_v4(), Role::Consumer));
    state.session.set_dark_mode(false);

    let session = state.session.session();
    assert!(session.is_authenticated());
    assert!(!session.is_dark_mode());
    assert_eq!(state.decide(ViewGroup::ConsumerArea), Decision::Allow);
}
