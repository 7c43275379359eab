use chrono::{Duration, Utc};

use worldbite_accounts::domain::types::{CodePolicy, LoginReason, User};
use worldbite_accounts::error::AccountsError;
use worldbite_accounts::usecase::login::{Credential, LoginInput};
use worldbite_accounts::usecase::verification::{RequestCodeInput, RequestCodeUseCase};
use worldbite_auth_types::token::validate_access_token;
use worldbite_domain::contact::ContactIdentifier;
use worldbite_testing::auth::TEST_JWT_SECRET;

use crate::helpers::{Harness, PASSWORD, client, email, user_with_password, verified_user};

fn password_login(identifier: &ContactIdentifier, password: &str) -> LoginInput {
    LoginInput {
        identifier: identifier.clone(),
        credential: Credential::Password(password.to_owned()),
        client: client("203.0.113.7", "Mozilla/5.0"),
    }
}

#[tokio::test]
async fn should_issue_tokens_and_session_on_password_login() {
    let id = email("ana@example.com");
    let user = user_with_password(&id);
    let h = Harness::new(vec![user.clone()]);

    let out = h.login().execute(password_login(&id, PASSWORD)).await.unwrap();

    let info = validate_access_token(&out.session.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, user.id);
    let sessions = h.sessions.sessions.lock().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, out.session.session_id);
    assert_eq!(sessions[0].refresh_token, out.session.refresh_token);
    assert_eq!(sessions[0].ip.as_deref(), Some("203.0.113.7"));
    assert_eq!(h.history.reasons(), vec![LoginReason::Success]);
    assert!(h.users.get(user.id).last_login.is_some());
}

#[tokio::test]
async fn should_lock_after_five_failures_even_with_right_password() {
    let id = email("ana@example.com");
    let user = user_with_password(&id);
    let h = Harness::new(vec![user.clone()]);

    for attempt in 1..=4 {
        let result = h.login().execute(password_login(&id, "wrong-password")).await;
        assert!(
            matches!(result, Err(AccountsError::InvalidCredentials)),
            "attempt {attempt}: {result:?}"
        );
    }
    let fifth = h.login().execute(password_login(&id, "wrong-password")).await;
    assert!(
        matches!(fifth, Err(AccountsError::AccountLocked { minutes: 30 })),
        "got {fifth:?}"
    );

    let sixth = h.login().execute(password_login(&id, PASSWORD)).await;
    match sixth {
        Err(e @ AccountsError::AccountLocked { .. }) => {
            assert!(e.to_string().contains("minute"), "{e}");
        }
        other => panic!("expected lockout, got {other:?}"),
    }
    assert_eq!(h.history.reasons().last(), Some(&LoginReason::AccountLocked));
    assert!(h.sessions.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_lock_when_failures_race_on_a_stale_count() {
    let id = email("ana@example.com");
    let user = user_with_password(&id);
    let h = Harness::new(vec![user.clone()]);
    h.users.freeze_reads();

    let mut results = Vec::new();
    for _ in 0..6 {
        results.push(h.login().execute(password_login(&id, "wrong-password")).await);
    }
    for (n, result) in results.iter().enumerate() {
        if n < 4 {
            assert!(matches!(result, Err(AccountsError::InvalidCredentials)), "{n}: {result:?}");
        } else {
            assert!(matches!(result, Err(AccountsError::AccountLocked { .. })), "{n}: {result:?}");
        }
    }
    let stored = h.users.get(user.id);
    assert_eq!(stored.failed_login_attempts, 5);
    assert!(stored.lock_remaining_minutes(Utc::now()).is_some());
}

#[tokio::test]
async fn should_round_remaining_lock_minutes_up() {
    let id = email("ana@example.com");
    let mut user = user_with_password(&id);
    user.failed_login_attempts = 5;
    user.locked_until = Some(Utc::now() + Duration::seconds(90));
    let h = Harness::new(vec![user]);

    let result = h.login().execute(password_login(&id, PASSWORD)).await;
    assert!(
        matches!(result, Err(AccountsError::AccountLocked { minutes: 2 })),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_log_in_once_lock_elapsed() {
    let id = email("ana@example.com");
    let mut user = user_with_password(&id);
    user.failed_login_attempts = 5;
    user.locked_until = Some(Utc::now() - Duration::minutes(1));
    let h = Harness::new(vec![user.clone()]);

    h.login().execute(password_login(&id, PASSWORD)).await.unwrap();

    let stored = h.users.get(user.id);
    assert_eq!(stored.failed_login_attempts, 0);
    assert!(stored.locked_until.is_none());
}

#[tokio::test]
async fn should_restart_failure_count_after_elapsed_lock() {
    let id = email("ana@example.com");
    let mut user = user_with_password(&id);
    user.failed_login_attempts = 5;
    user.locked_until = Some(Utc::now() - Duration::minutes(1));
    let h = Harness::new(vec![user.clone()]);

    let result = h.login().execute(password_login(&id, "wrong-password")).await;
    assert!(matches!(result, Err(AccountsError::InvalidCredentials)), "got {result:?}");
    assert_eq!(h.users.get(user.id).failed_login_attempts, 1);
}

#[tokio::test]
async fn should_record_unknown_user() {
    let h = Harness::new(vec![]);
    let id = email("nobody@example.com");

    let result = h.login().execute(password_login(&id, PASSWORD)).await;
    assert!(matches!(result, Err(AccountsError::UserNotFound)), "got {result:?}");

    let attempts = h.history.attempts.lock().unwrap();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].reason, LoginReason::UserNotFound);
    assert!(attempts[0].user_id.is_none());
    assert_eq!(attempts[0].identifier, "nobody@example.com");
}

#[tokio::test]
async fn should_refuse_inactive_account() {
    let id = email("ana@example.com");
    let mut user = user_with_password(&id);
    user.active = false;
    let h = Harness::new(vec![user]);

    let result = h.login().execute(password_login(&id, PASSWORD)).await;
    assert!(matches!(result, Err(AccountsError::AccountInactive)), "got {result:?}");
    assert_eq!(h.history.reasons(), vec![LoginReason::AccountInactive]);
}

#[tokio::test]
async fn should_report_missing_password() {
    let id = email("ana@example.com");
    let h = Harness::new(vec![verified_user(&id)]);

    let result = h.login().execute(password_login(&id, PASSWORD)).await;
    assert!(matches!(result, Err(AccountsError::PasswordNotSet)), "got {result:?}");
    assert_eq!(h.history.reasons(), vec![LoginReason::NoPassword]);
}

#[tokio::test]
async fn should_log_in_with_verification_code() {
    let id = ContactIdentifier::phone("+5511999990000").unwrap();
    let h = Harness::new(vec![User::new("Bia".into(), &id, Utc::now())]);
    let code = RequestCodeUseCase {
        users: h.users.clone(),
        cache: h.cache.clone(),
        expose_test_codes: true,
    }
    .execute(RequestCodeInput {
        identifier: id.clone(),
        policy: CodePolicy::Login,
    })
    .await
    .unwrap()
    .test_code
    .unwrap();

    let out = h
        .login()
        .execute(LoginInput {
            identifier: id.clone(),
            credential: Credential::Code(code.clone()),
            client: client("198.51.100.4", "okhttp/4.12"),
        })
        .await
        .unwrap();
    assert!(out.user.phone_verified);

    let replay = h
        .login()
        .execute(LoginInput {
            identifier: id,
            credential: Credential::Code(code),
            client: client("198.51.100.4", "okhttp/4.12"),
        })
        .await;
    assert!(matches!(replay, Err(AccountsError::NoActiveCode)), "got {replay:?}");
    assert_eq!(
        h.history.reasons(),
        vec![LoginReason::Success, LoginReason::NoActiveCode]
    );
}
