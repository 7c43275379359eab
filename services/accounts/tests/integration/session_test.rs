use uuid::Uuid;

use worldbite_accounts::error::AccountsError;
use worldbite_accounts::usecase::login::{Credential, LoginInput, LoginOutput};
use worldbite_accounts::usecase::profile::DeactivateAccountUseCase;
use worldbite_accounts::usecase::session::{
    ListSessionsUseCase, LogoutUseCase, RefreshTokenUseCase, RevokeSessionUseCase,
};
use worldbite_auth_types::token::validate_access_token;
use worldbite_domain::contact::ContactIdentifier;
use worldbite_testing::auth::TEST_JWT_SECRET;

use crate::helpers::{
    Harness, MockSessionRepo, MockUserRepo, PASSWORD, client, email, user_with_password,
};

async fn logged_in(h: &Harness, id: &ContactIdentifier) -> LoginOutput {
    h.login()
        .execute(LoginInput {
            identifier: id.clone(),
            credential: Credential::Password(PASSWORD.to_owned()),
            client: client("203.0.113.7", "Mozilla/5.0"),
        })
        .await
        .unwrap()
}

fn refresh(h: &Harness) -> RefreshTokenUseCase<MockUserRepo, MockSessionRepo> {
    RefreshTokenUseCase {
        users: h.users.clone(),
        sessions: h.sessions.clone(),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_mint_access_token_from_refresh_token() {
    let id = email("ana@example.com");
    let h = Harness::new(vec![user_with_password(&id)]);
    let login = logged_in(&h, &id).await;

    let out = refresh(&h).execute(&login.session.refresh_token).await.unwrap();
    assert_eq!(out.user_id, login.user.id);
    let info = validate_access_token(&out.access_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, login.user.id);
}

#[tokio::test]
async fn should_reject_access_token_as_refresh_token() {
    let id = email("ana@example.com");
    let h = Harness::new(vec![user_with_password(&id)]);
    let login = logged_in(&h, &id).await;

    let result = refresh(&h).execute(&login.session.access_token).await;
    assert!(
        matches!(result, Err(AccountsError::InvalidRefreshToken)),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_refuse_refresh_after_logout_and_allow_repeat_logout() {
    let id = email("ana@example.com");
    let h = Harness::new(vec![user_with_password(&id)]);
    let login = logged_in(&h, &id).await;
    let logout = LogoutUseCase {
        sessions: h.sessions.clone(),
    };

    logout.execute(Some(&login.session.refresh_token)).await.unwrap();
    logout.execute(Some(&login.session.refresh_token)).await.unwrap();
    logout.execute(None).await.unwrap();
    logout.execute(Some("never-issued")).await.unwrap();

    let result = refresh(&h).execute(&login.session.refresh_token).await;
    assert!(matches!(result, Err(AccountsError::InvalidSession)), "got {result:?}");
}

#[tokio::test]
async fn should_refuse_refresh_for_unverified_owner() {
    let id = email("ana@example.com");
    let mut user = user_with_password(&id);
    user.email_verified = false;
    let h = Harness::new(vec![user]);
    let login = logged_in(&h, &id).await;

    let result = refresh(&h).execute(&login.session.refresh_token).await;
    assert!(
        matches!(result, Err(AccountsError::AccountUnverified)),
        "got {result:?}"
    );
}

#[tokio::test]
async fn should_end_sessions_when_account_deactivated() {
    let id = email("ana@example.com");
    let h = Harness::new(vec![user_with_password(&id)]);
    let login = logged_in(&h, &id).await;

    DeactivateAccountUseCase {
        users: h.users.clone(),
        sessions: h.sessions.clone(),
    }
    .execute(login.user.id)
    .await
    .unwrap();

    assert!(!h.users.get(login.user.id).active);
    let result = refresh(&h).execute(&login.session.refresh_token).await;
    assert!(matches!(result, Err(AccountsError::InvalidSession)), "got {result:?}");
}

#[tokio::test]
async fn should_list_and_revoke_own_sessions_only() {
    let ana = email("ana@example.com");
    let bia = email("bia@example.com");
    let h = Harness::new(vec![user_with_password(&ana), user_with_password(&bia)]);
    let ana_login = logged_in(&h, &ana).await;
    let bia_login = logged_in(&h, &bia).await;

    let list = ListSessionsUseCase {
        sessions: h.sessions.clone(),
    };
    let sessions = list.execute(ana_login.user.id).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, ana_login.session.session_id);

    let revoke = RevokeSessionUseCase {
        sessions: h.sessions.clone(),
    };
    let foreign = revoke
        .execute(ana_login.user.id, bia_login.session.session_id)
        .await;
    assert!(matches!(foreign, Err(AccountsError::Forbidden)), "got {foreign:?}");
    let missing = revoke.execute(ana_login.user.id, Uuid::now_v7()).await;
    assert!(matches!(missing, Err(AccountsError::Forbidden)), "got {missing:?}");

    revoke
        .execute(ana_login.user.id, ana_login.session.session_id)
        .await
        .unwrap();
    assert!(list.execute(ana_login.user.id).await.unwrap().is_empty());
    assert_eq!(list.execute(bia_login.user.id).await.unwrap().len(), 1);
}
