use worldbite_accounts::error::AccountsError;
use worldbite_accounts::infra::cache::MemoryCodeCache;
use worldbite_accounts::infra::password::verify_password;
use worldbite_accounts::usecase::profile::{
    ConfirmEmailVerificationUseCase, RequestEmailVerificationUseCase, SetPasswordInput,
    SetPasswordUseCase, UpdateProfileUseCase,
};
use worldbite_accounts::usecase::verification::RequestCodeUseCase;
use worldbite_domain::contact::ContactIdentifier;

use crate::helpers::{MockUserRepo, PASSWORD, email, user_with_password, verified_user};

#[tokio::test]
async fn should_set_first_password_without_current() {
    let user = verified_user(&email("ana@example.com"));
    let users = MockUserRepo::new(vec![user.clone()]);

    SetPasswordUseCase {
        users: users.clone(),
    }
    .execute(
        user.id,
        SetPasswordInput {
            current_password: None,
            new_password: "brand-new-pass".into(),
        },
    )
    .await
    .unwrap();

    let hash = users.get(user.id).password_hash.unwrap();
    assert!(verify_password("brand-new-pass", &hash));
}

#[tokio::test]
async fn should_require_current_password_to_replace_it() {
    let user = user_with_password(&email("ana@example.com"));
    let users = MockUserRepo::new(vec![user.clone()]);
    let use_case = SetPasswordUseCase {
        users: users.clone(),
    };

    let result = use_case
        .execute(
            user.id,
            SetPasswordInput {
                current_password: Some("not-it-at-all".into()),
                new_password: "brand-new-pass".into(),
            },
        )
        .await;
    assert!(
        matches!(result, Err(AccountsError::InvalidCredentials)),
        "got {result:?}"
    );

    use_case
        .execute(
            user.id,
            SetPasswordInput {
                current_password: Some(PASSWORD.into()),
                new_password: "brand-new-pass".into(),
            },
        )
        .await
        .unwrap();
    let hash = users.get(user.id).password_hash.unwrap();
    assert!(verify_password("brand-new-pass", &hash));
}

#[tokio::test]
async fn should_rename_user() {
    let user = verified_user(&email("ana@example.com"));
    let users = MockUserRepo::new(vec![user.clone()]);

    let updated = UpdateProfileUseCase {
        users: users.clone(),
    }
    .execute(user.id, "  Ana Lima ")
    .await
    .unwrap();
    assert_eq!(updated.name, "Ana Lima");
    assert_eq!(users.get(user.id).name, "Ana Lima");
}

#[tokio::test]
async fn should_verify_email_of_phone_signup() {
    let phone = ContactIdentifier::phone("+5511999990000").unwrap();
    let mut user = verified_user(&phone);
    user.email = Some("bia@example.com".into());
    let users = MockUserRepo::new(vec![user.clone()]);
    let cache = MemoryCodeCache::new();

    let out = RequestEmailVerificationUseCase {
        inner: RequestCodeUseCase {
            users: users.clone(),
            cache: cache.clone(),
            expose_test_codes: true,
        },
    }
    .execute(user.id)
    .await
    .unwrap();
    let code = out.test_code.unwrap();
    assert_eq!(code.len(), 8);

    let confirmed = ConfirmEmailVerificationUseCase {
        users: users.clone(),
        cache,
    }
    .execute(user.id, &code)
    .await
    .unwrap();
    assert!(confirmed.email_verified);
    assert!(users.get(user.id).phone_verified);
}

#[tokio::test]
async fn should_refuse_verifying_verified_email() {
    let user = verified_user(&email("ana@example.com"));
    let result = RequestEmailVerificationUseCase {
        inner: RequestCodeUseCase {
            users: MockUserRepo::new(vec![user.clone()]),
            cache: MemoryCodeCache::new(),
            expose_test_codes: true,
        },
    }
    .execute(user.id)
    .await;
    assert!(matches!(result, Err(AccountsError::Conflict(_))), "got {result:?}");
}
