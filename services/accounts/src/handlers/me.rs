use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use worldbite_auth_types::cookie::clear_refresh_cookie;
use worldbite_auth_types::identity::CustomerIdentity;
use worldbite_core::envelope::{done, ok};
use worldbite_core::validate::ValidatedJson;
use worldbite_domain::pagination::PageRequest;

use crate::error::AccountsError;
use crate::handlers::views::{CodeSentView, LoginAttemptView, SessionView, UserView};
use crate::state::AppState;
use crate::usecase::profile::{
    ConfirmEmailVerificationUseCase, DeactivateAccountUseCase, GetProfileUseCase,
    ListLoginHistoryUseCase, RequestEmailVerificationUseCase, SetPasswordInput,
    SetPasswordUseCase, UpdateProfileUseCase,
};
use crate::usecase::session::{ListSessionsUseCase, RevokeSessionUseCase};
use crate::usecase::verification::RequestCodeUseCase;

#[derive(Serialize)]
pub struct UserResponse {
    pub usuario: UserView,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120))]
    pub nome: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetPasswordRequest {
    pub senha_atual: Option<String>,
    #[validate(length(max = 256))]
    pub nova_senha: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmEmailRequest {
    #[validate(length(min = 4, max = 8))]
    pub codigo: String,
}

#[derive(Serialize)]
pub struct SessionsResponse {
    pub sessoes: Vec<SessionView>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub historico: Vec<LoginAttemptView>,
}

pub async fn get_me(
    State(state): State<AppState>,
    identity: CustomerIdentity,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = use_case.execute(identity.user_id).await?;
    Ok(ok(UserResponse {
        usuario: user.into(),
    }))
}

pub async fn update_me(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = use_case.execute(identity.user_id, &body.nome).await?;
    Ok(ok(UserResponse {
        usuario: user.into(),
    }))
}

pub async fn delete_me(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    jar: CookieJar,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = DeactivateAccountUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
    };
    use_case.execute(identity.user_id).await?;
    Ok((clear_refresh_cookie(jar, state.cookie_domain.clone()), done()))
}

pub async fn set_password(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    ValidatedJson(body): ValidatedJson<SetPasswordRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = SetPasswordUseCase {
        users: state.user_repo(),
    };
    use_case
        .execute(
            identity.user_id,
            SetPasswordInput {
                current_password: body.senha_atual,
                new_password: body.nova_senha,
            },
        )
        .await?;
    Ok(done())
}

pub async fn request_email_verification(
    State(state): State<AppState>,
    identity: CustomerIdentity,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = RequestEmailVerificationUseCase {
        inner: RequestCodeUseCase {
            users: state.user_repo(),
            cache: state.code_cache(),
            expose_test_codes: state.expose_test_codes,
        },
    };
    let out = use_case.execute(identity.user_id).await?;
    Ok(ok(CodeSentView {
        enviado: true,
        codigo_para_teste: out.test_code,
    }))
}

pub async fn confirm_email_verification(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    ValidatedJson(body): ValidatedJson<ConfirmEmailRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = ConfirmEmailVerificationUseCase {
        users: state.user_repo(),
        cache: state.code_cache(),
    };
    let user = use_case.execute(identity.user_id, &body.codigo).await?;
    Ok(ok(UserResponse {
        usuario: user.into(),
    }))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    identity: CustomerIdentity,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = ListSessionsUseCase {
        sessions: state.session_repo(),
    };
    let sessions = use_case.execute(identity.user_id).await?;
    Ok(ok(SessionsResponse {
        sessoes: sessions.into_iter().map(Into::into).collect(),
    }))
}

pub async fn revoke_session(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = RevokeSessionUseCase {
        sessions: state.session_repo(),
    };
    use_case.execute(identity.user_id, session_id).await?;
    Ok(done())
}

pub async fn login_history(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    Query(page): Query<PageRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = ListLoginHistoryUseCase {
        history: state.login_history_repo(),
    };
    let attempts = use_case.execute(identity.user_id, page).await?;
    Ok(ok(HistoryResponse {
        historico: attempts.into_iter().map(Into::into).collect(),
    }))
}
