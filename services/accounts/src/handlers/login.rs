use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use validator::Validate;
use worldbite_auth_types::cookie::{
    clear_refresh_cookie, refresh_token_from, set_refresh_token_cookie,
};
use worldbite_core::envelope::{done, ok};
use worldbite_core::validate::ValidatedJson;

use crate::domain::types::ClientInfo;
use crate::error::AccountsError;
use crate::handlers::parse_identifier;
use crate::handlers::views::UserView;
use crate::state::AppState;
use crate::usecase::login::{Credential, LoginInput, LoginOutput, LoginUseCase};
use crate::usecase::session::{LogoutUseCase, RefreshTokenUseCase};
use crate::usecase::suspicious::SuspiciousLoginCheck;

#[derive(Debug, Deserialize, Validate)]
pub struct CodeLoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub identificador: String,
    #[validate(length(min = 4, max = 8))]
    pub codigo: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordLoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub identificador: String,
    #[validate(length(min = 1, max = 256))]
    pub senha: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Access-token expiry, unix seconds.
    pub expira_em: u64,
    pub usuario: UserView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    pub expira_em: u64,
}

pub async fn login_with_code(
    State(state): State<AppState>,
    jar: CookieJar,
    client: ClientInfo,
    ValidatedJson(body): ValidatedJson<CodeLoginRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let identifier = parse_identifier(&body.identificador)?;
    login(state, jar, client, identifier, Credential::Code(body.codigo)).await
}

pub async fn login_with_password(
    State(state): State<AppState>,
    jar: CookieJar,
    client: ClientInfo,
    ValidatedJson(body): ValidatedJson<PasswordLoginRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let identifier = parse_identifier(&body.identificador)?;
    login(state, jar, client, identifier, Credential::Password(body.senha)).await
}

async fn login(
    state: AppState,
    jar: CookieJar,
    client: ClientInfo,
    identifier: worldbite_domain::contact::ContactIdentifier,
    credential: Credential,
) -> Result<impl IntoResponse, AccountsError> {
    let use_case = LoginUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
        history: state.login_history_repo(),
        cache: state.code_cache(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let LoginOutput {
        user,
        session,
        login_id,
    } = use_case
        .execute(LoginInput {
            identifier,
            credential,
            client: client.clone(),
        })
        .await?;

    let check = SuspiciousLoginCheck {
        history: state.login_history_repo(),
        outbox: state.outbox_repo(),
    };
    let user_id = user.id;
    tokio::spawn(async move { check.run_logged(user_id, login_id, client).await });

    let jar = set_refresh_token_cookie(jar, session.refresh_token, state.cookie_domain.clone());
    Ok((
        jar,
        ok(LoginResponse {
            token: session.access_token,
            expira_em: session.access_token_exp,
            usuario: user.into(),
        }),
    ))
}

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AccountsError> {
    let token = refresh_token_from(&jar).ok_or(AccountsError::InvalidRefreshToken)?;
    let use_case = RefreshTokenUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = use_case.execute(&token).await?;
    Ok(ok(RefreshResponse {
        token: out.access_token,
        expira_em: out.access_token_exp,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AccountsError> {
    let token = refresh_token_from(&jar);
    let use_case = LogoutUseCase {
        sessions: state.session_repo(),
    };
    use_case.execute(token.as_deref()).await?;
    Ok((clear_refresh_cookie(jar, state.cookie_domain.clone()), done()))
}
