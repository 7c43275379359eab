use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use validator::Validate;
use worldbite_core::envelope::{Envelope, ok};
use worldbite_core::validate::ValidatedJson;
use worldbite_domain::contact::ContactIdentifier;

use crate::domain::types::CodePolicy;
use crate::error::AccountsError;
use crate::handlers::views::CodeSentView;
use crate::handlers::{parse_email, parse_phone};
use crate::state::AppState;
use crate::usecase::verification::{RequestCodeInput, RequestCodeUseCase};

#[derive(Debug, Deserialize, Validate)]
pub struct EmailCodeRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SmsCodeRequest {
    #[validate(length(min = 8, max = 20))]
    pub telefone: String,
}

pub async fn request_email_code(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<EmailCodeRequest>,
) -> Result<Json<Envelope<CodeSentView>>, AccountsError> {
    send_login_code(&state, parse_email(&body.email)?).await
}

pub async fn request_sms_code(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SmsCodeRequest>,
) -> Result<Json<Envelope<CodeSentView>>, AccountsError> {
    send_login_code(&state, parse_phone(&body.telefone)?).await
}

async fn send_login_code(
    state: &AppState,
    identifier: ContactIdentifier,
) -> Result<Json<Envelope<CodeSentView>>, AccountsError> {
    let use_case = RequestCodeUseCase {
        users: state.user_repo(),
        cache: state.code_cache(),
        expose_test_codes: state.expose_test_codes,
    };
    let out = use_case
        .execute(RequestCodeInput {
            identifier,
            policy: CodePolicy::Login,
        })
        .await?;
    Ok(ok(CodeSentView {
        enviado: true,
        codigo_para_teste: out.test_code,
    }))
}
