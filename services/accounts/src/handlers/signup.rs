use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use validator::Validate;
use worldbite_core::envelope::ok;
use worldbite_core::validate::ValidatedJson;

use crate::error::AccountsError;
use crate::handlers::views::UserView;
use crate::handlers::{parse_email, parse_phone};
use crate::state::AppState;
use crate::usecase::signup::{SignupInput, SignupUseCase};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 120))]
    pub nome: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 20))]
    pub telefone: Option<String>,
    pub senha: Option<String>,
}

#[derive(serde::Serialize)]
pub struct SignupResponse {
    pub usuario: UserView,
}

pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<SignupRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let input = SignupInput {
        name: body.nome,
        email: body.email.as_deref().map(parse_email).transpose()?,
        phone: body.telefone.as_deref().map(parse_phone).transpose()?,
        password: body.senha,
    };
    let use_case = SignupUseCase {
        users: state.user_repo(),
    };
    let user = use_case.execute(input).await?;
    Ok((
        StatusCode::CREATED,
        ok(SignupResponse {
            usuario: user.into(),
        }),
    ))
}
