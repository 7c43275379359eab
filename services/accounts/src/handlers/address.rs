use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use worldbite_auth_types::identity::CustomerIdentity;
use worldbite_core::envelope::{done, ok};
use worldbite_core::validate::ValidatedJson;

use crate::error::AccountsError;
use crate::handlers::views::AddressView;
use crate::state::AppState;
use crate::usecase::address::{AddressInput, AddressPatch, AddressUseCase};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAddressRequest {
    #[validate(length(max = 60))]
    pub apelido: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub rua: String,
    #[validate(length(min = 1, max = 20))]
    pub numero: String,
    #[validate(length(max = 120))]
    pub complemento: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub bairro: String,
    #[validate(length(min = 1, max = 120))]
    pub cidade: String,
    #[validate(length(equal = 2))]
    pub estado: String,
    #[validate(length(min = 8, max = 9))]
    pub cep: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAddressRequest {
    #[validate(length(max = 60))]
    pub apelido: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub rua: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub numero: Option<String>,
    #[validate(length(max = 120))]
    pub complemento: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub bairro: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub cidade: Option<String>,
    #[validate(length(equal = 2))]
    pub estado: Option<String>,
    #[validate(length(min = 8, max = 9))]
    pub cep: Option<String>,
}

#[derive(Serialize)]
pub struct AddressResponse {
    pub endereco: AddressView,
}

#[derive(Serialize)]
pub struct AddressListResponse {
    pub enderecos: Vec<AddressView>,
}

fn use_case(state: &AppState) -> AddressUseCase<crate::infra::db::DbAddressRepository> {
    AddressUseCase {
        addresses: state.address_repo(),
    }
}

pub async fn list_addresses(
    State(state): State<AppState>,
    identity: CustomerIdentity,
) -> Result<impl IntoResponse, AccountsError> {
    let addresses = use_case(&state).list(identity.user_id).await?;
    Ok(ok(AddressListResponse {
        enderecos: addresses.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_address(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    ValidatedJson(body): ValidatedJson<CreateAddressRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let input = AddressInput {
        nickname: body.apelido,
        street: body.rua,
        number: body.numero,
        complement: body.complemento,
        district: body.bairro,
        city: body.cidade,
        state: body.estado,
        postal_code: body.cep,
    };
    let address = use_case(&state).create(identity.user_id, input).await?;
    Ok((
        StatusCode::CREATED,
        ok(AddressResponse {
            endereco: address.into(),
        }),
    ))
}

pub async fn update_address(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    Path(address_id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateAddressRequest>,
) -> Result<impl IntoResponse, AccountsError> {
    let patch = AddressPatch {
        nickname: body.apelido,
        street: body.rua,
        number: body.numero,
        complement: body.complemento,
        district: body.bairro,
        city: body.cidade,
        state: body.estado,
        postal_code: body.cep,
    };
    let address = use_case(&state)
        .update(identity.user_id, address_id, patch)
        .await?;
    Ok(ok(AddressResponse {
        endereco: address.into(),
    }))
}

pub async fn delete_address(
    State(state): State<AppState>,
    identity: CustomerIdentity,
    Path(address_id): Path<Uuid>,
) -> Result<impl IntoResponse, AccountsError> {
    use_case(&state).delete(identity.user_id, address_id).await?;
    Ok(done())
}
