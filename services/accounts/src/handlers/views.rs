use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use worldbite_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};

use crate::domain::types::{Address, LoginAttempt, LoginReason, Session, User};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub email_verificado: bool,
    pub telefone_verificado: bool,
    pub possui_senha: bool,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub ultimo_login: Option<DateTime<Utc>>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub criado_em: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            possui_senha: u.password_hash.is_some(),
            nome: u.name,
            email: u.email,
            telefone: u.phone,
            email_verificado: u.email_verified,
            telefone_verificado: u.phone_verified,
            ultimo_login: u.last_login,
            criado_em: u.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub criada_em: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expira_em: DateTime<Utc>,
}

impl From<Session> for SessionView {
    fn from(s: Session) -> Self {
        Self {
            id: s.id,
            ip: s.ip,
            user_agent: s.user_agent,
            criada_em: s.created_at,
            expira_em: s.expires_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginAttemptView {
    pub id: Uuid,
    pub identificador: String,
    pub motivo: LoginReason,
    pub sucesso: bool,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub criado_em: DateTime<Utc>,
}

impl From<LoginAttempt> for LoginAttemptView {
    fn from(a: LoginAttempt) -> Self {
        Self {
            id: a.id,
            identificador: a.identifier,
            motivo: a.reason,
            sucesso: a.success,
            ip: a.ip,
            user_agent: a.user_agent,
            criado_em: a.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    pub id: Uuid,
    pub apelido: Option<String>,
    pub rua: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub criado_em: DateTime<Utc>,
}

impl From<Address> for AddressView {
    fn from(a: Address) -> Self {
        Self {
            id: a.id,
            apelido: a.nickname,
            rua: a.street,
            numero: a.number,
            complemento: a.complement,
            bairro: a.district,
            cidade: a.city,
            estado: a.state,
            cep: a.postal_code,
            criado_em: a.created_at,
        }
    }
}

/// Reply to a code request. `codigoParaTeste` only appears when test codes
/// are exposed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSentView {
    pub enviado: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo_para_teste: Option<String>,
}
