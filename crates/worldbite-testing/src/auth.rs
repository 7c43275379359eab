//! Mock credentials for integration tests.
//!
//! `MockAuth` signs a real access token with the test secret so the
//! `CustomerIdentity` extractor accepts it; `MockRestaurant` produces the
//! `Authorization: CNPJ …` header.

use axum::http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;
use worldbite_auth_types::token::issue_access_token;

pub const TEST_JWT_SECRET: &str = "worldbite-test-secret";

pub struct MockAuth {
    pub user_id: Uuid,
    pub secret: String,
}

impl MockAuth {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            secret: TEST_JWT_SECRET.to_owned(),
        }
    }

    pub fn access_token(&self) -> String {
        issue_access_token(
            self.user_id,
            &self.secret,
            jsonwebtoken::get_current_timestamp(),
        )
        .unwrap()
    }

    /// `Authorization: Bearer <token>` header map.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.access_token())).unwrap(),
        );
        map
    }
}

pub struct MockRestaurant {
    pub tax_id: String,
}

impl MockRestaurant {
    pub fn new(tax_id: &str) -> Self {
        Self {
            tax_id: tax_id.to_owned(),
        }
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("CNPJ {}", self.tax_id)).unwrap(),
        );
        map
    }
}
