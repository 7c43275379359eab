use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::AddressRepository;
use crate::domain::types::Address;
use crate::error::AccountsError;

#[derive(Debug, Clone)]
pub struct AddressInput {
    pub nickname: Option<String>,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AddressPatch {
    pub nickname: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

pub struct AddressUseCase<A: AddressRepository> {
    pub addresses: A,
}

impl<A: AddressRepository> AddressUseCase<A> {
    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Address>, AccountsError> {
        self.addresses.list_by_user(user_id).await
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        input: AddressInput,
    ) -> Result<Address, AccountsError> {
        let address = Address {
            id: Uuid::now_v7(),
            user_id,
            nickname: input.nickname,
            street: input.street,
            number: input.number,
            complement: input.complement,
            district: input.district,
            city: input.city,
            state: input.state.to_uppercase(),
            postal_code: input.postal_code,
            created_at: Utc::now(),
        };
        self.addresses.create(&address).await?;
        Ok(address)
    }

    /// Missing and foreign addresses both fail with
    /// [`AccountsError::Forbidden`], so ids cannot be enumerated.
    pub async fn update(
        &self,
        user_id: Uuid,
        address_id: Uuid,
        patch: AddressPatch,
    ) -> Result<Address, AccountsError> {
        let mut address = self
            .addresses
            .find_by_id(address_id)
            .await?
            .filter(|a| a.user_id == user_id)
            .ok_or(AccountsError::Forbidden)?;

        if let Some(v) = patch.nickname {
            address.nickname = Some(v);
        }
        if let Some(v) = patch.street {
            address.street = v;
        }
        if let Some(v) = patch.number {
            address.number = v;
        }
        if let Some(v) = patch.complement {
            address.complement = Some(v);
        }
        if let Some(v) = patch.district {
            address.district = v;
        }
        if let Some(v) = patch.city {
            address.city = v;
        }
        if let Some(v) = patch.state {
            address.state = v.to_uppercase();
        }
        if let Some(v) = patch.postal_code {
            address.postal_code = v;
        }

        self.addresses.update(&address).await?;
        Ok(address)
    }

    pub async fn delete(&self, user_id: Uuid, address_id: Uuid) -> Result<(), AccountsError> {
        if self.addresses.delete(address_id, user_id).await? {
            Ok(())
        } else {
            Err(AccountsError::Forbidden)
        }
    }
}
