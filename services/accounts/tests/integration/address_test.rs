use uuid::Uuid;

use worldbite_accounts::error::AccountsError;
use worldbite_accounts::usecase::address::{AddressInput, AddressPatch, AddressUseCase};

use crate::helpers::MockAddressRepo;

fn input() -> AddressInput {
    AddressInput {
        nickname: Some("Casa".into()),
        street: "Rua Augusta".into(),
        number: "1500".into(),
        complement: None,
        district: "Consolação".into(),
        city: "São Paulo".into(),
        state: "sp".into(),
        postal_code: "01304-001".into(),
    }
}

#[tokio::test]
async fn should_create_and_list_own_addresses() {
    let use_case = AddressUseCase {
        addresses: MockAddressRepo::default(),
    };
    let owner = Uuid::now_v7();

    let created = use_case.create(owner, input()).await.unwrap();
    assert_eq!(created.state, "SP");

    let listed = use_case.list(owner).await.unwrap();
    assert_eq!(listed, vec![created]);
    assert!(use_case.list(Uuid::now_v7()).await.unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_deleting_foreign_or_missing_address() {
    let repo = MockAddressRepo::default();
    let use_case = AddressUseCase {
        addresses: repo.clone(),
    };
    let owner = Uuid::now_v7();
    let stranger = Uuid::now_v7();
    let address = use_case.create(owner, input()).await.unwrap();

    let foreign = use_case.delete(stranger, address.id).await;
    assert!(matches!(foreign, Err(AccountsError::Forbidden)), "got {foreign:?}");
    let missing = use_case.delete(stranger, Uuid::now_v7()).await;
    assert!(matches!(missing, Err(AccountsError::Forbidden)), "got {missing:?}");
    assert_eq!(repo.addresses.lock().unwrap().len(), 1);

    use_case.delete(owner, address.id).await.unwrap();
    assert!(repo.addresses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_patch_only_given_fields() {
    let use_case = AddressUseCase {
        addresses: MockAddressRepo::default(),
    };
    let owner = Uuid::now_v7();
    let address = use_case.create(owner, input()).await.unwrap();

    let updated = use_case
        .update(
            owner,
            address.id,
            AddressPatch {
                number: Some("1502".into()),
                state: Some("rj".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.number, "1502");
    assert_eq!(updated.state, "RJ");
    assert_eq!(updated.street, "Rua Augusta");

    let foreign = use_case
        .update(Uuid::now_v7(), address.id, AddressPatch::default())
        .await;
    assert!(matches!(foreign, Err(AccountsError::Forbidden)), "got {foreign:?}");
}
