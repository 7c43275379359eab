use sea_orm::entity::prelude::*;

/// Restaurant registered on the platform. `tax_id` (CNPJ digits) doubles as
/// the restaurant's login for restaurant-scoped endpoints.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub tax_id: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub opening_hours: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub delivery_fee: BigDecimal,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dishes::Entity")]
    Dishes,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::dishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dishes.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
