use sea_orm::entity::prelude::*;

/// Placed order. Items, restaurant name and delivery address are snapshots
/// taken at placement; rows are never deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub restaurant_name: String,
    pub items: Json,
    /// `pickup` or `delivery`.
    pub delivery_type: String,
    /// `OrderStatus` in snake_case.
    pub status: String,
    #[sea_orm(column_type = "Char(Some(4))", nullable)]
    pub pickup_code: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub subtotal: BigDecimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub delivery_fee: Option<BigDecimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total: BigDecimal,
    pub notes: Option<String>,
    pub delivery_address: Option<Json>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurants::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurants::Column::Id"
    )]
    Restaurant,
    #[sea_orm(has_one = "super::invoices::Entity")]
    Invoice,
}

impl Related<super::restaurants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
