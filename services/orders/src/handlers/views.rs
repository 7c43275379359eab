use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use worldbite_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};
use worldbite_domain::dish::DishCategory;
use worldbite_domain::order::{DeliveryType, OrderStatus};

use crate::domain::types::{AddressSnapshot, Dish, Order, OrderItem, Restaurant};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantView {
    pub id: Uuid,
    pub nome: String,
    pub cnpj: String,
    pub endereco: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
    pub horario_funcionamento: Option<String>,
    pub taxa_entrega: BigDecimal,
    pub ativo: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub criado_em: DateTime<Utc>,
}

impl From<Restaurant> for RestaurantView {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id,
            nome: r.name,
            cnpj: r.tax_id,
            endereco: r.address,
            telefone: r.phone,
            email: r.email,
            horario_funcionamento: r.opening_hours,
            taxa_entrega: r.delivery_fee,
            ativo: r.active,
            criado_em: r.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishView {
    pub id: Uuid,
    pub restaurante_id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: BigDecimal,
    pub categoria: DishCategory,
    pub disponivel: bool,
}

impl From<Dish> for DishView {
    fn from(d: Dish) -> Self {
        Self {
            id: d.id,
            restaurante_id: d.restaurant_id,
            nome: d.name,
            descricao: d.description,
            preco: d.price,
            categoria: d.category,
            disponivel: d.available,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prato_id: Option<Uuid>,
    pub nome: String,
    pub preco_unitario: BigDecimal,
    pub quantidade: u32,
    pub total: BigDecimal,
}

impl From<OrderItem> for OrderItemView {
    fn from(i: OrderItem) -> Self {
        Self {
            total: i.line_total().with_scale(2),
            prato_id: i.dish_id,
            nome: i.name,
            preco_unitario: i.unit_price,
            quantidade: i.quantity,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apelido: Option<String>,
    pub rua: String,
    pub numero: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub cep: String,
}

impl From<AddressSnapshot> for AddressView {
    fn from(a: AddressSnapshot) -> Self {
        Self {
            apelido: a.nickname,
            rua: a.street,
            numero: a.number,
            complemento: a.complement,
            bairro: a.district,
            cidade: a.city,
            estado: a.state,
            cep: a.postal_code,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub restaurante_id: Uuid,
    pub restaurante_nome: String,
    pub itens: Vec<OrderItemView>,
    pub tipo_entrega: DeliveryType,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo_retirada: Option<String>,
    pub subtotal: BigDecimal,
    pub taxa_entrega: Option<BigDecimal>,
    pub total: BigDecimal,
    pub observacoes: Option<String>,
    pub endereco_entrega: Option<AddressView>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub criado_em: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub atualizado_em: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub concluido_em: Option<DateTime<Utc>>,
}

impl From<Order> for OrderView {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            cliente_id: o.customer_id,
            restaurante_id: o.restaurant_id,
            restaurante_nome: o.restaurant_name,
            itens: o.items.into_iter().map(Into::into).collect(),
            tipo_entrega: o.delivery_type,
            status: o.status,
            codigo_retirada: o.pickup_code,
            subtotal: o.subtotal,
            taxa_entrega: o.delivery_fee,
            total: o.total,
            observacoes: o.notes,
            endereco_entrega: o.delivery_address.map(Into::into),
            criado_em: o.created_at,
            atualizado_em: o.updated_at,
            concluido_em: o.completed_at,
        }
    }
}
