use sea_orm::entity::prelude::*;

use crate::contract::model::Customer;

/// Sakila `customer` table, restricted to the columns this service owns.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub customer_id: i32,
    pub store_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address_id: Option<i32>,
    pub active: bool,
    pub create_date: DateTime,
    pub last_update: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(m: Model) -> Self {
        Self {
            customer_id: m.customer_id,
            store_id: m.store_id,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            address_id: m.address_id,
            active: m.active,
            create_date: m.create_date,
            last_update: m.last_update,
        }
    }
}
