use sea_orm::entity::prelude::*;

use crate::contract::model::Rental;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rental")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub rental_id: i32,
    pub rental_date: DateTime,
    pub inventory_id: i32,
    pub customer_id: i32,
    pub return_date: Option<DateTime>,
    pub staff_id: i32,
    pub last_update: DateTime,
}

// No relation to `customer`: deleting a customer leaves its rentals in place.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Rental {
    fn from(m: Model) -> Self {
        Self {
            rental_id: m.rental_id,
            rental_date: m.rental_date,
            inventory_id: m.inventory_id,
            customer_id: m.customer_id,
            return_date: m.return_date,
            staff_id: m.staff_id,
            last_update: m.last_update,
        }
    }
}
