//! SeaORM-backed implementations of the storage port.
//!
//! Both repositories are generic over `C: ConnectionTrait`, so they accept a
//! `DatabaseConnection` or a transaction.

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use db::query::{all_contains, paginate};
use query_core::{Page, PageRequest};
use sea_orm::{
    sea_query::Expr, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::contract::model::{Customer, CustomerFilter, CustomerPatch, Rental};
use crate::domain::repo::{CustomerInsert, CustomersRepository, RentalInsert, RentalsRepository};
use crate::infra::storage::entity::{customer, rental};

pub struct SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// `Set` for fields present in the patch, `NotSet` otherwise.
fn patch_to_active_model(patch: &CustomerPatch, last_update: NaiveDateTime) -> customer::ActiveModel {
    fn opt<T: Clone + Into<sea_orm::Value>>(v: &Option<T>) -> sea_orm::ActiveValue<T> {
        match v {
            Some(v) => Set(v.clone()),
            None => NotSet,
        }
    }

    customer::ActiveModel {
        customer_id: NotSet,
        store_id: opt(&patch.store_id),
        first_name: opt(&patch.first_name),
        last_name: opt(&patch.last_name),
        email: opt(&patch.email),
        address_id: opt(&patch.address_id),
        active: opt(&patch.active),
        create_date: NotSet,
        last_update: Set(last_update),
    }
}

#[async_trait]
impl<C> CustomersRepository for SeaOrmCustomersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, c: CustomerInsert) -> anyhow::Result<i32> {
        let m = customer::ActiveModel {
            customer_id: NotSet,
            store_id: Set(c.store_id),
            first_name: Set(c.first_name),
            last_name: Set(c.last_name),
            email: Set(c.email),
            address_id: Set(c.address_id),
            active: Set(c.active),
            create_date: Set(c.create_date),
            last_update: Set(c.last_update),
        };
        let res = customer::Entity::insert(m)
            .exec(&self.conn)
            .await
            .context("insert customer failed")?;
        Ok(res.last_insert_id)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Customer>> {
        let found = customer::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find customer failed")?;
        Ok(found.map(Into::into))
    }

    async fn query(
        &self,
        filter: &CustomerFilter,
        req: PageRequest,
    ) -> anyhow::Result<Page<Customer>> {
        let cond = all_contains([
            (customer::Column::FirstName, filter.first_name.as_ref()),
            (customer::Column::LastName, filter.last_name.as_ref()),
            (customer::Column::Email, filter.email.as_ref()),
        ]);
        let select = customer::Entity::find().filter(cond);
        paginate(select, &self.conn, customer::Column::CustomerId, req, Customer::from)
            .await
            .context("query customers failed")
    }

    async fn update(
        &self,
        id: i32,
        patch: &CustomerPatch,
        last_update: NaiveDateTime,
    ) -> anyhow::Result<bool> {
        let res = customer::Entity::update_many()
            .set(patch_to_active_model(patch, last_update))
            .filter(customer::Column::CustomerId.eq(id))
            .exec(&self.conn)
            .await
            .context("update customer failed")?;
        if res.rows_affected > 0 {
            return Ok(true);
        }
        // MySQL reports changed rows, not matched rows: an identical write
        // in the same second affects nothing.
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let res = customer::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete customer failed")?;
        Ok(res.rows_affected > 0)
    }
}

pub struct SeaOrmRentalsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmRentalsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> RentalsRepository for SeaOrmRentalsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, r: RentalInsert) -> anyhow::Result<i32> {
        let m = rental::ActiveModel {
            rental_id: NotSet,
            rental_date: Set(r.rental_date),
            inventory_id: Set(r.inventory_id),
            customer_id: Set(r.customer_id),
            return_date: Set(None),
            staff_id: Set(r.staff_id),
            last_update: Set(r.last_update),
        };
        let res = rental::Entity::insert(m)
            .exec(&self.conn)
            .await
            .context("insert rental failed")?;
        Ok(res.last_insert_id)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Rental>> {
        let found = rental::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find rental failed")?;
        Ok(found.map(Into::into))
    }

    async fn list_by_customer(&self, customer_id: i32) -> anyhow::Result<Vec<Rental>> {
        let rows = rental::Entity::find()
            .filter(rental::Column::CustomerId.eq(customer_id))
            .order_by_asc(rental::Column::RentalId)
            .all(&self.conn)
            .await
            .context("list rentals by customer failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn query(&self, req: PageRequest) -> anyhow::Result<Page<Rental>> {
        paginate(
            rental::Entity::find(),
            &self.conn,
            rental::Column::RentalId,
            req,
            Rental::from,
        )
        .await
        .context("query rentals failed")
    }

    async fn close_if_open(&self, id: i32, returned_at: NaiveDateTime) -> anyhow::Result<bool> {
        let res = rental::Entity::update_many()
            .col_expr(rental::Column::ReturnDate, Expr::value(returned_at))
            .col_expr(rental::Column::LastUpdate, Expr::value(returned_at))
            .filter(rental::Column::RentalId.eq(id))
            .filter(rental::Column::ReturnDate.is_null())
            .exec(&self.conn)
            .await
            .context("close rental failed")?;
        Ok(res.rows_affected == 1)
    }
}
