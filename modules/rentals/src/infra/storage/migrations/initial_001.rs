//! Bootstraps `customer` and `rental` on an empty database. Existing Sakila
//! tables are left as they are.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Customer {
    Table,
    CustomerId,
    StoreId,
    FirstName,
    LastName,
    Email,
    AddressId,
    Active,
    CreateDate,
    LastUpdate,
}

#[derive(DeriveIden)]
enum Rental {
    Table,
    RentalId,
    RentalDate,
    InventoryId,
    CustomerId,
    ReturnDate,
    StaffId,
    LastUpdate,
}

const IDX_RENTAL_CUSTOMER: &str = "idx_rental_customer_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customer::CustomerId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customer::StoreId).integer().null())
                    .col(ColumnDef::new(Customer::FirstName).string_len(45).null())
                    .col(ColumnDef::new(Customer::LastName).string_len(45).null())
                    .col(ColumnDef::new(Customer::Email).string_len(50).null())
                    .col(ColumnDef::new(Customer::AddressId).integer().null())
                    .col(
                        ColumnDef::new(Customer::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Customer::CreateDate).date_time().not_null())
                    .col(ColumnDef::new(Customer::LastUpdate).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rental::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rental::RentalId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rental::RentalDate).date_time().not_null())
                    .col(ColumnDef::new(Rental::InventoryId).integer().not_null())
                    .col(ColumnDef::new(Rental::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Rental::ReturnDate).date_time().null())
                    .col(ColumnDef::new(Rental::StaffId).integer().not_null())
                    .col(ColumnDef::new(Rental::LastUpdate).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_RENTAL_CUSTOMER)
                    .table(Rental::Table)
                    .col(Rental::CustomerId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_RENTAL_CUSTOMER)
                    .table(Rental::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Rental::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customer::Table).to_owned())
            .await
    }
}
