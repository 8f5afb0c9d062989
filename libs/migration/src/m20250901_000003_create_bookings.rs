use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(big_pk_auto(Bookings::Id))
                    .col(timestamp(Bookings::StartDate))
                    .col(timestamp(Bookings::EndDate))
                    .col(big_integer(Bookings::ItemId))
                    .col(big_integer(Bookings::BookerId))
                    .col(string_len(Bookings::Status, 16))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_item")
                            .from(Bookings::Table, Bookings::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_booker")
                            .from(Bookings::Table, Bookings::BookerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_booker_id")
                    .table(Bookings::Table)
                    .col(Bookings::BookerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_item_id")
                    .table(Bookings::Table)
                    .col(Bookings::ItemId)
                    .to_owned(),
            )
            .await?;

        // Temporal bucket queries sort and filter on start_date
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_start_date")
                    .table(Bookings::Table)
                    .col(Bookings::StartDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Bookings {
    Table,
    Id,
    StartDate,
    EndDate,
    ItemId,
    BookerId,
    Status,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
