use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(big_pk_auto(Requests::Id))
                    .col(string_len(Requests::Description, 512))
                    .col(big_integer(Requests::RequesterId))
                    .col(timestamp(Requests::Created))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requests_requester")
                            .from(Requests::Table, Requests::RequesterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requests_requester_id")
                    .table(Requests::Table)
                    .col(Requests::RequesterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Requests::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Requests {
    Table,
    Id,
    Description,
    RequesterId,
    Created,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
