use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserInfo::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserInfo::Name).string().not_null())
                    .col(ColumnDef::new(UserInfo::Email).string().not_null())
                    .col(ColumnDef::new(UserInfo::PasswordHash).string().not_null())
                    .col(ColumnDef::new(UserInfo::Roles).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Login identifiers are unique; concurrent registrations race here.
        manager
            .create_index(
                Index::create()
                    .name("idx_user_info_email")
                    .table(UserInfo::Table)
                    .col(UserInfo::Email)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserInfo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserInfo {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Roles,
}
