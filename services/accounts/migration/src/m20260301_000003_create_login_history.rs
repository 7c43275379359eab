use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoginHistory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoginHistory::UserId).uuid())
                    .col(ColumnDef::new(LoginHistory::Identifier).string().not_null())
                    .col(ColumnDef::new(LoginHistory::Reason).string().not_null())
                    .col(ColumnDef::new(LoginHistory::Success).boolean().not_null())
                    .col(ColumnDef::new(LoginHistory::Ip).string())
                    .col(ColumnDef::new(LoginHistory::UserAgent).text())
                    .col(
                        ColumnDef::new(LoginHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LoginHistory::Table, LoginHistory::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Suspicious-login lookups: a user's recent successful logins.
        manager
            .create_index(
                Index::create()
                    .table(LoginHistory::Table)
                    .col(LoginHistory::UserId)
                    .col(LoginHistory::CreatedAt)
                    .name("idx_login_history_user_id_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum LoginHistory {
    Table,
    Id,
    UserId,
    Identifier,
    Reason,
    Success,
    Ip,
    UserAgent,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
