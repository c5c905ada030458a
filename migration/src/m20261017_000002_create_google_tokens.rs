use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per user: user_id is the primary key, and the OAuth callback
        // upserts on it.
        let create_table_sql = r#"
            CREATE TABLE IF NOT EXISTS google_tokens (
                user_id UUID PRIMARY KEY REFERENCES profiles(id) ON DELETE CASCADE,

                access_token TEXT NOT NULL,
                refresh_token TEXT,
                scope TEXT NOT NULL DEFAULT '',
                token_type VARCHAR(50) NOT NULL DEFAULT 'Bearer',
                expiry_date TIMESTAMPTZ,

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS google_tokens")
            .await?;

        Ok(())
    }
}
