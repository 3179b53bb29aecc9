//! Creates the `game` and `game_review` tables.
//!
//! `game_review.game_id` references `game.id` without cascading: reviews have to
//! be removed before the game they point at.

use log::info;
use sea_orm_migration::prelude::*;

/// Title length bound, mirrored from the entity validation.
const TITLE_CHECK: &str = r#"length("title") BETWEEN 3 AND 50"#;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Game::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Game::Title)
                            .text()
                            .not_null()
                            .check(Expr::cust(TITLE_CHECK)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GameReview::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameReview::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameReview::Score).double().null())
                    .col(ColumnDef::new(GameReview::Note).text().null())
                    .col(ColumnDef::new(GameReview::GameId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_review_game")
                            .from(GameReview::Table, GameReview::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_review_game_id")
                    .table(GameReview::Table)
                    .col(GameReview::GameId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        info!("[MIGRATION] game and game_review tables created");
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // child first, the foreign key does not cascade
        manager
            .drop_table(Table::drop().table(GameReview::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Game::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
    Title,
}

#[derive(DeriveIden)]
enum GameReview {
    Table,
    Id,
    Score,
    Note,
    GameId,
}
