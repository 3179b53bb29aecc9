mod common;

use game_reviews_lib::database::repository::GamesRepository;
use game_reviews_lib::{Error, Game, GameReview};

#[tokio::test]
async fn writes_need_a_transaction() {
    let mut ctx = common::open_context().await;
    let mut game = Game::new("Mario Kart");

    let err = ctx.save(&mut game).await.unwrap_err();
    assert!(matches!(err, Error::TransactionRequired));
    assert_eq!(game.id, None);

    let err = ctx.delete_all::<Game>().await.unwrap_err();
    assert!(matches!(err, Error::TransactionRequired));
}

#[tokio::test]
async fn transaction_boundaries_are_checked() {
    let mut ctx = common::open_context().await;

    assert!(matches!(ctx.commit().await, Err(Error::TransactionRequired)));
    assert!(matches!(ctx.rollback().await, Err(Error::TransactionRequired)));

    ctx.begin().await.unwrap();
    assert!(ctx.is_active());
    assert!(matches!(ctx.begin().await, Err(Error::TransactionActive)));
    ctx.commit().await.unwrap();
    assert!(!ctx.is_active());
}

#[tokio::test]
async fn committed_writes_are_visible() {
    let mut ctx = common::open_context().await;
    ctx.begin().await.unwrap();
    let mut game = Game::new("F-Zero");
    let id = ctx.save(&mut game).await.unwrap();
    ctx.commit().await.unwrap();

    let stored = GamesRepository::find_by_id(ctx.connection(), id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "F-Zero");
    assert_eq!(stored, game);
}

#[tokio::test]
async fn rollback_discards_writes() {
    let mut ctx = common::open_context().await;
    ctx.begin().await.unwrap();
    let mut game = Game::new("F-Zero");
    ctx.save(&mut game).await.unwrap();
    assert!(ctx.is_managed(&game));
    ctx.rollback().await.unwrap();

    assert!(!ctx.is_managed(&game));
    assert_eq!(GamesRepository::count(ctx.connection()).await.unwrap(), 0);
}

#[tokio::test]
async fn dropping_the_context_discards_open_writes() {
    let mut ctx = common::open_context().await;
    let conn = ctx.connection().clone();

    ctx.begin().await.unwrap();
    let mut game = Game::new("Mario Kart");
    ctx.save(&mut game).await.unwrap();
    drop(ctx);

    assert_eq!(GamesRepository::count(&conn).await.unwrap(), 0);
}

#[tokio::test]
async fn saving_twice_keeps_the_first_key() {
    let mut ctx = common::open_context().await;
    ctx.begin().await.unwrap();

    let mut game = Game::new("Mario Kart");
    let first = ctx.save(&mut game).await.unwrap();
    let second = ctx.save(&mut game).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(game.id, Some(first));
    assert_eq!(ctx.count_games().await.unwrap(), 1);

    ctx.commit().await.unwrap();
}

#[tokio::test]
async fn clear_detaches_managed_records() {
    let mut ctx = common::open_context().await;
    ctx.begin().await.unwrap();

    let mut game = Game::new("Mario Kart");
    let game_id = ctx.save(&mut game).await.unwrap();
    let mut review = GameReview::for_game_id(game_id).with_score(0.9);
    ctx.save(&mut review).await.unwrap();
    assert_eq!(ctx.managed_count(), 2);

    ctx.clear();
    assert_eq!(ctx.managed_count(), 0);
    assert!(!ctx.is_managed(&game));

    // reads attach again
    let games = ctx.find_games().await.unwrap();
    assert!(ctx.is_managed(&games[0]));
    assert!(!ctx.is_managed(&review));

    ctx.commit().await.unwrap();
}

#[tokio::test]
async fn bulk_delete_detaches_only_its_kind() {
    let mut ctx = common::open_context().await;
    ctx.begin().await.unwrap();

    let mut game = Game::new("Mario Kart");
    let game_id = ctx.save(&mut game).await.unwrap();
    let mut review = GameReview::for_game_id(game_id);
    ctx.save(&mut review).await.unwrap();

    assert_eq!(ctx.delete_all::<GameReview>().await.unwrap(), 1);
    assert!(!ctx.is_managed(&review));
    assert!(ctx.is_managed(&game));

    assert_eq!(ctx.delete_all::<Game>().await.unwrap(), 1);
    assert_eq!(ctx.managed_count(), 0);
    ctx.commit().await.unwrap();
}

#[tokio::test]
async fn games_with_reviews_cannot_be_deleted_first() {
    let mut ctx = common::open_context().await;
    ctx.begin().await.unwrap();

    let mut game = Game::new("Mario Kart");
    let game_id = ctx.save(&mut game).await.unwrap();
    let mut review = GameReview::for_game_id(game_id);
    ctx.save(&mut review).await.unwrap();

    let err = ctx.delete_all::<Game>().await.unwrap_err();
    assert!(matches!(err, Error::Db(_)));
    ctx.rollback().await.unwrap();
}

#[tokio::test]
async fn single_result_lookup_checks_cardinality() {
    let mut ctx = common::open_context().await;
    ctx.begin().await.unwrap();

    let err = ctx.find_single_game_by_title("Mario Kart").await.unwrap_err();
    assert!(matches!(err, Error::NoResult { entity: "Game", .. }));

    ctx.save(&mut Game::new("Mario Kart")).await.unwrap();
    let found = ctx.find_single_game_by_title("Mario Kart").await.unwrap();
    assert_eq!(found.title, "Mario Kart");

    ctx.save(&mut Game::new("Mario Kart")).await.unwrap();
    let err = ctx.find_single_game_by_title("Mario Kart").await.unwrap_err();
    assert!(matches!(err, Error::NonUniqueResult { count: 2, .. }));

    ctx.commit().await.unwrap();
}

#[tokio::test]
async fn title_lookup_is_exact() {
    let mut ctx = common::open_context().await;
    ctx.begin().await.unwrap();
    ctx.save(&mut Game::new("Super Mario Brothers")).await.unwrap();

    assert!(ctx.find_games_by_title("Super Mario").await.unwrap().is_empty());
    assert_eq!(
        ctx.find_games_by_title("Super Mario Brothers").await.unwrap().len(),
        1
    );
    ctx.commit().await.unwrap();
}
