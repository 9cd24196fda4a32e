use super::*;

/// Tests that deleting with a stale state leaves a newer challenge alone.
///
/// Expected: 0 rows deleted and the row still present
#[tokio::test]
async fn keeps_row_when_state_differs() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationRepository::new(db);
    repo.create(param(42, "current")).await?;

    let deleted = repo.delete(42, "previous").await?;

    assert_eq!(deleted, 0);
    assert!(repo.find_by_discord_id(42).await?.is_some());

    Ok(())
}

/// Tests deleting the challenge that carries the given state.
///
/// Expected: 1 row deleted
#[tokio::test]
async fn deletes_matching_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationRepository::new(db);
    repo.create(param(42, "current")).await?;

    assert_eq!(repo.delete(42, "current").await?, 1);
    assert!(repo.find_by_discord_id(42).await?.is_none());

    Ok(())
}

/// Tests that deleting by Discord id is idempotent.
///
/// Expected: 1 then 0 rows deleted
#[tokio::test]
async fn delete_by_discord_id_is_idempotent() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationRepository::new(db);
    repo.create(param(42, "current")).await?;

    assert_eq!(repo.delete_by_discord_id(42).await?, 1);
    assert_eq!(repo.delete_by_discord_id(42).await?, 0);

    Ok(())
}
