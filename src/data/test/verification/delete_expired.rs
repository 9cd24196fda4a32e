use super::*;

/// Tests that the sweep removes only expired challenges.
///
/// Expected: expired rows deleted, live row kept
#[tokio::test]
async fn deletes_only_expired_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let stale_a = factory::create_expired_verification(db).await?;
    let stale_b = factory::create_expired_verification(db).await?;
    let live = factory::create_verification(db).await?;

    let repo = VerificationRepository::new(db);
    let deleted = repo.delete_expired(Utc::now()).await?;

    assert_eq!(deleted, 2);
    assert!(repo.find_by_state(&stale_a.state).await?.is_none());
    assert!(repo.find_by_state(&stale_b.state).await?.is_none());
    assert!(repo.find_by_state(&live.state).await?.is_some());

    Ok(())
}

/// Tests the sweep on an empty table.
///
/// Expected: Ok(0)
#[tokio::test]
async fn sweeping_empty_table_deletes_nothing() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationRepository::new(db);

    assert_eq!(repo.delete_expired(Utc::now() + Duration::hours(1)).await?, 0);

    Ok(())
}
