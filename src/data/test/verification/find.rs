use super::*;

/// Tests looking up a challenge by its opaque state.
///
/// Expected: Ok(Some) for the known state, Ok(None) for an unknown one
#[tokio::test]
async fn finds_by_state() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::verification::VerificationFactory::new(db)
        .discord_id("555")
        .state("known-state")
        .build()
        .await?;

    let repo = VerificationRepository::new(db);

    let found = repo.find_by_state("known-state").await?.unwrap();
    assert_eq!(found.discord_id, 555);
    assert_eq!(found.challenge, row.challenge);

    assert!(repo.find_by_state("unknown-state").await?.is_none());

    Ok(())
}

/// Tests that lookups return expired rows so callers can decide.
///
/// Expected: Ok(Some) with `is_expired(now)` true
#[tokio::test]
async fn returns_expired_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::create_expired_verification(db).await?;

    let repo = VerificationRepository::new(db);
    let found = repo.find_by_state(&row.state).await?.unwrap();

    assert!(found.is_expired(Utc::now()));

    Ok(())
}

/// Tests lookup by Discord id for a user without a challenge.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationRepository::new(db);

    assert!(repo.find_by_discord_id(999999999).await?.is_none());

    Ok(())
}
