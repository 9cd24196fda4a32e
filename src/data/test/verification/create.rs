use super::*;

/// Tests inserting a challenge for a user without one.
///
/// Expected: Ok(VerificationChallenge) with the stored fields
#[tokio::test]
async fn creates_challenge() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationRepository::new(db);
    let challenge = repo.create(param(123456789, "state-a")).await?;

    assert_eq!(challenge.discord_id, 123456789);
    assert_eq!(challenge.state, "state-a");
    assert_eq!(challenge.challenge, "verifier-123456789");

    Ok(())
}

/// Tests that a second challenge for the same Discord user is rejected.
///
/// Expected: Err with a unique constraint violation, first row untouched
#[tokio::test]
async fn rejects_second_challenge_for_same_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationRepository::new(db);
    repo.create(param(123456789, "state-a")).await?;

    let result = repo.create(param(123456789, "state-b")).await;

    let err = result.unwrap_err();
    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
    let stored = repo.find_by_discord_id(123456789).await?.unwrap();
    assert_eq!(stored.state, "state-a");

    Ok(())
}

/// Tests that two users cannot share a state value.
///
/// Expected: Err with a unique constraint violation
#[tokio::test]
async fn rejects_duplicate_state() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnVerification)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = VerificationRepository::new(db);
    repo.create(param(1, "shared")).await?;

    let result = repo.create(param(2, "shared")).await;

    assert!(result.is_err());

    Ok(())
}
