use super::*;

/// Tests removing a mapped role and removing it again.
///
/// Expected: Ok(true) then Ok(false)
#[tokio::test]
async fn deletes_mapping_once() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_role_mapping(db, "1001", "42").await?;
    factory::create_role_mapping(db, "1002", "42").await?;

    let repo = GaltinnRoleRepository::new(db);

    assert!(repo.delete(1001).await?);
    assert!(!repo.delete(1001).await?);

    let remaining = repo.get_all().await?;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].discord_role_id, RoleId::new(1002));

    Ok(())
}
