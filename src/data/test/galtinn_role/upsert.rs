use super::*;

/// Tests mapping a role for the first time.
///
/// Expected: Ok(RoleMapping) with both ids
#[tokio::test]
async fn creates_mapping() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GaltinnRoleRepository::new(db);
    let mapping = repo.upsert(1001, "42").await?;

    assert_eq!(mapping.discord_role_id, RoleId::new(1001));
    assert_eq!(mapping.galtinn_org_id, "42");

    Ok(())
}

/// Tests that mapping an already mapped role replaces the organization.
///
/// Expected: single row pointing at the new organization
#[tokio::test]
async fn replaces_existing_mapping() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_role_mapping(db, "1001", "42").await?;

    let repo = GaltinnRoleRepository::new(db);
    repo.upsert(1001, "43").await?;

    let all = repo.get_all().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].galtinn_org_id, "43");

    Ok(())
}
