use super::*;

/// Tests listing mappings ordered by organization.
///
/// Expected: mappings sorted by organization id, then role id
#[tokio::test]
async fn lists_mappings_in_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_role_mapping(db, "3003", "b").await?;
    factory::create_role_mapping(db, "1001", "a").await?;
    factory::create_role_mapping(db, "2002", "a").await?;

    let repo = GaltinnRoleRepository::new(db);
    let all = repo.get_all().await?;

    let pairs: Vec<(u64, &str)> = all
        .iter()
        .map(|m| (m.discord_role_id.get(), m.galtinn_org_id.as_str()))
        .collect();
    assert_eq!(pairs, vec![(1001, "a"), (2002, "a"), (3003, "b")]);

    Ok(())
}

/// Tests that a corrupted role id surfaces as an error.
///
/// Expected: Err(DbErr::Custom)
#[tokio::test]
async fn fails_on_unparseable_role_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GaltinnRole)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_role_mapping(db, "not-a-snowflake", "a").await?;

    let repo = GaltinnRoleRepository::new(db);

    assert!(matches!(repo.get_all().await, Err(DbErr::Custom(_))));

    Ok(())
}
