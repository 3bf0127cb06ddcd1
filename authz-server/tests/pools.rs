mod common;

use authz_types::role::Effect;

use common::{policy, role, setup_with_storage};

#[tokio::test]
async fn pool_authorization_is_a_cross_role_union() {
    let (sdk, db, _tmpdir) = setup_with_storage().await;

    for pool in ["alpha", "beta"] {
        sqlx::query("INSERT INTO pools (name) VALUES (?)")
            .bind(pool)
            .execute(&db)
            .await
            .expect("seeding works");
    }

    sdk.roles
        .write(role(
            "granter",
            vec![policy(Effect::Allow, &["workflow:Create"], &["pool/alpha"])],
        ))
        .await
        .expect("role write works");
    sdk.roles
        .write(role(
            "revoker",
            vec![policy(Effect::Deny, &["workflow:Create"], &["pool/alpha"])],
        ))
        .await
        .expect("role write works");

    let resp = sdk
        .pools
        .allowed("u", "granter,revoker")
        .await
        .expect("pools call works");
    assert_eq!(resp.pools, vec!["alpha"]);

    let resp = sdk
        .pools
        .allowed("u", "revoker")
        .await
        .expect("pools call works");
    assert!(resp.pools.is_empty());
}

#[tokio::test]
async fn wildcard_grant_admits_every_pool_in_order() {
    let (sdk, db, _tmpdir) = setup_with_storage().await;

    for pool in ["alpha", "beta", "gamma"] {
        sqlx::query("INSERT INTO pools (name) VALUES (?)")
            .bind(pool)
            .execute(&db)
            .await
            .expect("seeding works");
    }

    sdk.roles
        .write(role(
            "creator",
            vec![policy(Effect::Allow, &["workflow:Create"], &["pool/*"])],
        ))
        .await
        .expect("role write works");

    let resp = sdk
        .pools
        .allowed("u", "creator")
        .await
        .expect("pools call works");
    assert_eq!(resp.pools, vec!["alpha", "beta", "gamma"]);
}
