mod common;

use authz_types::check::CheckRequest;

use common::setup_inmemory;

#[tokio::test]
async fn cache_stats_reflect_checks() {
    let sdk = setup_inmemory().await;

    let status = sdk.cache.status().await.expect("status works");
    assert!(status.enabled);
    assert_eq!(status.size, 0);

    let req = CheckRequest::new("GET", "/api/version", "anon", "");
    sdk.check.check(&req).await.expect("check works");
    sdk.check.check(&req).await.expect("check works");

    let status = sdk.cache.status().await.expect("status works");
    assert_eq!(status.size, 1);
    assert!(status.misses >= 1);
    assert!(status.hits >= 1);

    let cleared = sdk.cache.clear().await.expect("clear works");
    assert_eq!(cleared.cleared, 1);
    let status = sdk.cache.status().await.expect("status works");
    assert_eq!(status.size, 0);
}
