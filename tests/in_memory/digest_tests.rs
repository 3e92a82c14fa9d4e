//! Integration tests for digest counter reconciliation.

use outreach::digest::{
    adapters::memory::InMemoryDigestCounterRepository,
    domain::DigestCounter,
    ports::DigestCounterRepository,
    services::DigestCounterMaintainer,
};
use outreach::engagement::domain::UserId;
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reconciliation_tolerates_decrements_from_other_flows() {
    let repo = Arc::new(InMemoryDigestCounterRepository::new());
    let maintainer = DigestCounterMaintainer::new(Arc::clone(&repo), 5);
    let user = UserId::new();

    // First reconciliation creates the row: 5 + (5 - 3) = 7.
    let created = maintainer.reconcile(user, 3).await.expect("first reconcile");
    assert_eq!(created.value(), "7");

    // A dashboard flow decrements the counter out-of-band.
    repo.upsert(&DigestCounter::new(user, 6)).await.expect("decrement");

    // The next reconciliation applies its delta on top of the stored value.
    let adjusted = maintainer.reconcile(user, 4).await.expect("second reconcile");
    assert_eq!(adjusted.value(), "7");
}
