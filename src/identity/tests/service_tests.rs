//! Service orchestration tests for the user directory.

use std::sync::Arc;

use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::{GlobalRole, User, UserId, Username},
    services::{AccountService, AccountServiceError},
};
use rstest::{fixture, rstest};

type TestService = AccountService<InMemoryUserRepository>;

#[fixture]
fn service() -> TestService {
    AccountService::new(Arc::new(InMemoryUserRepository::new()))
}

fn admin() -> User {
    User::new(
        Username::new("root").expect("valid username"),
        GlobalRole::Admin,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn register_rejects_duplicate_username(service: TestService) {
    service
        .register("alice", GlobalRole::Member)
        .await
        .expect("first registration should succeed");

    let result = service.register("alice", GlobalRole::TeamLead).await;

    assert!(matches!(
        result,
        Err(AccountServiceError::UsernameTaken(name)) if name.as_str() == "alice"
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_global_role_requires_global_admin(service: TestService) {
    let target = service
        .register("bob", GlobalRole::Member)
        .await
        .expect("registration should succeed");
    let actor = service
        .register("carol", GlobalRole::TeamLead)
        .await
        .expect("registration should succeed");

    let result = service
        .change_global_role(&actor, target.id(), GlobalRole::Admin)
        .await;

    assert!(matches!(
        result,
        Err(AccountServiceError::RoleChangeRestricted)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_global_role_updates_manageable_roles(service: TestService) {
    let target = service
        .register("dave", GlobalRole::Member)
        .await
        .expect("registration should succeed");

    let updated = service
        .change_global_role(&admin(), target.id(), GlobalRole::DivisionHead)
        .await
        .expect("role change should succeed");

    assert_eq!(updated.global_role(), GlobalRole::DivisionHead);
    let fetched = service.find(target.id()).await.expect("user should exist");
    assert_eq!(fetched.global_role(), GlobalRole::DivisionHead);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_global_role_rejects_unmanageable_tier(service: TestService) {
    let target = service
        .register("erin", GlobalRole::Member)
        .await
        .expect("registration should succeed");

    let result = service
        .change_global_role(&admin(), target.id(), GlobalRole::TeamLead)
        .await;

    assert!(matches!(
        result,
        Err(AccountServiceError::UnassignableRole(GlobalRole::TeamLead))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_reports_missing_user(service: TestService) {
    let missing = UserId::new();
    let result = service.find(missing).await;
    assert!(matches!(
        result,
        Err(AccountServiceError::UserNotFound(id)) if id == missing
    ));
}
