//! Service orchestration tests for activities and message streams.

use std::sync::Arc;

use crate::activity::{
    adapters::memory::InMemoryActivityHub,
    domain::{ActivityKind, ActivityName},
    services::{ActivityService, ActivityServiceError},
};
use crate::identity::domain::{GlobalRole, User, Username};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Priority, Task, TaskComment, TaskDraft, TaskTitle, TaskType, TypeApproval},
    ports::{CommentRepository, TaskRepository},
};
use crate::team::{
    adapters::memory::InMemoryTeamRepository,
    domain::{Team, TeamMembership, TeamName, TeamRole},
    ports::TeamRepository,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Harness {
    teams: Arc<InMemoryTeamRepository>,
    tasks: Arc<InMemoryTaskRepository>,
    service: ActivityService<
        InMemoryActivityHub,
        InMemoryTeamRepository,
        InMemoryTaskRepository,
        InMemoryActivityHub,
        DefaultClock,
    >,
}

#[fixture]
fn harness() -> Harness {
    let hub = Arc::new(InMemoryActivityHub::new());
    let teams = Arc::new(InMemoryTeamRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let service = ActivityService::new(
        Arc::clone(&hub),
        Arc::clone(&teams),
        Arc::clone(&tasks),
        Arc::clone(&hub),
        Arc::new(DefaultClock),
    );
    Harness {
        teams,
        tasks,
        service,
    }
}

fn user(name: &str, role: GlobalRole) -> User {
    User::new(Username::new(name).expect("valid username"), role)
}

async fn seeded_team(harness: &Harness, member: &User, role: TeamRole) -> Team {
    let team = Team::new(
        TeamName::new("ops").expect("valid team name"),
        member.id(),
        true,
        &DefaultClock,
    );
    harness.teams.store_team(&team).await.expect("team stores");
    harness
        .teams
        .add_member(&TeamMembership::new(
            member.id(),
            team.id(),
            role,
            &DefaultClock,
        ))
        .await
        .expect("membership stores");
    team
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_create_activities(harness: Harness) {
    let member = user("alice", GlobalRole::Member);
    let outsider = user("bob", GlobalRole::Member);
    let team = seeded_team(&harness, &member, TeamRole::Member).await;

    let result = harness
        .service
        .create(
            &outsider,
            team.id(),
            ActivityName::new("launch prep").expect("valid name"),
            ActivityKind::Project,
        )
        .await;

    assert!(matches!(result, Err(ActivityServiceError::NotTeamMember)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn global_admin_creates_without_membership(harness: Harness) {
    let member = user("alice", GlobalRole::Member);
    let admin = user("root", GlobalRole::Admin);
    let team = seeded_team(&harness, &member, TeamRole::Member).await;

    let activity = harness
        .service
        .create(
            &admin,
            team.id(),
            ActivityName::new("launch prep").expect("valid name"),
            ActivityKind::Division,
        )
        .await
        .expect("creation succeeds");

    assert_eq!(activity.kind(), ActivityKind::Division);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_exchange_messages_in_order(harness: Harness) {
    let member = user("alice", GlobalRole::Member);
    let team = seeded_team(&harness, &member, TeamRole::Member).await;
    let activity = harness
        .service
        .create(
            &member,
            team.id(),
            ActivityName::new("launch prep").expect("valid name"),
            ActivityKind::Project,
        )
        .await
        .expect("creation succeeds");

    harness
        .service
        .post_message(&member, activity.id(), "first")
        .await
        .expect("post succeeds");
    harness
        .service
        .post_message(&member, activity.id(), "second")
        .await
        .expect("post succeeds");

    let stream = harness
        .service
        .list_messages(&member, activity.id())
        .await
        .expect("listing succeeds");
    let contents: Vec<_> = stream.iter().map(|m| m.content().to_owned()).collect();
    assert_eq!(contents, ["first", "second"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_author_edits_a_message(harness: Harness) {
    let author = user("alice", GlobalRole::Member);
    let peer = user("bob", GlobalRole::Member);
    let team = seeded_team(&harness, &author, TeamRole::Member).await;
    harness
        .teams
        .add_member(&TeamMembership::new(
            peer.id(),
            team.id(),
            TeamRole::Member,
            &DefaultClock,
        ))
        .await
        .expect("membership stores");
    let activity = harness
        .service
        .create(
            &author,
            team.id(),
            ActivityName::new("launch prep").expect("valid name"),
            ActivityKind::Project,
        )
        .await
        .expect("creation succeeds");
    let message = harness
        .service
        .post_message(&author, activity.id(), "draft")
        .await
        .expect("post succeeds");

    let result = harness
        .service
        .edit_message(&peer, message.id(), "hijacked")
        .await;

    assert!(matches!(result, Err(ActivityServiceError::NotMessageAuthor)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_requires_admin_and_clears_messages(harness: Harness) {
    let member = user("alice", GlobalRole::Member);
    let admin = user("root", GlobalRole::Admin);
    let team = seeded_team(&harness, &member, TeamRole::Member).await;
    let activity = harness
        .service
        .create(
            &member,
            team.id(),
            ActivityName::new("launch prep").expect("valid name"),
            ActivityKind::Project,
        )
        .await
        .expect("creation succeeds");
    harness
        .service
        .post_message(&member, activity.id(), "note")
        .await
        .expect("post succeeds");

    let refused = harness.service.delete(&member, activity.id()).await;
    assert!(matches!(
        refused,
        Err(ActivityServiceError::TeamAdminRequired)
    ));

    harness
        .service
        .delete(&admin, activity.id())
        .await
        .expect("deletion succeeds");
    let listed = harness
        .service
        .list(&admin, team.id())
        .await
        .expect("listing succeeds");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_cascades_over_tasks_and_their_comments(harness: Harness) {
    let member = user("alice", GlobalRole::Member);
    let admin = user("root", GlobalRole::Admin);
    let team = seeded_team(&harness, &member, TeamRole::Member).await;
    let activity = harness
        .service
        .create(
            &member,
            team.id(),
            ActivityName::new("launch prep").expect("valid name"),
            ActivityKind::Project,
        )
        .await
        .expect("creation succeeds");
    let draft = TaskDraft {
        title: TaskTitle::new("order parts").expect("valid title"),
        description: None,
        priority: Priority::Medium,
        due_date: None,
        task_type: TaskType::Normal,
        team_id: team.id(),
        activity_id: Some(activity.id()),
        created_by: member.id(),
        assigned_to: None,
        lead_person: None,
        percent_share: None,
        closure_approver: None,
        assignments: Vec::new(),
        is_approved: true,
        type_approval: TypeApproval::not_required(),
    };
    let task = Task::new(draft, &DefaultClock).expect("valid draft");
    harness.tasks.store(task.clone()).await.expect("task stores");
    let comment = TaskComment::new(task.id(), member.id(), "blocked on supplier", &DefaultClock)
        .expect("valid comment");
    harness
        .tasks
        .store_comment(comment)
        .await
        .expect("comment stores");

    harness
        .service
        .delete(&admin, activity.id())
        .await
        .expect("deletion succeeds");

    assert!(
        harness
            .tasks
            .find(task.id())
            .await
            .expect("lookup succeeds")
            .is_none()
    );
    assert!(
        harness
            .tasks
            .comments_for_task(task.id())
            .await
            .expect("lookup succeeds")
            .is_empty()
    );
}
