//! Service orchestration tests for the task lifecycle and its satellite
//! workflows.

use std::sync::Arc;

use crate::activity::adapters::memory::InMemoryActivityHub;
use crate::activity::domain::AuditEntry;
use crate::activity::ports::{AuditTrail, EventSinkError, NotificationSink};
use crate::identity::{
    adapters::memory::InMemoryUserRepository,
    domain::{GlobalRole, User, UserId, Username},
    ports::UserRepository,
};
use crate::task::{
    adapters::memory::{InMemoryAttachmentStore, InMemoryTaskRepository, keyed_name},
    domain::{Priority, TaskAssignment, TaskStatus, TaskType, TypeApprovalStatus},
    ports::{
        AttachmentKey, AttachmentStore, CommentRepository, CompletionRequestRepository,
        TaskRepository,
    },
    services::{
        CompletionService, CreateTask, ExtensionService, TaskFilter, TaskLifecycleService,
        TaskServiceError, TypeApprovalService,
    },
};
use crate::team::{
    adapters::memory::InMemoryTeamRepository,
    domain::{Team, TeamId, TeamMembership, TeamName, TeamRole},
    ports::TeamRepository,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type Lifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryTeamRepository,
    InMemoryUserRepository,
    InMemoryActivityHub,
    InMemoryActivityHub,
    DefaultClock,
>;
type TypeApprovals =
    TypeApprovalService<InMemoryTaskRepository, InMemoryTeamRepository, InMemoryActivityHub, DefaultClock>;
type Completions = CompletionService<
    InMemoryTaskRepository,
    InMemoryTeamRepository,
    InMemoryAttachmentStore,
    InMemoryActivityHub,
    DefaultClock,
>;
type Extensions =
    ExtensionService<InMemoryTaskRepository, InMemoryTeamRepository, InMemoryActivityHub, DefaultClock>;

struct Harness {
    teams: Arc<InMemoryTeamRepository>,
    users: Arc<InMemoryUserRepository>,
    tasks: Arc<InMemoryTaskRepository>,
    hub: Arc<InMemoryActivityHub>,
    attachments: Arc<InMemoryAttachmentStore>,
    lifecycle: Lifecycle,
    type_approvals: TypeApprovals,
    completions: Completions,
    extensions: Extensions,
}

#[fixture]
fn harness() -> Harness {
    let teams = Arc::new(InMemoryTeamRepository::new());
    let users = Arc::new(InMemoryUserRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let hub = Arc::new(InMemoryActivityHub::new());
    let attachments = Arc::new(InMemoryAttachmentStore::new());
    let clock = Arc::new(DefaultClock);
    let lifecycle = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&teams),
        Arc::clone(&users),
        Arc::clone(&hub),
        Arc::clone(&hub),
        Arc::clone(&clock),
    );
    let type_approvals = TypeApprovalService::new(
        Arc::clone(&tasks),
        Arc::clone(&teams),
        Arc::clone(&hub),
        Arc::clone(&clock),
    );
    let completions = CompletionService::new(
        Arc::clone(&tasks),
        Arc::clone(&teams),
        Arc::clone(&attachments),
        Arc::clone(&hub),
        Arc::clone(&clock),
    );
    let extensions = ExtensionService::new(
        Arc::clone(&tasks),
        Arc::clone(&teams),
        Arc::clone(&hub),
        Arc::clone(&clock),
    );
    Harness {
        teams,
        users,
        tasks,
        hub,
        attachments,
        lifecycle,
        type_approvals,
        completions,
        extensions,
    }
}

async fn stored_user(harness: &Harness, name: &str, role: GlobalRole) -> User {
    let user = User::new(Username::new(name).expect("valid username"), role);
    harness.users.store(&user).await.expect("user stores");
    user
}

async fn seeded_team(harness: &Harness, only_admins_assign: bool) -> Team {
    let mut team = Team::new(
        TeamName::new("ops").expect("valid team name"),
        UserId::new(),
        true,
        &DefaultClock,
    );
    team.set_only_admins_assign(only_admins_assign);
    harness.teams.store_team(&team).await.expect("team stores");
    team
}

async fn joined(harness: &Harness, user: &User, team: &Team, role: TeamRole) {
    harness
        .teams
        .add_member(&TeamMembership::new(
            user.id(),
            team.id(),
            role,
            &DefaultClock,
        ))
        .await
        .expect("membership stores");
}

fn payload(team: &Team, task_type: TaskType) -> CreateTask {
    CreateTask {
        title: "calibrate sensors".to_owned(),
        description: None,
        priority: Priority::Medium,
        due_date: None,
        task_type,
        activity_id: None,
        team_id: Some(team.id()),
        assigned_to: None,
        lead_person: None,
        percent_share: None,
        closure_approver: None,
        assignments: Vec::new(),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn member_created_procurement_task_awaits_both_gates(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;

    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Procurement))
        .await
        .expect("creation succeeds");

    assert!(!task.is_approved());
    assert_eq!(task.type_approval().status(), TypeApprovalStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_member_global_roles_are_auto_approved(harness: Harness) {
    let lead = stored_user(&harness, "lena", GlobalRole::TeamLead).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &lead, &team, TeamRole::Member).await;

    let task = harness
        .lifecycle
        .create(&lead, payload(&team, TaskType::Technical))
        .await
        .expect("creation succeeds");

    assert!(task.is_approved());
    // A privileged creator skips the type gate entirely.
    assert_eq!(
        task.type_approval().status(),
        TypeApprovalStatus::NotRequired
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unprivileged_assignment_fields_are_silently_dropped(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let peer = stored_user(&harness, "bob", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    joined(&harness, &peer, &team, TeamRole::Member).await;
    let mut request = payload(&team, TaskType::Normal);
    request.assigned_to = Some(peer.id());

    let task = harness
        .lifecycle
        .create(&member, request)
        .await
        .expect("creation succeeds without error");

    assert_eq!(task.assigned_to(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restricted_teams_reject_non_admin_assignment(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let peer = stored_user(&harness, "bob", GlobalRole::Member).await;
    let team = seeded_team(&harness, true).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    joined(&harness, &peer, &team, TeamRole::Member).await;
    let mut request = payload(&team, TaskType::Normal);
    request.assigned_to = Some(peer.id());

    let result = harness.lifecycle.create(&member, request).await;

    assert!(matches!(
        result,
        Err(TaskServiceError::AssignmentRestricted)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_create_tasks(harness: Harness) {
    let outsider = stored_user(&harness, "mallory", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;

    let result = harness
        .lifecycle
        .create(&outsider, payload(&team, TaskType::Normal))
        .await;

    assert!(matches!(result, Err(TaskServiceError::NotTeamMember)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plain_members_cannot_set_completed_directly(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");

    let moved = harness
        .lifecycle
        .update_status(&member, task.id(), TaskStatus::InProgress)
        .await
        .expect("ordinary move succeeds");
    assert_eq!(moved.status(), TaskStatus::InProgress);

    let result = harness
        .lifecycle
        .update_status(&member, task.id(), TaskStatus::Completed)
        .await;
    assert!(matches!(
        result,
        Err(TaskServiceError::DirectCompletionNotPermitted)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_admins_complete_directly(harness: Harness) {
    let admin = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &admin, &team, TeamRole::Admin).await;
    let task = harness
        .lifecycle
        .create(&admin, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");

    let completed = harness
        .lifecycle
        .update_status(&admin, task.id(), TaskStatus::Completed)
        .await
        .expect("admin completes directly");

    assert_eq!(completed.status(), TaskStatus::Completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_hides_unapproved_teams_and_repairs_stale_assignees(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let helper = stored_user(&harness, "bob", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Admin).await;
    joined(&harness, &helper, &team, TeamRole::Member).await;
    let mut request = payload(&team, TaskType::Normal);
    request.assigned_to = Some(helper.id());
    let task = harness
        .lifecycle
        .create(&member, request)
        .await
        .expect("creation succeeds");
    assert_eq!(task.assigned_to(), None, "team admin is not privileged");

    // Assign via a global admin, then drop the assignee's membership.
    let root = stored_user(&harness, "root", GlobalRole::Admin).await;
    harness
        .lifecycle
        .update_assignee(&root, task.id(), Some(helper.id()))
        .await
        .expect("assignment succeeds");
    harness
        .teams
        .remove_member(helper.id(), team.id())
        .await
        .expect("membership removes");

    let listed = harness
        .lifecycle
        .list(&member, TaskFilter::default())
        .await
        .expect("listing succeeds");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].assigned_to(), None);

    let persisted = harness
        .lifecycle
        .list(&member, TaskFilter::default())
        .await
        .expect("second listing succeeds");
    assert_eq!(persisted[0].assigned_to(), None);

    let stranger = stored_user(&harness, "zoe", GlobalRole::Member).await;
    let empty = harness
        .lifecycle
        .list(&stranger, TaskFilter::default())
        .await
        .expect("listing succeeds for outsiders");
    assert!(empty.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_applies_status_and_assignee_filters(harness: Harness) {
    let lead = stored_user(&harness, "lena", GlobalRole::TeamLead).await;
    let alice = stored_user(&harness, "alice", GlobalRole::Member).await;
    let bob = stored_user(&harness, "bob", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &lead, &team, TeamRole::Member).await;
    joined(&harness, &alice, &team, TeamRole::Member).await;
    joined(&harness, &bob, &team, TeamRole::Member).await;

    let mut solo = payload(&team, TaskType::Normal);
    solo.assigned_to = Some(alice.id());
    let solo = harness
        .lifecycle
        .create(&lead, solo)
        .await
        .expect("creation succeeds");
    harness
        .lifecycle
        .update_status(&lead, solo.id(), TaskStatus::InProgress)
        .await
        .expect("move succeeds");
    let mut shared = payload(&team, TaskType::Normal);
    shared.assignments = vec![
        TaskAssignment::new(alice.id(), None, true),
        TaskAssignment::new(bob.id(), None, false),
    ];
    let shared = harness
        .lifecycle
        .create(&lead, shared)
        .await
        .expect("creation succeeds");

    let in_progress = harness
        .lifecycle
        .list(
            &lead,
            TaskFilter {
                status: Some(TaskStatus::InProgress),
                ..TaskFilter::default()
            },
        )
        .await
        .expect("listing succeeds");
    assert_eq!(in_progress.len(), 1);
    assert_eq!(in_progress[0].id(), solo.id());

    // Bob appears only as a non-lead assignment row, so the filter must
    // look past the mirrored single assignee.
    let bobs = harness
        .lifecycle
        .list(
            &lead,
            TaskFilter {
                assigned_to: Some(bob.id()),
                ..TaskFilter::default()
            },
        )
        .await
        .expect("listing succeeds");
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].id(), shared.id());

    let alices = harness
        .lifecycle
        .list(
            &lead,
            TaskFilter {
                assigned_to: Some(alice.id()),
                ..TaskFilter::default()
            },
        )
        .await
        .expect("listing succeeds");
    assert_eq!(alices.len(), 2);

    let elsewhere = harness
        .lifecycle
        .list(
            &lead,
            TaskFilter {
                team_id: Some(TeamId::new()),
                ..TaskFilter::default()
            },
        )
        .await
        .expect("listing succeeds");
    assert!(elsewhere.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reassignment_is_global_admin_only(harness: Harness) {
    let admin = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &admin, &team, TeamRole::Admin).await;
    let task = harness
        .lifecycle
        .create(&admin, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");

    let result = harness
        .lifecycle
        .update_assignee(&admin, task.id(), Some(admin.id()))
        .await;

    assert!(matches!(
        result,
        Err(TaskServiceError::ReassignmentNotPermitted)
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn group_heads_cannot_decide_type_approvals(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let group_head = stored_user(&harness, "gina", GlobalRole::GroupHead).await;
    let team_lead = stored_user(&harness, "lena", GlobalRole::TeamLead).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Technical))
        .await
        .expect("creation succeeds");

    let refused = harness
        .type_approvals
        .decide(&group_head, task.id(), true)
        .await;
    assert!(matches!(
        refused,
        Err(TaskServiceError::TypeApprovalNotPermitted)
    ));

    let decided = harness
        .type_approvals
        .decide(&team_lead, task.id(), true)
        .await
        .expect("team lead decides");
    assert_eq!(
        decided.type_approval().status(),
        TypeApprovalStatus::Approved
    );

    let again = harness
        .type_approvals
        .decide(&team_lead, task.id(), false)
        .await;
    assert!(matches!(again, Err(TaskServiceError::Domain(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_snapshot_restores_on_rejection(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let admin = stored_user(&harness, "ada", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    joined(&harness, &admin, &team, TeamRole::Admin).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");
    harness
        .lifecycle
        .update_status(&member, task.id(), TaskStatus::InProgress)
        .await
        .expect("move succeeds");

    let request = harness
        .completions
        .submit(&member, task.id(), "proof.pdf", b"evidence")
        .await
        .expect("submission succeeds");
    let parked = harness
        .tasks
        .find(task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(parked.status(), TaskStatus::PendingCompletion);
    assert_eq!(request.previous_status(), TaskStatus::InProgress);

    let duplicate = harness
        .completions
        .submit(&member, task.id(), "proof.pdf", b"evidence")
        .await;
    assert!(matches!(
        duplicate,
        Err(TaskServiceError::CompletionPending(_))
    ));

    let refused = harness.completions.decide(&member, request.id(), false).await;
    assert!(matches!(refused, Err(TaskServiceError::TeamAdminRequired)));

    harness
        .completions
        .decide(&admin, request.id(), false)
        .await
        .expect("rejection succeeds");
    let restored = harness
        .tasks
        .find(task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(restored.status(), TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approved_completion_marks_the_task_completed(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let admin = stored_user(&harness, "ada", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    joined(&harness, &admin, &team, TeamRole::Admin).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");
    let request = harness
        .completions
        .submit(&member, task.id(), "proof.png", b"evidence")
        .await
        .expect("submission succeeds");

    // The stored proof is retrievable under the recorded reference.
    let stored = harness
        .attachments
        .open(&AttachmentKey::new(request.attachment()))
        .await
        .expect("proof opens");
    assert_eq!(stored, b"evidence");

    harness
        .completions
        .decide(&admin, request.id(), true)
        .await
        .expect("approval succeeds");

    let completed = harness
        .tasks
        .find(task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(completed.status(), TaskStatus::Completed);

    // A fresh submission is allowed once the previous one is decided.
    let fresh = harness
        .completions
        .submit(&member, task.id(), "proof.gif", b"more evidence")
        .await;
    assert!(fresh.is_ok());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conflicting_resubmission_stores_no_proof(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");
    harness
        .completions
        .submit(&member, task.id(), "proof.pdf", b"evidence")
        .await
        .expect("submission succeeds");

    let conflict = harness
        .completions
        .submit(&member, task.id(), "retry.pdf", b"second take")
        .await;
    assert!(matches!(
        conflict,
        Err(TaskServiceError::CompletionPending(_))
    ));

    // The conflicting proof never reached the attachment store.
    let orphan = harness
        .attachments
        .open(&AttachmentKey::new(keyed_name("retry.pdf", b"second take")))
        .await;
    assert!(orphan.is_err());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_rejects_bad_proof(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");

    let result = harness
        .completions
        .submit(&member, task.id(), "malware.exe", b"payload")
        .await;

    assert!(matches!(result, Err(TaskServiceError::Domain(_))));
    let untouched = harness
        .tasks
        .find(task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(untouched.status(), TaskStatus::ToDo);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn extension_defaults_to_first_team_admin_and_applies_override(harness: Harness) {
    let admin = stored_user(&harness, "ada", GlobalRole::Member).await;
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    // Join order matters: the first admin becomes the default approver.
    joined(&harness, &admin, &team, TeamRole::Admin).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");

    let asked = Utc::now() + Duration::days(7);
    let request = harness
        .extensions
        .request(&member, task.id(), "supplier delay", asked)
        .await
        .expect("request succeeds");
    assert_eq!(request.requested_to(), Some(admin.id()));

    let granted = Utc::now() + Duration::days(14);
    let decided = harness
        .extensions
        .decide(&admin, request.id(), true, Some(granted))
        .await
        .expect("approval succeeds");
    assert_eq!(decided.requested_due_date(), granted);

    let updated = harness
        .tasks
        .find(task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(updated.due_date(), Some(granted));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_extension_leaves_the_due_date_alone(harness: Harness) {
    let admin = stored_user(&harness, "ada", GlobalRole::Member).await;
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &admin, &team, TeamRole::Admin).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");

    let request = harness
        .extensions
        .request(&member, task.id(), "supplier delay", Utc::now() + Duration::days(7))
        .await
        .expect("request succeeds");
    harness
        .extensions
        .decide(&admin, request.id(), false, None)
        .await
        .expect("rejection succeeds");

    let untouched = harness
        .tasks
        .find(task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(untouched.due_date(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_extension_reason_is_rejected(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");

    let result = harness
        .extensions
        .request(&member, task.id(), "   ", Utc::now() + Duration::days(7))
        .await;

    assert!(matches!(result, Err(TaskServiceError::Domain(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn comments_are_member_gated_and_ordered(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let peer = stored_user(&harness, "bob", GlobalRole::Member).await;
    let outsider = stored_user(&harness, "mallory", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    joined(&harness, &peer, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");

    harness
        .lifecycle
        .post_comment(&member, task.id(), "kickoff notes")
        .await
        .expect("post succeeds");
    harness
        .lifecycle
        .post_comment(&peer, task.id(), "  supplier confirmed  ")
        .await
        .expect("post succeeds");

    let refused = harness
        .lifecycle
        .post_comment(&outsider, task.id(), "drive-by")
        .await;
    assert!(matches!(refused, Err(TaskServiceError::NotTeamMember)));
    let hidden = harness.lifecycle.list_comments(&outsider, task.id()).await;
    assert!(matches!(hidden, Err(TaskServiceError::NotTeamMember)));

    let blank = harness.lifecycle.post_comment(&member, task.id(), "   ").await;
    assert!(matches!(blank, Err(TaskServiceError::Domain(_))));

    let thread = harness
        .lifecycle
        .list_comments(&peer, task.id())
        .await
        .expect("listing succeeds");
    let contents: Vec<_> = thread.iter().map(|c| c.content().to_owned()).collect();
    assert_eq!(contents, ["kickoff notes", "supplier confirmed"]);
    assert_eq!(thread[0].author(), member.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_requests(harness: Harness) {
    let admin = stored_user(&harness, "ada", GlobalRole::Member).await;
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &admin, &team, TeamRole::Admin).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let task = harness
        .lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds");
    harness
        .completions
        .submit(&member, task.id(), "proof.pdf", b"evidence")
        .await
        .expect("submission succeeds");
    harness
        .lifecycle
        .post_comment(&member, task.id(), "done, see proof")
        .await
        .expect("post succeeds");

    harness
        .lifecycle
        .delete(&admin, task.id())
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
            .completions_for_task(task.id())
            .await
            .expect("lookup succeeds")
            .is_empty()
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

mockall::mock! {
    Sink {}

    #[async_trait]
    impl AuditTrail for Sink {
        async fn record(&self, entry: AuditEntry) -> Result<(), EventSinkError>;
    }

    #[async_trait]
    impl NotificationSink for Sink {
        async fn notify(&self, recipient: UserId, notice: &str) -> Result<(), EventSinkError>;
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sink_failures_never_fail_the_operation(harness: Harness) {
    let member = stored_user(&harness, "alice", GlobalRole::Member).await;
    let team = seeded_team(&harness, false).await;
    joined(&harness, &member, &team, TeamRole::Member).await;
    let mut sink = MockSink::new();
    sink.expect_record()
        .times(1..)
        .returning(|_| Err(EventSinkError::new(std::io::Error::other("sink down"))));
    let lifecycle = TaskLifecycleService::new(
        Arc::clone(&harness.tasks),
        Arc::clone(&harness.teams),
        Arc::clone(&harness.users),
        Arc::clone(&harness.hub),
        Arc::new(sink),
        Arc::new(DefaultClock),
    );

    let task = lifecycle
        .create(&member, payload(&team, TaskType::Normal))
        .await
        .expect("creation succeeds despite sink failures");

    assert_eq!(task.status(), TaskStatus::ToDo);
}
