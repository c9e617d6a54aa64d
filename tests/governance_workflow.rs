//! End-to-end governance scenarios exercised through the public API.

use std::sync::Arc;

use eyre::Result;
use foreman::activity::adapters::memory::InMemoryActivityHub;
use foreman::activity::domain::{ActivityKind, ActivityName};
use foreman::activity::services::ActivityService;
use foreman::error::ErrorKind;
use foreman::identity::adapters::memory::InMemoryUserRepository;
use foreman::identity::domain::{GlobalRole, User};
use foreman::identity::services::AccountService;
use foreman::task::adapters::memory::{InMemoryAttachmentStore, InMemoryTaskRepository};
use foreman::task::domain::{Priority, TaskStatus, TaskType, TypeApprovalStatus};
use foreman::task::services::{
    CompletionService, CreateTask, TaskFilter, TaskLifecycleService, TypeApprovalService,
};
use foreman::team::adapters::memory::InMemoryTeamRepository;
use foreman::team::domain::{TeamName, TeamRole};
use foreman::team::services::{TeamService, TeamServiceError};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

struct Stack {
    hub: Arc<InMemoryActivityHub>,
    accounts: AccountService<InMemoryUserRepository>,
    teams: TeamService<
        InMemoryTeamRepository,
        InMemoryUserRepository,
        InMemoryTaskRepository,
        InMemoryActivityHub,
        InMemoryActivityHub,
        DefaultClock,
    >,
    activities: ActivityService<
        InMemoryActivityHub,
        InMemoryTeamRepository,
        InMemoryTaskRepository,
        InMemoryActivityHub,
        DefaultClock,
    >,
    lifecycle: TaskLifecycleService<
        InMemoryTaskRepository,
        InMemoryTeamRepository,
        InMemoryUserRepository,
        InMemoryActivityHub,
        InMemoryActivityHub,
        DefaultClock,
    >,
    type_approvals: TypeApprovalService<
        InMemoryTaskRepository,
        InMemoryTeamRepository,
        InMemoryActivityHub,
        DefaultClock,
    >,
    completions: CompletionService<
        InMemoryTaskRepository,
        InMemoryTeamRepository,
        InMemoryAttachmentStore,
        InMemoryActivityHub,
        DefaultClock,
    >,
}

#[fixture]
fn stack() -> Stack {
    let users = Arc::new(InMemoryUserRepository::new());
    let team_repo = Arc::new(InMemoryTeamRepository::new());
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let hub = Arc::new(InMemoryActivityHub::new());
    let attachments = Arc::new(InMemoryAttachmentStore::new());
    let clock = Arc::new(DefaultClock);
    Stack {
        hub: Arc::clone(&hub),
        accounts: AccountService::new(Arc::clone(&users)),
        teams: TeamService::new(
            Arc::clone(&team_repo),
            Arc::clone(&users),
            Arc::clone(&tasks),
            Arc::clone(&hub),
            Arc::clone(&hub),
            Arc::clone(&clock),
        ),
        activities: ActivityService::new(
            Arc::clone(&hub),
            Arc::clone(&team_repo),
            Arc::clone(&tasks),
            Arc::clone(&hub),
            Arc::clone(&clock),
        ),
        lifecycle: TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&team_repo),
            Arc::clone(&users),
            Arc::clone(&hub),
            Arc::clone(&hub),
            Arc::clone(&clock),
        ),
        type_approvals: TypeApprovalService::new(
            Arc::clone(&tasks),
            Arc::clone(&team_repo),
            Arc::clone(&hub),
            Arc::clone(&clock),
        ),
        completions: CompletionService::new(
            Arc::clone(&tasks),
            Arc::clone(&team_repo),
            attachments,
            Arc::clone(&hub),
            clock,
        ),
    }
}

async fn registered(stack: &Stack, name: &str, role: GlobalRole) -> Result<User> {
    Ok(stack.accounts.register(name, role).await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn procurement_task_runs_the_full_approval_pipeline(stack: Stack) -> Result<()> {
    let root = registered(&stack, "root", GlobalRole::Admin).await?;
    let founder = registered(&stack, "founder", GlobalRole::Member).await?;
    let engineer = registered(&stack, "engineer", GlobalRole::Member).await?;

    // A member-founded team waits for global approval.
    let team = stack
        .teams
        .create_team(&founder, TeamName::new("procurement")?, false)
        .await?;
    assert!(!team.is_approved());
    let team = stack.teams.approve_team(&root, team.id()).await?;
    assert!(team.is_approved());

    // The founder, now the team admin, brings the engineer in.
    let invitation = stack
        .teams
        .invite(&founder, team.id(), engineer.id(), TeamRole::Member)
        .await?;
    stack
        .teams
        .respond_to_invitation(&engineer, invitation.id(), true)
        .await?;

    let activity = stack
        .activities
        .create(
            &founder,
            team.id(),
            ActivityName::new("lab refit")?,
            ActivityKind::Project,
        )
        .await?;

    // An unprivileged creator's procurement task waits on both gates.
    let task = stack
        .lifecycle
        .create(
            &engineer,
            CreateTask {
                title: "buy oscilloscope".to_owned(),
                description: Some("replacement for bench 3".to_owned()),
                priority: Priority::High,
                due_date: None,
                task_type: TaskType::Procurement,
                activity_id: Some(activity.id()),
                team_id: None,
                assigned_to: None,
                lead_person: None,
                percent_share: None,
                closure_approver: None,
                assignments: Vec::new(),
            },
        )
        .await?;
    assert!(!task.is_approved());
    assert_eq!(task.type_approval().status(), TypeApprovalStatus::Pending);

    let task = stack.lifecycle.approve(&root, task.id()).await?;
    assert!(task.is_approved());
    let task = stack.type_approvals.decide(&root, task.id(), true).await?;
    assert_eq!(task.type_approval().status(), TypeApprovalStatus::Approved);

    // Proof-backed completion, decided by the team admin.
    let request = stack
        .completions
        .submit(&engineer, task.id(), "invoice.pdf", b"scanned invoice")
        .await?;
    let request = stack.completions.decide(&founder, request.id(), true).await?;
    assert_eq!(request.decided_by(), Some(founder.id()));

    let visible = stack.lifecycle.list(&engineer, TaskFilter::default()).await?;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].status(), TaskStatus::Completed);

    // Lifecycle changes land in the activity stream and the audit trail.
    let stream = stack.activities.list_messages(&engineer, activity.id()).await?;
    assert!(!stream.is_empty());
    let actions: Vec<String> = stack
        .hub
        .audit_entries()
        .into_iter()
        .map(|entry| entry.action().to_owned())
        .collect();
    assert!(actions.iter().any(|action| action == "task.create"));
    assert!(actions.iter().any(|action| action == "task.completion_decision"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn member_removal_unassigns_and_deletion_is_guarded(stack: Stack) -> Result<()> {
    let root = registered(&stack, "root", GlobalRole::Admin).await?;
    let founder = registered(&stack, "founder", GlobalRole::Member).await?;
    let engineer = registered(&stack, "engineer", GlobalRole::Member).await?;

    let team = stack
        .teams
        .create_team(&founder, TeamName::new("ops")?, false)
        .await?;
    let team = stack.teams.approve_team(&root, team.id()).await?;
    stack
        .teams
        .add_member(&root, team.id(), engineer.id(), TeamRole::Member)
        .await?;

    let task = stack
        .lifecycle
        .create(
            &root,
            CreateTask {
                title: "rotate backups".to_owned(),
                description: None,
                priority: Priority::Low,
                due_date: None,
                task_type: TaskType::Normal,
                activity_id: None,
                team_id: Some(team.id()),
                assigned_to: Some(engineer.id()),
                lead_person: None,
                percent_share: None,
                closure_approver: None,
                assignments: Vec::new(),
            },
        )
        .await?;
    assert_eq!(task.assigned_to(), Some(engineer.id()));

    // A populated team cannot be deleted.
    let refused = stack.teams.delete_team(&root, team.id()).await;
    match refused {
        Err(err @ TeamServiceError::TeamNotEmpty(_)) => {
            assert_eq!(err.kind(), ErrorKind::InvalidState);
        }
        other => panic!("expected TeamNotEmpty, got {other:?}"),
    }

    stack
        .teams
        .remove_member(&founder, team.id(), engineer.id())
        .await?;
    let tasks = stack.lifecycle.list(&founder, TaskFilter::default()).await?;
    assert_eq!(tasks[0].assigned_to(), None);

    // The founder is the last team admin and stays put.
    let last_admin = stack
        .teams
        .remove_member(&founder, team.id(), founder.id())
        .await;
    assert!(matches!(last_admin, Err(TeamServiceError::LastTeamAdmin(_))));
    Ok(())
}
