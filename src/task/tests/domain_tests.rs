//! Domain-focused tests for task types.

use crate::identity::domain::UserId;
use crate::task::domain::{
    MAX_PROOF_BYTES, PercentShare, Priority, Task, TaskAssignment, TaskDomainError, TaskDraft,
    TaskStatus, TaskTitle, TaskType, TypeApproval, TypeApprovalStatus, validate_proof,
};
use crate::team::domain::TeamId;
use mockable::DefaultClock;
use rstest::rstest;

fn draft(team_id: TeamId, created_by: UserId) -> TaskDraft {
    TaskDraft {
        title: TaskTitle::new("calibrate sensors").expect("valid title"),
        description: None,
        priority: Priority::Medium,
        due_date: None,
        task_type: TaskType::Normal,
        team_id,
        activity_id: None,
        created_by,
        assigned_to: None,
        lead_person: None,
        percent_share: None,
        closure_approver: None,
        assignments: Vec::new(),
        is_approved: true,
        type_approval: TypeApproval::not_required(),
    }
}

#[rstest]
#[case("To Do", TaskStatus::ToDo)]
#[case("In Progress", TaskStatus::InProgress)]
#[case("Completed", TaskStatus::Completed)]
#[case("Pending Completion", TaskStatus::PendingCompletion)]
fn task_status_parses_exact_literals(#[case] input: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(input), Ok(expected));
}

#[rstest]
fn pending_completion_is_not_a_direct_target() {
    assert!(!TaskStatus::PendingCompletion.is_direct_target());
    assert!(TaskStatus::Completed.is_direct_target());
}

#[rstest]
fn percent_share_is_bounded() {
    assert!(PercentShare::new(100).is_ok());
    assert_eq!(
        PercentShare::new(101),
        Err(TaskDomainError::InvalidPercentShare(101))
    );
}

#[rstest]
fn new_task_starts_in_to_do() {
    let task = Task::new(draft(TeamId::new(), UserId::new()), &DefaultClock)
        .expect("task builds");
    assert_eq!(task.status(), TaskStatus::ToDo);
    assert_eq!(task.procurement_stage(), None);
}

#[rstest]
fn multi_assign_rejects_two_leads() {
    let mut d = draft(TeamId::new(), UserId::new());
    d.assignments = vec![
        TaskAssignment::new(UserId::new(), None, true),
        TaskAssignment::new(UserId::new(), None, true),
    ];
    assert!(matches!(
        Task::new(d, &DefaultClock),
        Err(TaskDomainError::MultipleLeads)
    ));
}

#[rstest]
fn mirrored_assignee_prefers_the_lead() {
    let first = UserId::new();
    let lead = UserId::new();
    let mut d = draft(TeamId::new(), UserId::new());
    d.assignments = vec![
        TaskAssignment::new(first, Some(PercentShare::new(40).expect("valid share")), false),
        TaskAssignment::new(lead, Some(PercentShare::new(60).expect("valid share")), true),
    ];
    let task = Task::new(d, &DefaultClock).expect("task builds");
    assert_eq!(task.assigned_to(), Some(lead));
    assert_eq!(task.lead_person(), Some(lead));
}

#[rstest]
fn mirrored_assignee_falls_back_to_first_row() {
    let first = UserId::new();
    let mut d = draft(TeamId::new(), UserId::new());
    d.assignments = vec![
        TaskAssignment::new(first, None, false),
        TaskAssignment::new(UserId::new(), None, false),
    ];
    let task = Task::new(d, &DefaultClock).expect("task builds");
    assert_eq!(task.assigned_to(), Some(first));
}

#[rstest]
fn approve_is_idempotent() {
    let mut d = draft(TeamId::new(), UserId::new());
    d.is_approved = false;
    let mut task = Task::new(d, &DefaultClock).expect("task builds");
    assert!(task.approve(&DefaultClock));
    assert!(!task.approve(&DefaultClock));
    assert!(task.is_approved());
}

#[rstest]
fn type_approval_decides_once() {
    let mut d = draft(TeamId::new(), UserId::new());
    d.type_approval = TypeApproval::pending();
    d.task_type = TaskType::Technical;
    let mut task = Task::new(d, &DefaultClock).expect("task builds");
    let approver = UserId::new();

    task.decide_type(approver, true, &DefaultClock)
        .expect("pending gate decides");
    assert_eq!(task.type_approval().status(), TypeApprovalStatus::Approved);
    assert_eq!(task.type_approval().decided_by(), Some(approver));

    assert!(matches!(
        task.decide_type(approver, false, &DefaultClock),
        Err(TaskDomainError::TypeApprovalNotPending(
            TypeApprovalStatus::Approved
        ))
    ));
}

#[rstest]
#[case("report.pdf", true)]
#[case("photo.JPG", true)]
#[case("scan.jpeg", true)]
#[case("proof.docx", true)]
#[case("archive.zip", false)]
#[case("noextension", false)]
fn proof_extension_allow_list(#[case] filename: &str, #[case] accepted: bool) {
    assert_eq!(validate_proof(filename, 1024).is_ok(), accepted);
}

#[rstest]
fn proof_size_is_capped_at_ten_mebibytes() {
    assert!(validate_proof("report.pdf", MAX_PROOF_BYTES).is_ok());
    assert!(matches!(
        validate_proof("report.pdf", MAX_PROOF_BYTES + 1),
        Err(TaskDomainError::ProofTooLarge(_))
    ));
}
