//! Domain-focused tests for activities and messages.

use crate::activity::domain::{
    ActivityDomainError, ActivityId, ActivityKind, ActivityMessage, ActivityName,
};
use crate::identity::domain::UserId;
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[case("Division", ActivityKind::Division)]
#[case(" Project ", ActivityKind::Project)]
fn activity_kind_parses_exact_literals(#[case] input: &str, #[case] expected: ActivityKind) {
    assert_eq!(ActivityKind::try_from(input), Ok(expected));
}

#[rstest]
fn activity_kind_rejects_lowercase_variant() {
    assert!(ActivityKind::try_from("division").is_err());
}

#[rstest]
fn activity_name_rejects_blank_value() {
    assert_eq!(
        ActivityName::new("   "),
        Err(ActivityDomainError::EmptyActivityName)
    );
}

#[rstest]
fn user_message_trims_content() {
    let message = ActivityMessage::user(
        ActivityId::new(),
        UserId::new(),
        "  status update  ",
        &DefaultClock,
    )
    .expect("valid message");
    assert_eq!(message.content(), "status update");
    assert!(message.author().is_some());
}

#[rstest]
fn system_message_cannot_be_edited() {
    let mut message = ActivityMessage::system(ActivityId::new(), "bob joined", &DefaultClock)
        .expect("valid message");
    assert_eq!(
        message.edit("tampered", &DefaultClock),
        Err(ActivityDomainError::SystemMessageImmutable)
    );
}

#[rstest]
fn blank_message_content_is_rejected() {
    assert_eq!(
        ActivityMessage::user(ActivityId::new(), UserId::new(), "   ", &DefaultClock),
        Err(ActivityDomainError::EmptyMessage)
    );
}
