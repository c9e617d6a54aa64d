//! Ordered procurement stage pipeline for procurement-type tasks.

use super::error::ParseProcurementStageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages a procurement task moves through, in pipeline order.
///
/// Movement is partially monotonic around the tendering boundary: before
/// tendering a task may only move forward; once tendering is reached it
/// may move anywhere at or beyond the boundary, but never back before it.
/// Clearing the stage entirely is always allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcurementStage {
    /// Drafting the technical specification.
    #[serde(rename = "Specification Preparation")]
    SpecificationPreparation,
    /// Estimating the cost envelope.
    #[serde(rename = "Cost Estimation")]
    CostEstimation,
    /// Raising the formal demand.
    #[serde(rename = "Demand Initiation")]
    DemandInitiation,
    /// Open tendering; the monotonic boundary.
    Tendering,
    /// Tender committee evaluation.
    #[serde(rename = "TCEC")]
    Tcec,
    /// Contract negotiation committee.
    #[serde(rename = "CNC")]
    Cnc,
    /// Purchase order issued.
    #[serde(rename = "Purchase Order")]
    PurchaseOrder,
    /// Goods or services delivered.
    Delivery,
    /// Acceptance and issue to the indenting division.
    #[serde(rename = "Acceptance / IDIV Issue")]
    AcceptanceIdivIssue,
}

impl ProcurementStage {
    /// Every stage in pipeline order.
    pub const ALL: [Self; 9] = [
        Self::SpecificationPreparation,
        Self::CostEstimation,
        Self::DemandInitiation,
        Self::Tendering,
        Self::Tcec,
        Self::Cnc,
        Self::PurchaseOrder,
        Self::Delivery,
        Self::AcceptanceIdivIssue,
    ];

    const BOUNDARY: usize = Self::Tendering.index();

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpecificationPreparation => "Specification Preparation",
            Self::CostEstimation => "Cost Estimation",
            Self::DemandInitiation => "Demand Initiation",
            Self::Tendering => "Tendering",
            Self::Tcec => "TCEC",
            Self::Cnc => "CNC",
            Self::PurchaseOrder => "Purchase Order",
            Self::Delivery => "Delivery",
            Self::AcceptanceIdivIssue => "Acceptance / IDIV Issue",
        }
    }

    /// Returns this stage's position in the pipeline.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the pipeline permits moving from `self` to `target`.
    ///
    /// Before the tendering boundary only forward movement is allowed;
    /// from the boundary onward any stage at or past the boundary is
    /// reachable.
    #[must_use]
    pub const fn can_move_to(self, target: Self) -> bool {
        let from = self.index();
        let to = target.index();
        if from < Self::BOUNDARY {
            to >= from
        } else {
            to >= Self::BOUNDARY
        }
    }
}

impl fmt::Display for ProcurementStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProcurementStage {
    type Error = ParseProcurementStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == trimmed)
            .ok_or_else(|| ParseProcurementStageError(trimmed.to_owned()))
    }
}
