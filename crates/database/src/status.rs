//! Application and document status enums with explicit transition rules.
//!
//! Statuses are closed variants, not free-form strings: every write goes
//! through [`LoanStatus::validate_transition`] or
//! [`DocumentStatus::validate_transition`], so a row can never hold an
//! illegal move such as `funded -> submitted`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle status of a loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum LoanStatus {
    Submitted,
    DocumentReview,
    Underwriting,
    Approved,
    Rejected,
    Funded,
}

impl LoanStatus {
    /// Text encoding used in the database and over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Submitted => "submitted",
            LoanStatus::DocumentReview => "document_review",
            LoanStatus::Underwriting => "underwriting",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Funded => "funded",
        }
    }

    /// Pipeline stage implied by this status, 1 through 5.
    ///
    /// `Rejected` has no stage of its own: a rejected application keeps the
    /// stage it had reached, so the stored stage is only ever written
    /// together with the status that implies it.
    pub fn stage(self) -> Option<i64> {
        match self {
            LoanStatus::Submitted => Some(1),
            LoanStatus::DocumentReview => Some(2),
            LoanStatus::Underwriting => Some(3),
            LoanStatus::Approved => Some(4),
            LoanStatus::Funded => Some(5),
            LoanStatus::Rejected => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition.
    pub fn can_transition(self, to: LoanStatus) -> bool {
        use LoanStatus::*;
        matches!(
            (self, to),
            (Submitted, DocumentReview)
                | (Submitted, Rejected)
                | (DocumentReview, Underwriting)
                | (DocumentReview, Rejected)
                | (Underwriting, Approved)
                | (Underwriting, Rejected)
                | (Approved, Funded)
                | (Approved, Rejected)
        )
    }

    /// Validate a transition, rejecting illegal moves.
    pub fn validate_transition(self, to: LoanStatus) -> Result<(), TransitionError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(TransitionError::Loan { from: self, to })
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(LoanStatus::Submitted),
            "document_review" => Ok(LoanStatus::DocumentReview),
            "underwriting" => Ok(LoanStatus::Underwriting),
            "approved" => Ok(LoanStatus::Approved),
            "rejected" => Ok(LoanStatus::Rejected),
            "funded" => Ok(LoanStatus::Funded),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Review status of a single loan document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum DocumentStatus {
    Missing,
    Processing,
    Approved,
    ReuploadNeeded,
}

impl DocumentStatus {
    /// Text encoding used in the database and over the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentStatus::Missing => "missing",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Approved => "approved",
            DocumentStatus::ReuploadNeeded => "reupload_needed",
        }
    }

    /// Whether moving from `self` to `to` is a legal transition.
    ///
    /// `Missing -> Processing` happens on upload, `Processing -> Approved`
    /// and `Processing -> ReuploadNeeded` on admin review, and
    /// `ReuploadNeeded -> Processing` on client re-upload.
    pub fn can_transition(self, to: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, to),
            (Missing, Processing)
                | (Processing, Approved)
                | (Processing, ReuploadNeeded)
                | (ReuploadNeeded, Processing)
        )
    }

    /// Validate a transition, rejecting illegal moves.
    pub fn validate_transition(self, to: DocumentStatus) -> Result<(), TransitionError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(TransitionError::Document { from: self, to })
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "missing" => Ok(DocumentStatus::Missing),
            "processing" => Ok(DocumentStatus::Processing),
            "approved" => Ok(DocumentStatus::Approved),
            "reupload_needed" => Ok(DocumentStatus::ReuploadNeeded),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A status string that does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// An attempted status move outside the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("illegal application status transition: {from} -> {to}")]
    Loan { from: LoanStatus, to: LoanStatus },

    #[error("illegal document status transition: {from} -> {to}")]
    Document {
        from: DocumentStatus,
        to: DocumentStatus,
    },
}
