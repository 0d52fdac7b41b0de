//! Loan document CRUD, upload bookkeeping and review transitions.

use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::LoanDocument;
use crate::status::DocumentStatus;
use crate::{activity, now_rfc3339};

/// Required document slots for a loan type, as `(document_type, display name)`.
///
/// Unknown loan types fall back to the identity and bank statement set.
pub fn required_documents(loan_type: &str) -> &'static [(&'static str, &'static str)] {
    match loan_type {
        "bridging" => &[
            ("proof_of_id", "Proof of ID"),
            ("proof_of_address", "Proof of address"),
            ("bank_statements", "Bank statements (3 months)"),
            ("property_details", "Property details"),
            ("exit_strategy", "Exit strategy"),
        ],
        "development" => &[
            ("proof_of_id", "Proof of ID"),
            ("proof_of_address", "Proof of address"),
            ("bank_statements", "Bank statements (3 months)"),
            ("development_appraisal", "Development appraisal"),
            ("schedule_of_works", "Schedule of works"),
            ("exit_strategy", "Exit strategy"),
        ],
        "commercial_mortgage" => &[
            ("proof_of_id", "Proof of ID"),
            ("proof_of_address", "Proof of address"),
            ("bank_statements", "Bank statements (6 months)"),
            ("business_accounts", "Business accounts (2 years)"),
            ("lease_agreements", "Lease agreements"),
        ],
        "business_loan" => &[
            ("proof_of_id", "Proof of ID"),
            ("bank_statements", "Bank statements (6 months)"),
            ("business_accounts", "Business accounts (2 years)"),
            ("management_accounts", "Management accounts"),
        ],
        _ => &[
            ("proof_of_id", "Proof of ID"),
            ("proof_of_address", "Proof of address"),
            ("bank_statements", "Bank statements (3 months)"),
        ],
    }
}

/// Create the required document slots for a new application, all `missing`.
///
/// Runs on the caller's connection so application creation stays atomic.
pub async fn create_documents_for(
    conn: &mut SqliteConnection,
    loan_id: &str,
    loan_type: &str,
) -> Result<()> {
    for (document_type, document_name) in required_documents(loan_type) {
        sqlx::query(
            r#"
            INSERT INTO loan_documents (id, loan_id, document_name, document_type, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(loan_id)
        .bind(document_name)
        .bind(document_type)
        .bind(DocumentStatus::Missing)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Get a document by ID.
pub async fn get_document(pool: &SqlitePool, id: &str) -> Result<LoanDocument> {
    sqlx::query_as::<_, LoanDocument>(
        r#"
        SELECT id, loan_id, document_name, document_type, status, file_path, uploaded_at
        FROM loan_documents
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "LoanDocument",
        id: id.to_string(),
    })
}

/// Find the document slot for a loan and document type.
pub async fn find_by_type(
    pool: &SqlitePool,
    loan_id: &str,
    document_type: &str,
) -> Result<LoanDocument> {
    sqlx::query_as::<_, LoanDocument>(
        r#"
        SELECT id, loan_id, document_name, document_type, status, file_path, uploaded_at
        FROM loan_documents
        WHERE loan_id = ? AND document_type = ?
        "#,
    )
    .bind(loan_id)
    .bind(document_type)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "LoanDocument",
        id: format!("{loan_id}/{document_type}"),
    })
}

/// A document joined with the account that owns its application.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentWithOwner {
    pub id: String,
    pub loan_id: String,
    pub document_name: String,
    pub document_type: String,
    pub status: DocumentStatus,
    pub file_path: Option<String>,
    pub uploaded_at: Option<String>,
    /// `user_id` of the owning application.
    pub owner_id: String,
}

/// Get a document together with its owning user, for ownership checks.
pub async fn get_document_with_owner(pool: &SqlitePool, id: &str) -> Result<DocumentWithOwner> {
    sqlx::query_as::<_, DocumentWithOwner>(
        r#"
        SELECT d.id, d.loan_id, d.document_name, d.document_type,
               d.status, d.file_path, d.uploaded_at,
               a.user_id AS owner_id
        FROM loan_documents d
        INNER JOIN loan_applications a ON a.id = d.loan_id
        WHERE d.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "LoanDocument",
        id: id.to_string(),
    })
}

/// List documents for an application.
pub async fn list_for_loan(pool: &SqlitePool, loan_id: &str) -> Result<Vec<LoanDocument>> {
    let docs = sqlx::query_as::<_, LoanDocument>(
        r#"
        SELECT id, loan_id, document_name, document_type, status, file_path, uploaded_at
        FROM loan_documents
        WHERE loan_id = ?
        ORDER BY document_name
        "#,
    )
    .bind(loan_id)
    .fetch_all(pool)
    .await?;

    Ok(docs)
}

/// Record a successful upload against a document slot.
///
/// Transitions `missing` or `reupload_needed` to `processing` and stores the
/// storage key. Must only be called after the blob write succeeded; if the
/// slot was concurrently transitioned by another writer the guarded update
/// affects no rows and `Conflict` is returned, leaving the row valid.
pub async fn mark_uploaded(
    pool: &SqlitePool,
    id: &str,
    file_path: &str,
) -> Result<LoanDocument> {
    let doc = get_document(pool, id).await?;
    doc.status.validate_transition(DocumentStatus::Processing)?;

    let now = now_rfc3339();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE loan_documents
        SET status = ?, file_path = ?, uploaded_at = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(DocumentStatus::Processing)
    .bind(file_path)
    .bind(&now)
    .bind(id)
    .bind(doc.status)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::Conflict {
            entity: "LoanDocument",
            id: id.to_string(),
        });
    }

    activity::record(
        &mut tx,
        &doc.loan_id,
        &format!("Document uploaded: {}", doc.document_name),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(document = %id, key = %file_path, "Recorded document upload");

    Ok(LoanDocument {
        status: DocumentStatus::Processing,
        file_path: Some(file_path.to_string()),
        uploaded_at: Some(now),
        ..doc
    })
}

/// Apply an admin review outcome to a document.
///
/// Only `processing -> approved` and `processing -> reupload_needed` are
/// review outcomes; anything else is rejected by the transition table.
pub async fn review(
    pool: &SqlitePool,
    id: &str,
    outcome: DocumentStatus,
) -> Result<LoanDocument> {
    if !matches!(
        outcome,
        DocumentStatus::Approved | DocumentStatus::ReuploadNeeded
    ) {
        return Err(DatabaseError::Transition(
            crate::status::TransitionError::Document {
                from: DocumentStatus::Processing,
                to: outcome,
            },
        ));
    }

    let doc = get_document(pool, id).await?;
    doc.status.validate_transition(outcome)?;

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE loan_documents
        SET status = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(outcome)
    .bind(id)
    .bind(doc.status)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::Conflict {
            entity: "LoanDocument",
            id: id.to_string(),
        });
    }

    let action = match outcome {
        DocumentStatus::Approved => "approved",
        _ => "returned for re-upload",
    };
    activity::record(
        &mut tx,
        &doc.loan_id,
        &format!("Document {}: {}", action, doc.document_name),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(document = %id, outcome = %outcome, "Reviewed document");

    Ok(LoanDocument {
        status: outcome,
        ..doc
    })
}

/// Count approved and total documents for an application.
pub async fn completion_counts(pool: &SqlitePool, loan_id: &str) -> Result<(i64, i64)> {
    let row = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COUNT(CASE WHEN status = 'approved' THEN 1 END) as approved,
            COUNT(*) as total
        FROM loan_documents
        WHERE loan_id = ?
        "#,
    )
    .bind(loan_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Completion percentage from approved/total counts. A presentation figure,
/// never stored.
pub fn completion_percentage(approved: i64, total: i64) -> u8 {
    if total <= 0 {
        return 0;
    }
    ((approved as f64 / total as f64) * 100.0).round() as u8
}

/// Count documents grouped by status.
pub async fn count_by_status(pool: &SqlitePool) -> Result<Vec<(DocumentStatus, i64)>> {
    let rows = sqlx::query_as::<_, (DocumentStatus, i64)>(
        r#"
        SELECT status, COUNT(*) as count
        FROM loan_documents
        GROUP BY status
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::tests::seed_user;
    use crate::application::{create_application, NewApplication};
    use crate::test_db;

    async fn seed_application(pool: &SqlitePool) -> crate::models::LoanApplication {
        seed_user(pool, "user-1").await;
        create_application(
            pool,
            NewApplication {
                user_id: "user-1".to_string(),
                loan_type: "bridging".to_string(),
                loan_amount: 120_000.0,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_mark_uploaded_transitions_missing_to_processing() {
        let db = test_db().await;
        let app = seed_application(db.pool()).await;
        let docs = list_for_loan(db.pool(), &app.id).await.unwrap();
        let doc = &docs[0];

        let (approved, total) = completion_counts(db.pool(), &app.id).await.unwrap();
        assert_eq!(approved, 0);
        let before = completion_percentage(approved, total);

        let updated = mark_uploaded(db.pool(), &doc.id, "documents/x/proof-1-id.pdf")
            .await
            .unwrap();
        assert_eq!(updated.status, DocumentStatus::Processing);
        assert_eq!(
            updated.file_path.as_deref(),
            Some("documents/x/proof-1-id.pdf")
        );
        assert!(updated.uploaded_at.is_some());

        // Approval moves the completion figure.
        review(db.pool(), &doc.id, DocumentStatus::Approved)
            .await
            .unwrap();
        let (approved, total) = completion_counts(db.pool(), &app.id).await.unwrap();
        assert!(completion_percentage(approved, total) > before);
    }

    #[tokio::test]
    async fn test_mark_uploaded_rejects_processing_slot() {
        let db = test_db().await;
        let app = seed_application(db.pool()).await;
        let docs = list_for_loan(db.pool(), &app.id).await.unwrap();
        let doc = &docs[0];

        mark_uploaded(db.pool(), &doc.id, "documents/a").await.unwrap();

        // A second upload against the same slot loses cleanly; the first
        // key survives and the row stays valid.
        let result = mark_uploaded(db.pool(), &doc.id, "documents/b").await;
        assert!(matches!(result, Err(DatabaseError::Transition(_))));

        let stored = get_document(db.pool(), &doc.id).await.unwrap();
        assert_eq!(stored.status, DocumentStatus::Processing);
        assert_eq!(stored.file_path.as_deref(), Some("documents/a"));
    }

    #[tokio::test]
    async fn test_reupload_cycle() {
        let db = test_db().await;
        let app = seed_application(db.pool()).await;
        let docs = list_for_loan(db.pool(), &app.id).await.unwrap();
        let doc = &docs[0];

        mark_uploaded(db.pool(), &doc.id, "documents/first")
            .await
            .unwrap();
        review(db.pool(), &doc.id, DocumentStatus::ReuploadNeeded)
            .await
            .unwrap();

        let again = mark_uploaded(db.pool(), &doc.id, "documents/second")
            .await
            .unwrap();
        assert_eq!(again.status, DocumentStatus::Processing);
        assert_eq!(again.file_path.as_deref(), Some("documents/second"));
    }

    #[tokio::test]
    async fn test_review_requires_processing() {
        let db = test_db().await;
        let app = seed_application(db.pool()).await;
        let docs = list_for_loan(db.pool(), &app.id).await.unwrap();
        let doc = &docs[0];

        // Still missing, nothing to review.
        let result = review(db.pool(), &doc.id, DocumentStatus::Approved).await;
        assert!(matches!(result, Err(DatabaseError::Transition(_))));

        // Review can only land on approved or reupload_needed.
        mark_uploaded(db.pool(), &doc.id, "documents/k").await.unwrap();
        let result = review(db.pool(), &doc.id, DocumentStatus::Missing).await;
        assert!(matches!(result, Err(DatabaseError::Transition(_))));
    }

    #[tokio::test]
    async fn test_get_document_with_owner() {
        let db = test_db().await;
        let app = seed_application(db.pool()).await;
        let docs = list_for_loan(db.pool(), &app.id).await.unwrap();

        let with_owner = get_document_with_owner(db.pool(), &docs[0].id)
            .await
            .unwrap();
        assert_eq!(with_owner.owner_id, "user-1");
        assert_eq!(with_owner.loan_id, app.id);
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(0, 5), 0);
        assert_eq!(completion_percentage(2, 5), 40);
        assert_eq!(completion_percentage(5, 5), 100);
    }

    #[test]
    fn test_required_documents_fallback() {
        assert!(!required_documents("unheard_of").is_empty());
        assert!(required_documents("development")
            .iter()
            .any(|(t, _)| *t == "development_appraisal"));
    }
}
