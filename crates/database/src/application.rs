//! Loan application CRUD and status transitions.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::LoanApplication;
use crate::status::LoanStatus;
use crate::{activity, document, now_rfc3339, validation};

/// Input for creating a loan application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: String,
    pub loan_type: String,
    pub loan_amount: f64,
}

/// Generate a unique application reference, e.g. `HVC-2026-4F09A1`.
fn generate_reference() -> String {
    let year = chrono::Utc::now().format("%Y");
    let nonce = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("HVC-{year}-{nonce}")
}

/// Create a loan application.
///
/// The application starts as `submitted` at stage 1, and its required
/// document slots are created in the same transaction with status `missing`.
pub async fn create_application(
    pool: &SqlitePool,
    new: NewApplication,
) -> Result<LoanApplication> {
    validation::validate_required("loan_type", &new.loan_type)?;
    validation::validate_loan_amount(new.loan_amount)?;

    let app = LoanApplication {
        id: Uuid::new_v4().to_string(),
        reference_number: generate_reference(),
        user_id: new.user_id,
        loan_type: new.loan_type.trim().to_string(),
        loan_amount: new.loan_amount,
        status: LoanStatus::Submitted,
        current_stage: 1,
        last_action: "Application submitted".to_string(),
        last_action_date: now_rfc3339(),
        created_at: now_rfc3339(),
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO loan_applications
            (id, reference_number, user_id, loan_type, loan_amount,
             status, current_stage, last_action, last_action_date, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&app.id)
    .bind(&app.reference_number)
    .bind(&app.user_id)
    .bind(&app.loan_type)
    .bind(app.loan_amount)
    .bind(app.status)
    .bind(app.current_stage)
    .bind(&app.last_action)
    .bind(&app.last_action_date)
    .bind(&app.created_at)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "LoanApplication",
                    id: app.reference_number.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    document::create_documents_for(&mut tx, &app.id, &app.loan_type).await?;
    activity::record(
        &mut tx,
        &app.id,
        &format!("Application {} submitted", app.reference_number),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        reference = %app.reference_number,
        loan_type = %app.loan_type,
        "Created loan application"
    );

    Ok(app)
}

/// Get an application by ID.
pub async fn get_application(pool: &SqlitePool, id: &str) -> Result<LoanApplication> {
    sqlx::query_as::<_, LoanApplication>(
        r#"
        SELECT id, reference_number, user_id, loan_type, loan_amount,
               status, current_stage, last_action, last_action_date, created_at
        FROM loan_applications
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "LoanApplication",
        id: id.to_string(),
    })
}

/// List applications owned by a user, newest first.
pub async fn list_applications_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<LoanApplication>> {
    let apps = sqlx::query_as::<_, LoanApplication>(
        r#"
        SELECT id, reference_number, user_id, loan_type, loan_amount,
               status, current_stage, last_action, last_action_date, created_at
        FROM loan_applications
        WHERE user_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(apps)
}

/// List all applications, newest first.
pub async fn list_applications(pool: &SqlitePool) -> Result<Vec<LoanApplication>> {
    let apps = sqlx::query_as::<_, LoanApplication>(
        r#"
        SELECT id, reference_number, user_id, loan_type, loan_amount,
               status, current_stage, last_action, last_action_date, created_at
        FROM loan_applications
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(apps)
}

/// Apply a status transition to an application.
///
/// The move is checked against the transition table, and the stored stage is
/// recomputed from the new status in the same statement, so stage and status
/// cannot drift apart. The update is guarded on the status the transition
/// was validated against; losing that race yields `Conflict`.
pub async fn update_status(
    pool: &SqlitePool,
    id: &str,
    to: LoanStatus,
) -> Result<LoanApplication> {
    let current = get_application(pool, id).await?;
    current.status.validate_transition(to)?;

    // Rejected keeps the stage the application had reached.
    let stage = to.stage().unwrap_or(current.current_stage);
    let last_action = format!("Status changed from {} to {}", current.status, to);
    let now = now_rfc3339();

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE loan_applications
        SET status = ?, current_stage = ?, last_action = ?, last_action_date = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(to)
    .bind(stage)
    .bind(&last_action)
    .bind(&now)
    .bind(id)
    .bind(current.status)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::Conflict {
            entity: "LoanApplication",
            id: id.to_string(),
        });
    }

    activity::record(&mut tx, id, &last_action).await?;
    tx.commit().await?;

    tracing::info!(
        application = %id,
        from = %current.status,
        to = %to,
        "Applied status transition"
    );

    Ok(LoanApplication {
        status: to,
        current_stage: stage,
        last_action,
        last_action_date: now,
        ..current
    })
}

/// Count applications grouped by status.
pub async fn count_by_status(pool: &SqlitePool) -> Result<Vec<(LoanStatus, i64)>> {
    let rows = sqlx::query_as::<_, (LoanStatus, i64)>(
        r#"
        SELECT status, COUNT(*) as count
        FROM loan_applications
        GROUP BY status
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count all applications.
pub async fn count_applications(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM loan_applications
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
