use hairscan_core::constants::MAX_LIST_LIMIT;
use hairscan_core::models::{new_upload_id, AnalysisDocument, NewUpload, UploadRecord};
use hairscan_core::AppError;
use sqlx::PgPool;

/// Result page for a subject's upload history.
#[derive(Debug)]
pub struct UploadPage {
    pub uploads: Vec<UploadRecord>,
    pub total_count: i64,
}

/// Repository for upload records (table `scan_uploads`).
///
/// Status discipline: records are always inserted in `processing`; the
/// terminal write (`completed` or `error`) is a second, guarded UPDATE that
/// refuses to touch a record that already reached a terminal status. Terminal
/// transitions are therefore single-shot per record even under concurrent
/// callers.
#[derive(Clone)]
pub struct UploadRepository {
    pool: PgPool,
}

impl UploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new record in `processing` status and return it.
    ///
    /// The identifier combines a millisecond timestamp with a random suffix;
    /// the primary-key constraint backs up the generator against the
    /// astronomically unlikely collision.
    pub async fn create(&self, new: NewUpload) -> Result<UploadRecord, AppError> {
        let upload_id = new_upload_id();

        let record = sqlx::query_as::<_, UploadRecord>(
            r#"
            INSERT INTO scan_uploads (
                upload_id, subject_id, filename, file_size, file_type,
                object_url, density_model_run, thickness_model_run, processing_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'processing')
            RETURNING *
            "#,
        )
        .bind(&upload_id)
        .bind(&new.subject_id)
        .bind(&new.filename)
        .bind(new.file_size)
        .bind(&new.file_type)
        .bind(&new.object_url)
        .bind(new.density_model_run)
        .bind(new.thickness_model_run)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            upload_id = %record.upload_id,
            subject_id = %record.subject_id,
            "Upload record created"
        );

        Ok(record)
    }

    /// Transition a record to `completed`, attaching its results document.
    ///
    /// Fails with `NotFound` for an unknown id and `InvalidState` when the
    /// record already reached a terminal status; an existing document is
    /// never overwritten.
    pub async fn attach_results(
        &self,
        upload_id: &str,
        document: AnalysisDocument,
    ) -> Result<UploadRecord, AppError> {
        let value = document.into_value();

        let updated = sqlx::query_as::<_, UploadRecord>(
            r#"
            UPDATE scan_uploads
            SET processing_status = 'completed',
                analysis_results = $2,
                updated_at = NOW()
            WHERE upload_id = $1
              AND processing_status NOT IN ('completed', 'error')
            RETURNING *
            "#,
        )
        .bind(upload_id)
        .bind(&value)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(record) => {
                tracing::info!(upload_id = %upload_id, "Analysis results attached");
                Ok(record)
            }
            None => Err(self.rejection_reason(upload_id).await?),
        }
    }

    /// Transition a record to `error`, recording the triggering reason.
    pub async fn mark_error(
        &self,
        upload_id: &str,
        reason: &str,
    ) -> Result<UploadRecord, AppError> {
        let updated = sqlx::query_as::<_, UploadRecord>(
            r#"
            UPDATE scan_uploads
            SET processing_status = 'error',
                error_message = $2,
                updated_at = NOW()
            WHERE upload_id = $1
              AND processing_status NOT IN ('completed', 'error')
            RETURNING *
            "#,
        )
        .bind(upload_id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(record) => {
                tracing::warn!(upload_id = %upload_id, reason = %reason, "Upload marked as error");
                Ok(record)
            }
            None => Err(self.rejection_reason(upload_id).await?),
        }
    }

    /// Distinguish a missing record from a rejected terminal transition.
    async fn rejection_reason(&self, upload_id: &str) -> Result<AppError, AppError> {
        match self.get(upload_id).await? {
            Some(record) => Ok(AppError::InvalidState(format!(
                "upload {} is already {}",
                upload_id, record.processing_status
            ))),
            None => Ok(AppError::NotFound(format!("upload {} not found", upload_id))),
        }
    }

    /// Fetch one record by id.
    pub async fn get(&self, upload_id: &str) -> Result<Option<UploadRecord>, AppError> {
        let record = sqlx::query_as::<_, UploadRecord>(
            "SELECT * FROM scan_uploads WHERE upload_id = $1",
        )
        .bind(upload_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// List a subject's records, most recent first, with the total count for
    /// pagination. A subject with no records yields an empty page, not an
    /// error. `limit` is clamped to the server maximum.
    pub async fn list_for_subject(
        &self,
        subject_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<UploadPage, AppError> {
        let limit = limit.clamp(1, MAX_LIST_LIMIT);
        let offset = offset.max(0);

        let uploads = sqlx::query_as::<_, UploadRecord>(
            r#"
            SELECT * FROM scan_uploads
            WHERE subject_id = $1
            ORDER BY created_at DESC, upload_id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(subject_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM scan_uploads WHERE subject_id = $1")
                .bind(subject_id)
                .fetch_one(&self.pool)
                .await?;

        tracing::debug!(
            subject_id = %subject_id,
            returned = uploads.len(),
            total_count,
            "Listed uploads for subject"
        );

        Ok(UploadPage {
            uploads,
            total_count,
        })
    }

    /// Count of records not yet in a terminal status, for operational
    /// visibility into stuck ingestions.
    pub async fn count_in_flight(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM scan_uploads WHERE processing_status IN ('pending', 'processing')",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
