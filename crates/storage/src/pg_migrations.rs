//! PostgreSQL schema migrations for the student document store.

use sqlx::PgPool;

/// Run all PostgreSQL migrations.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id TEXT PRIMARY KEY,
            doc JSONB NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_name ON students ((doc->>'name'))")
        .execute(pool)
        .await?;

    // Stored timestamps may be RFC 3339 with any offset, zone-less ISO (UTC)
    // or epoch milliseconds; anything else sorts as NULL.
    sqlx::query(
        r#"
        CREATE OR REPLACE FUNCTION student_instant(value JSONB) RETURNS TIMESTAMPTZ
        LANGUAGE plpgsql IMMUTABLE
        SET timezone TO 'UTC'
        AS $$
        BEGIN
            CASE jsonb_typeof(value)
                WHEN 'number' THEN
                    RETURN to_timestamp((value #>> '{}')::numeric / 1000);
                WHEN 'string' THEN
                    RETURN (value #>> '{}')::timestamptz;
                ELSE
                    RETURN NULL;
            END CASE;
        EXCEPTION WHEN others THEN
            RETURN NULL;
        END
        $$
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("DROP INDEX IF EXISTS idx_students_created").execute(pool).await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_students_created_at \
         ON students (student_instant(doc->'createdAt') DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_students_age ON students ((doc->'age'))")
        .execute(pool)
        .await?;

    tracing::debug!("PostgreSQL migrations applied");
    Ok(())
}
