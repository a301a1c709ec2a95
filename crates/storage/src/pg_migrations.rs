//! PostgreSQL schema migrations for eventboard storage.

use sqlx::PgPool;

/// Run all PostgreSQL migrations. Every statement is idempotent.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS locations (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            city TEXT,
            state TEXT,
            website TEXT,
            discord_url TEXT,
            facebook_url TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS game_systems (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            slug TEXT NOT NULL UNIQUE,
            publisher TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id BIGSERIAL PRIMARY KEY,
            location_id BIGINT NOT NULL REFERENCES locations (id),
            game_system_id BIGINT NOT NULL REFERENCES game_systems (id),
            title TEXT NOT NULL,
            date DATE NOT NULL,
            start_time TEXT,
            description TEXT,
            source_url TEXT,
            source_type TEXT,
            last_seen_at TIMESTAMPTZ,
            is_expired BOOLEAN NOT NULL DEFAULT FALSE,
            dedup_hash TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Columns added with user submissions
    sqlx::query("ALTER TABLE events ADD COLUMN IF NOT EXISTS submitted_by TEXT")
        .execute(pool)
        .await?;
    sqlx::query("ALTER TABLE events ADD COLUMN IF NOT EXISTS submission_status TEXT")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_date ON events (date)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_location ON events (location_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_game_system ON events (game_system_id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_events_pending ON events (date)
         WHERE submission_status = 'pending_review'",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subscribers (
            id BIGSERIAL PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            location_ids JSONB NOT NULL DEFAULT '[]',
            game_system_ids JSONB NOT NULL DEFAULT '[]',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("PostgreSQL migrations applied");
    Ok(())
}
