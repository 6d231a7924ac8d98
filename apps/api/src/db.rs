use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::contact::{ContactRow, NewContact};

/// Creates the SQLite connection pool and applies pending migrations.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Connecting to SQLite...");

    // An in-memory database lives and dies with its connection.
    let max_connections = if database_url.contains(":memory:") { 1 } else { 10 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Inserts one contact row and returns its generated id.
pub async fn insert_contact(pool: &SqlitePool, contact: &NewContact<'_>) -> Result<i64, sqlx::Error> {
    let s = contact.submission;

    let result = sqlx::query(
        r#"
        INSERT INTO contacts
            (name, email, phone, company, subject, message, priority, newsletter,
             ip_address, user_agent, page_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&s.name)
    .bind(&s.email)
    .bind(&s.phone)
    .bind(&s.company)
    .bind(&s.subject)
    .bind(&s.message)
    .bind(s.priority.as_str())
    .bind(s.newsletter)
    .bind(contact.ip_address)
    .bind(contact.user_agent)
    .bind(&s.page_url)
    .bind(contact.created_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

#[allow(dead_code)]
pub async fn find_contact(pool: &SqlitePool, id: i64) -> Result<Option<ContactRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM contacts WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
pub async fn count_contacts(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use contact_core::{Priority, Submission};

    fn submission(name: &str) -> Submission {
        Submission {
            name: name.to_string(),
            email: "jean@x.com".to_string(),
            phone: Some("+243 852 291 755".to_string()),
            company: None,
            subject: "Info".to_string(),
            message: "bonjour\nligne 2".to_string(),
            priority: Priority::Urgent,
            newsletter: true,
            page_url: Some("https://example.com/#contact".to_string()),
        }
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let now = Utc::now();
        let mut last = 0;
        for name in ["a", "b", "c"] {
            let s = submission(name);
            let id = insert_contact(
                &pool,
                &NewContact {
                    submission: &s,
                    ip_address: None,
                    user_agent: None,
                    created_at: now,
                },
            )
            .await
            .unwrap();
            assert!(id > last);
            last = id;
        }
        assert_eq!(count_contacts(&pool).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let s = submission("a");
        let contact = NewContact {
            submission: &s,
            ip_address: None,
            user_agent: None,
            created_at: Utc::now(),
        };
        let first = insert_contact(&pool, &contact).await.unwrap();
        sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(first)
            .execute(&pool)
            .await
            .unwrap();
        let second = insert_contact(&pool, &contact).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_round_trip_by_id() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let s = submission("Jean");
        let id = insert_contact(
            &pool,
            &NewContact {
                submission: &s,
                ip_address: Some("10.0.0.1"),
                user_agent: Some("test-agent"),
                created_at: Utc::now(),
            },
        )
        .await
        .unwrap();

        let row = find_contact(&pool, id).await.unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.submission(), s);
        assert_eq!(row.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(row.user_agent.as_deref(), Some("test-agent"));

        assert!(find_contact(&pool, id + 1).await.unwrap().is_none());
    }
}
