use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::loader;
use crate::models::{FeedbackItem, FeedbackType};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Inserts the bundled fixture; rerunning leaves existing rows untouched.
pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let items = loader::bundled_feedback().context("bundled fixture is invalid")?;
    let rows: Vec<NewFeedback> = items
        .into_iter()
        .map(|item| NewFeedback {
            source_key: format!("seed-{:03}", item.id),
            product: item.product,
            kind: item.kind,
            transcript: item.transcript,
            phone: item.phone,
            location: item.location,
            created_at: item.timestamp,
        })
        .collect();

    let inserted = insert_all(pool, &rows).await?;
    tracing::info!(inserted, total = rows.len(), "seeded feedback");
    Ok(inserted)
}

pub async fn fetch_feedback(
    pool: &PgPool,
    product: Option<&str>,
) -> anyhow::Result<Vec<FeedbackItem>> {
    let mut query = String::from(
        "SELECT id, product, feedback_type, transcript, phone, location, created_at \
         FROM happiness_index.feedback",
    );

    if product.is_some() {
        query.push_str(" WHERE product = $1");
    }
    query.push_str(" ORDER BY id");

    let mut rows = sqlx::query(&query);
    if let Some(value) = product {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    let mut items = Vec::with_capacity(records.len());

    for row in records {
        let id: i64 = row.get("id");
        let kind_text: String = row.get("feedback_type");
        let Some(kind) = FeedbackType::parse(&kind_text) else {
            bail!("feedback {id} has unknown type '{kind_text}'");
        };

        items.push(FeedbackItem {
            id,
            product: row.get("product"),
            kind,
            transcript: row.get("transcript"),
            phone: row.get("phone"),
            location: row.get("location"),
            timestamp: row.get("created_at"),
        });
    }

    Ok(items)
}

/// A validated row ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub product: String,
    pub kind: FeedbackType,
    pub transcript: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub source_key: String,
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    product: String,
    #[serde(rename = "type")]
    feedback_type: String,
    transcript: String,
    phone: Option<String>,
    location: Option<String>,
    timestamp: Option<DateTime<Utc>>,
    source_key: Option<String>,
}

/// Imports every row or none: the whole file is validated before anything is
/// written, and the inserts share one transaction.
pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let rows = parse_csv(file)
        .with_context(|| format!("rejected {}, nothing imported", csv_path.display()))?;

    insert_all(pool, &rows).await
}

/// Reads and validates all CSV rows, reporting every bad row at once.
pub fn parse_csv<R: std::io::Read>(input: R) -> anyhow::Result<Vec<NewFeedback>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut rows = Vec::new();
    let mut problems = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let line = index + 1;
        match result {
            Ok(row) => match validate_csv_row(line, row) {
                Ok(row) => rows.push(row),
                Err(problem) => problems.push(problem),
            },
            Err(e) => problems.push(format!("CSV row {line}: {e}")),
        }
    }

    if !problems.is_empty() {
        bail!(
            "{} invalid CSV row(s):\n  - {}",
            problems.len(),
            problems.join("\n  - ")
        );
    }
    Ok(rows)
}

fn validate_csv_row(line: usize, row: CsvRow) -> Result<NewFeedback, String> {
    let Some(kind) = FeedbackType::parse(&row.feedback_type) else {
        return Err(format!(
            "CSV row {line}: unknown type '{}' (expected Technical or Feedback)",
            row.feedback_type
        ));
    };
    if row.product.trim().is_empty() {
        return Err(format!("CSV row {line}: product is blank"));
    }

    let source_key = row
        .source_key
        .filter(|key| !key.is_empty())
        .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

    Ok(NewFeedback {
        product: row.product,
        kind,
        transcript: row.transcript,
        phone: row.phone.filter(|v| !v.is_empty()),
        location: row.location.filter(|v| !v.is_empty()),
        created_at: row.timestamp,
        source_key,
    })
}

async fn insert_all(pool: &PgPool, rows: &[NewFeedback]) -> anyhow::Result<usize> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0usize;

    for row in rows {
        if insert_feedback(&mut *tx, row).await? {
            inserted += 1;
        }
    }

    tx.commit().await?;
    Ok(inserted)
}

async fn insert_feedback(conn: &mut PgConnection, row: &NewFeedback) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO happiness_index.feedback
        (product, feedback_type, transcript, phone, location, created_at, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(&row.product)
    .bind(row.kind.as_str())
    .bind(&row.transcript)
    .bind(row.phone.as_deref())
    .bind(row.location.as_deref())
    .bind(row.created_at)
    .bind(&row.source_key)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
