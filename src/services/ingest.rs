//! Ingestion
//!
//! Fills the product table from the dataset PDFs: read, extract, then insert
//! the batch in one transaction.

use tracing::{info, warn};

use crate::models::product::ProductRecord;
use crate::services::extraction::ProductExtractor;
use crate::services::pdf::DocumentReader;
use crate::storage::database::ProductDatabase;
use crate::utils::error::{AppError, AppResult};

/// Extract every dataset document missing from the table and insert them.
///
/// Returns the number of inserted rows. A document that fails is skipped;
/// the run only fails when nothing was extracted and something failed.
pub async fn populate_database(
    db: &ProductDatabase,
    reader: &dyn DocumentReader,
    extractor: &ProductExtractor,
) -> AppResult<usize> {
    let filenames = reader.list_documents()?;
    let mut records = Vec::new();
    let mut failures: Vec<String> = Vec::new();

    for filename in &filenames {
        if db.contains(filename)? {
            info!(filename = %filename, "Skipping already ingested document");
            continue;
        }

        let extracted = match reader.read_document(filename) {
            Ok(text) => extractor.extract(&text).await,
            Err(e) => Err(e),
        };

        match extracted {
            Ok(item) => {
                info!(filename = %filename, product = %item.product_name, "Extracted product");
                records.push(ProductRecord::new(filename.clone(), item));
            }
            Err(e) => {
                warn!(filename = %filename, error = %e, "Failed to ingest document");
                failures.push(format!("{}: {}", filename, e));
            }
        }
    }

    if records.is_empty() && !failures.is_empty() {
        return Err(AppError::extraction(format!(
            "No document could be ingested ({} failed): {}",
            failures.len(),
            failures.join("; ")
        )));
    }

    let inserted = db.insert_many(&records)?;
    info!(
        inserted,
        failed = failures.len(),
        total = filenames.len(),
        "Ingestion finished"
    );
    Ok(inserted)
}

/// Populate the database on the very first run.
pub async fn ensure_populated(
    db: &ProductDatabase,
    reader: &dyn DocumentReader,
    extractor: &ProductExtractor,
) -> AppResult<()> {
    if db.count_items()? > 0 {
        return Ok(());
    }

    info!("Database does not exist, preparing data in the very first run...");
    populate_database(db, reader, extractor).await?;
    info!("Database is ready!");
    Ok(())
}
