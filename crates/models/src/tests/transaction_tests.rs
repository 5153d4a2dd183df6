use anyhow::Result;
use sea_orm::TransactionTrait;

use super::setup_test_db;
use crate::product::{self, Model};

#[tokio::test]
async fn test_transaction_commit() -> Result<()> {
    let db = setup_test_db().await?;

    let txn = db.begin().await?;
    let created = product::insert(&txn, Model::new("Outdoor Rain Jacket", "", 49.99, "")).await?;
    txn.commit().await?;

    assert_eq!(product::find(&db, created.id).await?, Some(created));
    Ok(())
}

#[tokio::test]
async fn test_transaction_rollback() -> Result<()> {
    let db = setup_test_db().await?;

    let txn = db.begin().await?;
    let created = product::insert(&txn, Model::new("Outdoor Rain Jacket", "", 49.99, "")).await?;
    assert!(product::find(&txn, created.id).await?.is_some());
    txn.rollback().await?;

    assert!(product::find(&db, created.id).await?.is_none());
    assert_eq!(product::count(&db).await?, 0);
    Ok(())
}
