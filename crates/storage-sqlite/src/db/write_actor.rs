use super::DbPool;
use crate::errors::StorageError;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::SqliteConnection;
use ledger_routing_core::errors::{DatabaseError, Error, Result};
use log::{debug, error};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// Type alias for the job to be executed by the writer actor.
// It takes a mutable reference to a SqliteConnection and returns a Result.
// We use core::Result here since that's what callers expect.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedJob = Job<Box<dyn Any + Send + 'static>>;
type ErasedReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    // Each job is a boxed closure, and a oneshot sender is used for the reply.
    // The Box<dyn Any + Send> is used for type erasure of the job's return type.
    tx: mpsc::Sender<(ErasedJob, ErasedReply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside one `BEGIN IMMEDIATE` transaction: it is committed
    /// when the job returns `Ok` and rolled back otherwise. Once sent, the job
    /// runs to completion even if the caller stops waiting for it.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| writer_stopped())?;

        let boxed = ret_rx.await.map_err(|_| writer_stopped())??;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::Unexpected("Failed to downcast writer actor result".to_string()))
    }
}

fn writer_stopped() -> Error {
    Error::Database(DatabaseError::Internal(
        "The database writer is no longer running".to_string(),
    ))
}

/// Runs `job` inside an immediate transaction on `conn`.
///
/// If the rollback itself fails, the rollback error is logged and the job's
/// original error is returned.
fn run_in_transaction<T>(
    conn: &mut SqliteConnection,
    job: impl FnOnce(&mut SqliteConnection) -> Result<T>,
) -> Result<T> {
    AnsiTransactionManager::begin_transaction_sql(conn, "BEGIN IMMEDIATE")
        .map_err(StorageError::TransactionFailed)?;

    match job(conn) {
        Ok(value) => {
            <AnsiTransactionManager as TransactionManager<SqliteConnection>>::commit_transaction(
                conn,
            )
            .map_err(StorageError::TransactionFailed)?;
            Ok(value)
        }
        Err(err) => {
            debug!("Rolling back write transaction: {}", err);
            if let Err(rollback_err) =
                <AnsiTransactionManager as TransactionManager<SqliteConnection>>::rollback_transaction(
                    conn,
                )
            {
                error!(
                    "Rollback failed while handling '{}': {}",
                    err, rollback_err
                );
            }
            Err(err)
        }
    }
}

/// Spawns a background Tokio task that acts as a single writer to the database.
/// This actor owns one database connection from the pool and processes write jobs serially.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    // The channel is bounded; 1024 is an arbitrary size.
    let (tx, mut rx) = mpsc::channel::<(ErasedJob, ErasedReply)>(1024);

    tokio::spawn(async move {
        // This connection is held for the lifetime of the actor.
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                let message = e.to_string();
                error!("Writer actor could not acquire a connection: {}", message);
                while let Some((_, reply_tx)) = rx.recv().await {
                    let _ = reply_tx.send(Err(Error::Database(DatabaseError::ConnectionFailed(
                        message.clone(),
                    ))));
                }
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result = run_in_transaction(&mut conn, job);

            // Ignore error if the receiver has dropped (e.g., the caller was cancelled).
            let _ = reply_tx.send(result);
        }
        // rx.recv() returns None once every WriteHandle is dropped.
    });

    WriteHandle { tx }
}
