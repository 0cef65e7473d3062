//! Operation dispatch.
//!
//! An operation is an immutable, typed request descriptor whose key is bound
//! at the type level to its output. The registry maps keys to handlers; it is
//! populated once while the client is constructed and read-only afterwards,
//! and travels with the client instead of living in module-level globals.

use std::any::Any;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::client::NftkitClient;
use crate::errors::{ClientError, ClientResult};

/// A typed request descriptor.
///
/// The associated `KEY` uniquely identifies the registered handler, and the
/// associated `Output` pairs the request with its response type statically.
pub trait Operation: Send + 'static {
    const KEY: &'static str;
    type Output: Send + 'static;

    fn key(&self) -> &'static str {
        Self::KEY
    }
}

/// Handler for one operation type.
#[async_trait]
pub trait OperationHandler<O: Operation>: Send + Sync {
    async fn handle(
        &self,
        operation: O,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<O::Output>;
}

/// Cooperative cancellation scope passed to handlers.
///
/// Handlers check the scope before launching new suspending work after a
/// preceding one completes. Cancellation after a transaction has been
/// submitted cannot un-send it.
#[derive(Clone, Default)]
pub struct OperationScope {
    canceled: Arc<AtomicBool>,
}

impl OperationScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the operation.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::SeqCst)
    }

    /// Fail with [`ClientError::OperationCanceled`] if cancellation was
    /// requested.
    pub fn throw_if_canceled(&self, key: impl Into<String>) -> ClientResult<()> {
        if self.is_canceled() {
            Err(ClientError::OperationCanceled { key: key.into() })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
trait ErasedHandler: Send + Sync {
    async fn handle_erased(
        &self,
        operation: Box<dyn Any + Send>,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<Box<dyn Any + Send>>;
}

struct Erased<O, H> {
    handler: H,
    _operation: PhantomData<fn(O)>,
}

#[async_trait]
impl<O, H> ErasedHandler for Erased<O, H>
where
    O: Operation,
    H: OperationHandler<O>,
{
    async fn handle_erased(
        &self,
        operation: Box<dyn Any + Send>,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<Box<dyn Any + Send>> {
        let operation = operation
            .downcast::<O>()
            .map_err(|_| ClientError::Internal(anyhow!("operation input type mismatch for {}", O::KEY)))?;
        let output = self.handler.handle(*operation, client, scope).await?;
        Ok(Box::new(output))
    }
}

/// Key → handler mapping.
///
/// Registration happens during client setup; lookups never race with writes
/// in normal operation. Re-registering a key replaces the previous handler
/// silently, like a map insert.
#[derive(Default)]
pub struct OperationRegistry {
    handlers: HashMap<&'static str, Box<dyn ErasedHandler>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handler to an operation key. Replaces any previous handler for
    /// the same key.
    pub fn register<O, H>(&mut self, handler: H)
    where
        O: Operation,
        H: OperationHandler<O> + 'static,
    {
        self.handlers.insert(
            O::KEY,
            Box::new(Erased {
                handler,
                _operation: PhantomData::<fn(O)>,
            }),
        );
    }

    /// Whether a handler is registered for the key.
    pub fn is_registered(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }

    /// Dispatch an operation to its registered handler.
    pub async fn execute<O: Operation>(
        &self,
        operation: O,
        client: &NftkitClient,
        scope: &OperationScope,
    ) -> ClientResult<O::Output> {
        let handler = self
            .handlers
            .get(O::KEY)
            .ok_or_else(|| ClientError::UnregisteredOperation {
                key: O::KEY.to_string(),
            })?;

        let output = handler
            .handle_erased(Box::new(operation), client, scope)
            .await?;

        output
            .downcast::<O::Output>()
            .map(|output| *output)
            .map_err(|_| ClientError::Internal(anyhow!("operation output type mismatch for {}", O::KEY)))
    }
}
