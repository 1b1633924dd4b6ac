//! Operation invocation
//!
//! [`OperationInvoker`] is the seam the batch engine drives; [`Operations`]
//! is the production implementation that binds parameters, plans the request
//! and hands it to the [`RequestExecutor`].

use std::sync::Arc;

use armory_domain::{Locale, ParamSet, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use super::auction;
use super::binding::bind;
use super::catalog::{Execution, OperationId};
use super::plan::plan;
use super::registry::OperationRegistry;
use crate::request::RequestExecutor;

/// Runs one operation with one parameter set
#[async_trait]
pub trait OperationInvoker: Send + Sync {
    /// Validate `params` for `operation` and perform its fetch
    async fn invoke(&self, operation: OperationId, params: &ParamSet) -> Result<Value>;
}

/// Registry-backed invoker over a [`RequestExecutor`]
pub struct Operations {
    registry: Arc<OperationRegistry>,
    executor: Arc<RequestExecutor>,
}

impl Operations {
    pub fn new(registry: Arc<OperationRegistry>, executor: Arc<RequestExecutor>) -> Self {
        Self { registry, executor }
    }

    /// Invoke with an explicit locale for this call only.
    ///
    /// # Errors
    /// - `ArmoryError::UnknownOperation` if `operation` is not registered
    /// - `ArmoryError::InvalidParameter` before any network call if `params`
    ///   does not bind
    /// - Any executor error
    #[instrument(skip(self, params), fields(operation = %operation))]
    pub async fn invoke_with_locale(
        &self,
        operation: OperationId,
        params: &ParamSet,
        locale: Option<Locale>,
    ) -> Result<Value> {
        let descriptor = self.registry.descriptor(operation)?;
        let args = bind(descriptor, params)?;
        let plan = plan(descriptor, &args)?;

        let primary = self.executor.issue(&plan.path, plan.query, locale).await?;

        match descriptor.execution {
            Execution::Single => Ok(primary),
            Execution::AuctionSnapshots => {
                auction::fetch_snapshots(&self.executor, primary, plan.watermark.unwrap_or(0)).await
            }
        }
    }

    pub fn registry(&self) -> &Arc<OperationRegistry> {
        &self.registry
    }

    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }
}

#[async_trait]
impl OperationInvoker for Operations {
    async fn invoke(&self, operation: OperationId, params: &ParamSet) -> Result<Value> {
        self.invoke_with_locale(operation, params, None).await
    }
}

#[cfg(test)]
mod tests {
    use armory_domain::{ArmoryError, ErrorKind};
    use serde_json::json;

    use super::*;
    use crate::auth::TokenLifecycle;
    use crate::testing::{CountingTokenIssuer, InMemoryCredentialStore, ScriptedTransport};

    const BASE: &str = "https://us.api.blizzard.com/wow";

    struct Harness {
        operations: Operations,
        transport: Arc<ScriptedTransport>,
        issuer: Arc<CountingTokenIssuer>,
    }

    fn harness() -> Harness {
        let transport = Arc::new(ScriptedTransport::new());
        let issuer = Arc::new(CountingTokenIssuer::new(3600));
        let tokens = Arc::new(TokenLifecycle::new(
            Arc::new(InMemoryCredentialStore::new()),
            issuer.clone(),
        ));
        let executor = Arc::new(RequestExecutor::new(transport.clone(), tokens, BASE, Locale::EnUs));
        let operations = Operations::new(Arc::new(OperationRegistry::standard()), executor);
        Harness { operations, transport, issuer }
    }

    #[tokio::test]
    async fn test_character_details_are_filtered() {
        let h = harness();
        h.transport.respond(format!("{BASE}/character/Azralon/Thrall"), 200, &json!({"name": "Thrall"}));

        let params = ParamSet::positional([json!("Azralon"), json!("Thrall"), json!(["guild", "bogus"])]);
        let value = h.operations.invoke(OperationId::CharInfo, &params).await.unwrap();

        assert_eq!(value, json!({"name": "Thrall"}));
        let request = &h.transport.requests()[0];
        assert_eq!(request.query_value("fields"), Some("guild"));
        assert_eq!(request.query_value("locale"), Some("en_US"));
    }

    #[tokio::test]
    async fn test_invalid_identifier_makes_no_network_call() {
        let h = harness();

        let err = h
            .operations
            .invoke(OperationId::GameItemInfo, &ParamSet::positional([json!("abc")]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(h.transport.call_count(), 0);
        assert_eq!(h.issuer.calls(), 0);
    }

    #[tokio::test]
    async fn test_auction_two_phase_fetch() {
        let h = harness();
        h.transport.respond(
            format!("{BASE}/auction/data/Azralon"),
            200,
            &json!({"files": [
                {"url": "https://cdn.test/1.json", "lastModified": 10},
                {"url": "https://cdn.test/2.json", "lastModified": 20},
                {"url": "https://cdn.test/3.json", "lastModified": 30},
            ]}),
        );

        let params = ParamSet::named([("realm", json!("Azralon")), ("last_modified", json!(15))]);
        let value = h.operations.invoke(OperationId::GameAuctionData, &params).await.unwrap();

        assert_eq!(value.as_array().map(Vec::len), Some(2));
        // One manifest call plus two snapshot downloads
        assert_eq!(h.transport.call_count(), 3);
        let downloads: Vec<_> =
            h.transport.requests().into_iter().filter(|r| r.bearer.is_none()).collect();
        assert_eq!(downloads.len(), 2);
    }

    #[tokio::test]
    async fn test_locale_override_applies_to_one_call() {
        let h = harness();

        h.operations
            .invoke_with_locale(OperationId::GameMountList, &ParamSet::empty(), Some(Locale::FrFr))
            .await
            .unwrap();
        h.operations.invoke(OperationId::GameMountList, &ParamSet::empty()).await.unwrap();

        let requests = h.transport.requests();
        assert_eq!(requests[0].query_value("locale"), Some("fr_FR"));
        assert_eq!(requests[1].query_value("locale"), Some("en_US"));
    }

    #[tokio::test]
    async fn test_unregistered_operation() {
        let transport = Arc::new(ScriptedTransport::new());
        let tokens = Arc::new(TokenLifecycle::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(CountingTokenIssuer::new(3600)),
        ));
        let executor = Arc::new(RequestExecutor::new(transport.clone(), tokens, BASE, Locale::EnUs));
        let operations = Operations::new(Arc::new(OperationRegistry::empty()), executor);

        let err = operations.invoke(OperationId::PetList, &ParamSet::empty()).await.unwrap_err();
        assert_eq!(err, ArmoryError::UnknownOperation("pet_list".into()));
        assert_eq!(transport.call_count(), 0);
    }
}
