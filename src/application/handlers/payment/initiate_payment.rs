//! InitiatePaymentHandler - start a coin purchase through a gateway.

use std::sync::Arc;

use crate::domain::catalog::Currency;
use crate::domain::foundation::{BundleId, PaymentId, UserId};
use crate::domain::payment::{Payment, PaymentIntakeError};
use crate::ports::{BundleCatalog, GatewayRegistry, LedgerStore};

/// Command to initiate a coin purchase.
#[derive(Debug, Clone)]
pub struct InitiatePaymentCommand {
    pub user_id: UserId,
    pub bundle_id: BundleId,
    pub currency: Currency,
}

/// What the client needs to reach the gateway checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatePaymentResult {
    pub payment_id: PaymentId,
    pub gateway: String,
    pub gateway_ref: String,
    pub amount: i64,
    pub currency: Currency,
    pub redirect_url: String,
}

/// Handler for payment initiation.
///
/// The gateway network call happens after the pending payment is persisted
/// and before any ledger mutation; no ledger lock is ever held across it.
/// The payment stays `pending` until a callback arrives.
pub struct InitiatePaymentHandler {
    ledger: Arc<dyn LedgerStore>,
    bundles: Arc<dyn BundleCatalog>,
    gateways: Arc<GatewayRegistry>,
    default_currency: Currency,
}

impl InitiatePaymentHandler {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        bundles: Arc<dyn BundleCatalog>,
        gateways: Arc<GatewayRegistry>,
        default_currency: Currency,
    ) -> Self {
        Self {
            ledger,
            bundles,
            gateways,
            default_currency,
        }
    }

    pub async fn handle(
        &self,
        cmd: InitiatePaymentCommand,
    ) -> Result<InitiatePaymentResult, PaymentIntakeError> {
        // 1. Resolve the bundle, honoring the same default-currency
        //    fallback the listing uses.
        let bundle = match self
            .bundles
            .find(cmd.bundle_id, &cmd.currency)
            .await
            .map_err(|e| PaymentIntakeError::Storage(e.to_string()))?
        {
            Some(bundle) => bundle,
            None => self
                .bundles
                .find(cmd.bundle_id, &self.default_currency)
                .await
                .map_err(|e| PaymentIntakeError::Storage(e.to_string()))?
                .ok_or(PaymentIntakeError::InvalidBundle)?,
        };
        if !bundle.active {
            return Err(PaymentIntakeError::InvalidBundle);
        }

        let gateway = self
            .gateways
            .for_currency(&bundle.currency)
            .ok_or_else(|| PaymentIntakeError::UnsupportedCurrency(bundle.currency.clone()))?;

        // 2. Pending payment first, so an initiation that dies mid-flight
        //    leaves an auditable stub and never a credit.
        let mut payment = Payment::pending(cmd.user_id, &bundle);
        self.ledger
            .create_payment(&payment)
            .await
            .map_err(|e| PaymentIntakeError::Storage(e.to_string()))?;

        // 3. Gateway call, outside any lock.
        let initiation = gateway
            .initiate(&payment, &bundle)
            .await
            .map_err(|e| PaymentIntakeError::Gateway(e.to_string()))?;

        payment.attach_reference(
            gateway.name(),
            initiation.reference.clone(),
            initiation.payload,
        )?;
        self.ledger
            .attach_payment_reference(&payment)
            .await
            .map_err(|e| PaymentIntakeError::Storage(e.to_string()))?;

        tracing::info!(
            user_id = %cmd.user_id,
            payment_id = %payment.id,
            gateway = gateway.name(),
            gateway_ref = %initiation.reference,
            coins = bundle.coins,
            "payment initiated"
        );

        Ok(InitiatePaymentResult {
            payment_id: payment.id,
            gateway: gateway.name().to_string(),
            gateway_ref: initiation.reference,
            amount: bundle.price,
            currency: bundle.currency,
            redirect_url: initiation.redirect_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateways::MockGateway;
    use crate::adapters::memory::{InMemoryLedgerStore, StaticBundleCatalog};
    use crate::domain::payment::PaymentStatus;

    fn registry() -> Arc<GatewayRegistry> {
        Arc::new(
            GatewayRegistry::new()
                .register(Currency::new("INR"), Arc::new(MockGateway::succeeding()))
                .register(Currency::new("NGN"), Arc::new(MockGateway::succeeding())),
        )
    }

    async fn handler_with(
        gateways: Arc<GatewayRegistry>,
    ) -> (InitiatePaymentHandler, Arc<InMemoryLedgerStore>, BundleId) {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        let catalog = Arc::new(StaticBundleCatalog::with_default_bundles());
        let bundle_id = catalog
            .bundles_for(&Currency::new("INR"))
            .await
            .unwrap()
            .into_iter()
            .find(|b| b.coins == 120)
            .unwrap()
            .id;
        (
            InitiatePaymentHandler::new(
                ledger.clone(),
                catalog,
                gateways,
                Currency::new("INR"),
            ),
            ledger,
            bundle_id,
        )
    }

    #[tokio::test]
    async fn initiation_creates_pending_payment_with_reference() {
        let (handler, ledger, bundle_id) = handler_with(registry()).await;

        let result = handler
            .handle(InitiatePaymentCommand {
                user_id: UserId::new(),
                bundle_id,
                currency: Currency::new("INR"),
            })
            .await
            .unwrap();

        assert_eq!(result.amount, 9900);
        assert!(!result.gateway_ref.is_empty());
        assert!(!result.redirect_url.is_empty());

        let payment = ledger
            .find_payment_by_reference(&result.gateway_ref)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.coins, 120);
    }

    #[tokio::test]
    async fn unknown_bundle_is_invalid() {
        let (handler, _, _) = handler_with(registry()).await;

        let err = handler
            .handle(InitiatePaymentCommand {
                user_id: UserId::new(),
                bundle_id: BundleId::new(),
                currency: Currency::new("INR"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentIntakeError::InvalidBundle));
    }

    #[tokio::test]
    async fn currency_without_gateway_is_unsupported() {
        // Bundles exist for NGN but no gateway is registered for it.
        let gateways = Arc::new(GatewayRegistry::new().register(
            Currency::new("INR"),
            Arc::new(MockGateway::succeeding()),
        ));
        let ledger = Arc::new(InMemoryLedgerStore::new());
        let catalog = Arc::new(StaticBundleCatalog::with_default_bundles());
        let bundle_id = catalog
            .bundles_for(&Currency::new("NGN"))
            .await
            .unwrap()[0]
            .id;
        let handler = InitiatePaymentHandler::new(
            ledger,
            catalog,
            gateways,
            Currency::new("INR"),
        );

        let err = handler
            .handle(InitiatePaymentCommand {
                user_id: UserId::new(),
                bundle_id,
                currency: Currency::new("NGN"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentIntakeError::UnsupportedCurrency(_)));
    }
}
