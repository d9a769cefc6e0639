use crate::{types::OrderbookOrder, AggregatorClient, ApiError};
use alloy::primitives::Address;
use core::future::Future;
use futures_util::{
    future::Either,
    stream::{self, Stream, StreamExt},
};
use oneinch_onchain::Wallet;
use oneinch_types::{
    OrderComposer, SaltSource, SignedLimitOrder, SigningError, TimestampSalt, UnsignedLimitOrder,
};

/// Page size used when streaming a maker's orders.
const ORDERS_PAGE_LIMIT: u32 = 100;

/// A trait for submitting signed limit orders to a backend.
///
/// Implementors of this trait are responsible for forwarding signed orders
/// to an orderbook or other submission endpoint.
pub trait OrderSubmitter {
    /// The error type returned by submission operations.
    type Error;

    /// Submit a signed order to the backend.
    fn submit_order(
        &self,
        order: SignedLimitOrder,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// A trait for fetching a maker's orders from a source.
pub trait OrderSource {
    /// The error type returned by the stream.
    type Error;

    /// Fetch the maker's orders as a stream.
    ///
    /// The stream handles pagination. An error is yielded once and ends
    /// the stream.
    fn orders_by_maker(
        &self,
        maker: Address,
    ) -> impl Stream<Item = Result<OrderbookOrder, Self::Error>> + Send;
}

impl OrderSubmitter for AggregatorClient {
    type Error = ApiError;

    async fn submit_order(&self, order: SignedLimitOrder) -> Result<(), Self::Error> {
        self.submit_limit_order(&order).await
    }
}

impl OrderSource for AggregatorClient {
    type Error = ApiError;

    fn orders_by_maker(
        &self,
        maker: Address,
    ) -> impl Stream<Item = Result<OrderbookOrder, Self::Error>> + Send {
        stream::unfold(Some(1u32), move |page| async move {
            let page = page?;

            match self.orders_by_maker_page(maker, page, ORDERS_PAGE_LIMIT).await {
                Ok(orders) => {
                    let next = (orders.len() as u32 >= ORDERS_PAGE_LIMIT).then(|| page + 1);
                    let orders = stream::iter(orders).map(Ok);
                    Some((Either::Left(orders), next))
                }
                Err(error) => Some((Either::Right(stream::once(async { Err(error) })), None)),
            }
        })
        .flatten()
    }
}

/// Errors returned by [`OrderSender`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OrderSenderError {
    /// Order composition or signing failed.
    #[error("order signing error: {0}")]
    Signing(#[from] SigningError),
    /// The wallet signs for a different chain than the composer.
    #[error("wallet chain {wallet} does not match order chain {composer}")]
    ChainMismatch {
        /// The wallet's chain.
        wallet: u64,
        /// The composer's chain.
        composer: u64,
    },
    /// The order names a maker other than the wallet.
    #[error("order maker {maker} is not the signing wallet {wallet}")]
    MakerMismatch {
        /// The order's maker.
        maker: Address,
        /// The wallet's address.
        wallet: Address,
    },
    /// Order submission failed.
    #[error("order submission error: {0}")]
    Submission(#[source] Box<dyn core::error::Error + Send + Sync>),
}

impl OrderSenderError {
    /// A short, stable identifier for the error kind.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Signing(e) => e.code(),
            Self::ChainMismatch { .. } | Self::MakerMismatch { .. } => "invalid_order",
            Self::Submission(_) => "submission",
        }
    }
}

/// Signs limit orders with a wallet and sends them to a backend.
///
/// `OrderSender` is generic over:
/// - `Submit`: An [`OrderSubmitter`] for submitting signed orders
/// - `S`: The [`SaltSource`] of the order composer
#[derive(Debug)]
pub struct OrderSender<Submit, S = TimestampSalt> {
    wallet: Wallet,
    composer: OrderComposer<S>,
    submitter: Submit,
}

impl<Submit, S> OrderSender<Submit, S> {
    /// Create a new order sender instance.
    pub fn new(
        wallet: Wallet,
        composer: OrderComposer<S>,
        submitter: Submit,
    ) -> Result<Self, OrderSenderError> {
        if wallet.chain_id() != composer.chain_id() {
            return Err(OrderSenderError::ChainMismatch {
                wallet: wallet.chain_id(),
                composer: composer.chain_id(),
            });
        }
        Ok(Self { wallet, composer, submitter })
    }

    /// Get a reference to the wallet.
    pub const fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Get a reference to the composer.
    pub const fn composer(&self) -> &OrderComposer<S> {
        &self.composer
    }

    /// Get a reference to the submitter.
    pub const fn submitter(&self) -> &Submit {
        &self.submitter
    }
}

impl<Submit, S: SaltSource> OrderSender<Submit, S> {
    /// Compose and sign an order. An order without a maker is made by the
    /// wallet.
    pub fn sign_order(
        &self,
        order: UnsignedLimitOrder,
    ) -> Result<SignedLimitOrder, OrderSenderError> {
        let order = if order.maker().is_zero() {
            order.with_maker(self.wallet.address())
        } else {
            order
        };
        if order.maker() != self.wallet.address() {
            return Err(OrderSenderError::MakerMismatch {
                maker: order.maker(),
                wallet: self.wallet.address(),
            });
        }
        self.composer.compose(&order, self.wallet.key()).map_err(Into::into)
    }
}

impl<Submit, S> OrderSender<Submit, S>
where
    Submit: OrderSubmitter + Send + Sync,
    Submit::Error: core::error::Error + Send + Sync + 'static,
{
    /// Submit a signed order to the backend.
    pub async fn send_order(&self, order: SignedLimitOrder) -> Result<(), OrderSenderError> {
        self.submitter
            .submit_order(order)
            .await
            .map_err(|error| OrderSenderError::Submission(Box::new(error)))
    }
}

impl<Submit, S> OrderSender<Submit, S>
where
    Submit: OrderSubmitter + Send + Sync,
    Submit::Error: core::error::Error + Send + Sync + 'static,
    S: SaltSource,
{
    /// Sign and submit an order, returning the signed order.
    pub async fn sign_and_send_order(
        &self,
        order: UnsignedLimitOrder,
    ) -> Result<SignedLimitOrder, OrderSenderError> {
        let signed = self.sign_order(order)?;
        self.send_order(signed.clone()).await?;
        Ok(signed)
    }
}
