use crate::{OnchainError, OnchainReader, Wallet};
use alloy::{
    primitives::{Address, U256},
    providers::Provider,
};
use oneinch_constants::{EIP2612_PERMIT_TYPEHASH, PERMIT_CHAINS};
use oneinch_types::{eip712::TypedDataDomain, PermitMessage, PermitPayload, Signature65};
use tracing::{debug, instrument};

/// A signed EIP-2612 permit and its router calldata blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPermit {
    /// The signed message.
    pub message: PermitMessage,
    /// The token's EIP-712 domain.
    pub domain: TypedDataDomain,
    /// Signature over the message, `v` in `{27, 28}`.
    pub signature: Signature65,
    /// The calldata blob passed to the router.
    pub payload: PermitPayload,
}

/// True if swaps selling `token` should attach a permit instead of
/// requiring an approval.
///
/// Only chains in [`PERMIT_CHAINS`] qualify, and only when the token's
/// `PERMIT_TYPEHASH()` is the EIP-2612 typehash. A token that lacks the
/// constant or reverts is not eligible. Transport failures are returned.
#[instrument(skip_all, fields(chain_id, %token))]
pub async fn should_use_permit<P: Provider>(
    reader: &OnchainReader<P>,
    chain_id: u64,
    token: Address,
) -> Result<bool, OnchainError> {
    if !PERMIT_CHAINS.contains(&chain_id) {
        return Ok(false);
    }
    match reader.read_permit_typehash(token).await {
        Ok(typehash) => Ok(typehash == EIP2612_PERMIT_TYPEHASH),
        Err(OnchainError::PermitUnsupported(_) | OnchainError::Rpc { .. }) => Ok(false),
        Err(OnchainError::Primitive(e)) => {
            debug!(%e, "undecodable PERMIT_TYPEHASH");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Read the token's name and the owner's permit nonce, then sign a permit
/// letting `spender` move `value` of `token` until `deadline`.
#[instrument(skip_all, fields(%token, %spender))]
pub async fn build_token_permit<P: Provider>(
    reader: &OnchainReader<P>,
    wallet: &Wallet,
    token: Address,
    spender: Address,
    value: U256,
    deadline: U256,
) -> Result<SignedPermit, OnchainError> {
    let name = reader.read_name(token).await?;
    let nonce = reader.read_nonce(token, wallet.address()).await?;
    debug!(%name, %nonce, "signing permit");

    let domain = TypedDataDomain::permit(name, wallet.chain_id(), token);
    let message = PermitMessage::new(wallet.address(), spender, value, nonce, deadline);
    let signature = message.sign(&domain, wallet.key())?;
    let payload = message.payload(&signature)?;

    Ok(SignedPermit { message, domain, signature, payload })
}
