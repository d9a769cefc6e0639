//! Keys, signatures, permits and limit orders.

mod error;
pub use error::SigningError;

mod interactions;
pub use interactions::Interactions;

mod key;
pub use key::{address_of_private, sign, PrivateKey};

mod maker_traits;
pub use maker_traits::MakerTraits;

mod order;
pub use order::{
    LimitOrderParams, LimitOrderPayload, OrderComposer, OrderData, OrderRecord, SignedLimitOrder,
    UnsignedLimitOrder,
};

mod permit;
pub use permit::{assemble_permit_payload, PermitMessage, PermitPayload, PERMIT_PAYLOAD_LEN};

mod salt;
pub use salt::{
    salt_matches_extension, salt_with_extension, FixedSalt, SaltSource, TimestampSalt,
    SALT_EXTENSION_MASK,
};

mod signature;
pub use signature::Signature65;
