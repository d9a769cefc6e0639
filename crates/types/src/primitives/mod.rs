mod abi;
pub use abi::{decode_single, encode_params, pack, selector, unpack, AbiType, AbiValue, Erc20Method};

mod error;
pub use error::PrimitiveError;

mod encoding;
pub use encoding::{
    convert_sig_rs_to_vrs, convert_sig_vrs_to_rs, hex_decode, hex_encode, pad_left, parse_address,
    strip_prefix,
};

mod num;
pub use num::{parse_u256, u256_to_padded_hex};
