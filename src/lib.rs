#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Usage
//!
//! A codec instance is a plain set of component byte vectors plus a byte
//! order chosen at construction. Fill the components (typically from a
//! native provider export) and encode, or decode an existing document:
//!
//! ```
//! use rsa_keyinfo::{Endian, RsaKeyComponents};
//!
//! # fn main() -> rsa_keyinfo::Result<()> {
//! let mut key = RsaKeyComponents::new(Endian::Little);
//! key.modulus = vec![0xd8, 0x3d, 0x85, 0x88, 0x9e, 0x88, 0x4d, 0xd9];
//! key.public_exponent = vec![0x01, 0x00, 0x01];
//!
//! let spki = key.to_public_key_der()?;
//! let imported = RsaKeyComponents::from_public_key_der(Endian::Little, &spki)?;
//! assert_eq!(imported.modulus, key.modulus);
//! assert_eq!(imported.public_exponent, key.public_exponent);
//! # Ok(())
//! # }
//! ```
//!
//! Import performs structural validation only. It rejects malformed
//! tags and lengths, a foreign `AlgorithmIdentifier`, truncated input,
//! and trailing bytes, but it does not vet the decoded integers for
//! cryptographic consistency, and it is not hardened beyond structural
//! correctness against adversarial input.

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use const_oid;

pub mod der;
pub mod errors;
pub mod traits;

mod components;

pub use crate::{
    components::{RsaKeyComponents, ALGORITHM_OID, RSA_ALGORITHM_IDENTIFIER},
    der::Endian,
    errors::{Error, Result},
};
