//! Component access traits and the platform-provider boundary.

use alloc::vec::Vec;

use crate::der::Endian;
use crate::RsaKeyComponents;

/// Read access to the public components of an RSA key.
pub trait PublicKeyParts {
    /// Returns the modulus `n` in storage byte order.
    fn modulus(&self) -> &[u8];

    /// Returns the public exponent `e` in storage byte order.
    fn public_exponent(&self) -> &[u8];

    /// Returns the modulus size in bytes.
    fn size(&self) -> usize {
        self.modulus().len()
    }
}

/// Read access to the private components of an RSA key.
pub trait PrivateKeyParts: PublicKeyParts {
    /// Returns the private exponent `d`.
    fn private_exponent(&self) -> &[u8];

    /// Returns the first prime factor `p`.
    fn prime1(&self) -> &[u8];

    /// Returns the second prime factor `q`.
    fn prime2(&self) -> &[u8];

    /// Returns the first CRT exponent `d mod (p-1)`.
    fn exponent1(&self) -> &[u8];

    /// Returns the second CRT exponent `d mod (q-1)`.
    fn exponent2(&self) -> &[u8];

    /// Returns the CRT coefficient `(inverse of q) mod p`.
    fn coefficient(&self) -> &[u8];
}

impl PublicKeyParts for RsaKeyComponents {
    fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    fn public_exponent(&self) -> &[u8] {
        &self.public_exponent
    }
}

impl PrivateKeyParts for RsaKeyComponents {
    fn private_exponent(&self) -> &[u8] {
        &self.private_exponent
    }

    fn prime1(&self) -> &[u8] {
        &self.prime1
    }

    fn prime2(&self) -> &[u8] {
        &self.prime2
    }

    fn exponent1(&self) -> &[u8] {
        &self.exponent1
    }

    fn exponent2(&self) -> &[u8] {
        &self.exponent2
    }

    fn coefficient(&self) -> &[u8] {
        &self.coefficient
    }
}

/// Boundary to a platform cryptographic provider.
///
/// One implementation exists per target platform, each owning whatever
/// native handle its provider uses. The codec never calls through this
/// trait; it only converts the component bytes an implementation exports,
/// so it stays platform-agnostic and testable without any provider.
pub trait NativeRsaKey: Sized {
    /// Provider-specific failure type.
    type Error;

    /// Generates a fresh key pair with a modulus of `bits` bits.
    fn generate(bits: usize) -> Result<Self, Self::Error>;

    /// Signs a message digest, returning the raw signature bytes.
    fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, Self::Error>;

    /// Exports the raw key components in `endian` byte order, ready for
    /// [`RsaKeyComponents::to_pkcs8_der`].
    fn export_components(&self, endian: Endian) -> Result<RsaKeyComponents, Self::Error>;
}
