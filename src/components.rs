//! RSA key components and their PKCS#8 / SubjectPublicKeyInfo encodings.

use alloc::vec::Vec;
use core::fmt;

use const_oid::ObjectIdentifier;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::der::{self, Endian, Reader, Tag, Writer};
use crate::errors::{Error, Result};

/// OID for the `rsaEncryption` algorithm: `1.2.840.113549.1.1.1`.
pub const ALGORITHM_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// DER encoding of the `rsaEncryption` `AlgorithmIdentifier`: a SEQUENCE
/// of [`ALGORITHM_OID`] and a NULL parameter.
///
/// Both key structures embed exactly these bytes; on import they are
/// compared verbatim, with no OID parsing.
pub const RSA_ALGORITHM_IDENTIFIER: [u8; 15] = [
    0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01, 0x05, 0x00,
];

/// Encoded `version(0)` INTEGER, shared by `PrivateKeyInfo` and the inner
/// `RSAPrivateKey` sequence.
const VERSION_DER: [u8; 3] = [0x02, 0x01, 0x00];

/// The eight integer components of an RSA key pair, held as raw byte
/// vectors in a byte order fixed at construction.
///
/// This is a marshaling type, not a key: it performs no arithmetic and no
/// cryptographic validation (`modulus = prime1 × prime2` is never
/// checked). A platform provider produces and consumes the component
/// bytes; this type converts them to and from the DER encodings of PKCS#8
/// `PrivateKeyInfo` and X.509 `SubjectPublicKeyInfo`.
///
/// The private components are zeroized when the value is dropped.
#[derive(Clone, Eq, PartialEq)]
pub struct RsaKeyComponents {
    endian: Endian,
    /// Modulus `n`.
    pub modulus: Vec<u8>,
    /// Public exponent `e`.
    pub public_exponent: Vec<u8>,
    /// Private exponent `d`.
    pub private_exponent: Vec<u8>,
    /// First prime factor `p`.
    pub prime1: Vec<u8>,
    /// Second prime factor `q`.
    pub prime2: Vec<u8>,
    /// First CRT exponent `d mod (p-1)`.
    pub exponent1: Vec<u8>,
    /// Second CRT exponent `d mod (q-1)`.
    pub exponent2: Vec<u8>,
    /// CRT coefficient `(inverse of q) mod p`.
    pub coefficient: Vec<u8>,
}

impl RsaKeyComponents {
    /// Creates an empty set of components whose byte vectors use `endian`
    /// significance.
    pub fn new(endian: Endian) -> Self {
        Self {
            endian,
            modulus: Vec::new(),
            public_exponent: Vec::new(),
            private_exponent: Vec::new(),
            prime1: Vec::new(),
            prime2: Vec::new(),
            exponent1: Vec::new(),
            exponent2: Vec::new(),
            coefficient: Vec::new(),
        }
    }

    /// The byte order of the component vectors, fixed at construction.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// The eight components in `RSAPrivateKey` field order.
    fn private_fields(&self) -> [&Vec<u8>; 8] {
        [
            &self.modulus,
            &self.public_exponent,
            &self.private_exponent,
            &self.prime1,
            &self.prime2,
            &self.exponent1,
            &self.exponent2,
            &self.coefficient,
        ]
    }

    /// Encodes the components as a PKCS#8 `PrivateKeyInfo` document.
    ///
    /// All eight components are written, in `RSAPrivateKey` field order;
    /// an unset component encodes as the zero INTEGER. The output holds
    /// private key material and is zeroized on drop.
    pub fn to_pkcs8_der(&self) -> Result<Zeroizing<Vec<u8>>> {
        let endian = self.endian;

        let mut key_len = VERSION_DER.len();
        for field in self.private_fields() {
            key_len += der::uint_encoded_len(field, endian)?;
        }
        // The inner RSAPrivateKey SEQUENCE is the OCTET STRING content.
        let octets_len = der::header_len(key_len)? + key_len;
        let info_len = VERSION_DER.len()
            + RSA_ALGORITHM_IDENTIFIER.len()
            + der::header_len(octets_len)?
            + octets_len;

        let mut writer = Writer::with_capacity(der::header_len(info_len)? + info_len);
        writer.header(Tag::Sequence, info_len)?;
        writer.bytes(&VERSION_DER);
        writer.bytes(&RSA_ALGORITHM_IDENTIFIER);
        writer.header(Tag::OctetString, octets_len)?;
        writer.header(Tag::Sequence, key_len)?;
        writer.bytes(&VERSION_DER);
        for field in self.private_fields() {
            writer.uint(field, endian)?;
        }
        Ok(Zeroizing::new(writer.finish()))
    }

    /// Encodes the public components as an X.509 `SubjectPublicKeyInfo`
    /// document. Only `modulus` and `public_exponent` are used.
    pub fn to_public_key_der(&self) -> Result<Vec<u8>> {
        let endian = self.endian;

        let key_len = der::uint_encoded_len(&self.modulus, endian)?
            + der::uint_encoded_len(&self.public_exponent, endian)?;
        // BIT STRING content: unused-bits prefix plus RSAPublicKey SEQUENCE.
        let bits_len = 1 + der::header_len(key_len)? + key_len;
        let info_len = RSA_ALGORITHM_IDENTIFIER.len() + der::header_len(bits_len)? + bits_len;

        let mut writer = Writer::with_capacity(der::header_len(info_len)? + info_len);
        writer.header(Tag::Sequence, info_len)?;
        writer.bytes(&RSA_ALGORITHM_IDENTIFIER);
        writer.header(Tag::BitString, bits_len)?;
        writer.bytes(&[0x00]);
        writer.header(Tag::Sequence, key_len)?;
        writer.uint(&self.modulus, endian)?;
        writer.uint(&self.public_exponent, endian)?;
        Ok(writer.finish())
    }

    /// Decodes a PKCS#8 `PrivateKeyInfo` document, storing each component
    /// with `endian` significance.
    ///
    /// One forward pass with no backtracking. Every declared length must
    /// be exactly exhausted: by the inner `RSAPrivateKey` sequence, the
    /// `OCTET STRING`, the outer sequence, and the input buffer itself.
    /// Any failure discards the attempt; no partially populated value is
    /// ever returned.
    pub fn from_pkcs8_der(endian: Endian, input: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(input);
        let info_len = reader.read_header(Tag::Sequence)?;
        let components = reader.read_nested(info_len, |reader| {
            read_version(reader)?;
            read_algorithm_identifier(reader)?;
            let octets_len = reader.read_header(Tag::OctetString)?;
            reader.read_nested(octets_len, |reader| {
                let key_len = reader.read_header(Tag::Sequence)?;
                reader.read_nested(key_len, |reader| {
                    read_version(reader)?;
                    let mut components = Self::new(endian);
                    components.modulus = reader.read_uint(endian)?;
                    components.public_exponent = reader.read_uint(endian)?;
                    components.private_exponent = reader.read_uint(endian)?;
                    components.prime1 = reader.read_uint(endian)?;
                    components.prime2 = reader.read_uint(endian)?;
                    components.exponent1 = reader.read_uint(endian)?;
                    components.exponent2 = reader.read_uint(endian)?;
                    components.coefficient = reader.read_uint(endian)?;
                    Ok(components)
                })
            })
        })?;
        reader.finish()?;
        Ok(components)
    }

    /// Decodes an X.509 `SubjectPublicKeyInfo` document, populating
    /// `modulus` and `public_exponent` only. The six private components
    /// are left empty.
    pub fn from_public_key_der(endian: Endian, input: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(input);
        let info_len = reader.read_header(Tag::Sequence)?;
        let components = reader.read_nested(info_len, |reader| {
            read_algorithm_identifier(reader)?;
            let bits_len = reader.read_header(Tag::BitString)?;
            reader.read_nested(bits_len, |reader| {
                if reader.read_byte()? != 0x00 {
                    return Err(Error::MalformedBitString);
                }
                let key_len = reader.read_header(Tag::Sequence)?;
                reader.read_nested(key_len, |reader| {
                    let mut components = Self::new(endian);
                    components.modulus = reader.read_uint(endian)?;
                    components.public_exponent = reader.read_uint(endian)?;
                    Ok(components)
                })
            })
        })?;
        reader.finish()?;
        Ok(components)
    }
}

/// Reads a `version` INTEGER and requires it to be 0.
fn read_version(reader: &mut Reader<'_>) -> Result<()> {
    let len = reader.read_header(Tag::Integer)?;
    if len != 1 {
        return Err(Error::Version);
    }
    if reader.read_byte()? != 0x00 {
        return Err(Error::Version);
    }
    Ok(())
}

/// Reads the `AlgorithmIdentifier` and compares it verbatim against the
/// `rsaEncryption` constant. Runs before any component is decoded, so a
/// mismatched document can never leak attacker-chosen integers into the
/// output.
fn read_algorithm_identifier(reader: &mut Reader<'_>) -> Result<()> {
    if reader.read_slice(RSA_ALGORITHM_IDENTIFIER.len())? != RSA_ALGORITHM_IDENTIFIER {
        return Err(Error::UnexpectedAlgorithmIdentifier);
    }
    Ok(())
}

impl fmt::Debug for RsaKeyComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaKeyComponents")
            .field("endian", &self.endian)
            .field("modulus", &self.modulus)
            .field("public_exponent", &self.public_exponent)
            .finish_non_exhaustive()
    }
}

impl Zeroize for RsaKeyComponents {
    fn zeroize(&mut self) {
        self.private_exponent.zeroize();
        self.prime1.zeroize();
        self.prime2.zeroize();
        self.exponent1.zeroize();
        self.exponent2.zeroize();
        self.coefficient.zeroize();
    }
}

impl Drop for RsaKeyComponents {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for RsaKeyComponents {}
