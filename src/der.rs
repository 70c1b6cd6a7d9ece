//! Minimal DER primitives for the two fixed key structures.
//!
//! This is not a general-purpose ASN.1 implementation. Only the tags and
//! length forms that `PrivateKeyInfo` and `SubjectPublicKeyInfo` use are
//! supported, and parsing is strict DER: definite lengths, minimally
//! encoded, at most four length bytes.

use alloc::vec::Vec;

use crate::errors::{Error, Result};

/// Byte order of the integer components handled by a codec instance.
///
/// This selects the byte-significance of the component vectors only; the
/// DER wire encoding is always big-endian.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Endian {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

/// ASN.1 tags used by the key structures.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Tag {
    /// `INTEGER`
    Integer = 0x02,
    /// `BIT STRING`
    BitString = 0x03,
    /// `OCTET STRING`
    OctetString = 0x04,
    /// `SEQUENCE` (constructed)
    Sequence = 0x30,
}

impl Tag {
    /// The identifier octet for this tag.
    pub fn octet(self) -> u8 {
        self as u8
    }
}

/// Number of bytes a tag plus DER length field occupies for a value of
/// `len` content bytes.
pub fn header_len(len: usize) -> Result<usize> {
    let len = u32::try_from(len).map_err(|_| Error::MalformedLength)?;
    Ok(1 + match len {
        0..=0x7f => 1,
        0x80..=0xff => 2,
        0x100..=0xffff => 3,
        0x1_0000..=0xff_ffff => 4,
        _ => 5,
    })
}

/// Returns the significant digits of `value`: the slice left after
/// discarding redundant zero bytes from the most significant end.
fn significant(value: &[u8], endian: Endian) -> &[u8] {
    match endian {
        Endian::Big => {
            let zeros = value.iter().take_while(|&&b| b == 0).count();
            &value[zeros..]
        }
        Endian::Little => {
            let zeros = value.iter().rev().take_while(|&&b| b == 0).count();
            &value[..value.len() - zeros]
        }
    }
}

/// Content length of the `INTEGER` encoding of `value`, sign pad included.
fn uint_content_len(value: &[u8], endian: Endian) -> usize {
    let digits = significant(value, endian);
    let msb = match endian {
        Endian::Big => digits.first(),
        Endian::Little => digits.last(),
    };
    match msb {
        // The zero value still takes one content byte.
        None => 1,
        Some(&msb) => digits.len() + usize::from(msb & 0x80 != 0),
    }
}

/// Full TLV length of the `INTEGER` encoding of `value`.
pub fn uint_encoded_len(value: &[u8], endian: Endian) -> Result<usize> {
    let content = uint_content_len(value, endian);
    Ok(header_len(content)? + content)
}

/// DER writer.
///
/// Values are written strictly front to back; callers compute the content
/// lengths of nested values first ([`header_len`], [`uint_encoded_len`])
/// and emit each header before its contents.
#[derive(Debug)]
pub struct Writer {
    out: Vec<u8>,
}

impl Writer {
    /// Creates a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
        }
    }

    /// Writes a tag octet followed by the DER length field for `len`
    /// content bytes: a single byte below 0x80, otherwise `0x80 | k` and
    /// `k` big-endian length bytes.
    pub fn header(&mut self, tag: Tag, len: usize) -> Result<()> {
        let len = u32::try_from(len).map_err(|_| Error::MalformedLength)?;
        self.out.push(tag.octet());
        if len < 0x80 {
            self.out.push(len as u8);
        } else {
            let be = len.to_be_bytes();
            let zeros = be.iter().take_while(|&&b| b == 0).count();
            self.out.push(0x80 | (be.len() - zeros) as u8);
            self.out.extend_from_slice(&be[zeros..]);
        }
        Ok(())
    }

    /// Writes raw content bytes.
    pub fn bytes(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    /// Writes one `INTEGER` TLV for `value` held in `endian` byte order.
    ///
    /// The content is minimal big-endian with a single `0x00` prefix when
    /// the leading significant byte has its high bit set. The zero value
    /// (including an empty `value`) encodes as one `0x00` byte.
    pub fn uint(&mut self, value: &[u8], endian: Endian) -> Result<()> {
        let digits = significant(value, endian);
        let msb = match endian {
            Endian::Big => digits.first(),
            Endian::Little => digits.last(),
        };
        match msb {
            None => {
                self.header(Tag::Integer, 1)?;
                self.out.push(0x00);
            }
            Some(&msb) => {
                let pad = msb & 0x80 != 0;
                self.header(Tag::Integer, digits.len() + usize::from(pad))?;
                if pad {
                    self.out.push(0x00);
                }
                match endian {
                    Endian::Big => self.out.extend_from_slice(digits),
                    Endian::Little => self.out.extend(digits.iter().rev()),
                }
            }
        }
        Ok(())
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

/// Forward-only bounds-checked cursor over a DER buffer.
///
/// Every primitive validates against the end of the input before the
/// position advances; a failed read returns an error without producing
/// partial output. Nesting into a declared-length substructure narrows the
/// bound, so an inner value can never consume bytes owned by an outer one.
#[derive(Debug)]
pub struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a cursor over `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Bytes left before the bound.
    pub fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    /// Whether the cursor sits exactly on the bound.
    pub fn is_finished(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Fails with [`Error::TrailingBytes`] unless the input is exhausted.
    pub fn finish(&self) -> Result<()> {
        if self.is_finished() {
            Ok(())
        } else {
            Err(Error::TrailingBytes)
        }
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self) -> Result<u8> {
        let byte = *self.input.get(self.pos).ok_or(Error::TruncatedInput)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads `len` content bytes.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::TruncatedInput);
        }
        let slice = &self.input[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Reads a DER length field.
    ///
    /// Rejects indefinite lengths, more than four length bytes,
    /// non-minimal encodings, and any length that exceeds the remaining
    /// input.
    fn read_length(&mut self) -> Result<usize> {
        let first = self.read_byte()?;
        let len = if first < 0x80 {
            usize::from(first)
        } else {
            let count = usize::from(first & 0x7f);
            if count == 0 || count > 4 {
                return Err(Error::MalformedLength);
            }
            let mut len: u32 = 0;
            for _ in 0..count {
                len = len << 8 | u32::from(self.read_byte()?);
            }
            let minimal = match count {
                1 => len >= 0x80,
                2 => len > 0xff,
                3 => len > 0xffff,
                _ => len > 0xff_ffff,
            };
            if !minimal {
                return Err(Error::MalformedLength);
            }
            usize::try_from(len).map_err(|_| Error::MalformedLength)?
        };
        if len > self.remaining() {
            return Err(Error::MalformedLength);
        }
        Ok(len)
    }

    /// Reads a tag octet and length field, validating the tag against
    /// `expected` and the declared length against the remaining input.
    /// Returns the content length.
    pub fn read_header(&mut self, expected: Tag) -> Result<usize> {
        let tag = self.read_byte()?;
        if tag != expected.octet() {
            return Err(Error::MalformedTag {
                expected: expected.octet(),
                actual: tag,
            });
        }
        self.read_length()
    }

    /// Reads a `len`-byte substructure and runs `f` over it with a
    /// narrowed bound. The closure must consume the substructure exactly.
    pub fn read_nested<T>(
        &mut self,
        len: usize,
        f: impl FnOnce(&mut Reader<'a>) -> Result<T>,
    ) -> Result<T> {
        let mut inner = Reader::new(self.read_slice(len)?);
        let value = f(&mut inner)?;
        inner.finish()?;
        Ok(value)
    }

    /// Reads an `INTEGER` and returns its magnitude in `endian` byte
    /// order.
    ///
    /// A single leading `0x00` sign byte is stripped; the zero value comes
    /// back as an empty vector.
    pub fn read_uint(&mut self, endian: Endian) -> Result<Vec<u8>> {
        let len = self.read_header(Tag::Integer)?;
        if len == 0 {
            return Err(Error::MalformedLength);
        }
        let mut content = self.read_slice(len)?;
        if content[0] == 0x00 {
            content = &content[1..];
        }
        let mut out = content.to_vec();
        if endian == Endian::Little {
            out.reverse();
        }
        Ok(out)
    }

    /// Like [`Reader::read_uint`], but additionally requires the decoded
    /// magnitude to be exactly `expected` bytes long.
    ///
    /// Useful when marshaling into fixed-width provider blobs where a
    /// field's length is structurally significant.
    pub fn read_uint_exact(&mut self, endian: Endian, expected: usize) -> Result<Vec<u8>> {
        let out = self.read_uint(endian)?;
        if out.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: out.len(),
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_tlv(tag: Tag, content: &[u8]) -> Vec<u8> {
        let mut w = Writer::with_capacity(header_len(content.len()).unwrap() + content.len());
        w.header(tag, content.len()).unwrap();
        w.bytes(content);
        w.finish()
    }

    #[test]
    fn short_form_length() {
        let der = encode_tlv(Tag::OctetString, &[0xab; 0x7f]);
        assert_eq!(der[..2], [0x04, 0x7f]);

        let mut r = Reader::new(&der);
        assert_eq!(r.read_header(Tag::OctetString).unwrap(), 0x7f);
        assert_eq!(r.read_slice(0x7f).unwrap(), [0xab; 0x7f]);
        assert!(r.finish().is_ok());
    }

    #[test]
    fn long_form_length() {
        let der = encode_tlv(Tag::OctetString, &[0xcd; 0x80]);
        assert_eq!(der[..3], [0x04, 0x81, 0x80]);
        let mut r = Reader::new(&der);
        assert_eq!(r.read_header(Tag::OctetString).unwrap(), 0x80);

        let der = encode_tlv(Tag::OctetString, &[0xcd; 0x100]);
        assert_eq!(der[..4], [0x04, 0x82, 0x01, 0x00]);
        let mut r = Reader::new(&der);
        assert_eq!(r.read_header(Tag::OctetString).unwrap(), 0x100);

        let der = encode_tlv(Tag::OctetString, &[0xcd; 0x1_0000]);
        assert_eq!(der[..5], [0x04, 0x83, 0x01, 0x00, 0x00]);
        let mut r = Reader::new(&der);
        assert_eq!(r.read_header(Tag::OctetString).unwrap(), 0x1_0000);
    }

    #[test]
    fn header_len_matches_writer() {
        for len in [0, 1, 0x7f, 0x80, 0xff, 0x100, 0xffff, 0x1_0000] {
            let mut w = Writer::with_capacity(8);
            w.header(Tag::Sequence, len).unwrap();
            assert_eq!(w.finish().len(), header_len(len).unwrap());
        }
    }

    #[test]
    fn rejects_wrong_tag() {
        let mut r = Reader::new(&[0x04, 0x00]);
        assert_eq!(
            r.read_header(Tag::Sequence),
            Err(Error::MalformedTag {
                expected: 0x30,
                actual: 0x04
            })
        );
    }

    #[test]
    fn rejects_bogus_lengths() {
        // Indefinite form.
        let mut r = Reader::new(&[0x30, 0x80]);
        assert_eq!(r.read_header(Tag::Sequence), Err(Error::MalformedLength));

        // More than four length bytes.
        let mut r = Reader::new(&[0x30, 0x85, 0x01, 0x01, 0x01, 0x01, 0x01]);
        assert_eq!(r.read_header(Tag::Sequence), Err(Error::MalformedLength));

        // Non-minimal: 0x7f must use the short form.
        let mut input = vec![0x30, 0x81, 0x7f];
        input.extend_from_slice(&[0u8; 0x7f]);
        let mut r = Reader::new(&input);
        assert_eq!(r.read_header(Tag::Sequence), Err(Error::MalformedLength));

        // Non-minimal: leading zero length byte.
        let mut input = vec![0x30, 0x82, 0x00, 0x80];
        input.extend_from_slice(&[0u8; 0x80]);
        let mut r = Reader::new(&input);
        assert_eq!(r.read_header(Tag::Sequence), Err(Error::MalformedLength));
    }

    #[test]
    fn rejects_length_past_bound() {
        let mut r = Reader::new(&[0x30, 0x03, 0x00, 0x00]);
        assert_eq!(r.read_header(Tag::Sequence), Err(Error::MalformedLength));
    }

    #[test]
    fn read_slice_checks_bound() {
        let mut r = Reader::new(&[0x01, 0x02]);
        assert_eq!(r.read_slice(3), Err(Error::TruncatedInput));
        // The failed read must not have advanced the cursor.
        assert_eq!(r.read_slice(2).unwrap(), [0x01, 0x02]);
        assert_eq!(r.read_byte(), Err(Error::TruncatedInput));
    }

    #[test]
    fn nested_requires_exhaustion() {
        let mut r = Reader::new(&[0xaa, 0xbb, 0xcc]);
        let result = r.read_nested(3, |inner| {
            inner.read_byte()?;
            Ok(())
        });
        assert_eq!(result, Err(Error::TrailingBytes));
    }

    #[test]
    fn uint_zero_encodes_as_one_byte() {
        for endian in [Endian::Big, Endian::Little] {
            for value in [&[][..], &[0x00][..], &[0x00, 0x00, 0x00][..]] {
                let mut w = Writer::with_capacity(3);
                w.uint(value, endian).unwrap();
                assert_eq!(w.finish(), [0x02, 0x01, 0x00]);
            }
        }
    }

    #[test]
    fn uint_high_bit_gains_sign_pad() {
        let mut w = Writer::with_capacity(4);
        w.uint(&[0x80, 0x01], Endian::Big).unwrap();
        assert_eq!(w.finish(), [0x02, 0x03, 0x00, 0x80, 0x01]);

        // Same magnitude, little-endian storage.
        let mut w = Writer::with_capacity(4);
        w.uint(&[0x01, 0x80], Endian::Little).unwrap();
        assert_eq!(w.finish(), [0x02, 0x03, 0x00, 0x80, 0x01]);
    }

    #[test]
    fn uint_strips_redundant_zeros() {
        let mut w = Writer::with_capacity(8);
        w.uint(&[0x00, 0x00, 0x12, 0x34], Endian::Big).unwrap();
        assert_eq!(w.finish(), [0x02, 0x02, 0x12, 0x34]);

        let mut w = Writer::with_capacity(8);
        w.uint(&[0x34, 0x12, 0x00, 0x00], Endian::Little).unwrap();
        assert_eq!(w.finish(), [0x02, 0x02, 0x12, 0x34]);
    }

    #[test]
    fn read_uint_strips_sign_pad() {
        let mut r = Reader::new(&[0x02, 0x03, 0x00, 0x80, 0x01]);
        assert_eq!(r.read_uint(Endian::Big).unwrap(), [0x80, 0x01]);

        let mut r = Reader::new(&[0x02, 0x03, 0x00, 0x80, 0x01]);
        assert_eq!(r.read_uint(Endian::Little).unwrap(), [0x01, 0x80]);
    }

    #[test]
    fn read_uint_zero_is_empty_magnitude() {
        let mut r = Reader::new(&[0x02, 0x01, 0x00]);
        assert_eq!(r.read_uint(Endian::Big).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn read_uint_rejects_empty_content() {
        let mut r = Reader::new(&[0x02, 0x00]);
        assert_eq!(r.read_uint(Endian::Big), Err(Error::MalformedLength));
    }

    #[test]
    fn read_uint_exact_enforces_size() {
        let mut r = Reader::new(&[0x02, 0x02, 0x12, 0x34]);
        assert_eq!(r.read_uint_exact(Endian::Big, 2).unwrap(), [0x12, 0x34]);

        let mut r = Reader::new(&[0x02, 0x02, 0x12, 0x34]);
        assert_eq!(
            r.read_uint_exact(Endian::Big, 4),
            Err(Error::SizeMismatch {
                expected: 4,
                actual: 2
            })
        );

        let mut r = Reader::new(&[0x02, 0x02, 0x12, 0x34]);
        assert_eq!(
            r.read_uint_exact(Endian::Big, 1),
            Err(Error::SizeMismatch {
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn uint_round_trip_per_endianness() {
        let cases: &[&[u8]] = &[&[0x01], &[0x7f], &[0x80], &[0x01, 0x00, 0x01], &[0xff; 16]];
        for &value in cases {
            for endian in [Endian::Big, Endian::Little] {
                let mut w = Writer::with_capacity(20);
                w.uint(value, endian).unwrap();
                let der = w.finish();
                assert_eq!(der.len(), uint_encoded_len(value, endian).unwrap());

                // Every case is already minimal under both byte orders, so
                // the decoded magnitude must match the input exactly.
                let mut r = Reader::new(&der);
                assert_eq!(r.read_uint(endian).unwrap(), value);
            }
        }
    }
}
