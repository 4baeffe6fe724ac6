//! ASN.1 DER primitive encoding helpers
//!
//! Just enough DER to assemble an EC private-key container: tag constants,
//! length octets, and a tag-length-value combinator. Everything here is a
//! pure function of its inputs, which is what makes the containers built on
//! top of it byte-reproducible.

/// SEQUENCE tag
pub const TAG_SEQUENCE: u8 = 0x30;
/// INTEGER tag
pub const TAG_INTEGER: u8 = 0x02;
/// BIT STRING tag
pub const TAG_BIT_STRING: u8 = 0x03;
/// OCTET STRING tag
pub const TAG_OCTET_STRING: u8 = 0x04;
/// Context-specific constructed tag [0]
pub const TAG_CONTEXT_0: u8 = 0xA0;
/// Context-specific constructed tag [1]
pub const TAG_CONTEXT_1: u8 = 0xA1;

/// Errors that can occur while encoding DER primitives
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("content length {0} exceeds the supported DER length range")]
    LengthOverflow(usize),
}

/// Encode a content length as DER length octets
///
/// Short form for lengths below 128, one length-of-length byte up to 255,
/// two length-of-length bytes up to 65535. Anything larger is rejected
/// rather than truncated; no structure in this container comes close to
/// that bound, so hitting it means the caller is malformed.
///
/// # Errors
///
/// Returns [`EncodingError::LengthOverflow`] for lengths of 65536 or more.
pub fn encode_length(len: usize) -> Result<Vec<u8>, EncodingError> {
    match len {
        0..=0x7F => Ok(vec![len as u8]),
        0x80..=0xFF => Ok(vec![0x81, len as u8]),
        0x100..=0xFFFF => Ok(vec![0x82, (len >> 8) as u8, (len & 0xFF) as u8]),
        _ => Err(EncodingError::LengthOverflow(len)),
    }
}

/// Encode a complete tag-length-value element
///
/// # Errors
///
/// Returns [`EncodingError::LengthOverflow`] if the content is too large
/// for the supported length forms.
pub fn encode_tlv(tag: u8, content: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let length = encode_length(content.len())?;
    let mut out = Vec::with_capacity(1 + length.len() + content.len());
    out.push(tag);
    out.extend_from_slice(&length);
    out.extend_from_slice(content);
    Ok(out)
}
