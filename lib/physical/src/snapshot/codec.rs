use crate::SavedOperator;

/// Magic bytes at the start of every encoded snapshot.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"SAGE";

/// Version written by [encode]. Snapshots of other versions are rejected.
pub const SNAPSHOT_VERSION: u8 = 1;

/// Magic (4 bytes), version (1 byte), and payload length (4 bytes).
const HEADER_LENGTH: usize = 9;

/// An error raised while encoding or decoding a snapshot.
///
/// Every error while decoding means that the snapshot is corrupted.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("The snapshot is too short to contain a header.")]
    TooShort,
    #[error("The snapshot does not start with the expected magic bytes.")]
    InvalidMagic,
    #[error("Unsupported snapshot version {0}.")]
    UnsupportedVersion(u8),
    #[error("The snapshot payload is truncated.")]
    Truncated,
    #[error("The snapshot contains {0} unexpected trailing bytes.")]
    TrailingBytes(usize),
    #[error("The snapshot payload of {0} bytes is too large.")]
    TooLarge(usize),
    #[error("Invalid snapshot payload: {0}")]
    Payload(#[from] postcard::Error),
    #[error("Invalid continuation token: {0}")]
    Token(#[from] base64::DecodeError),
}

/// Encodes `saved` into the versioned binary snapshot format.
pub fn encode(saved: &SavedOperator) -> Result<Vec<u8>, SnapshotError> {
    let payload = postcard::to_allocvec(saved)?;
    let length =
        u32::try_from(payload.len()).map_err(|_| SnapshotError::TooLarge(payload.len()))?;

    let mut data = Vec::with_capacity(HEADER_LENGTH + payload.len());
    data.extend_from_slice(SNAPSHOT_MAGIC);
    data.push(SNAPSHOT_VERSION);
    data.extend_from_slice(&length.to_be_bytes());
    data.extend_from_slice(&payload);

    tracing::trace!(root = saved.name(), bytes = data.len(), "Encoded snapshot.");
    Ok(data)
}

/// Decodes a snapshot produced by [encode].
pub fn decode(data: &[u8]) -> Result<SavedOperator, SnapshotError> {
    if data.len() < HEADER_LENGTH {
        return Err(SnapshotError::TooShort);
    }
    if &data[0..4] != SNAPSHOT_MAGIC {
        return Err(SnapshotError::InvalidMagic);
    }
    if data[4] != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(data[4]));
    }

    let length = u32::from_be_bytes([data[5], data[6], data[7], data[8]]);
    let length = usize::try_from(length).map_err(|_| SnapshotError::Truncated)?;
    let payload = &data[HEADER_LENGTH..];
    if payload.len() < length {
        return Err(SnapshotError::Truncated);
    }
    if payload.len() > length {
        return Err(SnapshotError::TrailingBytes(payload.len() - length));
    }

    let (saved, rest) = postcard::take_from_bytes::<SavedOperator>(payload)?;
    if !rest.is_empty() {
        return Err(SnapshotError::TrailingBytes(rest.len()));
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SavedScan;
    use rdf_sage_model::TriplePattern;

    fn example() -> SavedOperator {
        SavedOperator::Scan(SavedScan {
            pattern: TriplePattern::parse("?s", "<http://ex.org/p>", "?o").unwrap(),
            cardinality: 10,
            offset: 3,
        })
    }

    #[test]
    fn header_layout() {
        let data = encode(&example()).unwrap();

        assert_eq!(&data[0..4], b"SAGE");
        assert_eq!(data[4], SNAPSHOT_VERSION);
        let length = u32::from_be_bytes([data[5], data[6], data[7], data[8]]) as usize;
        assert_eq!(length, data.len() - HEADER_LENGTH);
    }

    #[test]
    fn rejects_invalid_header() {
        let mut data = encode(&example()).unwrap();

        assert!(matches!(decode(&data[0..3]), Err(SnapshotError::TooShort)));

        data[4] = 42;
        assert!(matches!(
            decode(&data),
            Err(SnapshotError::UnsupportedVersion(42))
        ));

        data[0] = b'X';
        assert!(matches!(decode(&data), Err(SnapshotError::InvalidMagic)));
    }

    #[test]
    fn rejects_truncated_payload() {
        let data = encode(&example()).unwrap();

        let result = decode(&data[..data.len() - 1]);

        assert!(matches!(result, Err(SnapshotError::Truncated)));
    }

    #[test]
    fn rejects_unknown_variant_tag() {
        let mut data = encode(&example()).unwrap();
        data[HEADER_LENGTH] = 0x7f;

        assert!(matches!(decode(&data), Err(SnapshotError::Payload(_))));
    }
}
