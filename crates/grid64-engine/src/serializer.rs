//! Two-phase serialize state.
//!
//! Setup (metadata pre-encoding and header computation) is cached and
//! reused by later warm calls until the grid's dimensions or metadata
//! change. The cell copy and checksum run on every call.

use grid64_codec::codec::metadata_to_vec;
use grid64_codec::{encoded_len, CodecError, Header};
use grid64_core::{GridError, Metadata};

/// Result of the setup phase for one grid shape and metadata revision.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Setup {
    pub(crate) header: Header,
    pub(crate) meta: Vec<u8>,
    pub(crate) meta_revision: u64,
    /// Exact encoded length.
    pub(crate) len: usize,
}

impl Setup {
    pub(crate) fn prepare(
        header: Header,
        metadata: &Metadata,
        meta_revision: u64,
    ) -> Result<Self, GridError> {
        let meta = metadata_to_vec(metadata)?;
        let count = header.checked_count()?;
        let len = encoded_len(count, meta.len()).ok_or(CodecError::DimensionOverflow {
            height: header.dims.height as u64,
            width: header.dims.width as u64,
        })?;
        Ok(Self {
            header,
            meta,
            meta_revision,
            len,
        })
    }
}

/// Cached setup, if any.
#[derive(Debug, Default)]
pub(crate) struct Serializer {
    setup: Option<Setup>,
}

impl Serializer {
    /// The cached setup if it still describes `header` and `meta_revision`.
    pub(crate) fn current(&self, header: &Header, meta_revision: u64) -> Option<&Setup> {
        self.setup
            .as_ref()
            .filter(|s| s.header == *header && s.meta_revision == meta_revision)
    }

    pub(crate) fn store(&mut self, setup: Setup) -> &Setup {
        self.setup.insert(setup)
    }

    pub(crate) fn is_primed(&self) -> bool {
        self.setup.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid64_core::Dims;

    #[test]
    fn setup_length_matches_layout() {
        let mut meta = Metadata::new();
        meta.insert("k", true);
        let setup = Setup::prepare(Header::populated(Dims::new(2, 3)), &meta, 0).unwrap();
        // count + key len + "k" + tag + bool
        assert_eq!(setup.meta.len(), 4 + 4 + 1 + 1 + 1);
        assert_eq!(setup.len, 24 + 48 + setup.meta.len() + 8);
    }

    #[test]
    fn cache_keyed_on_header_and_revision() {
        let header = Header::populated(Dims::new(4, 4));
        let mut s = Serializer::default();
        assert!(!s.is_primed());
        s.store(Setup::prepare(header, &Metadata::new(), 3).unwrap());
        assert!(s.current(&header, 3).is_some());
        assert!(s.current(&header, 4).is_none());
        assert!(s.current(&Header::populated(Dims::new(2, 8)), 3).is_none());
        assert!(s.current(&Header::empty(), 3).is_none());
    }
}
