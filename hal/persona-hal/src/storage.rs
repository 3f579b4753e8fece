//! Asset storage abstractions
//!
//! Textures, eyelid masks and persona bundles live in a read-only asset
//! partition addressed by path-like identifiers ("hazel/iris.565").

/// Errors from asset storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// No asset with this identifier
    NotFound,
    /// Offset lies past the end of the asset
    OutOfRange,
    /// Underlying flash read failed
    Flash,
    /// Partition index is damaged
    Corrupted,
}

/// Read-only asset store
///
/// Implementations resolve an identifier to a byte range; they never
/// allocate.
pub trait AssetStore {
    /// Return the size in bytes of the asset
    fn size(&mut self, id: &str) -> Result<usize, StoreError>;

    /// Read bytes of the asset starting at `offset`
    ///
    /// Returns the number of bytes read, which is less than `buf.len()`
    /// only at the end of the asset.
    fn read(&mut self, id: &str, offset: usize, buf: &mut [u8]) -> Result<usize, StoreError>;

    /// Check if an asset exists
    fn contains(&mut self, id: &str) -> bool {
        self.size(id).is_ok()
    }
}

/// Share one store between several readers
///
/// Each call borrows the store for its own duration only.
impl<S: AssetStore> AssetStore for &core::cell::RefCell<S> {
    fn size(&mut self, id: &str) -> Result<usize, StoreError> {
        self.borrow_mut().size(id)
    }

    fn read(&mut self, id: &str, offset: usize, buf: &mut [u8]) -> Result<usize, StoreError> {
        self.borrow_mut().read(id, offset, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    struct OneAsset;

    impl AssetStore for OneAsset {
        fn size(&mut self, id: &str) -> Result<usize, StoreError> {
            if id == "a" {
                Ok(3)
            } else {
                Err(StoreError::NotFound)
            }
        }

        fn read(&mut self, id: &str, offset: usize, buf: &mut [u8]) -> Result<usize, StoreError> {
            let data = b"abc";
            if id != "a" {
                return Err(StoreError::NotFound);
            }
            let rest = data.get(offset..).ok_or(StoreError::OutOfRange)?;
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            Ok(n)
        }
    }

    #[test]
    fn test_shared_store_readers() {
        let store = RefCell::new(OneAsset);
        let mut first = &store;
        let mut second = &store;
        assert!(first.contains("a"));
        assert!(!second.contains("b"));
        let mut buf = [0u8; 2];
        assert_eq!(second.read("a", 1, &mut buf), Ok(2));
        assert_eq!(&buf, b"bc");
        assert_eq!(first.read("a", 4, &mut buf), Err(StoreError::OutOfRange));
    }
}
