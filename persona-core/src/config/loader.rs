//! Bundle loader reading persona configs from the asset partition

use persona_hal::{AssetStore, EyeLink};

use super::PersonaConfig;
use crate::eye::EyeRig;
use crate::traits::{ConfigError, ConfigLoader};

/// Maximum serialized bundle size
pub const MAX_BUNDLE_SIZE: usize = 2048;

/// Loads postcard persona bundles from an [`AssetStore`]
pub struct BundleLoader<S> {
    store: S,
}

impl<S: AssetStore> BundleLoader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read and decode a bundle without applying it
    pub fn read(&mut self, bundle: &str) -> Result<PersonaConfig, ConfigError> {
        let size = self.store.size(bundle)?;
        if size > MAX_BUNDLE_SIZE {
            return Err(ConfigError::TooLarge);
        }

        let mut buf = [0u8; MAX_BUNDLE_SIZE];
        let mut filled = 0;
        while filled < size {
            let n = self.store.read(bundle, filled, &mut buf[filled..size])?;
            if n == 0 {
                return Err(ConfigError::Deserialize);
            }
            filled += n;
        }

        postcard::from_bytes(&buf[..size]).map_err(|_| ConfigError::Deserialize)
    }
}

impl<S: AssetStore> ConfigLoader for BundleLoader<S> {
    fn load<L: EyeLink, const N: usize>(
        &mut self,
        bundle: &str,
        rig: &mut EyeRig<L, N>,
    ) -> Result<(), ConfigError> {
        let config = self.read(bundle)?;
        config.apply(rig);
        Ok(())
    }
}
