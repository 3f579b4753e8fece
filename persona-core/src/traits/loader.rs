//! Persona configuration loader trait

use persona_hal::{EyeLink, StoreError};

use crate::eye::EyeRig;

/// Errors that can occur while loading a persona bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bundle could not be read
    Store(StoreError),
    /// Bundle is larger than the read buffer
    TooLarge,
    /// Bundle bytes are not a valid persona
    Deserialize,
}

impl From<StoreError> for ConfigError {
    fn from(e: StoreError) -> Self {
        ConfigError::Store(e)
    }
}

/// Applies a persona bundle to the eye rig
///
/// A loader may write any field of the rig, geometry included. The
/// orchestrator restores geometry afterwards when it is protected.
/// Fields a bundle omits must be left untouched so the defaults set
/// before the load survive.
pub trait ConfigLoader {
    /// Load `bundle` into `rig`
    fn load<L: EyeLink, const N: usize>(
        &mut self,
        bundle: &str,
        rig: &mut EyeRig<L, N>,
    ) -> Result<(), ConfigError>;
}
