//! NVS-backed environment lookups.
//!
//! Values are plain strings stored in the `env` namespace by whatever tool
//! provisions the device. The console only reads them, once, at startup.

use super::Env;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

/// NVS namespace holding environment strings
pub const NVS_NAMESPACE: &str = "env";

/// Longest value read from NVS (bytes, including terminator)
pub const MAX_VALUE_LEN: usize = 64;

/// NVS operation errors
#[derive(Debug)]
pub enum NvsError {
    /// NVS initialization failed
    #[cfg(target_os = "espidf")]
    InitFailed(EspError),
    /// NVS read error
    #[cfg(target_os = "espidf")]
    IoError(EspError),
    /// Feature not available on this platform
    #[cfg(not(target_os = "espidf"))]
    NotAvailable,
}

#[cfg(target_os = "espidf")]
impl From<EspError> for NvsError {
    fn from(e: EspError) -> Self {
        NvsError::IoError(e)
    }
}

impl core::fmt::Display for NvsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(target_os = "espidf")]
            NvsError::InitFailed(e) => write!(f, "NVS init failed: {}", e),
            #[cfg(target_os = "espidf")]
            NvsError::IoError(e) => write!(f, "NVS read failed: {}", e),
            #[cfg(not(target_os = "espidf"))]
            NvsError::NotAvailable => f.write_str("NVS not available"),
        }
    }
}

/// Read-only view of the `env` NVS namespace.
#[cfg(target_os = "espidf")]
pub struct NvsEnv {
    storage: EspNvs<NvsDefault>,
}

#[cfg(target_os = "espidf")]
impl NvsEnv {
    /// Open the namespace on the default NVS partition.
    pub fn open(partition: EspDefaultNvsPartition) -> Result<Self, NvsError> {
        let storage = EspNvs::new(partition, NVS_NAMESPACE, false)
            .map_err(NvsError::InitFailed)?;
        Ok(Self { storage })
    }

    /// Read `key` into `buf`. A missing key is `Ok(None)`.
    pub fn get<'a>(&self, key: &str, buf: &'a mut [u8]) -> Result<Option<&'a str>, NvsError> {
        Ok(self.storage.get_str(key, buf)?)
    }
}

#[cfg(target_os = "espidf")]
impl Env for NvsEnv {
    fn with_value(&self, key: &str, f: &mut dyn FnMut(&str)) {
        let mut buf = [0u8; MAX_VALUE_LEN];
        // Unreadable values count as missing
        if let Ok(Some(value)) = self.get(key, &mut buf) {
            f(value);
        }
    }
}

/// Stub for non-ESP platforms: every lookup misses.
#[cfg(not(target_os = "espidf"))]
pub struct NvsEnv {
    _private: (),
}

#[cfg(not(target_os = "espidf"))]
impl NvsEnv {
    pub fn open() -> Result<Self, NvsError> {
        Err(NvsError::NotAvailable)
    }
}

#[cfg(not(target_os = "espidf"))]
impl Env for NvsEnv {
    fn with_value(&self, _key: &str, _f: &mut dyn FnMut(&str)) {}
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn test_nvs_unavailable_on_host() {
        let err = NvsEnv::open().err().unwrap();
        assert_eq!(err.to_string(), "NVS not available");
    }
}
