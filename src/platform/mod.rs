// Conditionally include each backend...
pub mod emulated;
#[cfg(xinput2)]
pub(crate) mod xinput2;

use crate::raw::DeviceInfo;

/// Trait that all platforms implement, giving the `Manager` and each `Tablet` access to the black box.
///
/// Every call is a synchronous round-trip to the input server. Nothing is cached between calls.
#[enum_dispatch::enum_dispatch]
pub(crate) trait PlatformImpl {
    /// Every device currently attached, in server order.
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, crate::QueryError>;
    /// Fresh capabilities and state of a single device.
    fn query_device(&self, device_id: u16) -> Result<DeviceInfo, crate::QueryError>;
}

/// Static dispatch between compiled backends.
/// Shared behind an `Arc` by the `Manager` and every `Tablet`, the last of which to drop closes the connection.
#[enum_dispatch::enum_dispatch(PlatformImpl)]
pub(crate) enum PlatformManager {
    #[cfg(xinput2)]
    XInput2(xinput2::Manager),
    Emulated(emulated::Server),
}
impl PlatformManager {
    pub(crate) fn backed(&self) -> crate::Backend {
        match self {
            #[cfg(xinput2)]
            Self::XInput2(_) => crate::Backend::XInput2,
            Self::Emulated(_) => crate::Backend::Emulated,
        }
    }
}
