//! Builder-style configuration for connecting to the system input server.
//!
//! For a default configuration, `Builder::new().build()` is all you need!

use crate::{platform::PlatformManager, Backing, Manager, QueryError};

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// The given display handle doesn't use a supported connection type.
    /// This includes cases where the platform is otherwise supported but the feature was disabled at compile-time.
    #[error("handle doesn't contain a supported display type")]
    Unsupported,
    /// Failed to acquire a display handle
    #[error("{:?}", .0)]
    HandleError(raw_window_handle::HandleError),
    /// Couldn't reach the X server at all.
    #[cfg(xinput2)]
    #[error(transparent)]
    Connect(#[from] x11rb::errors::ConnectError),
    #[error("server lacks the XInput2 extension")]
    MissingExtension,
    #[error("server speaks XInput v{major}.{minor}, v2.0 or later is required")]
    UnsupportedVersion { major: u16, minor: u16 },
    /// Connected, but enumeration failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}
// #[from] thiserror attribute breaks horribly D:
impl From<raw_window_handle::HandleError> for BuildError {
    fn from(value: raw_window_handle::HandleError) -> Self {
        Self::HandleError(value)
    }
}

/// Pre-construction configuration for a [`Manager`].
#[derive(Clone, Debug)]
pub struct Builder {
    pub(crate) display: Option<String>,
    pub(crate) skip_disconnected: bool,
    pub(crate) include_disabled: bool,
}
impl Default for Builder {
    fn default() -> Self {
        Self {
            display: None,
            skip_disconnected: true,
            include_disabled: true,
        }
    }
}

/// # Configuration
impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// X display to connect to, as in `:0` or `host:1.0`. By default, `$DISPLAY` is used.
    #[must_use]
    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }
    /// Whether tablets whose last poll failed are passed over by [`Manager::tablet`] until they
    /// come back. Defaults to `true`.
    #[must_use]
    pub fn skip_disconnected(mut self, skip: bool) -> Self {
        self.skip_disconnected = skip;
        self
    }
    /// Whether to keep devices that are attached but disabled. Defaults to `true`.
    #[must_use]
    pub fn include_disabled(mut self, include: bool) -> Self {
        self.include_disabled = include;
        self
    }
}
/// # Finishing
impl Builder {
    /// Connect to the configured display and enumerate its tablets.
    ///
    /// Failing here means the environment can't provide tablet input at all.
    #[allow(clippy::missing_errors_doc)]
    pub fn build(self) -> Result<Manager, BuildError> {
        #[cfg(xinput2)]
        {
            let platform = crate::platform::xinput2::Manager::connect(self.display.as_deref())?;
            Manager::enumerate(&self, PlatformManager::XInput2(platform), Backing::None)
        }
        #[cfg(not(xinput2))]
        {
            Err(BuildError::Unsupported)
        }
    }
    /// Build alongside a host's display handle carrier, such as an `Arc`'d `winit` window.
    ///
    /// The handle only selects the backend, a separate connection is opened to the configured
    /// display. The `Arc` is kept alive for as long as the returned `Manager` is around.
    // Silly clippy, it's a self-describing err type!
    #[allow(clippy::missing_errors_doc)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn build_shared(
        self,
        rwh: std::sync::Arc<impl raw_window_handle::HasDisplayHandle + 'static>,
    ) -> Result<Manager, BuildError> {
        let raw = rwh.display_handle()?.as_raw();
        match raw {
            #[cfg(xinput2)]
            raw_window_handle::RawDisplayHandle::Xlib(_)
            | raw_window_handle::RawDisplayHandle::Xcb(_) => {
                let platform =
                    crate::platform::xinput2::Manager::connect(self.display.as_deref())?;
                // Erase the type, we don't care - we just need to be able to `Drop` it and to keep it around as
                // long as we need!
                let backing = Backing::Arc(rwh as _);
                Manager::enumerate(&self, PlatformManager::XInput2(platform), backing)
            }
            _ => Err(BuildError::Unsupported),
        }
    }
    /// Enumerate the devices of an in-memory [server](crate::emulated::Server).
    #[allow(clippy::missing_errors_doc)]
    pub fn build_emulated(self, server: crate::emulated::Server) -> Result<Manager, BuildError> {
        Manager::enumerate(&self, PlatformManager::Emulated(server), Backing::None)
    }
}
