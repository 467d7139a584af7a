//! # Per-frame polling of pressure and tilt sensitive [Tablets](tablet) 🖊️
//!
//! Exposes graphics tablet pens and erasers to an application that already runs a frame loop.
//! Once per frame, the host [polls](Tablet::poll) the tablet it's interested in, and then reads a
//! stable snapshot: normalized [position](Tablet::position), [pressure](Tablet::pressure),
//! [tilt](Tablet::tilt), and edge-triggered [button](Tablet::button) state.
//!
//! Backed by Xorg's *`xinput2`* through `x11rb`, or by an in-memory [`emulated`] server for
//! tests and headless hosts.
//!
//! To get started, create a [`Builder`].
//!
//! ```no_run
//! use drawtablet::{Builder, PreUpdate};
//!
//! let mut manager = Builder::new().build().expect("no X server");
//! let id = manager.tablet(0, true, false).map(drawtablet::Tablet::id);
//!
//! loop {
//!     let Some(tablet) = id.and_then(|id| manager.get_mut(id)) else {
//!         break;
//!     };
//!     tablet.pre_update();
//!     if tablet.button(1).is_some_and(|b| b.held) {
//!         let _ = (tablet.position(), tablet.pressure());
//!     }
//! }
//! ```
//!
//! ## Device detection
//! Only devices whose name contains `"stylus"` or `"eraser"` (case-sensitive) are considered.
//! This matches the naming used by the `xf86-input-wacom` and `xf86-input-libinput` drivers.
//! Devices are enumerated once, at construction; hotplugged devices are not picked up.
//!
//! ## Threading
//! Everything runs synchronously on the calling thread. A poll is one blocking round-trip to the
//! input server, with no timeout. Distinct tablets share nothing mutable and may be polled
//! independently.

#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod axis;
pub mod builder;
pub mod button;
mod platform;
pub mod raw;
pub mod tablet;
pub use builder::Builder;
pub use platform::emulated;
pub use tablet::Tablet;

use std::sync::Arc;

use platform::{PlatformImpl, PlatformManager};

/// A trait that every object is.
/// Used to cast things to `dyn Erased` which leaves us with a wholly erased type.
trait Erased {}
impl<T> Erased for T {}

#[allow(dead_code)]
enum Backing {
    // The RWH owner is arc'd and thus is valid for as long as we need.
    // We don't need to remember what type the pointer came from, but `dyn WhateverTrait` remembers
    // enough to be able to destruct it cleanly.
    Arc(Arc<dyn Erased>),
    // Not borrowed from the host.
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Xorg [`XInput2`](https://www.x.org/releases/current/doc/inputproto/XI2proto.txt)
    #[cfg(xinput2)]
    XInput2,
    /// An in-memory [server](emulated::Server).
    Emulated,
}

/// Errors that may occur while talking to the input server.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    #[cfg(xinput2)]
    #[error(transparent)]
    Connection(#[from] x11rb::errors::ConnectionError),
    #[cfg(xinput2)]
    #[error("server replied with an error: {0:?}")]
    Protocol(x11rb::x11_utils::X11Error),
    /// The device went away after it was enumerated.
    #[error("device {device_id} is no longer attached")]
    Disconnected { device_id: u16 },
}

/// Something to run before the host exposes each frame's input to application code.
///
/// Implemented by [`Tablet`], which polls itself, and [`Manager`], which polls every tablet.
pub trait PreUpdate {
    fn pre_update(&mut self);
}

/// Manages a connection to the OS's input server. This is the main entry point for
/// finding tablets.
///
/// The connection is shared with every [`Tablet`], and closes once the manager and all of its
/// tablets are dropped.
pub struct Manager {
    conn: Arc<PlatformManager>,
    /// In enumeration order. Never changes after construction.
    tablets: Vec<Tablet>,
    skip_disconnected: bool,
    // `_backing` MUST BE LAST IN DECLARATION ORDER!
    // the other fields may rely on the lifetime guarantees granted by the contents
    // of this `Backing`, and it's guaranteed that drop order == declaration order.
    _backing: Backing,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("backend", &self.backed())
            .field("tablets", &self.tablets)
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// List every device once, keeping the tablet-like ones.
    fn enumerate(
        opts: &Builder,
        platform: PlatformManager,
        backing: Backing,
    ) -> Result<Self, builder::BuildError> {
        let conn = Arc::new(platform);
        let devices = conn.list_devices()?;

        let mut tablets = Vec::new();
        for device in &devices {
            if !device.looks_like_tablet() {
                tracing::trace!(
                    device_id = device.id,
                    name = %device.name,
                    "not a tablet"
                );
                continue;
            }
            if !device.enabled && !opts.include_disabled {
                tracing::debug!(
                    device_id = device.id,
                    name = %device.name,
                    "skipping disabled tablet"
                );
                continue;
            }
            tablets.push(Tablet::new(device, Arc::clone(&conn)));
        }
        // `devices` dropped here, the tablets hold only what they digested.

        tracing::info!(
            backend = ?conn.backed(),
            devices = devices.len(),
            tablets = tablets.len(),
            "enumerated input devices"
        );

        Ok(Self {
            conn,
            tablets,
            skip_disconnected: opts.skip_disconnected,
            _backing: backing,
        })
    }
    /// Query the API currently in use.
    #[must_use]
    pub fn backed(&self) -> Backend {
        self.conn.backed()
    }
    /// How many tablet-like devices were found, connected or not.
    #[must_use]
    pub fn tablet_count(&self) -> usize {
        self.tablets.len()
    }
    /// Every tablet, in enumeration order.
    #[must_use]
    pub fn tablets(&self) -> &[Tablet] {
        &self.tablets
    }
    /// The first tablet, in enumeration order, with at least `minimum_buttons` buttons and the
    /// requested capabilities. `None` if nothing qualifies.
    ///
    /// Unless [configured](Builder::skip_disconnected) otherwise, tablets whose last poll failed
    /// are passed over.
    #[must_use]
    pub fn tablet(
        &self,
        minimum_buttons: usize,
        require_pressure: bool,
        require_tilt: bool,
    ) -> Option<&Tablet> {
        self.tablets.iter().find(|tablet| {
            qualifies(
                tablet,
                self.skip_disconnected,
                minimum_buttons,
                require_pressure,
                require_tilt,
            )
        })
    }
    /// As [`Self::tablet`], mutably, to [poll](Tablet::poll) it.
    #[must_use]
    pub fn tablet_mut(
        &mut self,
        minimum_buttons: usize,
        require_pressure: bool,
        require_tilt: bool,
    ) -> Option<&mut Tablet> {
        let skip_disconnected = self.skip_disconnected;
        self.tablets.iter_mut().find(|tablet| {
            qualifies(
                tablet,
                skip_disconnected,
                minimum_buttons,
                require_pressure,
                require_tilt,
            )
        })
    }
    /// Find a tablet previously returned by this manager.
    #[must_use]
    pub fn get(&self, id: tablet::ID) -> Option<&Tablet> {
        self.tablets.iter().find(|tablet| tablet.id() == id)
    }
    #[must_use]
    pub fn get_mut(&mut self, id: tablet::ID) -> Option<&mut Tablet> {
        self.tablets.iter_mut().find(|tablet| tablet.id() == id)
    }
    /// [Poll](Tablet::poll) every tablet, in enumeration order.
    pub fn poll_all(&mut self) {
        self.tablets.iter_mut().for_each(Tablet::poll);
    }
}

impl PreUpdate for Manager {
    fn pre_update(&mut self) {
        self.poll_all();
    }
}

fn qualifies(
    tablet: &Tablet,
    skip_disconnected: bool,
    minimum_buttons: usize,
    require_pressure: bool,
    require_tilt: bool,
) -> bool {
    (tablet.is_connected() || !skip_disconnected)
        && tablet.button_count() >= minimum_buttons
        && (!require_pressure || tablet.supports_pressure())
        && (!require_tilt || tablet.supports_tilt() == require_tilt)
}
