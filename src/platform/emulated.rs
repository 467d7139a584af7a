//! An in-memory input server.
//!
//! Holds a scripted list of devices which the host (or a test) pokes between polls, standing in
//! for real hardware. Cloning a [`Server`] gives another handle onto the same devices, so one
//! copy can be handed to [`Builder::build_emulated`](crate::Builder::build_emulated) while the
//! other keeps driving it.
//!
//! ```
//! use drawtablet::{emulated, raw::DeviceInfo, Builder};
//!
//! let server = emulated::Server::new().with_device(
//!     DeviceInfo::new(12, "Wacom Intuos S Pen stylus")
//!         .with_buttons(3)
//!         .with_valuator(0, 0.0, 100.0)
//!         .with_valuator(1, 0.0, 100.0)
//!         .with_valuator(2, 0.0, 1024.0),
//! );
//! let mut manager = Builder::new().build_emulated(server.clone()).unwrap();
//!
//! server.set_valuator(12, 2, 512.0);
//! let tablet = manager.tablet_mut(0, true, false).unwrap();
//! tablet.poll();
//! assert_eq!(tablet.pressure(), 0.5);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::raw::{Class, DeviceInfo};

#[derive(Clone, Default)]
pub struct Server {
    devices: Arc<Mutex<Vec<DeviceInfo>>>,
}
impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("devices", &self.devices.lock().len())
            .finish()
    }
}

impl Server {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Attach a device, builder style.
    #[must_use]
    pub fn with_device(self, device: DeviceInfo) -> Self {
        self.attach(device);
        self
    }
    /// Attach a device, replacing any with the same id.
    pub fn attach(&self, device: DeviceInfo) {
        let mut devices = self.devices.lock();
        if let Some(existing) = devices.iter_mut().find(|d| d.id == device.id) {
            *existing = device;
        } else {
            devices.push(device);
        }
    }
    /// Unplug a device. Further queries for it fail.
    pub fn detach(&self, device_id: u16) -> Option<DeviceInfo> {
        let mut devices = self.devices.lock();
        let idx = devices.iter().position(|d| d.id == device_id)?;
        Some(devices.remove(idx))
    }
    /// Edit a device in place. Returns false if there is no such device.
    pub fn update(&self, device_id: u16, f: impl FnOnce(&mut DeviceInfo)) -> bool {
        let mut devices = self.devices.lock();
        let Some(device) = devices.iter_mut().find(|d| d.id == device_id) else {
            return false;
        };
        f(device);
        true
    }
    /// Set the raw value of valuator `number`. Returns false if the device or valuator doesn't exist.
    pub fn set_valuator(&self, device_id: u16, number: u16, value: f64) -> bool {
        let mut found = false;
        self.update(device_id, |device| {
            for class in &mut device.classes {
                if let Class::Valuator(v) = class {
                    if v.number == number {
                        v.value = value;
                        found = true;
                    }
                }
            }
        });
        found
    }
    /// Hold or release button `index`. Returns false if the device has no button block.
    pub fn set_button(&self, device_id: u16, index: usize, down: bool) -> bool {
        let mut found = false;
        self.update(device_id, |device| {
            for class in &mut device.classes {
                if let Class::Buttons(b) = class {
                    crate::button::set_mask_bit(&mut b.mask, index, down);
                    found = true;
                }
            }
        });
        found
    }
}

impl super::PlatformImpl for Server {
    fn list_devices(&self) -> Result<Vec<DeviceInfo>, crate::QueryError> {
        Ok(self.devices.lock().clone())
    }
    fn query_device(&self, device_id: u16) -> Result<DeviceInfo, crate::QueryError> {
        self.devices
            .lock()
            .iter()
            .find(|d| d.id == device_id)
            .cloned()
            .ok_or(crate::QueryError::Disconnected { device_id })
    }
}
