//! # Tablets
//!
//! A [`Tablet`] is one pressure-sensitive tool as the input server sees it - typically the tip
//! *or* the eraser end of a stylus, each being a separate device. Its capabilities are fixed when
//! the [`Manager`](crate::Manager) enumerates it, and its state is refreshed by [`Tablet::poll`],
//! which the host calls once per frame before reading anything.
//!
//! All values are normalized to `[0, 1]` from the ranges the device reports.

use std::sync::Arc;

use crate::{
    axis::{AvailableAxes, Axis, Range, Vec2},
    button::{mask_bit, ButtonState},
    platform::{PlatformImpl, PlatformManager},
    raw::{Class, DeviceInfo},
    QueryError,
};

/// Devices whose name contains this are pen tips.
pub const STYLUS_KEYWORD: &str = "stylus";
/// Devices whose name contains this are erasers.
pub const ERASER_KEYWORD: &str = "eraser";

/// Which end of the pen this is, guessed from the device name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::AsRefStr)]
pub enum Type {
    Stylus,
    /// A nib found on the reverse of some styli primarily intended to erase.
    Eraser,
    /// Neither keyword appeared in the name.
    Unknown,
}
impl Type {
    /// Case-sensitive. A name matching both is a `Stylus`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.contains(STYLUS_KEYWORD) {
            Self::Stylus
        } else if name.contains(ERASER_KEYWORD) {
            Self::Eraser
        } else {
            Self::Unknown
        }
    }
}

/// An opaque ID. Can be used to find a tablet again through [`Manager::get`](crate::Manager::get).
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ID(u16);

/// See [module level docs](`crate::tablet`) for details.
pub struct Tablet {
    device_id: u16,
    name: String,
    tablet_type: Type,
    available_axes: AvailableAxes,

    position: Vec2,
    pressure: f32,
    tilt: Vec2,
    /// Length never changes after construction.
    buttons: Vec<ButtonState>,
    /// Raw bounds of each axis, as last reported.
    ranges: [Option<Range>; <Axis as strum::EnumCount>::COUNT],
    /// Cleared when a poll fails, set again by the next that succeeds.
    connected: bool,

    conn: Arc<PlatformManager>,
}

impl std::fmt::Debug for Tablet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut this = f.debug_struct("Tablet");
        this.field("device_id", &self.device_id);
        this.field("name", &self.name);
        this.field("tablet_type", &self.tablet_type);
        this.field("available_axes", &self.available_axes);
        this.field("position", &self.position);
        if self.supports_pressure() {
            this.field("pressure", &self.pressure);
        }
        if self.supports_tilt() {
            this.field("tilt", &self.tilt);
        }
        this.field("buttons", &self.buttons);
        this.field("connected", &self.connected);
        this.finish()
    }
}

impl Tablet {
    /// Classify a freshly enumerated device. Classes may come in any order.
    pub(crate) fn new(info: &DeviceInfo, conn: Arc<PlatformManager>) -> Self {
        let mut this = Self {
            device_id: info.id,
            name: info.name.clone(),
            tablet_type: Type::from_name(&info.name),
            available_axes: AvailableAxes::empty(),
            position: Vec2::default(),
            pressure: 0.0,
            tilt: Vec2::default(),
            buttons: Vec::new(),
            ranges: [None; <Axis as strum::EnumCount>::COUNT],
            connected: true,
            conn,
        };

        for class in &info.classes {
            match class {
                Class::Buttons(b) => {
                    this.buttons = vec![ButtonState::default(); usize::from(b.count)];
                }
                Class::Valuator(v) => {
                    this.available_axes |= AvailableAxes::from_valuator(v.number);
                    if let Some(axis) = Axis::from_valuator(v.number) {
                        this.ranges[axis as usize] = Some(Range {
                            min: v.min,
                            max: v.max,
                        });
                    }
                }
                Class::Other => (),
            }
        }

        tracing::debug!(
            device_id = this.device_id,
            name = %this.name,
            tablet_type = this.tablet_type.as_ref(),
            buttons = this.buttons.len(),
            axes = ?this.available_axes,
            "classified tablet"
        );

        this
    }
    /// Opaque, transient ID of this tablet. Only meaningful to the `Manager` that produced it.
    #[must_use]
    pub fn id(&self) -> ID {
        ID(self.device_id)
    }
    /// The input server's ID for this device.
    #[must_use]
    pub fn device_id(&self) -> u16 {
        self.device_id
    }
    /// Human-readable name, as reported by the driver.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn tablet_type(&self) -> Type {
        self.tablet_type
    }
    /// How many buttons the device advertises, which may be more than physically exist.
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }
    #[must_use]
    pub fn available_axes(&self) -> AvailableAxes {
        self.available_axes
    }
    #[must_use]
    pub fn supports_pressure(&self) -> bool {
        self.available_axes.contains(AvailableAxes::PRESSURE)
    }
    #[must_use]
    pub fn supports_tilt(&self) -> bool {
        self.available_axes.contains(AvailableAxes::TILT)
    }
    /// False if the most recent poll couldn't reach the device.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// # Polling
impl Tablet {
    /// Fetch the device's current state. Call once per frame, before reading any values.
    ///
    /// Failures are contained: the previous values are kept, any `pressed`/`released` edges are
    /// cleared, and the tablet reports [not connected](Self::is_connected) until a poll succeeds.
    /// Use [`Self::try_poll`] to see the error.
    pub fn poll(&mut self) {
        // Already logged and recorded in `connected`.
        let _ = self.try_poll();
    }
    /// As [`Self::poll`], but surfaces why the device couldn't be reached.
    ///
    /// Blocks for one round-trip to the input server.
    #[allow(clippy::missing_errors_doc)]
    pub fn try_poll(&mut self) -> Result<(), QueryError> {
        match self.conn.query_device(self.device_id) {
            Ok(info) => {
                self.apply(&info);
                if !self.connected {
                    tracing::info!(
                        device_id = self.device_id,
                        name = %self.name,
                        "tablet responding again"
                    );
                    self.connected = true;
                }
                Ok(())
            }
            Err(err) => {
                self.buttons.iter_mut().for_each(ButtonState::clear_edges);
                if self.connected {
                    tracing::warn!(
                        device_id = self.device_id,
                        name = %self.name,
                        error = %err,
                        "tablet stopped responding"
                    );
                    self.connected = false;
                }
                Err(err)
            }
        }
    }
    /// Overwrite polled state from a snapshot. Buttons are edge-detected against the previous poll.
    fn apply(&mut self, info: &DeviceInfo) {
        // A snapshot without a button block is a snapshot without transitions.
        self.buttons.iter_mut().for_each(ButtonState::clear_edges);

        for class in &info.classes {
            match class {
                Class::Valuator(v) => {
                    let Some(axis) = Axis::from_valuator(v.number) else {
                        continue;
                    };
                    let range = Range {
                        min: v.min,
                        max: v.max,
                    };
                    self.ranges[axis as usize] = Some(range);
                    let value = range.normalize(v.value);
                    match axis {
                        Axis::X => self.position.x = value,
                        Axis::Y => self.position.y = value,
                        Axis::Pressure => self.pressure = value,
                        Axis::TiltX => self.tilt.x = value,
                        Axis::TiltY => self.tilt.y = value,
                    }
                }
                Class::Buttons(b) => {
                    for (idx, button) in self.buttons.iter_mut().enumerate() {
                        button.update(mask_bit(&b.mask, idx));
                    }
                }
                Class::Other => (),
            }
        }
    }
}

/// # Last polled state
impl Tablet {
    /// Position across the active area, each axis in `[0, 1]`.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }
    /// Tip pressure in `[0, 1]`. Meaningless unless [`Self::supports_pressure`].
    #[must_use]
    pub fn pressure(&self) -> f32 {
        self.pressure
    }
    /// Tilt, each axis in `[0, 1]`. Meaningless unless [`Self::supports_tilt`].
    #[must_use]
    pub fn tilt(&self) -> Vec2 {
        self.tilt
    }
    /// State of button `index`, or `None` past [`Self::button_count`].
    ///
    /// Indices follow the device's button mask. On XInput2 slot 0 is never set and the pen tip
    /// is X button 1, so `button(1)`.
    #[must_use]
    pub fn button(&self, index: usize) -> Option<ButtonState> {
        self.buttons.get(index).copied()
    }
    #[must_use]
    pub fn buttons(&self) -> &[ButtonState] {
        &self.buttons
    }
    /// Raw bounds of `axis` as last reported by the device, if it has that axis.
    #[must_use]
    pub fn axis_range(&self, axis: Axis) -> Option<Range> {
        self.ranges[axis as usize]
    }
}

impl crate::PreUpdate for Tablet {
    fn pre_update(&mut self) {
        self.poll();
    }
}
