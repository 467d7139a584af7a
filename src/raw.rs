//! Backend-neutral device descriptors, the form in which a backend reports a device's
//! capabilities and current state. These are produced fresh by every enumeration and
//! every poll, and dropped once they've been digested.

/// Raw button mask. Bit `n` lives in byte `n / 8`, at bit `n % 8`, least-significant first.
/// Inline storage covers 32 buttons before spilling, which is more than any stylus has.
pub type ButtonMask = smallvec::SmallVec<[u8; 4]>;

/// A block of buttons. Appears zero or one times per device.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ButtonClass {
    /// How many buttons the device reports.
    pub count: u16,
    /// Which of them are currently held. May be shorter than `count` bits, in which case
    /// the missing bits read as released.
    pub mask: ButtonMask,
}
impl ButtonClass {
    /// A button block of `count` buttons, all released.
    #[must_use]
    pub fn new(count: u16) -> Self {
        Self {
            count,
            mask: smallvec::smallvec![0; usize::from(count).div_ceil(8)],
        }
    }
}

/// A single ranged axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValuatorClass {
    /// Index of the axis on the device. `0, 1` are x and y, `2` is pressure, `3, 4` are tilt.
    pub number: u16,
    pub min: f64,
    pub max: f64,
    /// The last value reported by the device, in `min..=max` for well behaved hardware.
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Class {
    Buttons(ButtonClass),
    Valuator(ValuatorClass),
    /// Keys, scrolling, touch, etc. None of these are used.
    Other,
}
impl Class {
    #[must_use]
    pub fn as_buttons(&self) -> Option<&ButtonClass> {
        match self {
            Self::Buttons(b) => Some(b),
            _ => None,
        }
    }
    #[must_use]
    pub fn as_valuator(&self) -> Option<&ValuatorClass> {
        match self {
            Self::Valuator(v) => Some(v),
            _ => None,
        }
    }
}

/// Everything the input server knows about one device.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceInfo {
    /// Server assigned, unique among currently attached devices.
    pub id: u16,
    pub name: String,
    /// Disabled devices are attached but report nothing.
    pub enabled: bool,
    /// Capability classes, in no particular order.
    pub classes: Vec<Class>,
}
/// # Construction
/// Mostly useful for scripting an [emulated](crate::emulated) server.
impl DeviceInfo {
    /// An enabled device with no classes.
    #[must_use]
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            enabled: true,
            classes: vec![],
        }
    }
    /// Add a button block of `count` released buttons.
    #[must_use]
    pub fn with_buttons(mut self, count: u16) -> Self {
        self.classes.push(Class::Buttons(ButtonClass::new(count)));
        self
    }
    /// Add valuator `number` spanning `min..=max`, resting at `min`.
    #[must_use]
    pub fn with_valuator(mut self, number: u16, min: f64, max: f64) -> Self {
        self.classes.push(Class::Valuator(ValuatorClass {
            number,
            min,
            max,
            value: min,
        }));
        self
    }
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
impl DeviceInfo {
    /// Does the name mark this as a tablet tool? Case-sensitive.
    #[must_use]
    pub fn looks_like_tablet(&self) -> bool {
        self.name.contains(crate::tablet::STYLUS_KEYWORD)
            || self.name.contains(crate::tablet::ERASER_KEYWORD)
    }
}
