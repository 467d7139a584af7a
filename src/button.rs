//! # Buttons
//!
//! Per-button state, edge-triggered from the raw held mask each poll.

/// State of a single tool button as of the last poll.
///
/// At most one of `pressed` and `released` is set, and both are clear unless `held`
/// changed during that poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ButtonState {
    /// The button is down. Persists across polls.
    pub held: bool,
    /// The button went down during the last poll.
    pub pressed: bool,
    /// The button came up during the last poll.
    pub released: bool,
}
impl ButtonState {
    /// Feed the current raw state of the button, updating the edges from the previous `held`.
    pub fn update(&mut self, down: bool) {
        *self = match (self.held, down) {
            (true, false) => Self {
                held: false,
                pressed: false,
                released: true,
            },
            (false, true) => Self {
                held: true,
                pressed: true,
                released: false,
            },
            (held, _) => Self {
                held,
                pressed: false,
                released: false,
            },
        };
    }
    /// Drop the edges without touching `held`.
    pub(crate) fn clear_edges(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}

/// Read bit `index` of a raw button mask: byte `index / 8`, bit `index % 8`, least-significant first.
/// Bits past the end of the mask read as `false`.
#[must_use]
pub fn mask_bit(mask: &[u8], index: usize) -> bool {
    mask.get(index / 8)
        .is_some_and(|byte| (byte >> (index % 8)) & 1 == 1)
}

/// Set or clear bit `index` of a raw button mask, growing it as needed.
pub fn set_mask_bit(mask: &mut crate::raw::ButtonMask, index: usize, down: bool) {
    let byte = index / 8;
    if mask.len() <= byte {
        mask.resize(byte + 1, 0);
    }
    let bit = 1u8 << (index % 8);
    if down {
        mask[byte] |= bit;
    } else {
        mask[byte] &= !bit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_order_is_lsb_first() {
        let mask = [0b0000_0101u8, 0b1000_0000];
        assert!(mask_bit(&mask, 0));
        assert!(!mask_bit(&mask, 1));
        assert!(mask_bit(&mask, 2));
        assert!(!mask_bit(&mask, 8));
        assert!(mask_bit(&mask, 15));
        // Short masks read as released.
        assert!(!mask_bit(&mask, 16));
        assert!(!mask_bit(&[], 0));
    }

    #[test]
    fn set_bit_grows() {
        let mut mask = crate::raw::ButtonMask::new();
        set_mask_bit(&mut mask, 10, true);
        assert_eq!(mask.as_slice(), &[0, 0b100]);
        assert!(mask_bit(&mask, 10));
        set_mask_bit(&mut mask, 10, false);
        assert_eq!(mask.as_slice(), &[0, 0]);
    }

    #[test]
    fn press_then_hold() {
        let mut b = ButtonState::default();
        b.update(true);
        assert_eq!(
            b,
            ButtonState {
                held: true,
                pressed: true,
                released: false
            }
        );
        b.update(true);
        assert_eq!(
            b,
            ButtonState {
                held: true,
                pressed: false,
                released: false
            }
        );
    }

    #[test]
    fn press_then_release() {
        let mut b = ButtonState::default();
        b.update(true);
        assert!(b.pressed);
        b.update(false);
        assert_eq!(
            b,
            ButtonState {
                held: false,
                pressed: false,
                released: true
            }
        );
        b.update(false);
        assert_eq!(b, ButtonState::default());
    }

    #[test]
    fn edges_exclusive() {
        let mut b = ButtonState::default();
        for down in [true, false, false, true, true, false, true] {
            b.update(down);
            assert!(!(b.pressed && b.released));
            assert_eq!(b.held, down);
        }
    }
}
