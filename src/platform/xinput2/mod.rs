use x11rb::{
    connection::RequestConnection,
    errors::ReplyError,
    protocol::xinput::{self, ConnectionExt},
};

use crate::{raw, QueryError};

// Some necessary constants not defined by x11rb:
const XI_ALL_DEVICES: u16 = 0;
/// `XIQueryDevice` arrived with 2.0, nothing newer is needed.
const XI_REQUIRED_VERSION: (u16, u16) = (2, 0);
/// `2^32`, the denominator of the fractional half of an `FP3232`.
const FP3232_FRAC_SCALE: f64 = 4_294_967_296.0;

/// Turn an xinput fixed-point number into a float.
/// `integral` is the floor and `frac` is always a positive offset from it, regardless of sign.
fn fixed32_to_f64(fixed: xinput::Fp3232) -> f64 {
    f64::from(fixed.integral) + f64::from(fixed.frac) / FP3232_FRAC_SCALE
}

/// Button state arrives as a list of `CARD32`. Lay it out in memory order so bit `n` is
/// found at byte `n / 8`, bit `n % 8`, the same as xlib's `XIButtonState::mask`.
fn mask_bytes(words: &[u32]) -> raw::ButtonMask {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

fn convert_class(class: &xinput::DeviceClass) -> raw::Class {
    match &class.data {
        xinput::DeviceClassData::Button(b) => raw::Class::Buttons(raw::ButtonClass {
            count: b.num_buttons(),
            mask: mask_bytes(&b.state),
        }),
        xinput::DeviceClassData::Valuator(v) => raw::Class::Valuator(raw::ValuatorClass {
            number: v.number,
            min: fixed32_to_f64(v.min),
            max: fixed32_to_f64(v.max),
            value: fixed32_to_f64(v.value),
        }),
        _ => raw::Class::Other,
    }
}

fn convert_device(device: &xinput::XIDeviceInfo) -> raw::DeviceInfo {
    raw::DeviceInfo {
        id: device.deviceid,
        // UTF8 human-readable device name.
        name: String::from_utf8_lossy(&device.name).into_owned(),
        enabled: device.enabled,
        classes: device.classes.iter().map(convert_class).collect(),
    }
}

/// An X11 error in reply to a device query means the device id no longer refers to anything (`BadDevice`).
fn query_error(err: ReplyError, device_id: u16) -> QueryError {
    match err {
        ReplyError::ConnectionError(err) => QueryError::Connection(err),
        ReplyError::X11Error(_) => QueryError::Disconnected { device_id },
    }
}

pub struct Manager {
    conn: x11rb::rust_connection::RustConnection,
}

impl Manager {
    /// Open a fresh connection to `display`, or `$DISPLAY` if `None`, and make sure it speaks XInput2.
    pub fn connect(display: Option<&str>) -> Result<Self, crate::builder::BuildError> {
        use crate::builder::BuildError;

        let (conn, _screen) = x11rb::connect(display)?;
        // Check we have XInput2 and get it's version.
        if conn
            .extension_information(xinput::X11_EXTENSION_NAME)
            .map_err(QueryError::from)?
            .is_none()
        {
            return Err(BuildError::MissingExtension);
        }

        let (major, minor) = XI_REQUIRED_VERSION;
        let version = conn
            .xinput_xi_query_version(major, minor)
            .map_err(QueryError::from)?
            .reply()
            .map_err(|err| match err {
                ReplyError::ConnectionError(err) => QueryError::Connection(err).into(),
                // Only XI1 servers reject this request.
                ReplyError::X11Error(_) => BuildError::MissingExtension,
            })?;

        tracing::debug!(
            "Server supports XInput v{}.{}",
            version.major_version,
            version.minor_version
        );

        if version.major_version < major {
            return Err(BuildError::UnsupportedVersion {
                major: version.major_version,
                minor: version.minor_version,
            });
        }

        Ok(Self { conn })
    }
}

impl super::PlatformImpl for Manager {
    fn list_devices(&self) -> Result<Vec<raw::DeviceInfo>, QueryError> {
        let reply = self
            .conn
            .xinput_xi_query_device(XI_ALL_DEVICES)?
            .reply()
            .map_err(|err| match err {
                ReplyError::ConnectionError(err) => QueryError::Connection(err),
                ReplyError::X11Error(err) => QueryError::Protocol(err),
            })?;
        // `reply` is freed on return, only the converted copies survive.
        Ok(reply.infos.iter().map(convert_device).collect())
    }
    fn query_device(&self, device_id: u16) -> Result<raw::DeviceInfo, QueryError> {
        let reply = self
            .conn
            .xinput_xi_query_device(device_id)?
            .reply()
            .map_err(|err| query_error(err, device_id))?;

        reply
            .infos
            .iter()
            .find(|device| device.deviceid == device_id)
            .map(convert_device)
            .ok_or(QueryError::Disconnected { device_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point() {
        let fp = |integral, frac| xinput::Fp3232 { integral, frac };
        assert_eq!(fixed32_to_f64(fp(0, 0)), 0.0);
        assert_eq!(fixed32_to_f64(fp(50, 0)), 50.0);
        assert_eq!(fixed32_to_f64(fp(1, 1 << 31)), 1.5);
        // -0.5 is floor -1 plus one half.
        assert_eq!(fixed32_to_f64(fp(-1, 1 << 31)), -0.5);
    }

    #[test]
    fn mask_words_to_bytes() {
        let bytes = mask_bytes(&[0b1_0000_0010, 0x8000_0000]);
        assert_eq!(bytes.as_slice(), &[0b10, 1, 0, 0, 0, 0, 0, 0x80]);
        assert!(crate::button::mask_bit(&bytes, 1));
        assert!(crate::button::mask_bit(&bytes, 8));
        assert!(crate::button::mask_bit(&bytes, 63));
        assert!(!crate::button::mask_bit(&bytes, 0));
    }

    fn class(data: xinput::DeviceClassData) -> xinput::DeviceClass {
        xinput::DeviceClass {
            len: 0,
            sourceid: 11,
            data,
        }
    }

    fn valuator(number: u16, min: i32, max: i32, value: i32) -> xinput::DeviceClass {
        let fp = |integral| xinput::Fp3232 { integral, frac: 0 };
        class(xinput::DeviceClassData::Valuator(
            xinput::DeviceClassDataValuator {
                number,
                label: 0,
                min: fp(min),
                max: fp(max),
                value: fp(value),
                resolution: 1,
                mode: xinput::ValuatorMode::ABSOLUTE,
            },
        ))
    }

    #[test]
    fn button_class_counts_labels() {
        // Pen tip is X button 1, so bit 1.
        let buttons = class(xinput::DeviceClassData::Button(
            xinput::DeviceClassDataButton {
                state: vec![0b10],
                labels: vec![0; 3],
            },
        ));
        let raw::Class::Buttons(converted) = convert_class(&buttons) else {
            panic!("not a button class");
        };
        assert_eq!(converted.count, 3);
        assert_eq!(converted.mask.as_slice(), &[0b10, 0, 0, 0]);
        assert!(!crate::button::mask_bit(&converted.mask, 0));
        assert!(crate::button::mask_bit(&converted.mask, 1));
        assert!(!crate::button::mask_bit(&converted.mask, 2));
    }

    #[test]
    fn valuator_and_unused_classes() {
        assert_eq!(
            convert_class(&valuator(2, 0, 2047, 1024)),
            raw::Class::Valuator(raw::ValuatorClass {
                number: 2,
                min: 0.0,
                max: 2047.0,
                value: 1024.0,
            })
        );
        let keys = class(xinput::DeviceClassData::Key(xinput::DeviceClassDataKey {
            keys: vec![9, 10],
        }));
        assert_eq!(convert_class(&keys), raw::Class::Other);
    }

    #[test]
    fn device_keeps_class_order() {
        let device = xinput::XIDeviceInfo {
            deviceid: 11,
            type_: xinput::DeviceType::SLAVE_POINTER,
            attachment: 2,
            enabled: false,
            name: b"Wacom Intuos Pro M Pen stylus".to_vec(),
            classes: vec![
                valuator(3, -64, 63, 0),
                class(xinput::DeviceClassData::Button(
                    xinput::DeviceClassDataButton {
                        state: vec![0],
                        labels: vec![0; 9],
                    },
                )),
            ],
        };
        let converted = convert_device(&device);
        assert_eq!(converted.id, 11);
        assert_eq!(converted.name, "Wacom Intuos Pro M Pen stylus");
        assert!(!converted.enabled);
        assert!(converted.looks_like_tablet());
        assert!(matches!(
            converted.classes.as_slice(),
            [raw::Class::Valuator(v), raw::Class::Buttons(b)] if v.number == 3 && b.count == 9
        ));
    }

    #[test]
    fn bad_device_is_disconnected() {
        let bad_device = x11rb::x11_utils::X11Error {
            error_kind: x11rb::protocol::ErrorKind::XinputDevice,
            error_code: 0,
            sequence: 7,
            bad_value: 11,
            minor_opcode: 48,
            major_opcode: 131,
            extension_name: Some(xinput::X11_EXTENSION_NAME.to_owned()),
            request_name: Some("XIQueryDevice"),
        };
        assert!(matches!(
            query_error(ReplyError::X11Error(bad_device), 11),
            QueryError::Disconnected { device_id: 11 }
        ));
        assert!(matches!(
            query_error(
                ReplyError::ConnectionError(x11rb::errors::ConnectionError::UnknownError),
                11
            ),
            QueryError::Connection(_)
        ));
    }
}
