//! Headless frame loop: list tablets, then poll the first one at ~60Hz and log what it reports.
//!
//! `cargo run --example poll` against the X server in `$DISPLAY`, or
//! `cargo run --example poll -- --emulated` for a scripted pen. `RUST_LOG=drawtablet=debug`
//! shows enumeration details.

use drawtablet::{emulated, raw::DeviceInfo, Builder, PreUpdate};

const FRAME: std::time::Duration = std::time::Duration::from_millis(16);
const EMULATED_ID: u16 = 10;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let emulated = std::env::args().any(|arg| arg == "--emulated");
    let server = emulated::Server::new().with_device(
        DeviceInfo::new(EMULATED_ID, "Emulated Pen stylus")
            .with_buttons(3)
            .with_valuator(0, 0.0, 1000.0)
            .with_valuator(1, 0.0, 1000.0)
            .with_valuator(2, 0.0, 4095.0),
    );

    let mut manager = if emulated {
        Builder::new().build_emulated(server.clone())
    } else {
        Builder::new().build()
    }
    .expect("failed to connect to the input server");

    for tablet in manager.tablets() {
        println!(
            "{:>3} {:<40} {:?} buttons={} pressure={} tilt={}",
            tablet.device_id(),
            tablet.name(),
            tablet.tablet_type(),
            tablet.button_count(),
            tablet.supports_pressure(),
            tablet.supports_tilt(),
        );
    }

    let Some(id) = manager.tablet(0, false, false).map(drawtablet::Tablet::id) else {
        println!("No tablets found.");
        return;
    };

    for frame in 0u32..600 {
        if emulated {
            // Sweep across, pressing harder, clicking every second.
            let t = f64::from(frame % 120) / 120.0;
            server.set_valuator(EMULATED_ID, 0, t * 1000.0);
            server.set_valuator(EMULATED_ID, 1, 500.0);
            server.set_valuator(EMULATED_ID, 2, t * 4095.0);
            server.set_button(EMULATED_ID, 1, frame % 60 < 30);
        }

        let Some(tablet) = manager.get_mut(id) else {
            break;
        };
        tablet.pre_update();

        for (idx, button) in tablet.buttons().iter().enumerate() {
            if button.pressed {
                println!("button {idx} pressed");
            }
            if button.released {
                println!("button {idx} released");
            }
        }
        if frame % 10 == 0 {
            let position = tablet.position();
            println!(
                "pos ({:.3}, {:.3}) pressure {:.3} connected {}",
                position.x,
                position.y,
                tablet.pressure(),
                tablet.is_connected()
            );
        }

        std::thread::sleep(FRAME);
    }
}
