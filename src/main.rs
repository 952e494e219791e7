//! PineTime analog clock face
//!
//! On the watch the face is painted on the ST7789 panel. Any other target runs
//! the same tasks in a simulator against an in-memory panel.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[macro_use]
#[path = "fmt.rs"]
mod fmt;

#[cfg(target_os = "none")]
mod peripherals;
#[cfg(not(target_os = "none"))]
mod simulator;

#[cfg(target_os = "none")]
use {defmt_rtt as _, panic_probe as _};

// Device
use embassy_executor::Spawner;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};
use embassy_time::{Duration, Instant, Ticker};
use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};

// Crate
use clockface::{
    config::FRAME_INTERVAL,
    system::{
        random::RandomSource,
        time::{Clock, MinuteTicker, TimeManager},
    },
    ui::canvas::{ColorMode, GraphicsCanvas},
    app::HostEvents,
    App, HostEvent,
};

// Others
use chrono::NaiveDateTime;

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));
#[cfg(target_os = "none")]
const TIMEZONE: i32 = 3_600;

// Communication channels
static TIME: Signal<CriticalSectionRawMutex, NaiveDateTime> = Signal::new();
static OBSTRUCTION: HostEvents = HostEvents::new();
static POP_WINDOW: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Notify the face once per elapsed minute
#[embassy_executor::task(pool_size = 1)]
async fn update_time(clock: TimeManager) {
    let mut minutes = MinuteTicker::starting_at(clock.now());
    let mut tick = Ticker::every(Duration::from_secs(1));
    loop {
        if let Some(time) = minutes.poll(clock.now()) {
            TIME.signal(time);
        }

        // Re-schedule the timer interrupt in 1s
        tick.next().await;
    }
}

/// Run the window event loop until the window is popped
async fn face_loop<R, D>(app: &mut App<R>, display: &mut D, mode: ColorMode)
where
    R: RandomSource,
    D: DrawTarget<Color = Rgb565>,
{
    if let Err(e) = app.push_window(Instant::now()) {
        warn!("Grow-in failed: {}", e);
    }

    let mut frames = Ticker::every(FRAME_INTERVAL);
    loop {
        let now = Instant::now();

        if TIME.signaled() {
            let time = TIME.wait().await;
            if let Err(e) = app.handle(HostEvent::Tick(time), now) {
                warn!("Tick failed: {}", e);
            }
        }

        // Will-change and did-change may both arrive within one frame
        app.handle_queued(&OBSTRUCTION, now);

        if POP_WINDOW.signaled() {
            POP_WINDOW.reset();
            app.pop_window();
            return;
        }

        app.advance(now);

        let mut canvas = GraphicsCanvas::new(&mut *display, mode);
        match app.render(&mut canvas) {
            Ok(true) => debug!("Painted frame"),
            Ok(false) => {}
            Err(e) => warn!("Paint failed: {}", e),
        }

        frames.next().await;
    }
}

#[cfg(target_os = "none")]
mod firmware {
    use super::*;
    use crate::peripherals::display::Display;
    use fastrand::Rng;

    /// Own the panel and run the watch face
    #[embassy_executor::task(pool_size = 1)]
    pub async fn run_face(mut app: App<Rng>, mut display: Display) {
        face_loop(&mut app, display.lcd(), ColorMode::Color).await;
        info!("Window closed");
    }
}

#[cfg(target_os = "none")]
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    use clockface::{
        system::{random, time::TimeReference},
        ClockFaceConfig,
    };
    use defmt::unwrap;
    use embassy_nrf::{
        bind_interrupts,
        gpio::{Level, Output, OutputDrive},
        peripherals::SPI2,
        spim,
    };
    use embedded_graphics::prelude::Size;
    use peripherals::{
        board_config,
        display::{BacklightPins, Brightness, Display, LCD_H, LCD_W},
    };

    bind_interrupts!(struct Irqs {
        SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
    });

    let p = embassy_nrf::init(board_config());
    info!("Initializing");

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let backlight = BacklightPins::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    );
    let mut display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        backlight,
    ));
    display.set_brightness(Brightness::LEVEL2);

    // Clock and palette source, both seeded from the build time
    let clock = TimeManager::init(TimeReference::from_timestamp(
        UTC_EPOCH,
        TIMEZONE,
        Instant::now(),
    ));
    let app = App::init(
        clock.now(),
        Size::new(LCD_W as u32, LCD_H as u32),
        random::seeded(UTC_EPOCH),
        ClockFaceConfig::default(),
    );

    info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(update_time(clock)));
    unwrap!(spawner.spawn(firmware::run_face(app, display)));
}

#[cfg(not(target_os = "none"))]
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    use clockface::{
        system::{random, time::TimeReference},
        ClockFaceConfig,
    };
    use embedded_graphics::prelude::Size;
    use env_logger::Env;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Simulator built at {}", UTC_EPOCH);

    let clock = TimeManager::init(TimeReference::new(
        chrono::Local::now().naive_local(),
        Instant::now(),
    ));
    let now = clock.now();
    let app = App::init(
        now,
        Size::new(simulator::SCREEN_W, simulator::SCREEN_H),
        random::seeded(now.and_utc().timestamp()),
        ClockFaceConfig::default(),
    );

    spawner.must_spawn(update_time(clock));
    spawner.must_spawn(simulator::obstruct());
    spawner.must_spawn(simulator::run_face(app));
}
