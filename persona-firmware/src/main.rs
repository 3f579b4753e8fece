//! Persona - dual round-display eye firmware
//!
//! Renders two animated eyes on RP2040 boards with a pair of ST7789
//! panels, and swaps the eyes' look ("persona") on command from the
//! serial console without dropping the render pipeline.

#![no_std]
#![no_main]

extern crate alloc;

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use persona_core::command::CommandHandler;
use persona_core::config::BundleLoader;
use persona_core::eye::{Eye, EyeRig, Geometry};
use persona_core::registry::Registry;
use persona_core::reload::Orchestrator;
use persona_core::texture::RawAssetDecoder;
use persona_hal_rp2040::{EmbassyClock, FlashAssetStore, SpiEyeLink};

use crate::board::{BoardLink, HeapInfo, DISPLAY_SPI_HZ, EYE_NAMES, HEAP_SIZE};
use crate::tasks::{EyeContext, Handler};

// Heap allocator for decoded textures and bundles
#[global_allocator]
static HEAP: Heap = Heap::empty();

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// Asset store shared by the decoder and the bundle loader
static ASSETS: StaticCell<RefCell<FlashAssetStore<'static>>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Persona firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Serial console
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized for the serial console");

    // Displays: left on SPI0, right on SPI1
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = DISPLAY_SPI_HZ;

    let left_spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config.clone());
    let left = BoardLink::Left(SpiEyeLink::new(
        left_spi,
        Output::new(p.PIN_17, Level::High),
        Output::new(p.PIN_16, Level::Low),
    ));

    let right_spi = Spi::new_txonly(p.SPI1, p.PIN_10, p.PIN_11, p.DMA_CH1, spi_config);
    let right = BoardLink::Right(SpiEyeLink::new(
        right_spi,
        Output::new(p.PIN_9, Level::High),
        Output::new(p.PIN_8, Level::Low),
    ));

    let rig = EyeRig::new(
        [
            Eye::new(EYE_NAMES[0], left, 0),
            Eye::new(EYE_NAMES[1], right, 1),
        ],
        Geometry::default(),
    );
    info!("Displays initialized");

    // Asset partition
    let mut store = FlashAssetStore::new(p.FLASH);
    match store.mount() {
        Ok(count) => info!("Asset partition mounted: {} assets", count),
        Err(e) => warn!("No asset partition ({:?}), running on default colours", e),
    }
    let assets = &*ASSETS.init(RefCell::new(store));

    let handler = init_handler(p.WATCHDOG);
    info!("Boot persona: {}", handler.current().name);

    let ctx = EyeContext {
        rig,
        handler,
        decoder: RawAssetDecoder::new(assets),
        loader: BundleLoader::new(assets),
        orchestrator: Orchestrator::new(EmbassyClock, HeapInfo),
    };

    // Spawn tasks
    spawner.spawn(tasks::serial_rx_task(rx)).unwrap();
    spawner.spawn(tasks::serial_tx_task(tx)).unwrap();
    spawner.spawn(tasks::eye_task(ctx)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Style cycling keeps its place in the watchdog scratch registers
#[cfg(feature = "style-cycle")]
fn init_handler(
    watchdog: embassy_rp::Peri<'static, embassy_rp::peripherals::WATCHDOG>,
) -> Handler {
    use embassy_rp::watchdog::Watchdog;
    use persona_hal_rp2040::WatchdogScratch;

    Handler::new(Registry::styles(), WatchdogScratch::new(Watchdog::new(watchdog)))
}

#[cfg(not(feature = "style-cycle"))]
fn init_handler(
    _watchdog: embassy_rp::Peri<'static, embassy_rp::peripherals::WATCHDOG>,
) -> Handler {
    Handler::new(Registry::moods())
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
