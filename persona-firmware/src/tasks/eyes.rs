//! Eye task
//!
//! Owns the rig, the texture cache (inside the orchestrator) and the
//! command handler. Commands, timers and reload requests are serviced
//! between column transfers, so a reload never interleaves with a
//! running transfer on this task.

use core::cell::RefCell;

use defmt::*;
use embassy_futures::yield_now;
use embassy_time::{Instant, Timer};

use persona_core::command::{CommandHandler, Request, Telemetry};
use persona_core::config::BundleLoader;
use persona_core::eye::{Eye, EyeRig, Geometry, Layer, Surface, DISPLAY_SIZE};
use persona_core::reload::{DrainOutcome, Orchestrator, ReloadReport, SlotResolution};
use persona_core::render::{ColumnJob, ColumnScheduler};
use persona_core::texture::{LoadStatus, RawAssetDecoder};
use persona_hal_rp2040::{EmbassyClock, FlashAssetStore};

use crate::board::{BoardLink, HeapInfo, COLUMN_BYTES, EYE_COUNT};
use crate::channels::{LINE_CHANNEL, PIPELINE_GATE};
use crate::tasks::ChannelSink;

/// Shared asset store
pub type Store = &'static RefCell<FlashAssetStore<'static>>;

#[cfg(feature = "style-cycle")]
pub type Handler = persona_core::command::StyleCycler<persona_hal_rp2040::WatchdogScratch>;

#[cfg(not(feature = "style-cycle"))]
pub type Handler = persona_core::command::MoodController;

/// Everything the eye task owns
pub struct EyeContext {
    pub rig: EyeRig<BoardLink, EYE_COUNT>,
    pub handler: Handler,
    pub decoder: RawAssetDecoder<Store>,
    pub loader: BundleLoader<Store>,
    pub orchestrator: Orchestrator<EmbassyClock, HeapInfo>,
}

/// Delay before a warm restart so the last reply leaves the UART
const RESTART_FLUSH_MS: u64 = 50;

/// Eye task - boot persona, then render and service commands forever
#[embassy_executor::task]
pub async fn eye_task(mut ctx: EyeContext) {
    info!("Eye task started");

    let mut sink = ChannelSink;
    ctx.handler.banner(now_ms(), &mut sink);

    let boot = ctx.handler.current();
    info!("Booting persona {}", boot.name);
    let report = ctx
        .orchestrator
        .boot(
            &mut ctx.rig,
            ctx.handler.boot_bundle(),
            &mut ctx.decoder,
            &mut ctx.loader,
            &PIPELINE_GATE,
        )
        .await;
    log_report(boot.name, &report);

    let mut scheduler = ColumnScheduler::new();
    let mut column = [0u8; COLUMN_BYTES];

    loop {
        let telemetry = Telemetry {
            frames: scheduler.frames(),
            free_ram: crate::HEAP.free(),
            now_ms: now_ms(),
        };
        while let Ok(line) = LINE_CHANNEL.try_receive() {
            ctx.handler.handle(&line, &telemetry, &mut sink);
        }
        ctx.handler.poll(telemetry.now_ms, &mut sink);

        match ctx.handler.take_request() {
            Some(Request::Reload(persona)) => {
                info!("Switching to persona {}", persona.name);
                let report = ctx
                    .orchestrator
                    .reload(
                        &mut ctx.rig,
                        persona.bundle,
                        &mut ctx.decoder,
                        &mut ctx.loader,
                        &PIPELINE_GATE,
                    )
                    .await;
                log_report(persona.name, &report);
            }
            Some(Request::Restart) => {
                info!("Restarting into {}", ctx.handler.current().name);
                Timer::after_millis(RESTART_FLUSH_MS).await;
                cortex_m::peripheral::SCB::sys_reset();
            }
            None => {}
        }

        if let Some(job) = scheduler.poll(&mut ctx.rig, &PIPELINE_GATE) {
            draw(&mut ctx.rig, job, &mut column);
            let eye = &mut ctx.rig.eyes[job.eye];
            if let Err(e) = eye.link.send_column(&column).await {
                warn!("Eye {}: column transfer failed: {:?}", eye.name, e);
            }
            eye.column_ready = false;
        }

        yield_now().await;
    }
}

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

/// Render one column in big-endian RGB565
///
/// Flat concentric discs sampled from the layer surfaces. The polar
/// lookup-table renderer is a separate component and replaces this.
fn draw(rig: &mut EyeRig<BoardLink, EYE_COUNT>, job: ColumnJob, out: &mut [u8; COLUMN_BYTES]) {
    let geometry = rig.geometry;
    let eye = &mut rig.eyes[job.eye];
    if job.new_frame {
        advance(&mut eye.iris);
        advance(&mut eye.sclera);
    }

    for (row, px) in out.chunks_exact_mut(2).enumerate() {
        let color = shade(eye, &geometry, job.column as i32, row as i32);
        px.copy_from_slice(&color.to_be_bytes());
    }
}

/// Step a layer's angle by its integer spin
fn advance(layer: &mut Layer) {
    if layer.i_spin != 0 {
        let angle = i32::from(layer.angle) + i32::from(layer.i_spin);
        layer.angle = angle.rem_euclid(1024) as u16;
    }
}

fn shade(eye: &Eye<BoardLink>, geometry: &Geometry, x: i32, y: i32) -> u16 {
    let centre = i32::from(DISPLAY_SIZE) / 2;
    let (dx, dy) = (x - centre, y - centre);
    let d2 = dx * dx + dy * dy;
    let eye_r = geometry.eye_radius.min(centre);
    let iris_r = geometry.iris_radius;
    let pupil_r = iris_r / 3;

    if d2 < pupil_r * pupil_r {
        eye.pupil_color
    } else if d2 < iris_r * iris_r {
        sample(&eye.iris, x, y)
    } else if d2 < eye_r * eye_r {
        sample(&eye.sclera, x, y)
    } else {
        eye.back_color
    }
}

fn sample(layer: &Layer, x: i32, y: i32) -> u16 {
    match layer.surface {
        Surface::Flat(color) => color,
        Surface::Texture(t) => {
            let (w, h) = (i32::from(t.width), i32::from(t.height));
            let mut tx = (x + i32::from(layer.angle)).rem_euclid(w);
            if layer.mirror != 0 {
                tx = w - 1 - tx;
            }
            let ty = y.rem_euclid(h);
            t.pixels
                .get((ty * w + tx) as usize)
                .copied()
                .unwrap_or(layer.color)
        }
    }
}

/// Log what degraded during a reload
fn log_report(name: &str, report: &ReloadReport<EYE_COUNT>) {
    for (i, outcome) in report.drain.iter().enumerate() {
        if *outcome == DrainOutcome::Forced {
            warn!("Eye {}: transfer did not drain, aborted", i);
        }
    }

    if let Err(e) = report.config {
        warn!("Bundle for {} failed to load: {:?}, using defaults", name, e);
    }

    for (slot, resolutions) in [("iris", &report.iris), ("sclera", &report.sclera)] {
        for (i, resolution) in resolutions.iter().enumerate() {
            match resolution {
                SlotResolution::Shared { from } => {
                    debug!("Eye {} {}: shared with eye {}", i, slot, from);
                }
                SlotResolution::Loaded(LoadStatus::Decoded { cached: false }) => {
                    warn!("Eye {} {}: texture cache full, not caching", i, slot);
                }
                SlotResolution::Loaded(LoadStatus::Failed(e)) => {
                    warn!("Eye {} {}: texture load failed: {:?}", i, slot, e);
                }
                SlotResolution::Loaded(status) => {
                    trace!("Eye {} {}: {:?}", i, slot, status);
                }
            }
        }
    }

    for (i, result) in report.rotation.iter().enumerate() {
        if let Err(e) = result {
            warn!("Eye {}: rotation command failed: {:?}", i, e);
        }
    }

    for (lid, result) in ["upper", "lower"].iter().zip(report.eyelids.iter()) {
        if let Err(e) = result {
            warn!("{} eyelid failed to load: {:?}", lid, e);
        }
    }

    if report.is_degraded() {
        warn!("Persona {} loaded with fallbacks", name);
    }
    info!("Persona {} ready, free RAM: {}", name, report.free_memory);
}
