//! Persona swap pipeline
//!
//! The swap runs in nine steps:
//!
//! 1. Drain every link, aborting transfers that miss the deadline
//! 2. Detach every link (chip select high, bus transaction ended)
//! 3. Drop every owned identifier
//! 4. Reset persona-controlled fields and render parameters
//! 5. Load the bundle, restoring geometry afterwards
//! 6. Resolve textures, sharing surfaces with earlier eyes
//! 7. Decode eyelid contours
//! 8. Drop the identifiers the bundle introduced
//! 9. Reset column cursors and gaze, reapply rotation
//!
//! The render pipeline gate stays closed from step 1 to step 9.

use embassy_futures::yield_now;
use persona_hal::{Clock, EyeLink, LinkError, SystemInfo};

use super::drain::{drain, DrainOutcome, DRAIN_TIMEOUT_MS};
use super::gate::PipelineGate;
use crate::eye::params::{
    DEFAULT_LOWER_EYELID, DEFAULT_UPPER_EYELID, LOWER_EYELID_INIT, UPPER_EYELID_INIT,
};
use crate::eye::{EyeRig, EyelidContour, Slot, DISPLAY_SIZE};
use crate::texture::{LoadStatus, TextureCache};
use crate::traits::{AssetDecoder, ConfigError, ConfigLoader, DecodeError};

/// Bytes kept free for the stack when sizing decode buffers
pub const DEFAULT_STACK_RESERVE: usize = 5000;

/// Whether a load may change the geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GeometryPolicy {
    /// First boot: take whatever the bundle asks for
    Adopt,
    /// Lookup tables exist: keep the current geometry bit for bit
    Protect,
}

/// How one layer got its surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotResolution {
    /// Copied from the same slot of an earlier eye
    Shared { from: usize },
    /// Resolved through the cache
    Loaded(LoadStatus),
}

/// What happened during a reload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReloadReport<const N: usize> {
    /// Drain outcome per eye
    pub drain: [DrainOutcome; N],
    /// Bundle load result; on error the defaults stay in place
    pub config: Result<(), ConfigError>,
    pub iris: [SlotResolution; N],
    pub sclera: [SlotResolution; N],
    /// Upper then lower eyelid
    pub eyelids: [Result<(), DecodeError>; 2],
    /// Rotation command per eye
    pub rotation: [Result<(), LinkError>; N],
    /// Heap free once the reload finished
    pub free_memory: usize,
}

impl<const N: usize> ReloadReport<N> {
    fn new() -> Self {
        let unresolved = SlotResolution::Loaded(LoadStatus::NotFound);
        Self {
            drain: [DrainOutcome::AlreadyIdle; N],
            config: Ok(()),
            iris: [unresolved; N],
            sclera: [unresolved; N],
            eyelids: [Ok(()); 2],
            rotation: [Ok(()); N],
            free_memory: 0,
        }
    }

    /// Check if any step had to fall back
    pub fn is_degraded(&self) -> bool {
        let failed = |r: &SlotResolution| matches!(r, SlotResolution::Loaded(LoadStatus::Failed(_)));
        self.config.is_err()
            || self.drain.contains(&DrainOutcome::Forced)
            || self.iris.iter().any(failed)
            || self.sclera.iter().any(failed)
            || self.eyelids.iter().any(Result::is_err)
            || self.rotation.iter().any(Result::is_err)
    }
}

/// Runs persona swaps and owns the texture cache
pub struct Orchestrator<C, S> {
    cache: TextureCache,
    clock: C,
    system: S,
    drain_timeout_ms: u32,
    stack_reserve: usize,
}

impl<C: Clock, S: SystemInfo> Orchestrator<C, S> {
    pub fn new(clock: C, system: S) -> Self {
        Self {
            cache: TextureCache::new(),
            clock,
            system,
            drain_timeout_ms: DRAIN_TIMEOUT_MS,
            stack_reserve: DEFAULT_STACK_RESERVE,
        }
    }

    /// Override the bytes kept back from decode buffers
    pub fn with_stack_reserve(mut self, bytes: usize) -> Self {
        self.stack_reserve = bytes;
        self
    }

    /// Override the per-link drain deadline
    pub fn with_drain_timeout(mut self, ms: u32) -> Self {
        self.drain_timeout_ms = ms;
        self
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    /// Load the first persona after power-up
    ///
    /// The bundle's geometry requests are honoured; the caller builds the
    /// lookup tables from the resulting geometry.
    pub async fn boot<L, D, F, const N: usize>(
        &mut self,
        rig: &mut EyeRig<L, N>,
        bundle: &str,
        decoder: &mut D,
        loader: &mut F,
        gate: &PipelineGate,
    ) -> ReloadReport<N>
    where
        L: EyeLink,
        D: AssetDecoder,
        F: ConfigLoader,
    {
        self.run(rig, bundle, decoder, loader, gate, GeometryPolicy::Adopt)
            .await
    }

    /// Swap to another persona while rendering is live
    pub async fn reload<L, D, F, const N: usize>(
        &mut self,
        rig: &mut EyeRig<L, N>,
        bundle: &str,
        decoder: &mut D,
        loader: &mut F,
        gate: &PipelineGate,
    ) -> ReloadReport<N>
    where
        L: EyeLink,
        D: AssetDecoder,
        F: ConfigLoader,
    {
        self.run(rig, bundle, decoder, loader, gate, GeometryPolicy::Protect)
            .await
    }

    /// Run the full pipeline
    pub async fn run<L, D, F, const N: usize>(
        &mut self,
        rig: &mut EyeRig<L, N>,
        bundle: &str,
        decoder: &mut D,
        loader: &mut F,
        gate: &PipelineGate,
        policy: GeometryPolicy,
    ) -> ReloadReport<N>
    where
        L: EyeLink,
        D: AssetDecoder,
        F: ConfigLoader,
    {
        let _suspension = gate.suspend();
        let mut report = ReloadReport::new();

        // 1. Drain
        for (eye, outcome) in rig.eyes.iter_mut().zip(report.drain.iter_mut()) {
            let link = &eye.link;
            *outcome = drain(|| link.is_busy(), &self.clock, self.drain_timeout_ms).await;
            if *outcome == DrainOutcome::Forced {
                eye.link.abort_transfer();
            }
        }

        // 2. Detach
        for eye in rig.eyes.iter_mut() {
            eye.link.release();
        }

        // 3. Drop owned identifiers
        drop(rig.eyelids.upper_filename.take());
        drop(rig.eyelids.lower_filename.take());
        for eye in rig.eyes.iter_mut() {
            drop(eye.iris.filename.take());
            drop(eye.sclera.filename.take());
        }

        // 4. Defaults
        for (i, eye) in rig.eyes.iter_mut().enumerate() {
            eye.reset_render_defaults(i);
        }
        rig.params = Default::default();

        // 5. Bundle
        let geometry = rig.geometry;
        report.config = loader.load(bundle, rig);
        if policy == GeometryPolicy::Protect {
            rig.geometry = geometry;
        }

        // 6. Textures
        let max_ram = self
            .system
            .available_memory()
            .saturating_sub(self.stack_reserve);
        for e in 0..N {
            yield_now().await;
            report.iris[e] = self.resolve_slot(rig, e, Slot::Iris, decoder, max_ram);
            report.sclera[e] = self.resolve_slot(rig, e, Slot::Sclera, decoder, max_ram);
        }

        // 7. Eyelids
        yield_now().await;
        report.eyelids = load_eyelids(rig, decoder, max_ram);

        // 8. Drop the bundle's identifiers
        drop(rig.eyelids.upper_filename.take());
        drop(rig.eyelids.lower_filename.take());
        for eye in rig.eyes.iter_mut() {
            drop(eye.iris.filename.take());
            drop(eye.sclera.filename.take());
        }

        // 9. Resume
        let centre = rig.geometry.map_radius as f32;
        for (eye, rotation) in rig.eyes.iter_mut().zip(report.rotation.iter_mut()) {
            eye.col_num = DISPLAY_SIZE;
            eye.col_idx = 0;
            eye.link.clear_busy();
            eye.column_ready = false;
            eye.eye_x = centre;
            eye.eye_y = centre;
            *rotation = eye.link.set_rotation(eye.rotation);
        }

        report.free_memory = self.system.available_memory();
        report
    }

    /// Resolve one layer, sharing only with eyes before `e`
    fn resolve_slot<L: EyeLink, D: AssetDecoder, const N: usize>(
        &mut self,
        rig: &mut EyeRig<L, N>,
        e: usize,
        slot: Slot,
        decoder: &mut D,
        max_ram: usize,
    ) -> SlotResolution {
        let (earlier, rest) = rig.eyes.split_at_mut(e);
        let layer = rest[0].layer_mut(slot);

        let shared = match layer.filename.as_deref() {
            Some(id) if !id.is_empty() => earlier
                .iter()
                .position(|other| other.layer(slot).filename.as_deref() == Some(id)),
            _ => None,
        };

        if let Some(from) = shared {
            layer.surface = earlier[from].layer(slot).surface;
            return SlotResolution::Shared { from };
        }

        let loaded =
            self.cache
                .load_with_cache(layer.filename.as_deref(), layer.color, decoder, max_ram);
        layer.surface = loaded.surface;
        SlotResolution::Loaded(loaded.status)
    }
}

fn load_eyelids<L: EyeLink, D: AssetDecoder, const N: usize>(
    rig: &mut EyeRig<L, N>,
    decoder: &mut D,
    max_ram: usize,
) -> [Result<(), DecodeError>; 2] {
    let lids = &mut rig.eyelids;

    let upper_id = lids.upper_filename.as_deref().unwrap_or(DEFAULT_UPPER_EYELID);
    let upper = match decoder.decode_eyelid(upper_id, UPPER_EYELID_INIT, max_ram) {
        Ok(map) => {
            lids.upper.closed = map.min;
            lids.upper.open = map.max;
            Ok(())
        }
        Err(e) => {
            lids.upper = EyelidContour::flat(UPPER_EYELID_INIT);
            Err(e)
        }
    };

    let lower_id = lids.lower_filename.as_deref().unwrap_or(DEFAULT_LOWER_EYELID);
    let lower = match decoder.decode_eyelid(lower_id, LOWER_EYELID_INIT, max_ram) {
        Ok(map) => {
            lids.lower.open = map.min;
            lids.lower.closed = map.max;
            Ok(())
        }
        Err(e) => {
            lids.lower = EyelidContour::flat(LOWER_EYELID_INIT);
            Err(e)
        }
    };

    [upper, lower]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EyeConfig, LayerConfig, PersonaConfig};
    use crate::eye::{Surface, DEFAULT_PUPIL_COLOR, DEFAULT_ROTATION};
    use crate::testing::{
        test_rig, test_rig3, CountingDecoder, LinkEvent, MockClock, MockLink, MockSystem,
        ScriptedLoader,
    };
    use alloc::string::String;
    use embassy_futures::block_on;
    use proptest::prelude::*;

    fn orchestrator() -> Orchestrator<MockClock, MockSystem> {
        Orchestrator::new(MockClock::stepping(1), MockSystem { free: 64 * 1024 })
    }

    fn textured(iris: &str, sclera: Option<&str>) -> PersonaConfig {
        PersonaConfig {
            eye: EyeConfig {
                iris: LayerConfig {
                    texture: Some(iris.into()),
                    ..Default::default()
                },
                sclera: LayerConfig {
                    texture: sclera.map(String::from),
                    ..Default::default()
                },
                ..Default::default()
            },
            upper_eyelid: Some("moods/angry/upper.bmp".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_identifiers_survive() {
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", textured("a/iris.565", Some("a/sclera.565")));
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        block_on(orchestrator().reload(&mut rig, "a/config.eye", &mut decoder, &mut loader, &gate));
        assert!(!rig.holds_identifiers());
    }

    #[test]
    fn test_identical_ids_share_one_allocation() {
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", textured("a/iris.565", None));
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let report = block_on(orchestrator().reload(
            &mut rig,
            "a/config.eye",
            &mut decoder,
            &mut loader,
            &gate,
        ));

        assert_eq!(decoder.texture_calls, 1);
        assert_eq!(report.iris[0], SlotResolution::Loaded(LoadStatus::Decoded { cached: true }));
        assert_eq!(report.iris[1], SlotResolution::Shared { from: 0 });
        let a = rig.eyes[0].iris.surface.texture().unwrap();
        let b = rig.eyes[1].iris.surface.texture().unwrap();
        assert!(a.same_allocation(b));
        // No sclera texture: flat fallback in the sclera colour
        assert_eq!(report.sclera[1], SlotResolution::Loaded(LoadStatus::NotFound));
        assert!(rig.eyes[1].sclera.surface.is_flat());
    }

    fn per_eye(iris: [Option<&str>; 3], sclera: [Option<&str>; 3]) -> PersonaConfig {
        let per_eye = iris
            .iter()
            .zip(sclera.iter())
            .map(|(i, s)| EyeConfig {
                iris: LayerConfig {
                    texture: i.map(String::from),
                    ..Default::default()
                },
                sclera: LayerConfig {
                    texture: s.map(String::from),
                    ..Default::default()
                },
                ..Default::default()
            })
            .collect();
        PersonaConfig {
            per_eye,
            ..Default::default()
        }
    }

    fn reload3(config: PersonaConfig) -> (EyeRig<MockLink, 3>, ReloadReport<3>, CountingDecoder) {
        let mut rig = test_rig3();
        let mut loader = ScriptedLoader::default();
        loader.add("p/config.eye", config);
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let report = block_on(orchestrator().reload(
            &mut rig,
            "p/config.eye",
            &mut decoder,
            &mut loader,
            &gate,
        ));
        (rig, report, decoder)
    }

    #[test]
    fn test_shares_with_first_matching_earlier_eye() {
        let (rig, report, decoder) = reload3(per_eye(
            [Some("x/iris.565"), Some("y/iris.565"), Some("x/iris.565")],
            [None; 3],
        ));

        assert_eq!(decoder.texture_calls, 2);
        assert_eq!(report.iris[1], SlotResolution::Loaded(LoadStatus::Decoded { cached: true }));
        assert_eq!(report.iris[2], SlotResolution::Shared { from: 0 });
        let first = rig.eyes[0].iris.surface.texture().unwrap();
        let last = rig.eyes[2].iris.surface.texture().unwrap();
        assert!(first.same_allocation(last));
    }

    #[test]
    fn test_empty_identifiers_never_share() {
        let (_, report, _) = reload3(per_eye([Some(""), Some(""), Some("t")], [None; 3]));

        assert!(report
            .iris
            .iter()
            .all(|r| !matches!(r, SlotResolution::Shared { .. })));
        assert_eq!(report.iris[1], SlotResolution::Loaded(LoadStatus::CacheHit));
    }

    #[test]
    fn test_sclera_shares_within_its_own_slot() {
        let (rig, report, _) = reload3(per_eye(
            [Some("a/iris.565"), Some("s/sclera.565"), Some("c/iris.565")],
            [Some("s/sclera.565"), None, Some("s/sclera.565")],
        ));

        assert_eq!(report.sclera[2], SlotResolution::Shared { from: 0 });
        assert_eq!(report.sclera[1], SlotResolution::Loaded(LoadStatus::NotFound));
        // Same id in a different slot goes through the cache, not sharing
        assert_eq!(report.iris[1], SlotResolution::Loaded(LoadStatus::CacheHit));
        assert!(report
            .iris
            .iter()
            .all(|r| !matches!(r, SlotResolution::Shared { .. })));
        let a = rig.eyes[0].sclera.surface.texture().unwrap();
        let b = rig.eyes[2].sclera.surface.texture().unwrap();
        assert!(a.same_allocation(b));
    }

    #[test]
    fn test_cache_survives_reloads() {
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", textured("a/iris.565", None));
        loader.add("b/config.eye", textured("b/iris.565", None));
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let mut orch = orchestrator();

        for bundle in ["a/config.eye", "b/config.eye", "a/config.eye"] {
            block_on(orch.reload(&mut rig, bundle, &mut decoder, &mut loader, &gate));
        }
        assert_eq!(decoder.texture_calls, 2);
        assert_eq!(orch.cache().len(), 2);

        let report =
            block_on(orch.reload(&mut rig, "b/config.eye", &mut decoder, &mut loader, &gate));
        assert_eq!(report.iris[0], SlotResolution::Loaded(LoadStatus::CacheHit));
    }

    #[test]
    fn test_stuck_link_is_aborted_before_release() {
        let mut rig = test_rig();
        rig.eyes[1].link.stuck();
        let mut loader = ScriptedLoader::default();
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let report = block_on(orchestrator().reload(
            &mut rig,
            "missing/config.eye",
            &mut decoder,
            &mut loader,
            &gate,
        ));

        assert_eq!(report.drain, [DrainOutcome::AlreadyIdle, DrainOutcome::Forced]);
        let events = &rig.eyes[1].link.events;
        let abort = events.iter().position(|e| *e == LinkEvent::Abort).unwrap();
        let release = events.iter().position(|e| *e == LinkEvent::Release).unwrap();
        assert!(abort < release);
        assert!(!rig.eyes[0].link.events.contains(&LinkEvent::Abort));
    }

    #[test]
    fn test_resume_state() {
        let mut rig = test_rig();
        rig.eyes[0].col_num = 12;
        rig.eyes[0].column_ready = true;
        let mut loader = ScriptedLoader::default();
        loader.add(
            "r/config.eye",
            PersonaConfig {
                per_eye: alloc::vec![EyeConfig {
                    rotation: Some(1),
                    ..Default::default()
                }],
                ..Default::default()
            },
        );
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        block_on(orchestrator().reload(&mut rig, "r/config.eye", &mut decoder, &mut loader, &gate));

        let centre = rig.geometry.map_radius as f32;
        for eye in &rig.eyes {
            assert_eq!(eye.col_num, DISPLAY_SIZE);
            assert_eq!(eye.col_idx, 0);
            assert!(!eye.column_ready);
            assert_eq!((eye.eye_x, eye.eye_y), (centre, centre));
            assert!(eye.link.events.contains(&LinkEvent::ClearBusy));
        }
        assert_eq!(rig.eyes[0].link.events.last(), Some(&LinkEvent::Rotation(1)));
        assert_eq!(
            rig.eyes[1].link.events.last(),
            Some(&LinkEvent::Rotation(DEFAULT_ROTATION))
        );
        assert!(gate.is_open());
    }

    #[test]
    fn test_rotation_failure_is_reported() {
        let mut rig = test_rig();
        rig.eyes[1].link.rotation_fails = true;
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", textured("a/iris.565", None));
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let report = block_on(orchestrator().reload(
            &mut rig,
            "a/config.eye",
            &mut decoder,
            &mut loader,
            &gate,
        ));

        assert_eq!(report.rotation, [Ok(()), Err(LinkError::Bus)]);
        assert!(report.is_degraded());
        // The rest of the resume still happened
        assert_eq!(rig.eyes[1].col_num, DISPLAY_SIZE);
        assert!(gate.is_open());
    }

    #[test]
    fn test_clean_reload_is_not_degraded() {
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", textured("a/iris.565", None));
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let report = block_on(orchestrator().reload(
            &mut rig,
            "a/config.eye",
            &mut decoder,
            &mut loader,
            &gate,
        ));
        assert_eq!(report.rotation, [Ok(()); 2]);
        assert!(!report.is_degraded());
    }

    #[test]
    fn test_defaults_reset_before_load() {
        let mut rig = test_rig();
        rig.params.tracking = false;
        rig.eyes[0].pupil_color = 0x1234;
        rig.eyes[1].iris.spin = 9.0;
        let mut loader = ScriptedLoader::default();
        loader.add("d/config.eye", PersonaConfig::default());
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        block_on(orchestrator().reload(&mut rig, "d/config.eye", &mut decoder, &mut loader, &gate));

        assert!(rig.params.tracking);
        assert_eq!(rig.eyes[0].pupil_color, DEFAULT_PUPIL_COLOR);
        assert_eq!(rig.eyes[1].iris.spin, 0.0);
    }

    #[test]
    fn test_failed_bundle_still_completes() {
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let report = block_on(orchestrator().reload(
            &mut rig,
            "gone/config.eye",
            &mut decoder,
            &mut loader,
            &gate,
        ));
        assert!(report.config.is_err());
        assert!(report.is_degraded());
        assert!(rig.eyes.iter().all(|e| e.iris.surface.is_flat()));
        assert!(gate.is_open());
    }

    #[test]
    fn test_eyelids_use_defaults_and_fall_back_flat() {
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", textured("a/iris.565", None));
        let mut decoder = CountingDecoder::default();
        decoder.eyelid_fail_on = Some(DEFAULT_LOWER_EYELID);
        let gate = PipelineGate::new();
        let report = block_on(orchestrator().reload(
            &mut rig,
            "a/config.eye",
            &mut decoder,
            &mut loader,
            &gate,
        ));

        assert_eq!(
            decoder.eyelid_ids.as_slice(),
            ["moods/angry/upper.bmp", DEFAULT_LOWER_EYELID]
        );
        assert_eq!(report.eyelids[0], Ok(()));
        assert_eq!(report.eyelids[1], Err(DecodeError::NotFound));
        // Mock masks report min 10 / max 20 for every column
        assert_eq!(rig.eyelids.upper.closed[0], 10);
        assert_eq!(rig.eyelids.upper.open[0], 20);
        assert!(rig.eyelids.lower.open.iter().all(|&r| r == LOWER_EYELID_INIT));
        assert!(rig.eyelids.lower.closed.iter().all(|&r| r == LOWER_EYELID_INIT));
    }

    #[test]
    fn test_ram_ceiling_keeps_stack_reserve() {
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", textured("a/iris.565", None));
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let mut orch = Orchestrator::new(MockClock::stepping(1), MockSystem { free: 3000 });
        block_on(orch.reload(&mut rig, "a/config.eye", &mut decoder, &mut loader, &gate));
        assert_eq!(decoder.last_max_ram, Some(0));
    }

    #[test]
    fn test_gate_closed_during_load() {
        let mut rig = test_rig();
        let gate = PipelineGate::new();
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", PersonaConfig::default());
        loader.watch(&gate);
        let mut decoder = CountingDecoder::default();
        block_on(orchestrator().reload(&mut rig, "a/config.eye", &mut decoder, &mut loader, &gate));
        assert_eq!(loader.gate_open_during_load, Some(false));
        assert!(gate.is_open());
    }

    #[test]
    fn test_boot_adopts_geometry() {
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        loader.add(
            "g/config.eye",
            PersonaConfig {
                eye_radius: Some(110),
                ..Default::default()
            },
        );
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        block_on(orchestrator().boot(&mut rig, "g/config.eye", &mut decoder, &mut loader, &gate));
        assert_eq!(rig.geometry.eye_radius, 110);
        assert_eq!(rig.eyes[0].eye_x, rig.geometry.map_radius as f32);
    }

    proptest! {
        #[test]
        fn prop_geometry_is_protected(
            eye_radius in proptest::option::of(any::<i32>()),
            iris_radius in proptest::option::of(any::<i32>()),
            slit in proptest::option::of(any::<i32>()),
            coverage in proptest::option::of(any::<f32>()),
        ) {
            let mut rig = test_rig();
            let before = rig.geometry;
            let mut loader = ScriptedLoader::default();
            loader.add("p/config.eye", PersonaConfig {
                eye_radius,
                iris_radius,
                slit_pupil_radius: slit,
                coverage,
                ..Default::default()
            });
            let mut decoder = CountingDecoder::default();
            let gate = PipelineGate::new();
            block_on(orchestrator().reload(&mut rig, "p/config.eye", &mut decoder, &mut loader, &gate));
            prop_assert!(rig.geometry.bits_eq(&before));
        }
    }

    #[test]
    fn test_surfaces_never_outlive_reset() {
        // A texture from a previous persona must not linger when the new
        // one names none
        let mut rig = test_rig();
        let mut loader = ScriptedLoader::default();
        loader.add("a/config.eye", textured("a/iris.565", None));
        loader.add("plain/config.eye", PersonaConfig::default());
        let mut decoder = CountingDecoder::default();
        let gate = PipelineGate::new();
        let mut orch = orchestrator();
        block_on(orch.reload(&mut rig, "a/config.eye", &mut decoder, &mut loader, &gate));
        assert!(!rig.eyes[0].iris.surface.is_flat());
        block_on(orch.reload(&mut rig, "plain/config.eye", &mut decoder, &mut loader, &gate));
        assert!(matches!(rig.eyes[0].iris.surface, Surface::Flat(_)));
    }
}
