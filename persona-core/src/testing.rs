//! In-memory doubles shared by the unit tests

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use persona_hal::{
    AssetStore, Clock, EyeLink, LinkError, RetainedRegisters, RetainedSlot, StoreError,
    SystemInfo,
};

use crate::config::PersonaConfig;
use crate::eye::{Eye, EyeRig, Geometry, Texture};
use crate::reload::PipelineGate;
use crate::traits::{AssetDecoder, ConfigError, ConfigLoader, DecodeError, EyelidMap};

/// Something a link was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Abort,
    Release,
    ClearBusy,
    Rotation(u8),
}

const STUCK: u32 = u32::MAX;

/// Link that reports busy for a number of polls
#[derive(Debug, Default)]
pub struct MockLink {
    busy_polls: Cell<u32>,
    pub events: Vec<LinkEvent>,
    /// Reject rotation commands
    pub rotation_fails: bool,
}

impl MockLink {
    /// Never finish the current transfer
    pub fn stuck(&mut self) {
        self.busy_polls.set(STUCK);
    }
}

impl EyeLink for MockLink {
    fn is_busy(&self) -> bool {
        match self.busy_polls.get() {
            0 => false,
            STUCK => true,
            n => {
                self.busy_polls.set(n - 1);
                true
            }
        }
    }

    fn abort_transfer(&mut self) {
        self.busy_polls.set(0);
        self.events.push(LinkEvent::Abort);
    }

    fn clear_busy(&mut self) {
        self.busy_polls.set(0);
        self.events.push(LinkEvent::ClearBusy);
    }

    fn release(&mut self) {
        self.events.push(LinkEvent::Release);
    }

    fn set_rotation(&mut self, rotation: u8) -> Result<(), LinkError> {
        self.events.push(LinkEvent::Rotation(rotation));
        if self.rotation_fails {
            Err(LinkError::Bus)
        } else {
            Ok(())
        }
    }
}

/// Clock that advances by a fixed step on every read
pub struct MockClock {
    now: Cell<u32>,
    step: u32,
}

impl MockClock {
    pub fn stepping(step: u32) -> Self {
        Self::starting_at(0, step)
    }

    pub fn starting_at(start: u32, step: u32) -> Self {
        Self {
            now: Cell::new(start),
            step,
        }
    }

    /// Current time without advancing
    pub fn current(&self) -> u32 {
        self.now.get()
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(self.step));
        now
    }
}

pub struct MockSystem {
    pub free: usize,
}

impl SystemInfo for MockSystem {
    fn available_memory(&self) -> usize {
        self.free
    }
}

#[derive(Debug, Default)]
pub struct MockRegisters {
    pub regs: [u32; 2],
}

impl MockRegisters {
    pub fn with(regs: [u32; 2]) -> Self {
        Self { regs }
    }
}

impl RetainedRegisters for MockRegisters {
    fn read(&mut self, slot: RetainedSlot) -> u32 {
        self.regs[slot.index()]
    }

    fn write(&mut self, slot: RetainedSlot, value: u32) {
        self.regs[slot.index()] = value;
    }
}

/// Asset store backed by owned byte vectors
#[derive(Default)]
pub struct MemoryStore {
    assets: Vec<(String, Vec<u8>)>,
}

impl MemoryStore {
    pub fn put(&mut self, id: &str, data: Vec<u8>) {
        self.assets.push((id.into(), data));
    }

    fn find(&self, id: &str) -> Result<&[u8], StoreError> {
        self.assets
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, data)| data.as_slice())
            .ok_or(StoreError::NotFound)
    }
}

impl AssetStore for MemoryStore {
    fn size(&mut self, id: &str) -> Result<usize, StoreError> {
        self.find(id).map(<[u8]>::len)
    }

    fn read(&mut self, id: &str, offset: usize, buf: &mut [u8]) -> Result<usize, StoreError> {
        let data = self.find(id)?;
        let rest = data.get(offset..).ok_or(StoreError::OutOfRange)?;
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        Ok(n)
    }
}

/// Leak a solid-colour texture
pub fn leak_texture(width: u16, height: u16, fill: u16) -> Texture {
    let pixels: &'static [u16] =
        Box::leak(vec![fill; usize::from(width) * usize::from(height)].into_boxed_slice());
    Texture {
        pixels,
        width,
        height,
    }
}

/// Decoder that fabricates textures and counts calls
#[derive(Default)]
pub struct CountingDecoder {
    pub texture_calls: usize,
    /// Fail every texture decode with this error
    pub fail_with: Option<DecodeError>,
    /// Report this eyelid id as missing
    pub eyelid_fail_on: Option<&'static str>,
    pub eyelid_ids: Vec<String>,
    pub last_max_ram: Option<usize>,
}

impl AssetDecoder for CountingDecoder {
    fn decode_texture(&mut self, _id: &str, max_ram: usize) -> Result<Texture, DecodeError> {
        self.texture_calls += 1;
        self.last_max_ram = Some(max_ram);
        match self.fail_with {
            Some(e) => Err(e),
            None => Ok(leak_texture(2, 2, self.texture_calls as u16)),
        }
    }

    fn decode_eyelid(
        &mut self,
        id: &str,
        _init: u8,
        _max_ram: usize,
    ) -> Result<EyelidMap, DecodeError> {
        self.eyelid_ids.push(id.into());
        if self.eyelid_fail_on == Some(id) {
            return Err(DecodeError::NotFound);
        }
        Ok(EyelidMap {
            min: [10; 240],
            max: [20; 240],
        })
    }
}

/// Loader serving configs from a table
#[derive(Default)]
pub struct ScriptedLoader<'g> {
    bundles: Vec<(String, PersonaConfig)>,
    gate: Option<&'g PipelineGate>,
    pub gate_open_during_load: Option<bool>,
}

impl<'g> ScriptedLoader<'g> {
    pub fn add(&mut self, bundle: &str, config: PersonaConfig) {
        self.bundles.push((bundle.into(), config));
    }

    /// Record the gate state whenever a bundle is loaded
    pub fn watch(&mut self, gate: &'g PipelineGate) {
        self.gate = Some(gate);
    }
}

impl ConfigLoader for ScriptedLoader<'_> {
    fn load<L: EyeLink, const N: usize>(
        &mut self,
        bundle: &str,
        rig: &mut EyeRig<L, N>,
    ) -> Result<(), ConfigError> {
        if let Some(gate) = self.gate {
            self.gate_open_during_load = Some(gate.is_open());
        }
        let (_, config) = self
            .bundles
            .iter()
            .find(|(name, _)| name == bundle)
            .ok_or(ConfigError::Store(StoreError::NotFound))?;
        config.apply(rig);
        Ok(())
    }
}

/// Two-eye rig with default geometry
pub fn test_rig() -> EyeRig<MockLink, 2> {
    EyeRig::new(
        [
            Eye::new("left", MockLink::default(), 0),
            Eye::new("right", MockLink::default(), 1),
        ],
        Geometry::default(),
    )
}

/// Three-eye rig, so sharing can skip a neighbour
pub fn test_rig3() -> EyeRig<MockLink, 3> {
    EyeRig::new(
        [
            Eye::new("left", MockLink::default(), 0),
            Eye::new("centre", MockLink::default(), 1),
            Eye::new("right", MockLink::default(), 2),
        ],
        Geometry::default(),
    )
}
