//! Autonomous style cycling
//!
//! The chosen style is written to retained registers and applied by a
//! warm restart, so every style boots with its own geometry. With
//! autocycle on, the next style is picked every [`CYCLE_PERIOD_MS`].

use persona_hal::RetainedRegisters;
use persona_protocol::{parse_command, Channel, Command, Reply, ReplySink};

use super::{persona_at, CommandHandler, Request, Telemetry};
use crate::cycle::{CycleRecord, CycleStore};
use crate::registry::{Persona, Registry};

/// Autocycle period
pub const CYCLE_PERIOD_MS: u32 = 120_000;

/// Restart-based style handler
pub struct StyleCycler<R> {
    registry: Registry,
    store: CycleStore<R>,
    record: CycleRecord,
    last_cycle_ms: u32,
    restart: bool,
}

impl<R: RetainedRegisters> StyleCycler<R> {
    /// Restore the persisted record
    pub fn new(registry: Registry, regs: R) -> Self {
        let mut store = CycleStore::new(regs);
        let record = store.load(registry.len());
        Self {
            registry,
            store,
            record,
            last_cycle_ms: 0,
            restart: false,
        }
    }

    pub fn record(&self) -> CycleRecord {
        self.record
    }

    fn reboot_to(&mut self, index: usize, out: &mut dyn ReplySink) {
        let index = if self.registry.is_empty() {
            0
        } else {
            index % self.registry.len()
        };
        self.record.index = index as u8;
        self.store.save(self.record);
        out.send(&Reply::Rebooting {
            name: persona_at(&self.registry, index).name,
        });
        self.restart = true;
    }

    fn list(&self, out: &mut dyn ReplySink) {
        out.send(&Reply::ListHeader(Channel::Style));
        for (i, p) in self.registry.list().enumerate() {
            out.send(&Reply::ListEntry {
                name: p.name,
                bundle: p.bundle,
                current: i == usize::from(self.record.index),
            });
        }
        out.send(&Reply::Current {
            channel: Channel::Style,
            name: self.current().name,
        });
        out.send(&Reply::AutoCycle(self.record.enabled));
    }

    fn next(&mut self, out: &mut dyn ReplySink) {
        let next = self.registry.next_index(usize::from(self.record.index));
        self.reboot_to(next, out);
    }
}

impl<R: RetainedRegisters> CommandHandler for StyleCycler<R> {
    fn banner(&mut self, now_ms: u32, out: &mut dyn ReplySink) {
        out.send(&Reply::Banner {
            style: self.current().name,
            index: usize::from(self.record.index),
            count: self.registry.len(),
            autocycle: self.record.enabled,
        });
        out.send(&Reply::Help(Channel::Style));
        self.last_cycle_ms = now_ms;
    }

    fn handle(&mut self, line: &str, telemetry: &Telemetry, out: &mut dyn ReplySink) {
        let Some(command) = parse_command(line) else {
            return;
        };

        match command {
            Command::Select(name) => match self.registry.resolve(name) {
                Some((index, _)) => self.reboot_to(index, out),
                None => out.send(&Reply::UnknownName {
                    channel: Channel::Style,
                    name,
                }),
            },
            Command::List => self.list(out),
            Command::Next => self.next(out),
            Command::Status => out.send(&Reply::StyleStatus {
                style: self.current().name,
                index: usize::from(self.record.index),
                count: self.registry.len(),
                autocycle: self.record.enabled,
                frames: telemetry.frames,
                free_ram: telemetry.free_ram,
            }),
            Command::AutoCycle(on) => {
                self.record.enabled = on;
                self.store.save(self.record);
                if on {
                    self.last_cycle_ms = telemetry.now_ms;
                }
                out.send(&Reply::AutoCycle(on));
            }
            Command::Other(text) => match self.registry.resolve(text) {
                Some((index, _)) => self.reboot_to(index, out),
                None => out.send(&Reply::UnknownCommand(text)),
            },
        }
    }

    fn poll(&mut self, now_ms: u32, out: &mut dyn ReplySink) {
        if self.record.enabled
            && !self.restart
            && now_ms.wrapping_sub(self.last_cycle_ms) >= CYCLE_PERIOD_MS
        {
            self.next(out);
        }
    }

    fn take_request(&mut self) -> Option<Request> {
        if core::mem::take(&mut self.restart) {
            Some(Request::Restart)
        } else {
            None
        }
    }

    fn pending(&self) -> bool {
        self.restart
    }

    fn current(&self) -> &'static Persona {
        persona_at(&self.registry, usize::from(self.record.index))
    }
}
