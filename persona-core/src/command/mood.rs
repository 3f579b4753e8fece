//! Interactive mood mode

use persona_protocol::{parse_command, Channel, Command, Reply, ReplySink};

use super::{persona_at, CommandHandler, Request, Telemetry};
use crate::registry::{Persona, Registry};

/// Live-reload command handler
///
/// A selection only becomes current once the render loop takes the
/// request, so `STATUS` and `MOOD:list` report what is on screen.
pub struct MoodController {
    registry: Registry,
    current: usize,
    pending: Option<usize>,
}

impl MoodController {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            current: 0,
            pending: None,
        }
    }

    fn select(&mut self, index: usize, out: &mut dyn ReplySink) {
        let persona = persona_at(&self.registry, index);
        self.pending = Some(index);
        out.send(&Reply::Switching { name: persona.name });
    }

    fn list(&self, out: &mut dyn ReplySink) {
        out.send(&Reply::ListHeader(Channel::Mood));
        for (i, p) in self.registry.list().enumerate() {
            out.send(&Reply::ListEntry {
                name: p.name,
                bundle: p.bundle,
                current: i == self.current,
            });
        }
        out.send(&Reply::Current {
            channel: Channel::Mood,
            name: self.current().name,
        });
    }
}

impl CommandHandler for MoodController {
    fn banner(&mut self, _now_ms: u32, out: &mut dyn ReplySink) {
        out.send(&Reply::Help(Channel::Mood));
    }

    fn handle(&mut self, line: &str, telemetry: &Telemetry, out: &mut dyn ReplySink) {
        let Some(command) = parse_command(line) else {
            return;
        };

        match command {
            Command::Select(name) => match self.registry.resolve(name) {
                Some((index, _)) => self.select(index, out),
                None => out.send(&Reply::UnknownName {
                    channel: Channel::Mood,
                    name,
                }),
            },
            Command::List => self.list(out),
            Command::Next => {
                let from = self.pending.unwrap_or(self.current);
                self.select(self.registry.next_index(from), out);
            }
            Command::Status => out.send(&Reply::MoodStatus {
                mood: self.current().name,
                frames: telemetry.frames,
                free_ram: telemetry.free_ram,
            }),
            Command::AutoCycle(_) | Command::Other(_) => {
                out.send(&Reply::UnknownCommand(line.trim()));
            }
        }
    }

    fn poll(&mut self, _now_ms: u32, _out: &mut dyn ReplySink) {}

    fn take_request(&mut self) -> Option<Request> {
        let index = self.pending.take()?;
        self.current = index;
        Some(Request::Reload(persona_at(&self.registry, index)))
    }

    fn pending(&self) -> bool {
        self.pending.is_some()
    }

    fn current(&self) -> &'static Persona {
        persona_at(&self.registry, self.current)
    }
}
