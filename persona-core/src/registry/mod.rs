//! Persona registry
//!
//! Compiled-in tables mapping a persona name to its bundle identifier.
//! Order matters: listings follow it and `next` walks it.

/// A named persona bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Persona {
    pub name: &'static str,
    pub bundle: &'static str,
}

const fn persona(name: &'static str, bundle: &'static str) -> Persona {
    Persona { name, bundle }
}

/// Moods for interactive live reload
pub const MOODS: &[Persona] = &[
    persona("default", "default/config.eye"),
    persona("happy", "moods/happy/config.eye"),
    persona("angry", "moods/angry/config.eye"),
    persona("sad", "moods/sad/config.eye"),
    persona("scared", "moods/scared/config.eye"),
    persona("sleepy", "moods/sleepy/config.eye"),
    persona("suspicious", "moods/suspicious/config.eye"),
    persona("surprised", "moods/surprised/config.eye"),
    persona("love", "moods/love/config.eye"),
    persona("crazy", "moods/crazy/config.eye"),
];

/// Styles for autonomous restart-based cycling
pub const STYLES: &[Persona] = &[
    persona("hazel", "hazel/config.eye"),
    persona("anime", "anime/config.eye"),
    persona("big_blue", "big_blue/config.eye"),
    persona("demon", "demon/config.eye"),
    persona("doom_red", "doom-red/config.eye"),
    persona("doom_spiral", "doom-spiral/config.eye"),
    persona("fish", "fish_eyes/config.eye"),
    persona("fizzgig", "fizzgig/config.eye"),
    persona("hypno_red", "hypno_red/config.eye"),
    persona("reflection", "reflection/config.eye"),
    persona("skull", "skull/config.eye"),
    persona("snake", "snake_green/config.eye"),
    persona("spikes", "spikes/config.eye"),
    persona("toonstripe", "toonstripe/config.eye"),
];

/// A table of personas
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    entries: &'static [Persona],
}

impl Registry {
    pub const fn new(entries: &'static [Persona]) -> Self {
        Self { entries }
    }

    /// Registry over [`MOODS`]
    pub const fn moods() -> Self {
        Self::new(MOODS)
    }

    /// Registry over [`STYLES`]
    pub const fn styles() -> Self {
        Self::new(STYLES)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static Persona> {
        self.entries.get(index)
    }

    /// Find a persona by name, ignoring ASCII case
    pub fn resolve(&self, name: &str) -> Option<(usize, &'static Persona)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, p)| p.name.eq_ignore_ascii_case(name))
    }

    /// Personas in declaration order
    pub fn list(&self) -> impl Iterator<Item = &'static Persona> {
        self.entries.iter()
    }

    /// Index after `index`, wrapping to the start
    pub fn next_index(&self, index: usize) -> usize {
        if self.entries.is_empty() {
            0
        } else {
            (index + 1) % self.entries.len()
        }
    }
}
