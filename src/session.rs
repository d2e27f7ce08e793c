use std::cell::Cell;

/// Identifies one render pass. Only the token from the latest
/// [`RenderSession::begin_pass`] is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PassToken(u64);

impl PassToken {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Generation counter owned by one panel. Starting a pass supersedes every
/// earlier pass so their pending simulation ticks become no-ops.
#[derive(Debug, Default)]
pub struct RenderSession {
    generation: Cell<u64>,
}

impl RenderSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_pass(&self) -> PassToken {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        PassToken(next)
    }

    pub fn is_current(&self, token: PassToken) -> bool {
        self.generation.get() == token.0
    }

    pub fn current(&self) -> PassToken {
        PassToken(self.generation.get())
    }
}
