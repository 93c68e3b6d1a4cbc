/// Identifies one scheduled quiet-interval timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Tracks the single pending timer. Minting a new token always retires the old one,
/// so only the most recently scheduled timer is ever allowed to fire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Debouncer {
    minted: u64,
    pending: Option<TimerToken>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token that was cancelled, if any, and the new pending token.
    pub fn schedule(&mut self) -> (Option<TimerToken>, TimerToken) {
        let cancelled = self.pending.take();
        self.minted += 1;
        let token = TimerToken(self.minted);
        self.pending = Some(token);
        (cancelled, token)
    }

    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.pending.take()
    }

    /// Consumes the pending token. False for any token that was already cancelled.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.pending == Some(token) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<TimerToken> {
        self.pending
    }
}
