// Invincibility grants: reference counted, optionally flickering

/// Two independent grant counts: all grants, and grants that flicker.
///
/// The knight is invincible while any grant is active; overlapping grants
/// simply stack until the last one ends.
#[derive(Debug, Default)]
pub struct Invincibility {
    grants: u32,
    animated: u32,
    flickering: bool,
}

impl Invincibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grant. Returns true when a flicker loop must be started.
    pub fn grant(&mut self, animate: bool) -> bool {
        self.grants += 1;
        if animate {
            self.animated += 1;
        }

        if self.animated > 0 && !self.flickering {
            self.flickering = true;
            return true;
        }
        false
    }

    /// End a grant made with the same `animate` flag
    pub fn release(&mut self, animate: bool) {
        self.grants = self.grants.saturating_sub(1);
        if animate {
            self.animated = self.animated.saturating_sub(1);
        }
    }

    pub fn is_active(&self) -> bool {
        self.grants > 0
    }

    /// Whether any flickering grant is still active
    pub fn is_animating(&self) -> bool {
        self.animated > 0
    }

    /// Whether a flicker loop is running
    pub fn is_flickering(&self) -> bool {
        self.flickering
    }

    pub fn stop_flicker(&mut self) {
        self.flickering = false;
    }

    pub fn grants(&self) -> u32 {
        self.grants
    }

    pub fn animated_grants(&self) -> u32 {
        self.animated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_grants_stack() {
        let mut inv = Invincibility::new();
        assert!(inv.grant(true));
        assert!(!inv.grant(true), "second grant reuses the running flicker");
        assert!(!inv.grant(false));
        assert_eq!(inv.grants(), 3);
        assert_eq!(inv.animated_grants(), 2);

        inv.release(true);
        inv.release(false);
        assert!(inv.is_active());
        assert!(inv.is_animating());

        inv.release(true);
        assert!(!inv.is_active());
        assert!(!inv.is_animating());
    }

    #[test]
    fn test_plain_grant_does_not_flicker() {
        let mut inv = Invincibility::new();
        assert!(!inv.grant(false));
        assert!(inv.is_active());
        assert!(!inv.is_flickering());
    }

    #[test]
    fn test_flicker_restarts_after_stop() {
        let mut inv = Invincibility::new();
        assert!(inv.grant(true));
        inv.release(true);
        inv.stop_flicker();
        assert!(inv.grant(true));
    }

    #[test]
    fn test_release_never_underflows() {
        let mut inv = Invincibility::new();
        inv.release(true);
        assert_eq!(inv.grants(), 0);
        assert_eq!(inv.animated_grants(), 0);
    }
}
