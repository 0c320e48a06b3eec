//! Movement domain: capability flags gating advanced locomotion.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityKind {
    DoubleJump,
    WallJump,
    WallCling,
    Dash,
    Gun,
}

/// Capabilities the character has collected. Grants are monotonic: pickups
/// set flags, nothing ever clears them. The movement controller only reads
/// this to decide which transitions are reachable.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AbilitySet {
    pub double_jump: bool,
    pub wall_jump: bool,
    pub wall_cling: bool,
    pub dash: bool,
    pub gun: bool,
}

impl AbilitySet {
    /// Everything unlocked; used by the dev arena and tests.
    pub fn all() -> Self {
        Self {
            double_jump: true,
            wall_jump: true,
            wall_cling: true,
            dash: true,
            gun: true,
        }
    }

    pub fn grant(&mut self, kind: AbilityKind) {
        match kind {
            AbilityKind::DoubleJump => self.double_jump = true,
            AbilityKind::WallJump => self.wall_jump = true,
            AbilityKind::WallCling => self.wall_cling = true,
            AbilityKind::Dash => self.dash = true,
            AbilityKind::Gun => self.gun = true,
        }
    }

    pub fn has(&self, kind: AbilityKind) -> bool {
        match kind {
            AbilityKind::DoubleJump => self.double_jump,
            AbilityKind::WallJump => self.wall_jump,
            AbilityKind::WallCling => self.wall_cling,
            AbilityKind::Dash => self.dash,
            AbilityKind::Gun => self.gun,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_are_monotonic() {
        let mut abilities = AbilitySet::default();
        assert!(!abilities.has(AbilityKind::Dash));

        abilities.grant(AbilityKind::Dash);
        assert!(abilities.has(AbilityKind::Dash));

        // Granting again is a no-op, never a toggle.
        abilities.grant(AbilityKind::Dash);
        assert!(abilities.has(AbilityKind::Dash));
    }

    #[test]
    fn grant_is_readable_immediately() {
        let mut abilities = AbilitySet::default();
        for kind in [
            AbilityKind::DoubleJump,
            AbilityKind::WallJump,
            AbilityKind::WallCling,
            AbilityKind::Dash,
            AbilityKind::Gun,
        ] {
            abilities.grant(kind);
            assert!(abilities.has(kind));
        }
    }
}
