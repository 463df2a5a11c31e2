#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits weapon firing commands from readiness snapshots.
//!
//! The world owns every cooldown; this system only reads the readiness view
//! each tick and queues fire commands for the player's held trigger and for
//! every armed enemy whose shot cooldown has expired inside the active
//! window. The world re-validates each command on execution, so a stale
//! snapshot can at worst produce a command that executes as a no-op.

use starstrafe_core::{Command, EnemyFireView, PlayerFireSnapshot};

/// Fire control system that queues weapon commands for ready shooters.
#[derive(Debug, Default)]
pub struct FireControl {
    scratch: Vec<Command>,
}

impl FireControl {
    /// Creates a new fire control system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::FirePlayerWeapon` and `Command::FireEnemyWeapon`
    /// entries for every shooter ready this tick.
    pub fn handle(
        &mut self,
        player: PlayerFireSnapshot,
        enemies: EnemyFireView,
        out: &mut Vec<Command>,
    ) {
        self.scratch.clear();

        if player.firing && player.ready {
            self.scratch.push(Command::FirePlayerWeapon);
        }

        for snapshot in enemies.iter() {
            if snapshot.armed && snapshot.ready && snapshot.in_view {
                self.scratch.push(Command::FireEnemyWeapon {
                    enemy: snapshot.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
