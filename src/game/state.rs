//! Presentation-side state: log, particles, flashes, notifications.
//!
//! Nothing here affects production or evolution. It is rebuilt fresh on load
//! and reset; only the simulation state is persisted.

/// Log entry shown in the event panel.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    /// Important entries (stage changes, purchases) render highlighted.
    pub is_important: bool,
}

/// A floating text particle ("+3" rising from the star on click).
#[derive(Clone, Debug)]
pub struct Particle {
    pub text: String,
    /// Column offset from the star center.
    pub col_offset: i16,
    /// Milliseconds alive so far.
    pub age_ms: f64,
    /// Total lifetime; vertical position is derived from age / life.
    pub life_ms: f64,
}

impl Particle {
    /// How many rows the particle has risen above its spawn point.
    pub fn rise_rows(&self) -> u16 {
        ((self.age_ms / self.life_ms) * 4.0) as u16
    }
}

/// A transient banner message (stage transitions, new upgrades).
#[derive(Clone, Debug)]
pub struct Notification {
    pub message: String,
    pub age_ms: f64,
}

/// How long a notification stays on screen.
pub const NOTIFICATION_LIFE_MS: f64 = 4_000.0;

const PARTICLE_LIFE_MS: f64 = 900.0;
const MAX_LOG_ENTRIES: usize = 50;

/// Everything the renderer needs beyond the simulation itself.
pub struct ViewState {
    pub log: Vec<LogEntry>,
    pub particles: Vec<Particle>,
    pub notification: Option<Notification>,
    /// Milliseconds remaining of the click feedback frame.
    pub click_flash_ms: f64,
    /// Milliseconds remaining of the purchase celebration.
    pub purchase_flash_ms: f64,
    /// Whether the upgrade panel is open.
    pub show_upgrades: bool,
    /// Wall-clock animation accumulator for the idle pulse.
    pub anim_ms: f64,
    /// Simple RNG state for particle spread.
    pub rng_state: u32,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            log: vec![LogEntry {
                text: "A cloud of cosmic dust drifts in the void.".to_string(),
                is_important: true,
            }],
            particles: Vec::new(),
            notification: None,
            click_flash_ms: 0.0,
            purchase_flash_ms: 0.0,
            show_upgrades: false,
            anim_ms: 0.0,
            rng_state: 42,
        }
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG_ENTRIES {
            self.log.remove(0);
        }
    }

    pub fn notify(&mut self, message: &str) {
        self.notification = Some(Notification {
            message: message.to_string(),
            age_ms: 0.0,
        });
    }

    pub fn spawn_particle(&mut self, text: String) {
        let spread = (self.next_random() % 9) as i16 - 4;
        self.particles.push(Particle {
            text,
            col_offset: spread,
            age_ms: 0.0,
            life_ms: PARTICLE_LIFE_MS,
        });
    }

    /// Age every timed element by `delta_ms` and drop the expired ones.
    pub fn tick(&mut self, delta_ms: f64) {
        self.anim_ms += delta_ms;
        self.click_flash_ms = (self.click_flash_ms - delta_ms).max(0.0);
        self.purchase_flash_ms = (self.purchase_flash_ms - delta_ms).max(0.0);
        for p in &mut self.particles {
            p.age_ms += delta_ms;
        }
        self.particles.retain(|p| p.age_ms < p.life_ms);
        if let Some(n) = &mut self.notification {
            n.age_ms += delta_ms;
            if n.age_ms >= NOTIFICATION_LIFE_MS {
                self.notification = None;
            }
        }
    }

    /// xorshift32; deterministic and good enough for particle jitter.
    pub fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}
