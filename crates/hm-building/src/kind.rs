//! Tagged building variants and their per-kind state.
//!
//! Routines never downcast: they filter the registry by [`BuildingTag`] and
//! then match on [`BuildingKind`] to reach the state they need.

use hm_core::{AgentId, ResourceKind};

// ── BuildingTag ───────────────────────────────────────────────────────────────

/// Data-free discriminant of [`BuildingKind`], used as a registry query key.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildingTag {
    Field,
    Warehouse,
    House,
    Temple,
    Tree,
    Road,
    Wall,
}

impl BuildingTag {
    pub fn as_str(self) -> &'static str {
        match self {
            BuildingTag::Field     => "field",
            BuildingTag::Warehouse => "warehouse",
            BuildingTag::House     => "house",
            BuildingTag::Temple    => "temple",
            BuildingTag::Tree      => "tree",
            BuildingTag::Road      => "road",
            BuildingTag::Wall      => "wall",
        }
    }

    /// Footprint `(width, height)` used when none is given explicitly.
    pub fn default_size(self) -> (i32, i32) {
        match self {
            BuildingTag::Field | BuildingTag::Warehouse | BuildingTag::House | BuildingTag::Temple => {
                (2, 2)
            }
            BuildingTag::Tree | BuildingTag::Road | BuildingTag::Wall => (1, 1),
        }
    }

    /// Whether agents may walk across the footprint.
    pub fn is_walkable(self) -> bool {
        matches!(self, BuildingTag::Field | BuildingTag::Road)
    }
}

impl std::fmt::Display for BuildingTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Field ─────────────────────────────────────────────────────────────────────

pub const FIELD_SLOTS: usize = 8;

/// A crop field.  Each slot remembers when it was last planted.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Simulated seconds a crop needs before it can be harvested.
    pub mature_secs: f32,
    planted_at: [f32; FIELD_SLOTS],
}

impl Field {
    /// All slots planted at `now`.
    pub fn new(now: f32, mature_secs: f32) -> Self {
        Self { mature_secs, planted_at: [now; FIELD_SLOTS] }
    }

    fn is_mature(&self, slot: usize, now: f32) -> bool {
        self.planted_at[slot] + self.mature_secs <= now
    }

    pub fn has_crop(&self, now: f32) -> bool {
        (0..FIELD_SLOTS).any(|i| self.is_mature(i, now))
    }

    pub fn mature_count(&self, now: f32) -> usize {
        (0..FIELD_SLOTS).filter(|&i| self.is_mature(i, now)).count()
    }

    /// Harvest the first mature slot and replant it.  `false` if none was ripe.
    pub fn harvest(&mut self, now: f32) -> bool {
        match (0..FIELD_SLOTS).find(|&i| self.is_mature(i, now)) {
            Some(i) => {
                self.planted_at[i] = now;
                true
            }
            None => false,
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new(0.0, 15.0)
    }
}

// ── Warehouse ─────────────────────────────────────────────────────────────────

/// Storage for a single resource kind at a time.
///
/// The kind is fixed by the first item added and released once the last
/// item is taken out.
#[derive(Clone, Debug, PartialEq)]
pub struct Warehouse {
    pub capacity: u32,
    kind:  Option<ResourceKind>,
    count: u32,
}

impl Warehouse {
    pub fn new(capacity: u32) -> Self {
        Self { capacity, kind: None, count: 0 }
    }

    pub fn kind(&self) -> Option<ResourceKind> {
        self.kind
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    pub fn can_store(&self, kind: ResourceKind) -> bool {
        !self.is_full() && self.kind.is_none_or(|k| k == kind)
    }

    pub fn has(&self, kind: ResourceKind) -> bool {
        self.count > 0 && self.kind == Some(kind)
    }

    pub fn add(&mut self, kind: ResourceKind) -> bool {
        if !self.can_store(kind) {
            return false;
        }
        self.kind = Some(kind);
        self.count += 1;
        true
    }

    pub fn remove(&mut self, kind: ResourceKind) -> bool {
        if !self.has(kind) {
            return false;
        }
        self.count -= 1;
        if self.count == 0 {
            self.kind = None;
        }
        true
    }
}

impl Default for Warehouse {
    fn default() -> Self {
        Self::new(36)
    }
}

// ── House ─────────────────────────────────────────────────────────────────────

/// Sleeping place for up to `capacity` agents, with a food pantry.
#[derive(Clone, Debug, PartialEq)]
pub struct House {
    pub capacity:       usize,
    /// Food units consumed per newborn.
    pub food_per_birth: u32,
    inhabitants: Vec<AgentId>,
    food:        u32,
}

impl House {
    pub fn new(capacity: usize, food_per_birth: u32) -> Self {
        Self { capacity, food_per_birth, inhabitants: Vec::new(), food: 0 }
    }

    pub fn inhabitants(&self) -> &[AgentId] {
        &self.inhabitants
    }

    pub fn is_inhabitant(&self, agent: AgentId) -> bool {
        self.inhabitants.contains(&agent)
    }

    pub fn has_room(&self) -> bool {
        self.inhabitants.len() < self.capacity
    }

    /// Add `agent` as an inhabitant.  Idempotent; `false` when full.
    pub fn inhabit(&mut self, agent: AgentId) -> bool {
        if self.is_inhabitant(agent) {
            return true;
        }
        if !self.has_room() {
            return false;
        }
        self.inhabitants.push(agent);
        true
    }

    pub fn evict(&mut self, agent: AgentId) -> bool {
        let before = self.inhabitants.len();
        self.inhabitants.retain(|&a| a != agent);
        self.inhabitants.len() != before
    }

    pub fn food(&self) -> u32 {
        self.food
    }

    /// Store one unit of food.  Returns `true` when this completes the birth
    /// requirement; the requirement is consumed.
    pub fn feed(&mut self) -> bool {
        self.food += 1;
        if self.food_per_birth > 0 && self.food >= self.food_per_birth {
            self.food -= self.food_per_birth;
            return true;
        }
        false
    }

    /// Eat one unit of food from the pantry.
    pub fn take_food(&mut self) -> bool {
        if self.food == 0 {
            return false;
        }
        self.food -= 1;
        true
    }
}

impl Default for House {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

// ── Temple ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Temple {
    pub faith_per_sacrifice: f32,
    /// Priest currently holding the altar.
    holder: Option<AgentId>,
}

impl Temple {
    pub fn new(faith_per_sacrifice: f32) -> Self {
        Self { faith_per_sacrifice, holder: None }
    }

    pub fn is_sacrificing(&self) -> bool {
        self.holder.is_some()
    }

    pub fn holder(&self) -> Option<AgentId> {
        self.holder
    }

    /// Claim the altar for `priest`.  `false` if someone else holds it.
    pub fn start_sacrifice(&mut self, priest: AgentId) -> bool {
        match self.holder {
            Some(h) => h == priest,
            None => {
                self.holder = Some(priest);
                true
            }
        }
    }

    pub fn end_sacrifice(&mut self) {
        self.holder = None;
    }
}

impl Default for Temple {
    fn default() -> Self {
        Self::new(10.0)
    }
}

// ── BuildingKind ──────────────────────────────────────────────────────────────

/// Capability-bearing building variant.
#[derive(Clone, Debug, PartialEq)]
pub enum BuildingKind {
    Field(Field),
    Warehouse(Warehouse),
    House(House),
    Temple(Temple),
    Tree,
    Road,
    Wall,
}

impl BuildingKind {
    pub fn tag(&self) -> BuildingTag {
        match self {
            BuildingKind::Field(_)     => BuildingTag::Field,
            BuildingKind::Warehouse(_) => BuildingTag::Warehouse,
            BuildingKind::House(_)     => BuildingTag::House,
            BuildingKind::Temple(_)    => BuildingTag::Temple,
            BuildingKind::Tree         => BuildingTag::Tree,
            BuildingKind::Road         => BuildingTag::Road,
            BuildingKind::Wall         => BuildingTag::Wall,
        }
    }

    /// A fresh variant with default state for `tag`.
    pub fn from_tag(tag: BuildingTag) -> Self {
        match tag {
            BuildingTag::Field     => BuildingKind::Field(Field::default()),
            BuildingTag::Warehouse => BuildingKind::Warehouse(Warehouse::default()),
            BuildingTag::House     => BuildingKind::House(House::default()),
            BuildingTag::Temple    => BuildingKind::Temple(Temple::default()),
            BuildingTag::Tree      => BuildingKind::Tree,
            BuildingTag::Road      => BuildingKind::Road,
            BuildingTag::Wall      => BuildingKind::Wall,
        }
    }
}
