//! Job kinds, status effects, and causes of death.

/// What an agent does when it is not resting.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JobKind {
    Farmer,
    Logger,
    Builder,
    Breeder,
    Priest,
}

impl JobKind {
    pub const ALL: [JobKind; 5] = [
        JobKind::Farmer,
        JobKind::Logger,
        JobKind::Builder,
        JobKind::Breeder,
        JobKind::Priest,
    ];

    /// Jobs a newborn can be given.  Priests are only ever placed by the host.
    pub const NEWBORN: [JobKind; 4] = [JobKind::Farmer, JobKind::Logger, JobKind::Builder, JobKind::Breeder];

    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::Farmer  => "farmer",
            JobKind::Logger  => "logger",
            JobKind::Builder => "builder",
            JobKind::Breeder => "breeder",
            JobKind::Priest  => "priest",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temporary conditions that modify an agent's behaviour.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    /// Woke up without breakfast; moves slower until it eats.
    pub hungry: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeathCause {
    Starved,
    Sacrificed,
    /// Caught in an area strike.
    Smitten,
    /// Removed by the host.
    Removed,
}

impl DeathCause {
    /// Player-facing notification text.
    pub fn message(self) -> &'static str {
        match self {
            DeathCause::Starved    => "starved to death",
            DeathCause::Sacrificed => "was sacrificed",
            DeathCause::Smitten    => "suffered your godly wrath",
            DeathCause::Removed    => "was removed",
        }
    }
}

impl std::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
