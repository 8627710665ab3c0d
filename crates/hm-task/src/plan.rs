//! Static job plans: which building to look for, and what to do there.

use hm_agent::JobKind;
use hm_building::{Building, BuildingTag};
use hm_core::ResourceKind;

use crate::TaskConfig;

/// Which buildings satisfy a leg's search.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Goal {
    /// A finished field with at least one mature crop.
    ReadyField,
    StandingTree,
    /// A finished warehouse able to take one more unit of the resource.
    StorageWithRoom(ResourceKind),
    /// A finished warehouse holding the resource.
    StorageHolding(ResourceKind),
    /// Any building still waiting for wood.
    SiteNeedingWood,
    /// A finished house with room for a newborn.
    HouseNeedingFood,
}

impl Goal {
    /// Kind filter for the search; `None` searches every kind.
    pub fn tag(self) -> Option<BuildingTag> {
        match self {
            Goal::ReadyField => Some(BuildingTag::Field),
            Goal::StandingTree => Some(BuildingTag::Tree),
            Goal::StorageWithRoom(_) | Goal::StorageHolding(_) => Some(BuildingTag::Warehouse),
            Goal::SiteNeedingWood => None,
            Goal::HouseNeedingFood => Some(BuildingTag::House),
        }
    }

    pub fn accepts(self, b: &Building, now: f32) -> bool {
        match self {
            Goal::ReadyField => b.is_finished() && b.field().is_some_and(|f| f.has_crop(now)),
            Goal::StandingTree => b.tag() == BuildingTag::Tree,
            Goal::StorageWithRoom(k) => b.is_finished() && b.warehouse().is_some_and(|w| w.can_store(k)),
            Goal::StorageHolding(k) => b.is_finished() && b.warehouse().is_some_and(|w| w.has(k)),
            Goal::SiteNeedingWood => b.construction.requires_wood(),
            Goal::HouseNeedingFood => b.is_finished() && b.house().is_some_and(|h| h.has_room()),
        }
    }
}

/// What happens once the worker stands on an interaction cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Action {
    /// Take one mature crop; the worker now carries food.
    Harvest,
    /// Cut the tree down; it is demolished and the worker carries wood.
    Fell,
    Deposit(ResourceKind),
    Withdraw(ResourceKind),
    /// Hand carried wood to a construction site.
    Deliver,
    /// Hand carried food to a house; may produce a newborn.
    Feed,
}

impl Action {
    pub fn duration(self, config: &TaskConfig) -> f32 {
        match self {
            Action::Harvest => config.harvest_secs,
            Action::Fell => config.fell_secs,
            Action::Deposit(_) | Action::Withdraw(_) | Action::Deliver | Action::Feed => config.transfer_secs,
        }
    }

    /// Resource the worker must already carry for this action to make sense.
    pub fn requires(self) -> Option<ResourceKind> {
        match self {
            Action::Deposit(k) => Some(k),
            Action::Deliver => Some(ResourceKind::Wood),
            Action::Feed => Some(ResourceKind::Food),
            Action::Harvest | Action::Fell | Action::Withdraw(_) => None,
        }
    }
}

/// One search-travel-act step of a plan.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Leg {
    pub goal:   Goal,
    pub action: Action,
}

const fn leg(goal: Goal, action: Action) -> Leg {
    Leg { goal, action }
}

const FARMER: [Leg; 2] = [
    leg(Goal::ReadyField, Action::Harvest),
    leg(Goal::StorageWithRoom(ResourceKind::Food), Action::Deposit(ResourceKind::Food)),
];

const LOGGER: [Leg; 2] = [
    leg(Goal::StandingTree, Action::Fell),
    leg(Goal::StorageWithRoom(ResourceKind::Wood), Action::Deposit(ResourceKind::Wood)),
];

const BUILDER: [Leg; 2] = [
    leg(Goal::StorageHolding(ResourceKind::Wood), Action::Withdraw(ResourceKind::Wood)),
    leg(Goal::SiteNeedingWood, Action::Deliver),
];

const BREEDER: [Leg; 2] = [
    leg(Goal::StorageHolding(ResourceKind::Food), Action::Withdraw(ResourceKind::Food)),
    leg(Goal::HouseNeedingFood, Action::Feed),
];

/// The repeating plan for `job`.  Priests have no plan; they run their own
/// routine.
pub fn plan_for(job: JobKind) -> &'static [Leg] {
    match job {
        JobKind::Farmer => &FARMER,
        JobKind::Logger => &LOGGER,
        JobKind::Builder => &BUILDER,
        JobKind::Breeder => &BREEDER,
        JobKind::Priest => &[],
    }
}
