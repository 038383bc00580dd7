//! Society Status
//!
//! Immutable snapshot of the society: head count, how it splits across
//! occupations, how the resource endowment splits across uses, and the
//! technology level. Rule outputs are `Status` deltas that are summed with
//! the current status and then normalized.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use society_records::{KpiRecord, StatusSnapshot, SNAPSHOT_VERSION};
use thiserror::Error;

use crate::prefs::{inv_softmax, recenter, softmax};

/// Number of occupation categories, and of resource categories.
pub const CATEGORY_COUNT: usize = 5;

/// What an individual spends their time on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupation {
    Farmer,
    Researcher,
    Educator,
    Doctor,
    Inactive,
}

impl Occupation {
    pub const ALL: [Occupation; CATEGORY_COUNT] = [
        Occupation::Farmer,
        Occupation::Researcher,
        Occupation::Educator,
        Occupation::Doctor,
        Occupation::Inactive,
    ];

    /// Position in the population preference vector.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupation::Farmer => write!(f, "farmer"),
            Occupation::Researcher => write!(f, "researcher"),
            Occupation::Educator => write!(f, "educator"),
            Occupation::Doctor => write!(f, "doctor"),
            Occupation::Inactive => write!(f, "inactive"),
        }
    }
}

/// What a share of the resource endowment is devoted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Food,
    Research,
    Education,
    Health,
    Settlement,
}

impl Resource {
    pub const ALL: [Resource; CATEGORY_COUNT] = [
        Resource::Food,
        Resource::Research,
        Resource::Education,
        Resource::Health,
        Resource::Settlement,
    ];

    /// Position in the resource preference vector.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Food => write!(f, "food"),
            Resource::Research => write!(f, "research"),
            Resource::Education => write!(f, "education"),
            Resource::Health => write!(f, "health"),
            Resource::Settlement => write!(f, "settlement"),
        }
    }
}

/// Invalid input when building a status from head counts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatusError {
    #[error("{occupation} count must be positive ({count})")]
    NonPositiveCount { occupation: Occupation, count: i64 },
    #[error("{resource} share must be positive ({share:e})")]
    NonPositiveShare { resource: Resource, share: f64 },
}

/// Society state at one point in time.
///
/// `population` may be negative only inside unnormalized sums of deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    population: i64,
    population_prefs: [f64; CATEGORY_COUNT],
    resource_prefs: [f64; CATEGORY_COUNT],
    technology: f64,
}

impl Status {
    /// Additive identity.
    pub const ZERO: Status = Status {
        population: 0,
        population_prefs: [0.0; CATEGORY_COUNT],
        resource_prefs: [0.0; CATEGORY_COUNT],
        technology: 0.0,
    };

    pub fn new(
        population: i64,
        population_prefs: [f64; CATEGORY_COUNT],
        resource_prefs: [f64; CATEGORY_COUNT],
        technology: f64,
    ) -> Self {
        Self {
            population,
            population_prefs,
            resource_prefs,
            technology,
        }
    }

    /// Builds a status from head counts per occupation and resource shares
    /// per use (shares need not sum to 1).
    pub fn from_counts(
        counts: [i64; CATEGORY_COUNT],
        shares: [f64; CATEGORY_COUNT],
        technology: f64,
    ) -> Result<Self, StatusError> {
        for occupation in Occupation::ALL {
            let count = counts[occupation.index()];
            if count <= 0 {
                return Err(StatusError::NonPositiveCount { occupation, count });
            }
        }
        for resource in Resource::ALL {
            let share = shares[resource.index()];
            // Written so that NaN is rejected as well.
            if !(share > 0.0) {
                return Err(StatusError::NonPositiveShare { resource, share });
            }
        }
        Ok(Self {
            population: counts.iter().sum(),
            population_prefs: inv_softmax(&counts.map(|c| c as f64)),
            resource_prefs: inv_softmax(&shares),
            technology,
        })
    }

    /// Delta changing only the head count.
    pub fn population_delta(delta: i64) -> Self {
        Self {
            population: delta,
            ..Self::ZERO
        }
    }

    /// Delta changing only the technology level.
    pub fn technology_delta(delta: f64) -> Self {
        Self {
            technology: delta,
            ..Self::ZERO
        }
    }

    pub fn population(&self) -> i64 {
        self.population
    }

    pub fn population_prefs(&self) -> &[f64; CATEGORY_COUNT] {
        &self.population_prefs
    }

    pub fn resource_prefs(&self) -> &[f64; CATEGORY_COUNT] {
        &self.resource_prefs
    }

    pub fn technology(&self) -> f64 {
        self.technology
    }

    /// Returns a copy with a different technology level.
    pub fn with_technology(self, technology: f64) -> Self {
        Self { technology, ..self }
    }

    /// Returns a copy with a different head count.
    pub fn with_population(self, population: i64) -> Self {
        Self { population, ..self }
    }

    /// Share of the population in each occupation.
    pub fn occupation_shares(&self) -> [f64; CATEGORY_COUNT] {
        softmax(&self.population_prefs)
    }

    /// Expected head count per occupation (fractional).
    pub fn individuals(&self) -> [f64; CATEGORY_COUNT] {
        let population = self.population as f64;
        self.occupation_shares().map(|share| share * population)
    }

    /// Share of the resource endowment devoted to each use.
    pub fn resource_ratios(&self) -> [f64; CATEGORY_COUNT] {
        softmax(&self.resource_prefs)
    }

    pub fn occupation(&self, occupation: Occupation) -> f64 {
        self.individuals()[occupation.index()]
    }

    pub fn resource_ratio(&self, resource: Resource) -> f64 {
        self.resource_ratios()[resource.index()]
    }

    pub fn farmers(&self) -> f64 {
        self.occupation(Occupation::Farmer)
    }

    pub fn researchers(&self) -> f64 {
        self.occupation(Occupation::Researcher)
    }

    pub fn educators(&self) -> f64 {
        self.occupation(Occupation::Educator)
    }

    pub fn doctors(&self) -> f64 {
        self.occupation(Occupation::Doctor)
    }

    pub fn inactive(&self) -> f64 {
        self.occupation(Occupation::Inactive)
    }

    pub fn food_ratio(&self) -> f64 {
        self.resource_ratio(Resource::Food)
    }

    pub fn research_ratio(&self) -> f64 {
        self.resource_ratio(Resource::Research)
    }

    pub fn education_ratio(&self) -> f64 {
        self.resource_ratio(Resource::Education)
    }

    pub fn health_ratio(&self) -> f64 {
        self.resource_ratio(Resource::Health)
    }

    pub fn settlement_ratio(&self) -> f64 {
        self.resource_ratio(Resource::Settlement)
    }

    /// Productivity multiplier `1 - exp(-technology)`: 0 without technology,
    /// approaching 1 as technology grows.
    pub fn efficiency(&self) -> f64 {
        -(-self.technology).exp_m1()
    }

    /// Clamps the head count at 0 and technology at `min_technology`, and
    /// re-centers both preference vectors. The decoded shares are unchanged.
    pub fn normalize(&self, min_technology: f64) -> Self {
        Self {
            population: self.population.max(0),
            population_prefs: recenter(&self.population_prefs),
            resource_prefs: recenter(&self.resource_prefs),
            technology: self.technology.max(min_technology),
        }
    }

    /// Named observables reported with every step.
    pub fn observables(&self) -> KpiRecord {
        KpiRecord::new()
            .with("population", self.population as f64)
            .with("technology", self.technology)
    }

    pub fn to_snapshot(&self) -> StatusSnapshot {
        let [farmer, researcher, educator, doctor, inactive] = self.population_prefs;
        let [food, research, education, health, settlement] = self.resource_prefs;
        StatusSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            population: self.population,
            farmer_prefs: farmer,
            researcher_prefs: researcher,
            educator_prefs: educator,
            doctor_prefs: doctor,
            inactive_prefs: inactive,
            food_prefs: food,
            research_prefs: research,
            education_prefs: education,
            health_prefs: health,
            settlement_prefs: settlement,
            technology: self.technology,
        }
    }
}

impl From<&StatusSnapshot> for Status {
    fn from(s: &StatusSnapshot) -> Self {
        Status::new(
            s.population,
            [
                s.farmer_prefs,
                s.researcher_prefs,
                s.educator_prefs,
                s.doctor_prefs,
                s.inactive_prefs,
            ],
            [
                s.food_prefs,
                s.research_prefs,
                s.education_prefs,
                s.health_prefs,
                s.settlement_prefs,
            ],
            s.technology,
        )
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Status {
    type Output = Status;

    fn add(self, rhs: Status) -> Status {
        let mut population_prefs = self.population_prefs;
        let mut resource_prefs = self.resource_prefs;
        for i in 0..CATEGORY_COUNT {
            population_prefs[i] += rhs.population_prefs[i];
            resource_prefs[i] += rhs.resource_prefs[i];
        }
        Status {
            population: self.population + rhs.population,
            population_prefs,
            resource_prefs,
            technology: self.technology + rhs.technology,
        }
    }
}

impl Sum for Status {
    fn sum<I: Iterator<Item = Status>>(iter: I) -> Status {
        iter.fold(Status::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Status> for Status {
    fn sum<I: Iterator<Item = &'a Status>>(iter: I) -> Status {
        iter.copied().sum()
    }
}
