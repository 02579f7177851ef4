use crate::error::ConfigurationError;

/// One scheduled pairing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fixture<T> {
    pub team_a: T,
    pub team_b: T,
}

impl<T: Clone> Fixture<T> {
    /// The same pairing with the sides swapped.
    pub fn reversed(&self) -> Self {
        Self {
            team_a: self.team_b.clone(),
            team_b: self.team_a.clone(),
        }
    }
}

/// Fixtures that are played at the same time. Every team appears at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matchday<T> {
    fixtures: Vec<Fixture<T>>,
}

impl<T> Matchday<T> {
    pub fn fixtures(&self) -> &[Fixture<T>] {
        &self.fixtures
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

/// A single round robin: every team meets every other team exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Round<T> {
    matchdays: Vec<Matchday<T>>,
}

impl<T: Clone> Round<T> {
    /// Schedules the round with the circle method.
    ///
    /// The first team stays in place while the others rotate by one
    /// position per matchday. On each matchday, the i-th team from the front
    /// plays the i-th team from the back.
    pub fn new(teams: &[T]) -> Self {
        let n = teams.len();
        if n < 2 {
            return Self {
                matchdays: Vec::new(),
            };
        }
        // Index into `teams` after rotating everything but the first team
        // to the left by `shift`.
        let rotated = |shift: usize, idx: usize| {
            if idx == 0 {
                0
            } else {
                (shift + idx - 1) % (n - 1) + 1
            }
        };
        let matchdays = (0..n - 1)
            .map(|shift| Matchday {
                fixtures: (0..n / 2)
                    .map(|offset| Fixture {
                        team_a: teams[rotated(shift, offset)].clone(),
                        team_b: teams[rotated(shift, n - 1 - offset)].clone(),
                    })
                    .collect(),
            })
            .collect();
        Self { matchdays }
    }

    pub fn matchdays(&self) -> &[Matchday<T>] {
        &self.matchdays
    }

    /// The return round: same matchdays in the same order, sides swapped.
    pub fn reversed(&self) -> Self {
        Self {
            matchdays: self
                .matchdays
                .iter()
                .map(|matchday| Matchday {
                    fixtures: matchday.fixtures.iter().map(Fixture::reversed).collect(),
                })
                .collect(),
        }
    }
}

/// A double round robin: a round followed by its return round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Season<T> {
    first_round: Round<T>,
    second_round: Round<T>,
}

impl<T: Clone> Season<T> {
    /// Fails for an odd number of teams. Pad the roster first.
    pub fn new(teams: &[T]) -> Result<Self, ConfigurationError> {
        if teams.len() % 2 != 0 {
            return Err(ConfigurationError::OddRoster { count: teams.len() });
        }
        let first_round = Round::new(teams);
        let second_round = first_round.reversed();
        Ok(Self {
            first_round,
            second_round,
        })
    }
}

impl<T> Season<T> {
    pub fn first_round(&self) -> &Round<T> {
        &self.first_round
    }

    pub fn second_round(&self) -> &Round<T> {
        &self.second_round
    }

    /// All matchdays in the order they are played.
    pub fn matchdays(&self) -> impl Iterator<Item = &Matchday<T>> {
        self.first_round
            .matchdays
            .iter()
            .chain(self.second_round.matchdays.iter())
    }

    /// The number of matchdays.
    pub fn len(&self) -> usize {
        self.first_round.matchdays.len() + self.second_round.matchdays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
