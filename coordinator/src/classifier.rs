//! Temporal classification of elections.
//!
//! An election is `Previous` once `now > end_time`, `Upcoming` while
//! `now < start_time`, and `Ongoing` otherwise. Both boundary instants
//! count as ongoing.

use ballot_types::{Election, ElectionId, IndexedElection, Timestamp};
use serde::{Deserialize, Serialize};

/// Which temporal bucket an election falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElectionBucket {
    Previous,
    Ongoing,
    Upcoming,
}

impl ElectionBucket {
    pub fn of(election: &Election, now: Timestamp) -> Self {
        if now > election.end_time {
            Self::Previous
        } else if now < election.start_time {
            Self::Upcoming
        } else {
            Self::Ongoing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Ongoing => "ongoing",
            Self::Upcoming => "upcoming",
        }
    }
}

/// Elections partitioned by bucket, each list in ledger order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedElections {
    pub previous: Vec<IndexedElection>,
    pub ongoing: Vec<IndexedElection>,
    pub upcoming: Vec<IndexedElection>,
}

impl ClassifiedElections {
    pub fn bucket(&self, bucket: ElectionBucket) -> &[IndexedElection] {
        match bucket {
            ElectionBucket::Previous => &self.previous,
            ElectionBucket::Ongoing => &self.ongoing,
            ElectionBucket::Upcoming => &self.upcoming,
        }
    }

    /// The bucket holding `election_id`, if it was classified at all.
    pub fn bucket_of(&self, election_id: ElectionId) -> Option<ElectionBucket> {
        [
            ElectionBucket::Previous,
            ElectionBucket::Ongoing,
            ElectionBucket::Upcoming,
        ]
        .into_iter()
        .find(|b| self.bucket(*b).iter().any(|e| e.election_id == election_id))
    }

    pub fn len(&self) -> usize {
        self.previous.len() + self.ongoing.len() + self.upcoming.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `elections` around `now` in a single pass.
pub fn classify(elections: &[Election], now: Timestamp) -> ClassifiedElections {
    let mut classified = ClassifiedElections::default();
    for (index, election) in elections.iter().enumerate() {
        let entry = IndexedElection::new(ElectionId::from(index), election.clone());
        match ElectionBucket::of(election, now) {
            ElectionBucket::Previous => classified.previous.push(entry),
            ElectionBucket::Ongoing => classified.ongoing.push(entry),
            ElectionBucket::Upcoming => classified.upcoming.push(entry),
        }
    }
    classified
}
