//! Nullable ledger: an in-memory election contract that records every call.

use async_trait::async_trait;
use ballot_adapters::{AdapterError, LedgerClient, LedgerOperation};
use ballot_types::{Candidate, CandidateHash, Election, ElectionId, NationalId, Timestamp};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Whether a recorded call was a query or a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallKind {
    Read,
    Write,
}

/// One call made against the [`NullLedger`].
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerCall {
    pub kind: CallKind,
    pub operation: String,
    pub args: Vec<Value>,
}

/// A test ledger that simulates the election contract in memory.
///
/// Writes mutate the simulated contract (`createElection` appends an
/// election, `registerCandidate` appends a candidate, `giveVote` bumps a
/// tally). Individual operations can be made to reject or to stall forever.
pub struct NullLedger {
    elections: Mutex<Vec<Election>>,
    voter_hashes: Mutex<HashMap<(u64, u64), String>>,
    registered_voters: Mutex<Vec<(u64, u64)>>,
    rejected: Mutex<HashSet<String>>,
    stalled: Mutex<HashSet<String>>,
    calls: Mutex<Vec<LedgerCall>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            elections: Mutex::new(Vec::new()),
            voter_hashes: Mutex::new(HashMap::new()),
            registered_voters: Mutex::new(Vec::new()),
            rejected: Mutex::new(HashSet::new()),
            stalled: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_elections(elections: Vec<Election>) -> Self {
        let ledger = Self::new();
        *ledger.elections.lock().unwrap() = elections;
        ledger
    }

    /// Replace the simulated election list.
    pub fn set_elections(&self, elections: Vec<Election>) {
        *self.elections.lock().unwrap() = elections;
    }

    pub fn elections(&self) -> Vec<Election> {
        self.elections.lock().unwrap().clone()
    }

    /// Make `getVoterHash(election_id, national_id)` answer `proof`.
    pub fn set_voter_hash(&self, election_id: u64, national_id: u64, proof: &str) {
        self.voter_hashes
            .lock()
            .unwrap()
            .insert((election_id, national_id), proof.to_string());
    }

    /// Make every call to `operation` fail with a rejection.
    pub fn reject(&self, operation: LedgerOperation) {
        self.rejected
            .lock()
            .unwrap()
            .insert(operation.as_str().to_string());
    }

    /// Let `operation` succeed again.
    pub fn accept(&self, operation: LedgerOperation) {
        self.rejected.lock().unwrap().remove(operation.as_str());
    }

    /// Make every call to `operation` hang forever.
    pub fn stall(&self, operation: LedgerOperation) {
        self.stalled
            .lock()
            .unwrap()
            .insert(operation.as_str().to_string());
    }

    pub fn registered_voters(&self) -> Vec<(u64, u64)> {
        self.registered_voters.lock().unwrap().clone()
    }

    /// All calls in the order they were made (for assertions).
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes_for(&self, operation: LedgerOperation) -> Vec<LedgerCall> {
        self.calls_matching(CallKind::Write, operation)
    }

    pub fn reads_for(&self, operation: LedgerOperation) -> Vec<LedgerCall> {
        self.calls_matching(CallKind::Read, operation)
    }

    pub fn write_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.kind == CallKind::Write)
            .count()
    }

    fn calls_matching(&self, kind: CallKind, operation: LedgerOperation) -> Vec<LedgerCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.kind == kind && c.operation == operation.as_str())
            .cloned()
            .collect()
    }

    async fn enter(&self, kind: CallKind, operation: &str, args: &[Value]) -> Result<(), AdapterError> {
        self.calls.lock().unwrap().push(LedgerCall {
            kind,
            operation: operation.to_string(),
            args: args.to_vec(),
        });
        let stalled = self.stalled.lock().unwrap().contains(operation);
        if stalled {
            std::future::pending::<()>().await;
        }
        if self.rejected.lock().unwrap().contains(operation) {
            return Err(rejected(operation, "rejected by null ledger"));
        }
        Ok(())
    }

    fn apply_write(&self, operation: &str, args: &[Value]) -> Result<Value, AdapterError> {
        match operation {
            "createElection" => {
                let mut elections = self.elections.lock().unwrap();
                let index = elections.len();
                elections.push(Election {
                    name: arg_str(operation, args, 0)?,
                    start_time: Timestamp::from_millis(arg_u64(operation, args, 1)?),
                    end_time: Timestamp::from_millis(arg_u64(operation, args, 2)?),
                    candidates: Vec::new(),
                    hash: format!("0xe{index}"),
                });
                Ok(Value::from(index as u64))
            }
            "registerVoter" => {
                let key = (arg_u64(operation, args, 0)?, arg_u64(operation, args, 2)?);
                self.registered_voters.lock().unwrap().push(key);
                Ok(Value::Null)
            }
            "registerCandidate" => {
                let election_id = arg_u64(operation, args, 0)?;
                let mut elections = self.elections.lock().unwrap();
                let next = elections.iter().map(|e| e.candidates.len()).sum::<usize>() + 1;
                let election = elections
                    .get_mut(election_id as usize)
                    .ok_or_else(|| rejected(operation, "unknown election"))?;
                let hash = CandidateHash::new(format!("0x{next}"));
                election.candidates.push(Candidate {
                    name: arg_str(operation, args, 1)?,
                    national_id: NationalId::new(arg_u64(operation, args, 2)?),
                    email: String::new(),
                    election_id: Some(ElectionId::new(election_id)),
                    symbol_name: arg_str(operation, args, 3)?,
                    symbol_image_uri: arg_str(operation, args, 4)?,
                    hash: hash.clone(),
                    votes: 0,
                });
                Ok(Value::from(hash.as_str()))
            }
            "giveVote" => {
                let election_id = arg_u64(operation, args, 0)?;
                let candidate = CandidateHash::new(arg_str(operation, args, 2)?);
                let mut elections = self.elections.lock().unwrap();
                let target = elections
                    .get_mut(election_id as usize)
                    .and_then(|e| e.candidates.iter_mut().find(|c| c.hash == candidate))
                    .ok_or_else(|| rejected(operation, "unknown candidate"))?;
                target.votes += 1;
                Ok(Value::Null)
            }
            other => Err(rejected(other, "unknown operation")),
        }
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for NullLedger {
    async fn read(&self, operation: &str, args: Vec<Value>) -> Result<Value, AdapterError> {
        self.enter(CallKind::Read, operation, &args).await?;
        match operation {
            "getElections" => {
                let elections = self.elections.lock().unwrap();
                serde_json::to_value(&*elections)
                    .map_err(|e| rejected(operation, &e.to_string()))
            }
            "getVoterHash" => {
                let key = (arg_u64(operation, &args, 0)?, arg_u64(operation, &args, 1)?);
                Ok(self
                    .voter_hashes
                    .lock()
                    .unwrap()
                    .get(&key)
                    .map(|proof| Value::from(proof.as_str()))
                    .unwrap_or(Value::Null))
            }
            other => Err(rejected(other, "unknown operation")),
        }
    }

    async fn write(&self, operation: &str, args: Vec<Value>) -> Result<Value, AdapterError> {
        self.enter(CallKind::Write, operation, &args).await?;
        self.apply_write(operation, &args)
    }
}

fn rejected(operation: &str, reason: &str) -> AdapterError {
    AdapterError::Rejected {
        operation: operation.to_string(),
        reason: reason.to_string(),
    }
}

fn arg_u64(operation: &str, args: &[Value], index: usize) -> Result<u64, AdapterError> {
    args.get(index)
        .and_then(Value::as_u64)
        .ok_or_else(|| rejected(operation, &format!("argument {index} is not an integer")))
}

fn arg_str(operation: &str, args: &[Value], index: usize) -> Result<String, AdapterError> {
    args.get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| rejected(operation, &format!("argument {index} is not a string")))
}
