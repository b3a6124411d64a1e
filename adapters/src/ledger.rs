//! Ledger client: the election contract behind a narrow read/write interface.

use std::sync::Arc;

use async_trait::async_trait;
use ballot_types::{
    CandidateHash, CandidateRegistration, Election, ElectionId, NationalId, NewElection,
    ProofHash, Timestamp, VoterRegistration,
};
use serde_json::{json, Value};

use crate::error::AdapterError;

/// Contract operations the coordinator uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgerOperation {
    GetElections,
    GetVoterHash,
    CreateElection,
    RegisterVoter,
    RegisterCandidate,
    GiveVote,
}

impl LedgerOperation {
    /// Contract method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetElections => "getElections",
            Self::GetVoterHash => "getVoterHash",
            Self::CreateElection => "createElection",
            Self::RegisterVoter => "registerVoter",
            Self::RegisterCandidate => "registerCandidate",
            Self::GiveVote => "giveVote",
        }
    }
}

/// Read queries and write transactions keyed by operation name and
/// positional arguments.
///
/// A write resolves once the transaction has landed; a rejected or reverted
/// transaction is an error.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn read(&self, operation: &str, args: Vec<Value>) -> Result<Value, AdapterError>;

    async fn write(&self, operation: &str, args: Vec<Value>) -> Result<Value, AdapterError>;
}

/// Typed view of the election contract over any [`LedgerClient`].
#[derive(Clone)]
pub struct ElectionContract {
    client: Arc<dyn LedgerClient>,
}

impl ElectionContract {
    pub fn new(client: Arc<dyn LedgerClient>) -> Self {
        Self { client }
    }

    /// Every election the contract knows, in ledger order.
    pub async fn get_elections(&self) -> Result<Vec<Election>, AdapterError> {
        let raw = self
            .client
            .read(LedgerOperation::GetElections.as_str(), Vec::new())
            .await?;
        if raw.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(raw).map_err(|e| AdapterError::decode("getElections", e))
    }

    /// The proof value assigned to a voter, if the ledger has issued one.
    ///
    /// Null, empty, and all-zero values mean "not assigned yet".
    pub async fn get_voter_hash(
        &self,
        election_id: ElectionId,
        national_id: NationalId,
    ) -> Result<Option<ProofHash>, AdapterError> {
        let raw = self
            .client
            .read(
                LedgerOperation::GetVoterHash.as_str(),
                vec![json!(election_id.as_u64()), json!(national_id.as_u64())],
            )
            .await?;
        match raw {
            Value::Null => Ok(None),
            Value::String(s) => Ok(defined_proof(&s)),
            other => Err(AdapterError::decode(
                "getVoterHash",
                format!("expected a string, got {other}"),
            )),
        }
    }

    pub async fn create_election(
        &self,
        election: &NewElection,
        submitted_at: Timestamp,
    ) -> Result<Value, AdapterError> {
        self.write(
            LedgerOperation::CreateElection,
            vec![
                json!(election.name),
                json!(election.start_time.as_millis()),
                json!(election.end_time.as_millis()),
                json!(submitted_at.as_millis()),
            ],
        )
        .await
    }

    /// The voter's email is deliberately not part of the transaction.
    pub async fn register_voter(
        &self,
        voter: &VoterRegistration,
        submitted_at: Timestamp,
    ) -> Result<Value, AdapterError> {
        self.write(
            LedgerOperation::RegisterVoter,
            vec![
                json!(voter.election_id.as_u64()),
                json!(voter.name),
                json!(voter.national_id.as_u64()),
                json!(submitted_at.as_millis()),
            ],
        )
        .await
    }

    pub async fn register_candidate(
        &self,
        candidate: &CandidateRegistration,
        symbol_uri: &str,
        submitted_at: Timestamp,
    ) -> Result<Value, AdapterError> {
        self.write(
            LedgerOperation::RegisterCandidate,
            vec![
                json!(candidate.election_id.as_u64()),
                json!(candidate.name),
                json!(candidate.national_id.as_u64()),
                json!(candidate.symbol_name),
                json!(symbol_uri),
                json!(submitted_at.as_millis()),
            ],
        )
        .await
    }

    pub async fn give_vote(
        &self,
        election_id: ElectionId,
        proof: &ProofHash,
        candidate: &CandidateHash,
        submitted_at: Timestamp,
    ) -> Result<Value, AdapterError> {
        self.write(
            LedgerOperation::GiveVote,
            vec![
                json!(election_id.as_u64()),
                json!(proof.as_str()),
                json!(candidate.as_str()),
                json!(submitted_at.as_millis()),
            ],
        )
        .await
    }

    async fn write(
        &self,
        operation: LedgerOperation,
        args: Vec<Value>,
    ) -> Result<Value, AdapterError> {
        let receipt = self.client.write(operation.as_str(), args).await?;
        tracing::debug!(operation = operation.as_str(), %receipt, "ledger write landed");
        Ok(receipt)
    }
}

fn defined_proof(raw: &str) -> Option<ProofHash> {
    let proof = ProofHash::new(raw);
    let digits = proof
        .as_str()
        .strip_prefix("0x")
        .unwrap_or(proof.as_str());
    if proof.is_blank() || digits.bytes().all(|b| b == b'0') {
        None
    } else {
        Some(proof)
    }
}

// ── JsonRpcLedgerClient ─────────────────────────────────────────────────

/// HTTP client for a contract gateway speaking JSON-RPC.
///
/// Every call posts `{"action": "read"|"write", "contract", "method", "args"}`
/// and returns the `result` field; an `error` field is a rejection.
#[derive(Clone)]
pub struct JsonRpcLedgerClient {
    http: reqwest::Client,
    endpoint: String,
    contract_address: String,
}

impl JsonRpcLedgerClient {
    /// Create a client targeting `endpoint` for the contract at `contract_address`.
    pub fn new(
        endpoint: impl Into<String>,
        contract_address: impl Into<String>,
    ) -> Result<Self, AdapterError> {
        Ok(Self {
            http: crate::http::build_client()?,
            endpoint: endpoint.into(),
            contract_address: contract_address.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    fn request_body(&self, action: &str, method: &str, args: Vec<Value>) -> Value {
        json!({
            "action": action,
            "contract": self.contract_address,
            "method": method,
            "args": args,
        })
    }

    async fn rpc_call(
        &self,
        action: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, AdapterError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&self.request_body(action, method, args))
            .send()
            .await
            .map_err(|e| AdapterError::Transport(e.to_string()))?;

        crate::http::check_status("ledger gateway", &response)?;

        let json: Value = response
            .json()
            .await
            .map_err(|e| AdapterError::decode("ledger gateway", e))?;

        if let Some(err) = json.get("error").filter(|e| !e.is_null()) {
            let reason = err
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string());
            return Err(AdapterError::Rejected {
                operation: method.to_string(),
                reason,
            });
        }

        Ok(json.get("result").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    async fn read(&self, operation: &str, args: Vec<Value>) -> Result<Value, AdapterError> {
        self.rpc_call("read", operation, args).await
    }

    async fn write(&self, operation: &str, args: Vec<Value>) -> Result<Value, AdapterError> {
        self.rpc_call("write", operation, args).await
    }
}
