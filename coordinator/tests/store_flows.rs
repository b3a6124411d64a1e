//! End-to-end store flows against the nullable ledger, notifier, storage and
//! clock: registration -> proof lookup -> email, upload -> candidate write,
//! and vote casting with its local gates.

use std::sync::Arc;
use std::time::Duration;

use ballot_adapters::LedgerOperation;
use ballot_coordinator::{
    Collaborators, CoordinatorError, ElectionBucket, ElectionStore, NotificationDispatcher,
    Operation, OperationStatus, VoteSession, VoteSessionError, VoteStatus,
};
use ballot_nullables::{NullClock, NullLedger, NullNotifier, NullStorage};
use ballot_types::{
    Candidate, Clock, CandidateHash, CandidateRegistration, Election, ElectionId, IndexedElection,
    NationalId, NewElection, ProofHash, SymbolFile, Timestamp, VoterRegistration,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    store: ElectionStore,
    dispatcher: NotificationDispatcher,
    ledger: Arc<NullLedger>,
    notifier: Arc<NullNotifier>,
    storage: Arc<NullStorage>,
    clock: Arc<NullClock>,
}

fn harness_with(ledger: NullLedger, notifier: NullNotifier, storage: NullStorage) -> Harness {
    let ledger = Arc::new(ledger);
    let notifier = Arc::new(notifier);
    let storage = Arc::new(storage);
    let clock = Arc::new(NullClock::new(1500));
    let (store, dispatcher) = ElectionStore::new(
        Collaborators {
            ledger: ledger.clone(),
            notifier: notifier.clone(),
            storage: storage.clone(),
            clock: clock.clone(),
        },
        "Decentralized Voting System",
    );
    Harness {
        store,
        dispatcher,
        ledger,
        notifier,
        storage,
        clock,
    }
}

fn harness(elections: Vec<Election>) -> Harness {
    harness_with(
        NullLedger::with_elections(elections),
        NullNotifier::new(),
        NullStorage::new(),
    )
}

fn election(name: &str, start: u64, end: u64, candidates: Vec<Candidate>) -> Election {
    Election {
        name: name.to_string(),
        start_time: Timestamp::from_millis(start),
        end_time: Timestamp::from_millis(end),
        candidates,
        hash: String::new(),
    }
}

fn candidate(name: &str, hash: &str) -> Candidate {
    Candidate {
        name: name.to_string(),
        national_id: NationalId::new(7),
        email: String::new(),
        election_id: Some(ElectionId::new(0)),
        symbol_name: "tree".to_string(),
        symbol_image_uri: String::new(),
        hash: CandidateHash::new(hash),
        votes: 0,
    }
}

fn bob() -> VoterRegistration {
    VoterRegistration {
        election_id: ElectionId::new(0),
        name: "Bob".to_string(),
        national_id: NationalId::new(123),
        email: "b@x.com".to_string(),
    }
}

fn carol() -> VoterRegistration {
    VoterRegistration {
        election_id: ElectionId::new(0),
        name: "Carol".to_string(),
        national_id: NationalId::new(456),
        email: "c@x.com".to_string(),
    }
}

fn alice_candidate() -> CandidateRegistration {
    CandidateRegistration {
        election_id: ElectionId::new(0),
        name: "Alice".to_string(),
        national_id: NationalId::new(77),
        email: "a@x.com".to_string(),
        symbol_name: "lamp".to_string(),
    }
}

fn symbol() -> SymbolFile {
    SymbolFile::new("lamp.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

// ---------------------------------------------------------------------------
// Elections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refresh_classifies_loaded_elections() {
    let h = harness(vec![
        election("A", 1000, 2000, Vec::new()),
        election("B", 100, 200, Vec::new()),
        election("C", 5000, 6000, Vec::new()),
    ]);

    h.store.refresh_elections().await;
    let state = h.store.snapshot();

    assert!(!state.elections_loading);
    assert_eq!(state.elections.len(), 3);
    assert_eq!(state.classified.bucket_of(ElectionId::new(0)), Some(ElectionBucket::Ongoing));
    assert_eq!(state.classified.bucket_of(ElectionId::new(1)), Some(ElectionBucket::Previous));
    assert_eq!(state.classified.bucket_of(ElectionId::new(2)), Some(ElectionBucket::Upcoming));
    assert_eq!(state.classified_at, Timestamp::from_millis(1500));
}

#[tokio::test]
async fn reclassify_uses_a_fresh_clock_reading() {
    let h = harness(vec![election("A", 1000, 2000, Vec::new())]);
    h.store.refresh_elections().await;

    h.clock.set(2001);
    h.store.reclassify();

    let state = h.store.snapshot();
    assert_eq!(state.classified.bucket_of(ElectionId::new(0)), Some(ElectionBucket::Previous));
    assert_eq!(h.ledger.reads_for(LedgerOperation::GetElections).len(), 1);
}

#[tokio::test]
async fn stalled_election_read_keeps_loading_flag_set() {
    let h = harness(vec![election("A", 1000, 2000, Vec::new())]);
    h.ledger.stall(LedgerOperation::GetElections);

    let refresh = h.store.refresh_elections();
    let timed_out = tokio::time::timeout(Duration::from_millis(50), refresh).await;

    assert!(timed_out.is_err());
    assert!(h.store.snapshot().elections_loading);
}

#[tokio::test]
async fn failed_election_read_keeps_previous_list() {
    let h = harness(vec![election("A", 1000, 2000, Vec::new())]);
    h.store.refresh_elections().await;

    h.ledger.reject(LedgerOperation::GetElections);
    h.store.refresh_elections().await;

    let state = h.store.snapshot();
    assert!(!state.elections_loading);
    assert_eq!(state.elections.len(), 1);
}

#[tokio::test]
async fn initialize_ballot_writes_and_refreshes() {
    let h = harness(Vec::new());
    let updates = h.store.subscribe();

    let status = h
        .store
        .initialize_ballot(NewElection::new(
            "Board",
            Timestamp::from_millis(2000),
            Timestamp::from_millis(3000),
        ))
        .await;

    assert_eq!(status, OperationStatus::Succeeded);
    let writes = h.ledger.writes_for(LedgerOperation::CreateElection);
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].args[3], serde_json::json!(1500u64));

    let state = h.store.snapshot();
    assert_eq!(state.ballot, OperationStatus::Succeeded);
    assert_eq!(state.classified.upcoming.len(), 1);
    assert!(updates.has_changed().unwrap());
}

#[tokio::test]
async fn stalled_ballot_write_keeps_status_pending() {
    let h = harness(Vec::new());
    h.ledger.stall(LedgerOperation::CreateElection);

    let create = h.store.initialize_ballot(NewElection::new(
        "Board",
        Timestamp::from_millis(2000),
        Timestamp::from_millis(3000),
    ));
    let timed_out = tokio::time::timeout(Duration::from_millis(50), create).await;

    assert!(timed_out.is_err());
    assert_eq!(h.store.snapshot().ballot, OperationStatus::Pending);
    assert_eq!(h.ledger.writes_for(LedgerOperation::CreateElection).len(), 1);
}

#[tokio::test]
async fn invalid_schedule_never_reaches_the_ledger() {
    let h = harness(Vec::new());

    let status = h
        .store
        .initialize_ballot(NewElection::new(
            "Board",
            Timestamp::from_millis(3000),
            Timestamp::from_millis(3000),
        ))
        .await;

    assert_eq!(status, OperationStatus::Failed);
    assert_eq!(h.ledger.write_count(), 0);
}

#[tokio::test]
async fn rejected_ballot_is_absorbed_as_failed() {
    let h = harness(Vec::new());
    h.ledger.reject(LedgerOperation::CreateElection);

    let status = h
        .store
        .initialize_ballot(NewElection::new(
            "Board",
            Timestamp::from_millis(2000),
            Timestamp::from_millis(3000),
        ))
        .await;

    assert_eq!(status, OperationStatus::Failed);
    assert_eq!(h.store.snapshot().ballot, OperationStatus::Failed);
    assert!(h.ledger.reads_for(LedgerOperation::GetElections).is_empty());

    h.store.acknowledge(Operation::InitializeBallot);
    assert_eq!(h.store.snapshot().ballot, OperationStatus::Idle);
}

// ---------------------------------------------------------------------------
// Voters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn registered_voter_gets_exactly_one_proof_email() {
    let mut h = harness(vec![election("A", 1000, 2000, Vec::new())]);
    h.ledger.set_voter_hash(0, 123, "0xABC");

    let status = h.store.register_voter(bob()).await;
    assert_eq!(status, OperationStatus::Succeeded);
    assert_eq!(h.store.snapshot().voter_email, OperationStatus::Pending);

    assert_eq!(h.dispatcher.drain().await, 1);

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, "b@x.com");
    assert_eq!(sent[0].to_name, "Bob");
    assert_eq!(sent[0].message, "0xABC");
    assert_eq!(sent[0].from_name, "Decentralized Voting System");
    assert_eq!(h.ledger.registered_voters(), vec![(0, 123)]);

    let state = h.store.snapshot();
    assert_eq!(state.voter_email, OperationStatus::Succeeded);
    assert_eq!(state.voter_details, Some(bob()));
}

#[tokio::test]
async fn repeated_lookup_does_not_resend_the_same_proof() {
    let mut h = harness(Vec::new());
    h.ledger.set_voter_hash(0, 123, "0xABC");

    h.store.register_voter(bob()).await;
    h.store.resolve_voter_proof().await;
    h.store.resolve_voter_proof().await;
    h.dispatcher.drain().await;

    assert_eq!(h.notifier.sent().len(), 1);
    assert_eq!(h.store.snapshot().voter_email, OperationStatus::Succeeded);
}

#[tokio::test]
async fn unassigned_proof_sends_nothing() {
    let mut h = harness(Vec::new());
    h.ledger.set_voter_hash(0, 123, "0x0000000000000000000000000000000000000000");

    let status = h.store.register_voter(bob()).await;
    h.dispatcher.drain().await;

    assert_eq!(status, OperationStatus::Succeeded);
    assert!(h.notifier.sent().is_empty());
    assert_eq!(h.store.snapshot().voter_email, OperationStatus::Idle);
}

#[tokio::test]
async fn next_registration_starts_with_idle_email_status() {
    let mut h = harness(Vec::new());
    h.ledger.set_voter_hash(0, 123, "0xABC");

    h.store.register_voter(bob()).await;
    h.dispatcher.drain().await;
    assert_eq!(h.store.snapshot().voter_email, OperationStatus::Succeeded);

    let status = h.store.register_voter(carol()).await;
    h.dispatcher.drain().await;

    let state = h.store.snapshot();
    assert_eq!(status, OperationStatus::Succeeded);
    assert_eq!(state.voter_details, Some(carol()));
    assert_eq!(state.voter_email, OperationStatus::Idle);
    assert_eq!(h.notifier.sent().len(), 1);
}

#[tokio::test]
async fn stalled_voter_write_keeps_registration_pending() {
    let h = harness(Vec::new());
    h.ledger.stall(LedgerOperation::RegisterVoter);

    let register = h.store.register_voter(bob());
    let timed_out = tokio::time::timeout(Duration::from_millis(50), register).await;

    assert!(timed_out.is_err());
    let state = h.store.snapshot();
    assert_eq!(state.voter_registration, OperationStatus::Pending);
    assert_eq!(state.voter_email, OperationStatus::Idle);
}

#[tokio::test]
async fn notification_failure_leaves_registration_succeeded() {
    let mut h = harness_with(NullLedger::new(), NullNotifier::failing(), NullStorage::new());
    h.ledger.set_voter_hash(0, 123, "0xABC");

    let status = h.store.register_voter(bob()).await;
    h.dispatcher.drain().await;

    let state = h.store.snapshot();
    assert_eq!(status, OperationStatus::Succeeded);
    assert_eq!(state.voter_registration, OperationStatus::Succeeded);
    assert_eq!(state.voter_email, OperationStatus::Failed);
}

#[tokio::test]
async fn failed_registration_skips_lookup() {
    let h = harness(Vec::new());
    h.ledger.reject(LedgerOperation::RegisterVoter);

    let status = h.store.register_voter(bob()).await;

    assert_eq!(status, OperationStatus::Failed);
    assert!(h.ledger.reads_for(LedgerOperation::GetVoterHash).is_empty());
    assert!(h.store.snapshot().voter_details.is_none());
}

#[tokio::test]
async fn dispatcher_task_delivers_until_store_is_dropped() {
    let h = harness(Vec::new());
    h.ledger.set_voter_hash(0, 123, "0xABC");
    let notifier = h.notifier.clone();
    let worker = tokio::spawn(h.dispatcher.run());

    h.store.register_voter(bob()).await;
    drop(h.store);
    worker.await.unwrap();

    assert_eq!(notifier.sent().len(), 1);
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn candidate_write_carries_the_uploaded_uri() {
    let h = harness_with(
        NullLedger::with_elections(vec![election("A", 1000, 2000, Vec::new())]),
        NullNotifier::new(),
        NullStorage::returning(vec!["ipfs://lamp".to_string(), "ipfs://ignored".to_string()]),
    );

    let status = h.store.register_candidate(alice_candidate(), symbol()).await;

    assert_eq!(status, OperationStatus::Succeeded);
    assert_eq!(h.storage.uploads()[0].len(), 1);
    let writes = h.ledger.writes_for(LedgerOperation::RegisterCandidate);
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].args[4], serde_json::json!("ipfs://lamp"));
    assert_eq!(h.store.snapshot().elections[0].candidates.len(), 1);
}

#[tokio::test]
async fn stalled_candidate_write_keeps_status_pending() {
    let h = harness(vec![election("A", 1000, 2000, Vec::new())]);
    h.ledger.stall(LedgerOperation::RegisterCandidate);

    let register = h.store.register_candidate(alice_candidate(), symbol());
    let timed_out = tokio::time::timeout(Duration::from_millis(50), register).await;

    assert!(timed_out.is_err());
    assert_eq!(h.storage.upload_count(), 1);
    assert_eq!(h.store.snapshot().candidate_registration, OperationStatus::Pending);
}

#[tokio::test]
async fn upload_failure_means_zero_candidate_writes() {
    let h = harness_with(
        NullLedger::with_elections(vec![election("A", 1000, 2000, Vec::new())]),
        NullNotifier::new(),
        NullStorage::failing(),
    );

    let status = h.store.register_candidate(alice_candidate(), symbol()).await;

    assert_eq!(status, OperationStatus::Failed);
    assert_eq!(h.storage.upload_count(), 1);
    assert!(h.ledger.writes_for(LedgerOperation::RegisterCandidate).is_empty());
    assert_eq!(h.store.snapshot().candidate_registration, OperationStatus::Failed);
}

#[tokio::test]
async fn empty_uri_list_means_zero_candidate_writes() {
    let h = harness_with(NullLedger::new(), NullNotifier::new(), NullStorage::returning(Vec::new()));

    let status = h.store.register_candidate(alice_candidate(), symbol()).await;

    assert_eq!(status, OperationStatus::Failed);
    assert_eq!(h.ledger.write_count(), 0);
}

#[tokio::test]
async fn candidate_lookup_scans_local_list_only() {
    let h = harness(vec![election(
        "A",
        1000,
        2000,
        vec![candidate("X", "0x1"), candidate("Y", "0x2")],
    )]);
    h.store.refresh_elections().await;
    let reads_before = h.ledger.calls().len();

    let found = h.store.get_election_candidate(ElectionId::new(0));
    let missing = h.store.get_election_candidate(ElectionId::new(9));

    assert_eq!(found.len(), 2);
    assert!(missing.is_empty());
    assert!(h.store.snapshot().selected_candidates.is_empty());
    assert_eq!(h.ledger.calls().len(), reads_before);
}

// ---------------------------------------------------------------------------
// Voting
// ---------------------------------------------------------------------------

async fn voting_harness() -> Harness {
    let h = harness(vec![election(
        "A",
        1000,
        2000,
        vec![candidate("X", "0x1"), candidate("Y", "0x2")],
    )]);
    h.store.refresh_elections().await;
    h
}

#[tokio::test]
async fn blank_proof_aborts_without_state_change() {
    let h = voting_harness().await;

    let outcome = h
        .store
        .give_vote(ElectionId::new(0), ProofHash::new(""), CandidateHash::from("0xFEED"))
        .await;

    assert!(matches!(outcome, Err(CoordinatorError::EmptyProof)));
    assert_eq!(h.store.snapshot().vote, VoteStatus::Idle);
    assert!(h.ledger.writes_for(LedgerOperation::GiveVote).is_empty());
}

#[tokio::test]
async fn blank_proof_after_success_is_an_error_not_a_stale_success() {
    let h = voting_harness().await;
    let first = h
        .store
        .give_vote(ElectionId::new(0), ProofHash::new("0xABC"), CandidateHash::from("0x1"))
        .await
        .unwrap();
    assert_eq!(first, VoteStatus::Succeeded);
    let writes_before = h.ledger.write_count();

    let outcome = h
        .store
        .give_vote(ElectionId::new(0), ProofHash::new("  "), CandidateHash::from("0x2"))
        .await;

    assert!(matches!(outcome, Err(CoordinatorError::EmptyProof)));
    assert_eq!(h.store.snapshot().vote, VoteStatus::Succeeded);
    assert_eq!(h.ledger.write_count(), writes_before);
}

#[tokio::test]
async fn vote_outside_window_is_refused_locally() {
    let h = voting_harness().await;
    h.clock.set(2000);

    let status = h
        .store
        .give_vote(ElectionId::new(0), ProofHash::new("0xABC"), CandidateHash::from("0x1"))
        .await
        .unwrap();

    assert_eq!(status, VoteStatus::Failed);
    assert!(h.ledger.writes_for(LedgerOperation::GiveVote).is_empty());
}

#[tokio::test]
async fn vote_for_unknown_election_is_refused_locally() {
    let h = voting_harness().await;

    let status = h
        .store
        .give_vote(ElectionId::new(4), ProofHash::new("0xABC"), CandidateHash::from("0x1"))
        .await
        .unwrap();

    assert_eq!(status, VoteStatus::Failed);
    assert_eq!(h.ledger.write_count(), 0);
}

#[tokio::test]
async fn vote_never_stays_in_progress() {
    let h = voting_harness().await;

    let ok = h
        .store
        .give_vote(ElectionId::new(0), ProofHash::new("0xABC"), CandidateHash::from("0x1"))
        .await
        .unwrap();
    assert_eq!(ok, VoteStatus::Succeeded);
    assert_eq!(h.store.snapshot().elections[0].candidates[0].votes, 1);

    h.store.acknowledge(Operation::GiveVote);
    assert_eq!(h.store.snapshot().vote, VoteStatus::Idle);

    h.ledger.reject(LedgerOperation::GiveVote);
    let failed = h
        .store
        .give_vote(ElectionId::new(0), ProofHash::new("0xABC"), CandidateHash::from("0x1"))
        .await
        .unwrap();
    assert_eq!(failed, VoteStatus::Failed);
    assert!(!h.store.snapshot().vote.is_in_progress());
}

#[tokio::test]
async fn stalled_vote_write_shows_in_progress() {
    let h = voting_harness().await;
    h.ledger.stall(LedgerOperation::GiveVote);

    let vote = h
        .store
        .give_vote(ElectionId::new(0), ProofHash::new("0xABC"), CandidateHash::from("0x1"));
    let timed_out = tokio::time::timeout(Duration::from_millis(50), vote).await;

    assert!(timed_out.is_err());
    assert_eq!(h.store.snapshot().vote, VoteStatus::InProgress);
    assert_eq!(h.ledger.writes_for(LedgerOperation::GiveVote).len(), 1);
}

#[tokio::test]
async fn session_submits_single_selected_candidate() {
    let h = voting_harness().await;
    let state = h.store.snapshot();
    let selected = IndexedElection::new(ElectionId::new(0), state.elections[0].clone());
    h.store.set_selected_election(selected.clone());
    let now = h.clock.now();

    let mut session = VoteSession::new(selected);
    session.set_input_hash("0xABC");
    session.verify(now).unwrap();
    session.select_candidate(CandidateHash::from("0x2"), now).unwrap();
    session.select_candidate(CandidateHash::from("0x1"), now).unwrap();

    let status = session.submit(&h.store, now).await.unwrap();

    assert_eq!(status, VoteStatus::Succeeded);
    assert!(!session.dialog_open());
    let writes = h.ledger.writes_for(LedgerOperation::GiveVote);
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].args[2], serde_json::json!("0x1"));
    // refresh after the vote re-derives the selected election's candidates
    assert_eq!(h.store.snapshot().selected_candidates[0].votes, 1);

    session.acknowledge_result(&h.store);
    assert_eq!(h.store.snapshot().vote, VoteStatus::Idle);
}

#[tokio::test]
async fn session_without_candidate_sends_nothing() {
    let h = voting_harness().await;
    let selected = IndexedElection::new(ElectionId::new(0), h.store.snapshot().elections[0].clone());
    let now = Timestamp::from_millis(1500);

    let mut session = VoteSession::new(selected);
    session.set_input_hash("0xABC");

    assert!(session.submit(&h.store, now).await.is_err());
    assert_eq!(h.ledger.write_count(), 0);
    assert_eq!(h.store.snapshot().vote, VoteStatus::Idle);
}

#[tokio::test]
async fn session_refuses_selection_and_submit_before_verify() {
    let h = voting_harness().await;
    let selected = IndexedElection::new(ElectionId::new(0), h.store.snapshot().elections[0].clone());
    let now = h.clock.now();

    let mut session = VoteSession::new(selected);
    session.set_input_hash("0xABC");

    assert_eq!(
        session.select_candidate(CandidateHash::from("0x1"), now),
        Err(VoteSessionError::NotVerified)
    );
    assert_eq!(
        session.submit(&h.store, now).await,
        Err(VoteSessionError::NotVerified)
    );
    assert_eq!(h.ledger.write_count(), 0);
    assert_eq!(h.store.snapshot().vote, VoteStatus::Idle);
}
