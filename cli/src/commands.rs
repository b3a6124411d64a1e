//! Subcommands of the `ballot` binary.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use ballot_coordinator::{
    ElectionBucket, ElectionStore, OperationStatus, StoreState, VoteSession, VoteStatus,
    VoteSubmission, WalletConnection,
};
use ballot_types::{
    CandidateRegistration, ElectionId, IndexedElection, NationalId, NewElection, SymbolFile,
    Timestamp, VoterRegistration,
};
use ballot_utils::format_until;

#[derive(clap::Subcommand)]
pub enum Command {
    /// List previous, ongoing and upcoming elections.
    Elections,

    /// Create a new election (authority only).
    #[command(name = "init-ballot")]
    InitBallot {
        #[arg(long)]
        name: String,
        /// Voting opens at this instant (epoch milliseconds).
        #[arg(long)]
        start: u64,
        /// Voting closes at this instant (epoch milliseconds).
        #[arg(long)]
        end: u64,
    },

    /// Register a voter and email them their proof value (authority only).
    #[command(name = "register-voter")]
    RegisterVoter {
        #[arg(long)]
        election_id: ElectionId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        national_id: NationalId,
        #[arg(long)]
        email: String,
    },

    /// Upload a symbol image and register a candidate (authority only).
    #[command(name = "register-candidate")]
    RegisterCandidate {
        #[arg(long)]
        election_id: ElectionId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        national_id: NationalId,
        #[arg(long)]
        email: String,
        #[arg(long)]
        symbol_name: String,
        /// Image file for the candidate's symbol.
        #[arg(long)]
        symbol: PathBuf,
    },

    /// Cast a vote with a proof value.
    Vote {
        #[arg(long)]
        election_id: String,
        #[arg(long)]
        proof: String,
        /// Hash of the chosen candidate.
        #[arg(long)]
        candidate: String,
    },
}

impl Command {
    fn needs_authority(&self) -> bool {
        matches!(
            self,
            Self::InitBallot { .. } | Self::RegisterVoter { .. } | Self::RegisterCandidate { .. }
        )
    }
}

pub async fn run(
    command: Command,
    store: &ElectionStore,
    wallet: &WalletConnection,
) -> anyhow::Result<()> {
    if command.needs_authority() && !wallet.is_admin() {
        bail!("this command requires the election authority wallet (see --wallet)");
    }

    match command {
        Command::Elections => {
            store.refresh_elections().await;
            print_elections(&store.snapshot(), Timestamp::now());
            Ok(())
        }
        Command::InitBallot { name, start, end } => {
            let election =
                NewElection::new(name, Timestamp::from_millis(start), Timestamp::from_millis(end));
            let status = store.initialize_ballot(election).await;
            expect_success("create election", status)
        }
        Command::RegisterVoter {
            election_id,
            name,
            national_id,
            email,
        } => {
            let voter = VoterRegistration {
                election_id,
                name,
                national_id,
                email,
            };
            let status = store.register_voter(voter).await;
            expect_success("register voter", status)?;
            match store.snapshot().voter_email {
                OperationStatus::Idle => println!("Proof not issued yet; no email sent."),
                OperationStatus::Failed => println!("Proof email could not be sent."),
                _ => println!("Proof email queued."),
            }
            Ok(())
        }
        Command::RegisterCandidate {
            election_id,
            name,
            national_id,
            email,
            symbol_name,
            symbol,
        } => {
            let file = read_symbol(&symbol)?;
            let candidate = CandidateRegistration {
                election_id,
                name,
                national_id,
                email,
                symbol_name,
            };
            let status = store.register_candidate(candidate, file).await;
            expect_success("register candidate", status)
        }
        Command::Vote {
            election_id,
            proof,
            candidate,
        } => vote(store, VoteSubmission::parse(&election_id, &proof, &candidate)?).await,
    }
}

async fn vote(store: &ElectionStore, submission: VoteSubmission) -> anyhow::Result<()> {
    store.refresh_elections().await;
    let state = store.snapshot();
    let Some(election) = state.election(submission.election_id.index()).cloned() else {
        bail!("election {} not found", submission.election_id);
    };
    let election = IndexedElection::new(submission.election_id, election);
    store.set_selected_election(election.clone());
    let candidates = store.get_election_candidate(submission.election_id);
    if !candidates.iter().any(|c| c.hash == submission.candidate) {
        bail!("candidate {} is not standing in this election", submission.candidate);
    }

    let now = Timestamp::now();
    let mut session = VoteSession::new(election);
    session.set_input_hash(submission.proof.as_str());
    session.verify(now)?;
    session.select_candidate(submission.candidate, now)?;

    match session.submit(store, now).await? {
        VoteStatus::Succeeded => {
            println!("Vote recorded.");
            if let Some(notice) = session.pending_result_notice(Timestamp::now()) {
                println!("{notice}");
            }
            Ok(())
        }
        other => bail!("vote was not recorded ({other:?})"),
    }
}

fn expect_success(what: &str, status: OperationStatus) -> anyhow::Result<()> {
    match status {
        OperationStatus::Succeeded => {
            println!("{what}: done");
            Ok(())
        }
        other => bail!("{what} failed ({other:?}); see log for details"),
    }
}

fn read_symbol(path: &Path) -> anyhow::Result<SymbolFile> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read symbol image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "symbol".to_string());
    let content_type = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(SymbolFile::new(file_name, content_type, bytes))
}

fn print_elections(state: &StoreState, now: Timestamp) {
    for bucket in [
        ElectionBucket::Ongoing,
        ElectionBucket::Upcoming,
        ElectionBucket::Previous,
    ] {
        let elections = state.classified.bucket(bucket);
        println!("{} ({})", bucket.as_str(), elections.len());
        for entry in elections {
            let e = &entry.election;
            let when = match bucket {
                ElectionBucket::Ongoing => format_until(e.end_time, now)
                    .map(|t| format!("closes {t}"))
                    .unwrap_or_default(),
                ElectionBucket::Upcoming => format_until(e.start_time, now)
                    .map(|t| format!("opens {t}"))
                    .unwrap_or_default(),
                ElectionBucket::Previous => "closed".to_string(),
            };
            println!("  [{}] {} {}", entry.election_id, e.name, when);
            for c in &e.candidates {
                if e.has_ended(now) {
                    println!("      {} {} ({}) votes={}", c.hash, c.name, c.symbol_name, c.votes);
                } else {
                    println!("      {} {} ({})", c.hash, c.name, c.symbol_name);
                }
            }
        }
    }
}
