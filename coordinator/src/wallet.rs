//! Wallet connection state and election-authority detection.

use ballot_types::WalletAddress;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// The user's wallet session.
///
/// A connected wallet whose address matches the configured authority address
/// (case-insensitively) may run the authority operations.
#[derive(Clone, Debug, Default)]
pub struct WalletConnection {
    status: ConnectionStatus,
    address: Option<WalletAddress>,
    admin: Option<WalletAddress>,
}

impl WalletConnection {
    pub fn new(admin: Option<WalletAddress>) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            address: None,
            admin,
        }
    }

    /// Mark a connection attempt as started.
    pub fn begin_connect(&mut self) {
        self.status = ConnectionStatus::Connecting;
    }

    pub fn connect(&mut self, address: WalletAddress) {
        tracing::info!(address = address.as_str(), "wallet connected");
        self.status = ConnectionStatus::Connected;
        self.address = Some(address);
    }

    pub fn disconnect(&mut self) {
        if self.address.take().is_some() {
            tracing::info!("wallet disconnected");
        }
        self.status = ConnectionStatus::Disconnected;
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn address(&self) -> Option<&WalletAddress> {
        self.address.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected && self.address.is_some()
    }

    pub fn is_admin(&self) -> bool {
        match (&self.address, &self.admin) {
            (Some(address), Some(admin)) => self.is_connected() && address == admin,
            _ => false,
        }
    }
}
