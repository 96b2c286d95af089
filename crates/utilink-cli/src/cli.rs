use clap::{Args, Parser, Subcommand};

/// Customer/account operations against the upstream enterprise system.
#[derive(Debug, Parser)]
#[command(name = "utilink", version, about)]
pub struct Cli {
    /// Standard upstream base URL.
    #[arg(long)]
    pub standard_base: String,

    /// Secure upstream base URL.
    #[arg(long)]
    pub secure_base: String,

    /// Authentication endpoint base URL.
    #[arg(long)]
    pub auth_base: String,

    /// Bearer token; falls back to the UTILINK_TOKEN environment variable.
    #[arg(long)]
    pub token: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mailing address operations.
    Address {
        #[command(subcommand)]
        command: AddressCommand,
    },
    /// List email contacts.
    Emails {
        /// Contract account number.
        account: String,
    },
    /// List phone contacts.
    Phones {
        /// Contract account number.
        account: String,
    },
    /// List identification documents.
    Identifiers {
        /// Contract account number.
        account: String,
    },
    /// List account relationships.
    Relationships {
        /// Contract account number.
        account: String,
    },
    /// Payment arrangement operations.
    PaymentArrangement {
        #[command(subcommand)]
        command: PaymentCommand,
    },
    /// Create a move-in contract item.
    MoveIn {
        /// Contract account number.
        account: String,
        /// Premise to start supply at.
        #[arg(long)]
        premise: String,
        /// Product to supply (upstream default when omitted).
        #[arg(long)]
        product: Option<String>,
        /// Move-in date, RFC3339 UTC (e.g. 2026-09-01T00:00:00Z).
        #[arg(long)]
        date: String,
    },
    /// Record a move-out date on a contract.
    MoveOut {
        /// Contract account number.
        account: String,
        /// Contract to end supply on.
        #[arg(long)]
        contract: String,
        /// Move-out date, RFC3339 UTC.
        #[arg(long)]
        date: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AddressCommand {
    /// Fetch the standard mailing address and write it through to the
    /// local cache of record.
    Get {
        /// Contract account number.
        account: String,
    },
    /// Read the locally cached mailing address without an upstream call.
    Cached {
        /// Contract account number.
        account: String,
    },
    /// Replace the mailing address.
    Update {
        /// Contract account number.
        account: String,
        /// Upstream address id to replace.
        #[arg(long)]
        address_id: String,
        #[command(flatten)]
        address: AddressArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum PaymentCommand {
    /// Fetch the current payment arrangement.
    Get {
        /// Contract account number.
        account: String,
    },
    /// Spread the open balance over installments.
    Create {
        /// Contract account number.
        account: String,
        /// Number of installments.
        #[arg(long)]
        installments: i64,
        /// First due date, RFC3339 UTC.
        #[arg(long)]
        first_due: String,
    },
}

#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Street line, free form (PO Box or house number + street).
    #[arg(long)]
    pub line1: String,
    /// Supplementary line.
    #[arg(long)]
    pub line2: Option<String>,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long)]
    pub postal_code: String,
    /// ISO country code.
    #[arg(long)]
    pub country: String,
}
