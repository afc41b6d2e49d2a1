//! Centralized constants for the payments reconciliation report
//!
//! Wallet-specific values are loaded from config.toml. The defaults below are
//! only used when no config file is present.

// =============================================================================
// Default Wallet
// =============================================================================

/// Rain bot wallet address (used when config.toml is absent)
pub const DEFAULT_WALLET_ADDRESS: &str = "TRTLv1m7FFnTybogRLyaaJDmmGVwae98j68L28AsZ6VxBLgHdjotEhu6HoYd4BpAiuSXLVqxbXEybHykFoH5Vr1h3HacVLo73p1";

/// Name of the default wallet entry
pub const DEFAULT_WALLET_NAME: &str = "rain";

/// Title printed in the report headers for the default wallet
pub const DEFAULT_WALLET_TITLE: &str = "@FranklinRain";

// =============================================================================
// TurtleCoin Constants
// =============================================================================

/// Currency ticker printed after every amount
pub const DEFAULT_TICKER: &str = "TRTL";

/// Atomic units are hundredths of a TRTL
pub const DEFAULT_DECIMALS: u32 = 2;

/// Prefix every TurtleCoin address starts with
pub const ADDRESS_PREFIX: &str = "TRTL";

/// Length of a standard TurtleCoin address
pub const ADDRESS_LENGTH: usize = 99;

/// walletd transfer type code for change returned to the sending wallet
pub const CHANGE_TRANSFER_TYPE: i64 = 2;

// =============================================================================
// File Names
// =============================================================================

/// Default config file path
pub const CONFIG_FILE: &str = "config.toml";

// =============================================================================
// Report Layout
// =============================================================================

/// Width of the '=' and '-' rules framing each section
pub const RULE_WIDTH: usize = 71;

/// Label column width for top-level lines
pub const LABEL_WIDTH: usize = 40;

/// Indentation of sub-lines (label column shrinks by the same amount)
pub const INDENT: usize = 4;

/// Right-aligned amount column width
pub const AMOUNT_WIDTH: usize = 20;
