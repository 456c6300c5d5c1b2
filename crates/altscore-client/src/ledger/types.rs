use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone)]
pub struct LedgerFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnType {
    Income,
    Expense,
}

impl TxnType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnStatus {
    Cleared,
    Pending,
}

impl TxnStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cleared => "cleared",
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cleared" => Some(Self::Cleared),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// One ledger transaction, immutable once imported. One user's full history
/// is the scoring snapshot; the analyzer never mutates it.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub txn_id: String,
    pub posted_at: NaiveDate,
    pub merchant: String,
    pub amount: f64,
    pub txn_type: TxnType,
    pub category: String,
    pub status: TxnStatus,
}

impl Transaction {
    pub fn abs_amount(&self) -> f64 {
        self.amount.abs()
    }

    /// Calendar-month grouping key, e.g. `2026-03`.
    pub fn month_key(&self) -> String {
        format!(
            "{:04}-{:02}",
            self.posted_at.year(),
            self.posted_at.month()
        )
    }

    pub fn is_income(&self) -> bool {
        self.txn_type == TxnType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.txn_type == TxnType::Expense
    }
}
