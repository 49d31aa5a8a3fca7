/// A finance value that would break its own invariants.
///
/// Returned by the validated constructors in
/// [`value`](crate::interpreter::value); no instance that failed one of these
/// checks is ever built.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueError {
    /// A rate outside `[0, 1]`.
    RateOutOfRange(f64),
    /// A percentage outside `[0, 100]`.
    PercentageOutOfRange(f64),
    /// A portfolio whose asset and weight lists differ in length.
    PortfolioShape {
        /// Number of assets.
        assets:  usize,
        /// Number of weights.
        weights: usize,
    },
    /// A portfolio weight below zero.
    NegativeWeight {
        /// The asset the weight belongs to.
        asset:  String,
        /// The offending weight.
        weight: f64,
    },
    /// Portfolio weights that do not add up to one.
    WeightSum(f64),
    /// A table column whose length differs from the first column.
    RaggedTable {
        /// The column name.
        column:   String,
        /// Length of the first column.
        expected: usize,
        /// Length of this column.
        found:    usize,
    },
    /// A table column name used twice.
    DuplicateColumn(String),
    /// A currency code outside the supported set.
    UnknownCurrency(String),
    /// A time unit other than days, months or years.
    UnknownTimeUnit(String),
    /// A money amount or ledger amount that is not a finite number.
    NonFinite(f64),
    /// A ledger debit or credit below zero.
    NegativeAmount(f64),
    /// A ledger entry with neither a debit nor a credit.
    EmptyEntry,
}

impl std::fmt::Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateOutOfRange(value) => write!(f, "Rate must be between 0 and 1, got {value}"),
            Self::PercentageOutOfRange(value) => {
                write!(f, "Percentage must be between 0 and 100, got {value}")
            },
            Self::PortfolioShape { assets, weights } => write!(f,
                                                               "Portfolio has {assets} asset(s) but {weights} weight(s)"),
            Self::NegativeWeight { asset, weight } => {
                write!(f, "Weight of '{asset}' must not be negative, got {weight}")
            },
            Self::WeightSum(sum) => write!(f, "Portfolio weights must sum to 1, got {sum}"),
            Self::RaggedTable { column,
                                expected,
                                found, } => write!(f,
                                                   "Column '{column}' has {found} row(s), expected {expected}"),
            Self::DuplicateColumn(name) => write!(f, "Column '{name}' is defined twice"),
            Self::UnknownCurrency(code) => write!(f, "Unknown currency '{code}'"),
            Self::UnknownTimeUnit(unit) => write!(f, "Unknown time unit '{unit}'"),
            Self::NonFinite(value) => write!(f, "Amount must be finite, got {value}"),
            Self::NegativeAmount(value) => write!(f, "Amount must not be negative, got {value}"),
            Self::EmptyEntry => write!(f, "Ledger entry needs a debit or a credit"),
        }
    }
}

impl std::error::Error for ValueError {}
