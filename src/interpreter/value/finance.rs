use crate::{
    error::ValueError,
    interpreter::value::{
        core::{Binding, format_binding, format_element},
        format_fixed, format_number,
    },
};

/// Tolerance for the portfolio weight sum.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Currencies a `Money` value may be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Usd,
    Php,
    Eur,
    Gbp,
    Jpy,
    Aud,
    Cad,
    Chf,
    Cny,
}

impl Currency {
    const ALL: [Self; 9] = [Self::Usd,
                            Self::Php,
                            Self::Eur,
                            Self::Gbp,
                            Self::Jpy,
                            Self::Aud,
                            Self::Cad,
                            Self::Chf,
                            Self::Cny];

    /// The ISO code, e.g. `"USD"`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Php => "PHP",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Aud => "AUD",
            Self::Cad => "CAD",
            Self::Chf => "CHF",
            Self::Cny => "CNY",
        }
    }

    /// Parses a currency code, ignoring case.
    ///
    /// # Errors
    /// Returns `ValueError::UnknownCurrency` for codes outside the supported
    /// set.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::value::finance::Currency;
    ///
    /// assert_eq!(Currency::parse("eur").unwrap(), Currency::Eur);
    /// assert!(Currency::parse("XYZ").is_err());
    /// ```
    pub fn parse(code: &str) -> Result<Self, ValueError> {
        Self::ALL.into_iter()
                 .find(|currency| currency.code().eq_ignore_ascii_case(code))
                 .ok_or_else(|| ValueError::UnknownCurrency(code.to_string()))
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An amount of a currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Money {
    amount:   f64,
    currency: Currency,
}

impl Money {
    /// # Errors
    /// Returns `ValueError::NonFinite` for NaN or infinite amounts.
    pub fn new(amount: f64, currency: Currency) -> Result<Self, ValueError> {
        if !amount.is_finite() {
            return Err(ValueError::NonFinite(amount));
        }
        Ok(Self { amount, currency })
    }

    #[must_use]
    pub const fn amount(&self) -> f64 {
        self.amount
    }

    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.currency, format_fixed(self.amount, 2))
    }
}

/// A fraction in `[0, 1]`, e.g. `0.05` for five percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rate(f64);

impl Rate {
    /// Builds a rate, rejecting values outside `[0, 1]`.
    ///
    /// # Errors
    /// Returns `ValueError::RateOutOfRange`; the value is never clamped.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::value::finance::Rate;
    ///
    /// assert_eq!(Rate::new(0.125).unwrap().to_string(), "12.50%");
    /// assert!(Rate::new(1.5).is_err());
    /// assert!(Rate::new(-0.01).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValueError::RateOutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// The same quantity on the `[0, 100]` scale.
    #[must_use]
    pub fn to_percentage(self) -> Percentage {
        Percentage((self.0 * 100.0).clamp(0.0, 100.0))
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", format_fixed(self.0 * 100.0, 2))
    }
}

/// A value in `[0, 100]`, e.g. `5` for five percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentage(f64);

impl Percentage {
    /// Builds a percentage, rejecting values outside `[0, 100]`.
    ///
    /// # Errors
    /// Returns `ValueError::PercentageOutOfRange`.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::value::finance::Percentage;
    ///
    /// let p = Percentage::new(12.5).unwrap();
    /// assert_eq!(p.to_string(), "12.50%");
    /// assert_eq!(p.to_rate().value(), 0.125);
    /// assert!(Percentage::new(100.5).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, ValueError> {
        if !(0.0..=100.0).contains(&value) {
            return Err(ValueError::PercentageOutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// The same quantity as a fraction.
    #[must_use]
    pub fn to_rate(self) -> Rate {
        Rate((self.0 / 100.0).clamp(0.0, 1.0))
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", format_fixed(self.0, 2))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Days,
    Months,
    Years,
}

impl TimeUnit {
    /// Parses `day(s)`, `month(s)` or `year(s)`, ignoring case.
    ///
    /// # Errors
    /// Returns `ValueError::UnknownTimeUnit` for anything else.
    pub fn parse(unit: &str) -> Result<Self, ValueError> {
        match unit.to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(Self::Days),
            "month" | "months" => Ok(Self::Months),
            "year" | "years" => Ok(Self::Years),
            _ => Err(ValueError::UnknownTimeUnit(unit.to_string())),
        }
    }

    /// Average length of one unit in days.
    #[must_use]
    pub const fn days(self) -> f64 {
        match self {
            Self::Days => 1.0,
            Self::Months => 30.44,
            Self::Years => 365.25,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Months => "months",
            Self::Years => "years",
        }
    }
}

/// A length of time such as `3 years`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimePeriod {
    pub value: f64,
    pub unit:  TimeUnit,
}

impl TimePeriod {
    /// Length in days, counting a month as 30.44 days and a year as 365.25.
    #[must_use]
    pub fn to_days(self) -> f64 {
        self.value * self.unit.days()
    }

    #[must_use]
    pub fn to_years(self) -> f64 {
        self.to_days() / TimeUnit::Years.days()
    }
}

impl std::fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", format_number(self.value), self.unit.name())
    }
}

/// Assets with weights that are non-negative and sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    assets:  Vec<Binding>,
    weights: Vec<f64>,
}

impl Portfolio {
    /// Builds a portfolio after checking its shape and weights.
    ///
    /// # Errors
    /// - `ValueError::PortfolioShape` if the lists differ in length.
    /// - `ValueError::NegativeWeight` for a weight below zero.
    /// - `ValueError::WeightSum` if the weights are more than
    ///   [`WEIGHT_TOLERANCE`] away from one.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::value::{core::Value, finance::Portfolio};
    ///
    /// let assets = vec![Some(Value::from("AAPL")), Some(Value::from("BND"))];
    /// assert!(Portfolio::new(assets.clone(), vec![0.6, 0.4]).is_ok());
    /// assert!(Portfolio::new(assets.clone(), vec![0.6, 0.5]).is_err());
    /// assert!(Portfolio::new(assets, vec![1.0]).is_err());
    /// ```
    pub fn new(assets: Vec<Binding>, weights: Vec<f64>) -> Result<Self, ValueError> {
        if assets.len() != weights.len() {
            return Err(ValueError::PortfolioShape { assets:  assets.len(),
                                                    weights: weights.len(), });
        }
        for (asset, weight) in assets.iter().zip(&weights) {
            if weight.is_nan() || *weight < 0.0 {
                return Err(ValueError::NegativeWeight { asset:  format_binding(asset),
                                                        weight: *weight, });
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() >= WEIGHT_TOLERANCE {
            return Err(ValueError::WeightSum(sum));
        }
        Ok(Self { assets, weights })
    }

    #[must_use]
    pub fn assets(&self) -> &[Binding] {
        &self.assets
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl std::fmt::Display for Portfolio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PORTFOLIO(assets={}, weights={})", self.assets.len(), self.weights.len())
    }
}

/// Named columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<(String, Vec<Binding>)>,
}

impl Table {
    /// Builds a table, keeping columns in the order given.
    ///
    /// # Errors
    /// - `ValueError::RaggedTable` if a column's length differs from the
    ///   first column's.
    /// - `ValueError::DuplicateColumn` if a name appears twice.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::value::{core::Value, finance::Table};
    ///
    /// let n = |x: f64| Some(Value::Number(x));
    /// let ok = Table::new(vec![("a".into(), vec![n(1.0), n(2.0)]), ("b".into(), vec![n(3.0), n(4.0)])]);
    /// assert_eq!(ok.unwrap().row_count(), 2);
    ///
    /// let ragged = Table::new(vec![("a".into(), vec![n(1.0)]), ("b".into(), vec![])]);
    /// assert!(ragged.is_err());
    /// ```
    pub fn new(columns: Vec<(String, Vec<Binding>)>) -> Result<Self, ValueError> {
        if let Some((_, first)) = columns.first() {
            let expected = first.len();
            for (index, (name, cells)) in columns.iter().enumerate() {
                if columns[..index].iter().any(|(other, _)| other == name) {
                    return Err(ValueError::DuplicateColumn(name.clone()));
                }
                if cells.len() != expected {
                    return Err(ValueError::RaggedTable { column: name.clone(),
                                                         expected,
                                                         found: cells.len() });
                }
            }
        }
        Ok(Self { columns })
    }

    /// Column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Binding]> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, cells)| cells.as_slice())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, cells)| cells.len())
    }

    /// The cells of row `index`, one per column.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Vec<Binding>> {
        (index < self.row_count()).then(|| self.columns.iter().map(|(_, cells)| cells[index].clone()).collect())
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TABLE({})", self.names().collect::<Vec<_>>().join(", "))?;
        for index in 0..self.row_count() {
            let cells: Vec<String> = self.columns
                                         .iter()
                                         .map(|(_, cells)| format_element(&cells[index]))
                                         .collect();
            write!(f, "\n  [{}]", cells.join(", "))?;
        }
        Ok(())
    }
}

/// Flows in period order, the first at period 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Cashflow {
    pub flows: Vec<f64>,
}

impl std::fmt::Display for Cashflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CASHFLOW({} periods)", self.flows.len())
    }
}

/// One debit/credit record.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    date:        String,
    debit:       Option<f64>,
    credit:      Option<f64>,
    description: String,
}

impl LedgerEntry {
    /// Builds an entry with at least one non-negative amount.
    ///
    /// # Errors
    /// - `ValueError::EmptyEntry` if both amounts are missing.
    /// - `ValueError::NegativeAmount` or `ValueError::NonFinite` for a bad
    ///   amount.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::value::finance::LedgerEntry;
    ///
    /// let entry = LedgerEntry::new("2024-01-31", Some(100.0), None, "Rent").unwrap();
    /// assert_eq!(entry.to_string(), "LedgerEntry(2024-01-31: Rent)");
    /// assert!(LedgerEntry::new("2024-01-31", None, None, "Nothing").is_err());
    /// assert!(LedgerEntry::new("2024-01-31", Some(-5.0), None, "Refund").is_err());
    /// ```
    pub fn new(date: impl Into<String>,
               debit: Option<f64>,
               credit: Option<f64>,
               description: impl Into<String>)
               -> Result<Self, ValueError> {
        if debit.is_none() && credit.is_none() {
            return Err(ValueError::EmptyEntry);
        }
        for amount in debit.iter().chain(&credit) {
            if !amount.is_finite() {
                return Err(ValueError::NonFinite(*amount));
            }
            if *amount < 0.0 {
                return Err(ValueError::NegativeAmount(*amount));
            }
        }
        Ok(Self { date: date.into(),
                  debit,
                  credit,
                  description: description.into() })
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[must_use]
    pub const fn debit(&self) -> Option<f64> {
        self.debit
    }

    #[must_use]
    pub const fn credit(&self) -> Option<f64> {
        self.credit
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LedgerEntry({}: {})", self.date, self.description)
    }
}

/// Entries in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    pub entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// A copy of this ledger with `entry` appended.
    #[must_use]
    pub fn with_entry(&self, entry: LedgerEntry) -> Self {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Self { entries }
    }

    /// Total debits minus total credits.
    ///
    /// # Example
    /// ```
    /// use finlite::interpreter::value::finance::{Ledger, LedgerEntry};
    ///
    /// let ledger = Ledger::default().with_entry(LedgerEntry::new("2024-01-01", Some(100.0), None, "In").unwrap())
    ///                               .with_entry(LedgerEntry::new("2024-01-02", None, Some(30.0), "Out").unwrap());
    /// assert_eq!(ledger.balance(), 70.0);
    /// ```
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.entries
            .iter()
            .map(|entry| entry.debit.unwrap_or(0.0) - entry.credit.unwrap_or(0.0))
            .sum()
    }
}

impl std::fmt::Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LEDGER({} entries)", self.entries.len())
    }
}
