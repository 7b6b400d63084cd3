//! Accessors for MARC JSON records (<http://format.gbv.de/marc/json>).
//!
//! A MARC JSON row is `[tag, ind1, ind2, code, value, ...]`. Control fields
//! carry their content under the pseudo subfield code `_`:
//!
//! ```text
//! ["001", null, null, "_", "1234567890"]
//! ["924", "0", " ", "a", "987654321", "b", "DE-14"]
//! ```
//!
//! Holdings (924) are read from all rows by default. An occurrence scope
//! compares against element 1 of the row, the first indicator.

use crate::accessor::{RecordAccessor, ValueQuery};
use crate::config::HoldingsScope;
use crate::derive::{
    cross_reference, indices_of, iso_date, iso_datetime, parse_date,
    parse_datetime_with_fallback,
};
use crate::error::Result;
use crate::record::Record;
use crate::report::Reporter;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Schema name used in reported conditions.
pub const NAME: &str = "MarcJson";

/// Subfield code of control field content.
pub const CONTROL_CODE: &str = "_";

/// Regular format of field 005, e.g. `20230615093000.0`.
pub const TRANSACTION_FORMAT: &str = "%Y%m%d%H%M%S.0";

/// Format of field 005 values whose time part was lost, e.g.
/// `20230615222222:2`. Parsed as midnight.
pub const TRANSACTION_FALLBACK_FORMAT: &str = "%Y%m%d222222:2";

/// Format of the date entered on file (008/00-05).
pub const DATE_ENTERED_FORMAT: &str = "%y%m%d";

/// Read-only view of one MARC JSON record.
#[derive(Debug, Clone)]
pub struct MarcJson {
    accessor: RecordAccessor,
    scope: HoldingsScope,
}

impl MarcJson {
    /// Wrap a record, reporting conditions through `tracing`.
    #[must_use]
    pub fn new(record: Record) -> Self {
        Self::from_accessor(RecordAccessor::new(NAME, record))
    }

    /// Wrap a record with an explicit reporter.
    #[must_use]
    pub fn with_reporter(record: Record, reporter: Arc<dyn Reporter>) -> Self {
        Self::from_accessor(RecordAccessor::with_reporter(NAME, record, reporter))
    }

    /// Decode and wrap a MARC JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a record.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(Record::from_json_str(json)?))
    }

    fn from_accessor(accessor: RecordAccessor) -> Self {
        MarcJson {
            accessor,
            scope: HoldingsScope::All,
        }
    }

    /// Select which 924 rows the holdings getters read.
    #[must_use]
    pub fn with_holdings_scope(mut self, scope: HoldingsScope) -> Self {
        self.scope = scope;
        self
    }

    /// Current holdings scope.
    #[must_use]
    pub fn holdings_scope(&self) -> &HoldingsScope {
        &self.scope
    }

    /// The underlying generic accessor.
    #[must_use]
    pub fn accessor(&self) -> &RecordAccessor {
        &self.accessor
    }

    fn control_field(&self, tag: &str) -> Option<String> {
        self.accessor
            .get_str(tag, CONTROL_CODE, &ValueQuery::unique())
    }

    /// 001: control number.
    #[must_use]
    pub fn ppn(&self) -> Option<String> {
        self.control_field("001")
    }

    /// 005: date and time of latest transaction.
    #[must_use]
    pub fn latest_trans(&self) -> Option<String> {
        self.control_field("005")
    }

    /// 005 as a timestamp.
    ///
    /// Values in the regular `YYYYMMDDHHMMSS.0` form are parsed first; values
    /// ending in `222222:2` are accepted as midnight of their day.
    ///
    /// # Errors
    ///
    /// Returns an error if the value matches neither form.
    pub fn latest_trans_datetime(&self) -> Result<Option<NaiveDateTime>> {
        self.latest_trans()
            .map(|value| {
                parse_datetime_with_fallback(
                    &value,
                    TRANSACTION_FORMAT,
                    TRANSACTION_FALLBACK_FORMAT,
                )
            })
            .transpose()
    }

    /// 005 in ISO 8601 form.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be parsed.
    pub fn latest_trans_iso(&self) -> Result<Option<String>> {
        Ok(self.latest_trans_datetime()?.as_ref().map(iso_datetime))
    }

    /// 008: fixed-length data elements.
    #[must_use]
    pub fn data_elements(&self) -> Option<String> {
        self.control_field("008")
    }

    /// 008/00-05: date entered on file, e.g. `230615`.
    #[must_use]
    pub fn date_entered(&self) -> Option<String> {
        let elements = self.data_elements()?;
        if elements.chars().count() > 5 {
            Some(elements.chars().take(6).collect())
        } else {
            None
        }
    }

    /// 008/00-05 as a calendar date.
    ///
    /// # Errors
    ///
    /// Returns an error if the positions are not a `YYMMDD` date.
    pub fn date_entered_date(&self) -> Result<Option<NaiveDate>> {
        self.date_entered()
            .map(|date| parse_date(&date, DATE_ENTERED_FORMAT))
            .transpose()
    }

    /// 008/00-05 in ISO 8601 form.
    ///
    /// # Errors
    ///
    /// Returns an error if the positions are not a `YYMMDD` date.
    pub fn date_entered_iso(&self) -> Result<Option<String>> {
        Ok(self.date_entered_date()?.as_ref().map(iso_date))
    }

    fn holdings(&self, code: &str) -> Option<Vec<String>> {
        let query = ValueQuery::multiple()
            .repeat(false)
            .occurrence(self.scope.as_occurrence());
        self.accessor.get_list("924", code, &query)
    }

    /// 924 $a: local record identifiers (IDN) of the holdings.
    #[must_use]
    pub fn holdings_idn(&self) -> Option<Vec<String>> {
        self.holdings("a")
    }

    /// 924 $b: ISIL of each holding library.
    #[must_use]
    pub fn holdings_isil(&self) -> Option<Vec<String>> {
        self.holdings("b")
    }

    /// Positions of `isil` in [`holdings_isil`](Self::holdings_isil).
    #[must_use]
    pub fn holdings_isil_index(&self, isil: &str) -> Option<Vec<usize>> {
        indices_of(&self.holdings_isil()?, isil)
    }

    /// IDNs of the holdings of `isil`.
    #[must_use]
    pub fn holdings_from_isil(&self, isil: &str) -> Option<Vec<String>> {
        let isils = self.holdings_isil()?;
        indices_of(&isils, isil)?;
        let idns = self.holdings_idn()?;
        cross_reference(&self.accessor, &isils, &idns, isil, "holding ISILs and PPNs")
    }
}
