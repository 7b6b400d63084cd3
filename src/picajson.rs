//! Accessors for PICA JSON records (<http://format.gbv.de/pica/json>).
//!
//! A PICA JSON row is `[tag, occurrence, code, value, code, value, ...]`.
//! Title data (level 0) has a `null` occurrence, copy data (level 2) is
//! numbered by occurrence (`"01"`, `"02"`, ...). The holdings getters read
//! the rows selected by the accessor's [`HoldingsScope`], which defaults to
//! occurrence `01`.
//!
//! # Examples
//!
//! ```ignore
//! use unapi::picajson::PicaJson;
//!
//! let pica = PicaJson::from_json_str(&body)?;
//! println!("PPN: {:?}", pica.ppn());
//! println!("changed: {:?}", pica.latest_change_iso()?);
//! if let Some(epns) = pica.holdings_from_isil("DE-14") {
//!     println!("EPNs: {}", epns.join(", "));
//! }
//! ```

use crate::accessor::{RecordAccessor, ValueQuery};
use crate::config::HoldingsScope;
use crate::derive::{
    component, component_of, components, cross_reference, indices_of, iso_date, iso_datetime,
    parse_date, parse_dates, parse_datetime, parse_datetimes, zip_join,
};
use crate::error::Result;
use crate::record::Record;
use crate::report::Reporter;
use crate::subfield::Extracted;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Schema name used in reported conditions.
pub const NAME: &str = "PicaJson";

/// Format of dates such as `15-06-23`.
pub const DATE_FORMAT: &str = "%d-%m-%y";

/// Format of a date joined with a time such as `15-06-23 14:22:31.000`.
///
/// The fraction of a second is optional.
pub const DATETIME_FORMAT: &str = "%d-%m-%y %H:%M:%S%.f";

/// Occurrence read by the holdings getters unless configured otherwise.
pub const DEFAULT_HOLDINGS_OCCURRENCE: &str = "01";

/// Read-only view of one PICA JSON record.
#[derive(Debug, Clone)]
pub struct PicaJson {
    accessor: RecordAccessor,
    scope: HoldingsScope,
}

impl PicaJson {
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

    /// Decode and wrap a PICA JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a record.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(Record::from_json_str(json)?))
    }

    fn from_accessor(accessor: RecordAccessor) -> Self {
        PicaJson {
            accessor,
            scope: HoldingsScope::occurrence(DEFAULT_HOLDINGS_OCCURRENCE),
        }
    }

    /// Select which copy rows the holdings getters read.
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

    fn holdings_query(&self) -> ValueQuery {
        ValueQuery::multiple()
            .repeat(false)
            .occurrence(self.scope.as_occurrence())
    }

    // ------------------------------------------------------------------
    // Title data
    // ------------------------------------------------------------------

    /// 003@ $0: PICA production number (PPN).
    #[must_use]
    pub fn ppn(&self) -> Option<String> {
        self.accessor.get_str("003@", "0", &ValueQuery::unique())
    }

    /// 001A $0: source and date of first entry, e.g. `1999:15-06-23`.
    #[must_use]
    pub fn first_entry(&self) -> Option<String> {
        self.accessor.get_str("001A", "0", &ValueQuery::unique())
    }

    /// Source code part of [`first_entry`](Self::first_entry).
    #[must_use]
    pub fn first_entry_code(&self) -> Option<String> {
        let entry = self.first_entry()?;
        component_of(&self.accessor, &entry, 0).map(str::to_string)
    }

    /// Date part of [`first_entry`](Self::first_entry).
    #[must_use]
    pub fn first_entry_date(&self) -> Option<String> {
        let entry = self.first_entry()?;
        component_of(&self.accessor, &entry, 1).map(str::to_string)
    }

    /// Date of first entry as a calendar date.
    ///
    /// # Errors
    ///
    /// Returns an error if the date is not in `DD-MM-YY` form.
    pub fn first_entry_date_date(&self) -> Result<Option<NaiveDate>> {
        self.first_entry_date()
            .map(|date| parse_date(&date, DATE_FORMAT))
            .transpose()
    }

    /// Date of first entry in ISO 8601 form.
    ///
    /// # Errors
    ///
    /// Returns an error if the date is not in `DD-MM-YY` form.
    pub fn first_entry_date_iso(&self) -> Result<Option<String>> {
        Ok(self.first_entry_date_date()?.as_ref().map(iso_date))
    }

    /// 001B $0: source and date of the latest change.
    #[must_use]
    pub fn latest_change(&self) -> Option<String> {
        self.accessor
            .get_str("001B", "0", &ValueQuery::unique().repeat(false))
    }

    /// Source code part of [`latest_change`](Self::latest_change).
    #[must_use]
    pub fn latest_change_code(&self) -> Option<String> {
        let change = self.latest_change()?;
        component_of(&self.accessor, &change, 0).map(str::to_string)
    }

    /// Date part of [`latest_change`](Self::latest_change).
    #[must_use]
    pub fn latest_change_date(&self) -> Option<String> {
        let change = self.latest_change()?;
        component_of(&self.accessor, &change, 1).map(str::to_string)
    }

    /// 001B $t: time of the latest change, e.g. `14:22:31.000`.
    #[must_use]
    pub fn latest_change_time(&self) -> Option<String> {
        self.accessor
            .get_str("001B", "t", &ValueQuery::unique().repeat(false))
    }

    /// Date and time of the latest change joined by a space.
    #[must_use]
    pub fn latest_change_str(&self) -> Option<String> {
        let date = self.latest_change_date()?;
        let time = self.latest_change_time()?;
        Some(format!("{date} {time}"))
    }

    /// Timestamp of the latest change.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp is not in `DD-MM-YY HH:MM:SS.fff` form.
    pub fn latest_change_datetime(&self) -> Result<Option<NaiveDateTime>> {
        self.latest_change_str()
            .map(|s| parse_datetime(&s, DATETIME_FORMAT))
            .transpose()
    }

    /// Timestamp of the latest change in ISO 8601 form.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be parsed.
    pub fn latest_change_iso(&self) -> Result<Option<String>> {
        Ok(self.latest_change_datetime()?.as_ref().map(iso_datetime))
    }

    /// 045R $a: Regensburg Union Classification (RVK) notations.
    ///
    /// Returns a flat list, or a single `||` delimited string with `collapse`.
    #[must_use]
    pub fn rvk(&self, collapse: bool) -> Option<Extracted> {
        self.accessor.get_value(
            "045R",
            "a",
            &ValueQuery::multiple().repeat(false).collapse(collapse),
        )
    }

    // ------------------------------------------------------------------
    // Copy data
    // ------------------------------------------------------------------

    /// 203@ $0: EPNs of the copies.
    #[must_use]
    pub fn holdings_epn(&self) -> Option<Vec<String>> {
        self.accessor.get_list("203@", "0", &self.holdings_query())
    }

    /// 101@ $a: ILNs of the libraries holding copies.
    ///
    /// Level 1 rows carry no occurrence, so the holdings scope does not apply.
    #[must_use]
    pub fn holdings_ilns(&self) -> Option<Vec<String>> {
        self.accessor
            .get_list("101@", "a", &ValueQuery::multiple().repeat(false))
    }

    /// 209A $B: ISIL of each copy (set automatically for SWB libraries).
    #[must_use]
    pub fn holdings_isil(&self) -> Option<Vec<String>> {
        self.accessor.get_list("209A", "B", &self.holdings_query())
    }

    /// Number of ISILs in [`holdings_isil`](Self::holdings_isil).
    #[must_use]
    pub fn holdings_isil_count(&self) -> usize {
        self.holdings_isil().map_or(0, |codes| codes.len())
    }

    /// Positions of `isil` in [`holdings_isil`](Self::holdings_isil).
    #[must_use]
    pub fn holdings_isil_index(&self, isil: &str) -> Option<Vec<usize>> {
        indices_of(&self.holdings_isil()?, isil)
    }

    /// EPNs of the copies held by `isil`.
    #[must_use]
    pub fn holdings_from_isil(&self, isil: &str) -> Option<Vec<String>> {
        let codes = self.holdings_isil()?;
        indices_of(&codes, isil)?;
        let epns = self.holdings_epn()?;
        cross_reference(&self.accessor, &codes, &epns, isil, "holding ISILs and PPNs")
    }

    /// 201A $0: date of first entry of each copy.
    #[must_use]
    pub fn holdings_first_entry_date(&self) -> Option<Vec<String>> {
        self.accessor.get_list("201A", "0", &self.holdings_query())
    }

    /// Dates of first entry of the copies as calendar dates.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is not in `DD-MM-YY` form.
    pub fn holdings_first_entry_date_date(&self) -> Result<Option<Vec<NaiveDate>>> {
        self.holdings_first_entry_date()
            .map(|dates| parse_dates(&dates, DATE_FORMAT))
            .transpose()
    }

    /// Dates of first entry of the copies in ISO 8601 form.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is not in `DD-MM-YY` form.
    pub fn holdings_first_entry_date_iso(&self) -> Result<Option<Vec<String>>> {
        Ok(self
            .holdings_first_entry_date_date()?
            .map(|dates| dates.iter().map(iso_date).collect()))
    }

    /// 201B $0: date of the latest change of each copy.
    #[must_use]
    pub fn holdings_latest_change_date(&self) -> Option<Vec<String>> {
        self.accessor.get_list("201B", "0", &self.holdings_query())
    }

    /// 201B $t: time of the latest change of each copy.
    #[must_use]
    pub fn holdings_latest_change_time(&self) -> Option<Vec<String>> {
        self.accessor.get_list("201B", "t", &self.holdings_query())
    }

    /// Date and time of the latest change of each copy.
    ///
    /// The date and time lists must align; otherwise an error is reported.
    #[must_use]
    pub fn holdings_latest_change_str(&self) -> Option<Vec<String>> {
        let dates = self.holdings_latest_change_date()?;
        let times = self.holdings_latest_change_time()?;
        zip_join(
            &self.accessor,
            &dates,
            &times,
            "edit dates and times in holding data",
        )
    }

    /// Timestamps of the latest change of each copy.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be parsed.
    pub fn holdings_latest_change_datetime(&self) -> Result<Option<Vec<NaiveDateTime>>> {
        self.holdings_latest_change_str()
            .map(|values| parse_datetimes(&values, DATETIME_FORMAT))
            .transpose()
    }

    /// Timestamps of the latest change of each copy in ISO 8601 form.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be parsed.
    pub fn holdings_latest_change_iso(&self) -> Result<Option<Vec<String>>> {
        Ok(self
            .holdings_latest_change_datetime()?
            .map(|values| values.iter().map(iso_datetime).collect()))
    }

    /// Latest change of the copies held by `isil`.
    #[must_use]
    pub fn holdings_isil_latest_change_str(&self, isil: &str) -> Option<Vec<String>> {
        let codes = self.holdings_isil()?;
        indices_of(&codes, isil)?;
        let changes = self.holdings_latest_change_str()?;
        cross_reference(
            &self.accessor,
            &codes,
            &changes,
            isil,
            "holding ISILs and edit timestamps",
        )
    }

    /// Timestamps of the latest change of the copies held by `isil`.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be parsed.
    pub fn holdings_isil_latest_change_datetime(
        &self,
        isil: &str,
    ) -> Result<Option<Vec<NaiveDateTime>>> {
        self.holdings_isil_latest_change_str(isil)
            .map(|values| parse_datetimes(&values, DATETIME_FORMAT))
            .transpose()
    }

    /// ISO 8601 timestamps of the latest change of the copies held by `isil`.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be parsed.
    pub fn holdings_isil_latest_change_iso(&self, isil: &str) -> Result<Option<Vec<String>>> {
        Ok(self
            .holdings_isil_latest_change_datetime(isil)?
            .map(|values| values.iter().map(iso_datetime).collect()))
    }

    /// 201D $0: source (ELN) and date of first entry of each copy.
    #[must_use]
    pub fn holdings_source_first_entry(&self) -> Option<Vec<String>> {
        self.accessor.get_list("201D", "0", &self.holdings_query())
    }

    /// ELN part of [`holdings_source_first_entry`](Self::holdings_source_first_entry).
    #[must_use]
    pub fn holdings_source_first_entry_eln(&self) -> Option<Vec<String>> {
        components(&self.accessor, &self.holdings_source_first_entry()?, 0)
    }

    /// Date part of [`holdings_source_first_entry`](Self::holdings_source_first_entry).
    #[must_use]
    pub fn holdings_source_first_entry_date(&self) -> Option<Vec<String>> {
        non_empty(components(
            &self.accessor,
            &self.holdings_source_first_entry()?,
            1,
        )?)
    }

    /// Dates of first entry by source as calendar dates.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is not in `DD-MM-YY` form.
    pub fn holdings_source_first_entry_date_date(&self) -> Result<Option<Vec<NaiveDate>>> {
        self.holdings_source_first_entry_date()
            .map(|dates| parse_dates(&dates, DATE_FORMAT))
            .transpose()
    }

    /// Dates of first entry by source in ISO 8601 form.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is not in `DD-MM-YY` form.
    pub fn holdings_source_first_entry_date_iso(&self) -> Result<Option<Vec<String>>> {
        Ok(self
            .holdings_source_first_entry_date_date()?
            .map(|dates| dates.iter().map(iso_date).collect()))
    }

    /// Entries of [`holdings_source_first_entry`](Self::holdings_source_first_entry)
    /// whose source is `eln`.
    #[must_use]
    pub fn holdings_eln_first_entry(&self, eln: &str) -> Option<Vec<String>> {
        let entries: Vec<String> = self
            .holdings_source_first_entry()?
            .into_iter()
            .filter(|entry| component(entry, 0) == Some(eln))
            .collect();
        non_empty(entries)
    }

    /// Dates of first entry of the copies entered by `eln`.
    #[must_use]
    pub fn holdings_eln_first_entry_date(&self, eln: &str) -> Option<Vec<String>> {
        non_empty(components(
            &self.accessor,
            &self.holdings_eln_first_entry(eln)?,
            1,
        )?)
    }

    /// Dates of first entry of the copies entered by `eln` as calendar dates.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is not in `DD-MM-YY` form.
    pub fn holdings_eln_first_entry_date_date(&self, eln: &str) -> Result<Option<Vec<NaiveDate>>> {
        self.holdings_eln_first_entry_date(eln)
            .map(|dates| parse_dates(&dates, DATE_FORMAT))
            .transpose()
    }

    /// Dates of first entry of the copies entered by `eln` in ISO 8601 form.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is not in `DD-MM-YY` form.
    pub fn holdings_eln_first_entry_date_iso(&self, eln: &str) -> Result<Option<Vec<String>>> {
        Ok(self
            .holdings_eln_first_entry_date_date(eln)?
            .map(|dates| dates.iter().map(iso_date).collect()))
    }
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
