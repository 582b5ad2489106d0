//! Read configuration
//!
//! Each option selects what happens to one category of parts. Options are
//! fixed for the duration of a read.

use crate::error::{StreamError, StreamResult};

/// `entries` option: generic notification for every classified entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntriesPolicy {
    /// No `entry` notification
    #[default]
    Skip,
    /// Raise `entry` before the entry is handled
    Emit,
}

impl EntriesPolicy {
    /// Parse an option value; anything but `emit` means skip
    pub fn parse(value: &str) -> Self {
        match value {
            "emit" => EntriesPolicy::Emit,
            _ => EntriesPolicy::Skip,
        }
    }
}

/// `sharedStrings` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SharedStringsPolicy {
    /// Drain the part without decoding it
    #[default]
    Skip,
    /// Build and keep the full table
    Cache,
    /// Raise one `shared-string` notification per item, keep nothing
    Emit,
}

impl SharedStringsPolicy {
    /// Parse an option value; unknown values mean skip
    pub fn parse(value: &str) -> Self {
        match value {
            "cache" => SharedStringsPolicy::Cache,
            "emit" => SharedStringsPolicy::Emit,
            _ => SharedStringsPolicy::Skip,
        }
    }
}

/// `styles` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StylesPolicy {
    /// Keep the placeholder resolver for the whole read
    #[default]
    Skip,
    /// Decode the styles part and swap it in
    Cache,
}

impl StylesPolicy {
    /// Parse an option value; anything but `cache` means skip
    pub fn parse(value: &str) -> Self {
        match value {
            "cache" => StylesPolicy::Cache,
            _ => StylesPolicy::Skip,
        }
    }
}

/// `hyperlinks` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HyperlinksPolicy {
    /// Drain relations parts; worksheets never see a hyperlink reader
    #[default]
    Skip,
    /// Keep one hyperlink reader per sheet for later lookups
    Cache,
    /// Like `Cache`, and raise `hyperlinks` with each new reader plus one
    /// `hyperlink` per relationship it decodes
    Emit,
}

impl HyperlinksPolicy {
    /// Parse an option value; unknown values mean skip
    pub fn parse(value: &str) -> Self {
        match value {
            "cache" => HyperlinksPolicy::Cache,
            "emit" => HyperlinksPolicy::Emit,
            _ => HyperlinksPolicy::Skip,
        }
    }

    /// Whether relations parts are decoded at all
    pub fn is_enabled(&self) -> bool {
        !matches!(self, HyperlinksPolicy::Skip)
    }
}

/// `worksheets` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorksheetsPolicy {
    /// Worksheets are still decoded, just not announced
    #[default]
    Skip,
    /// Raise `worksheet` with the reader as soon as it is looked up
    Emit,
}

impl WorksheetsPolicy {
    /// Parse an option value; anything but `emit` means skip
    pub fn parse(value: &str) -> Self {
        match value {
            "emit" => WorksheetsPolicy::Emit,
            _ => WorksheetsPolicy::Skip,
        }
    }
}

/// Options for a streaming read
///
/// `ReadOptions::default()` leaves every option absent: shared strings and
/// styles are skipped, relations are drained and nothing but `row`, `error`
/// and `finished` is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOptions {
    /// `entries`
    pub entries: EntriesPolicy,
    /// `sharedStrings`
    pub shared_strings: SharedStringsPolicy,
    /// `styles`
    pub styles: StylesPolicy,
    /// `hyperlinks`
    pub hyperlinks: HyperlinksPolicy,
    /// `worksheets`
    pub worksheets: WorksheetsPolicy,
}

impl ReadOptions {
    /// Recognized option names
    pub const NAMES: [&'static str; 5] = [
        "entries",
        "sharedStrings",
        "styles",
        "hyperlinks",
        "worksheets",
    ];

    /// Cache everything that can be cached and announce worksheet readers
    pub fn cached() -> Self {
        Self {
            entries: EntriesPolicy::Skip,
            shared_strings: SharedStringsPolicy::Cache,
            styles: StylesPolicy::Cache,
            hyperlinks: HyperlinksPolicy::Cache,
            worksheets: WorksheetsPolicy::Emit,
        }
    }

    /// Build options from `name = value` pairs
    ///
    /// Unknown values resolve to the option's skip behaviour; unknown names
    /// are rejected.
    ///
    /// ```
    /// use sheet_stream_xlsx::{ReadOptions, SharedStringsPolicy};
    ///
    /// let options = ReadOptions::from_pairs([("sharedStrings", "emit")]).unwrap();
    /// assert_eq!(options.shared_strings, SharedStringsPolicy::Emit);
    /// assert!(ReadOptions::from_pairs([("colors", "cache")]).is_err());
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> StreamResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        for (name, value) in pairs {
            options.set(name.as_ref(), value.as_ref())?;
        }
        Ok(options)
    }

    /// Set a single option by name
    pub fn set(&mut self, name: &str, value: &str) -> StreamResult<()> {
        match name {
            "entries" => self.entries = EntriesPolicy::parse(value),
            "sharedStrings" => self.shared_strings = SharedStringsPolicy::parse(value),
            "styles" => self.styles = StylesPolicy::parse(value),
            "hyperlinks" => self.hyperlinks = HyperlinksPolicy::parse(value),
            "worksheets" => self.worksheets = WorksheetsPolicy::parse(value),
            other => return Err(StreamError::InvalidOption(other.to_string())),
        }
        Ok(())
    }

    /// Set the `entries` option
    pub fn with_entries(mut self, policy: EntriesPolicy) -> Self {
        self.entries = policy;
        self
    }

    /// Set the `sharedStrings` option
    pub fn with_shared_strings(mut self, policy: SharedStringsPolicy) -> Self {
        self.shared_strings = policy;
        self
    }

    /// Set the `styles` option
    pub fn with_styles(mut self, policy: StylesPolicy) -> Self {
        self.styles = policy;
        self
    }

    /// Set the `hyperlinks` option
    pub fn with_hyperlinks(mut self, policy: HyperlinksPolicy) -> Self {
        self.hyperlinks = policy;
        self
    }

    /// Set the `worksheets` option
    pub fn with_worksheets(mut self, policy: WorksheetsPolicy) -> Self {
        self.worksheets = policy;
        self
    }
}
