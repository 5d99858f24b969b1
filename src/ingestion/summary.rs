use std::fmt;

/// Per-run tallies for a deal or order load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub total: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub errored: usize,
    /// Date-only `exchange_rates` rows created for new trade dates (deal loads only).
    pub rate_placeholders: usize,
}

impl IngestionSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn processed(&self) -> usize {
        self.inserted + self.skipped + self.errored
    }
}

impl fmt::Display for IngestionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows in file:               {}", self.total)?;
        writeln!(f, "Inserted:                   {}", self.inserted)?;
        writeln!(f, "Skipped (already stored):   {}", self.skipped)?;
        write!(f, "Errored:                    {}", self.errored)?;
        if self.rate_placeholders > 0 {
            write!(f, "\nNew rate dates to backfill: {}", self.rate_placeholders)?;
        }
        Ok(())
    }
}
