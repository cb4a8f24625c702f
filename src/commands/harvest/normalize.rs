use regex::Regex;

use crate::error::HarvestError;
use crate::table::RecordSet;

pub(crate) const NAME_COLUMN: &str = "ПІБ";
pub(crate) const BIRTH_DATE_COLUMN: &str = "Дата народження";
pub(crate) const BIRTHPLACE_COLUMN: &str = "Місце народження";

const SURNAME_FRAGMENT: &str = "Прізвище";
const DATE_FRAGMENT: &str = "Дата";
const PARTICULARS_FRAGMENT: &str = "Відомості";

/// Normalizes harvested records so both datasets join on identical keys:
/// repairs name tokenization and splits the free-text particulars field into
/// structured birth date / birthplace columns.
pub(crate) struct RecordNormalizer {
    name_boundary: Regex,
    birth_date: Regex,
    digit_run: Regex,
}

impl RecordNormalizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            name_boundary: Regex::new(r"([а-щьюяґєії])([А-ЩЬЮЯҐЄІЇ])")?,
            birth_date: Regex::new(r"[0-9]{2}\.[0-9]{2}\.[0-9]{4}")?,
            digit_run: Regex::new(r"[0-9]+")?,
        })
    }

    pub fn normalize(&self, records: &mut RecordSet) -> Result<(), HarvestError> {
        self.repair_name_column(records);
        self.split_particulars(records)
    }

    /// Source tables occasionally drop the separator between adjacent name
    /// components; a lowercase Cyrillic letter directly followed by an
    /// uppercase one marks the missing boundary.
    fn repair_name_column(&self, records: &mut RecordSet) {
        let Some(column) = records.find_column(SURNAME_FRAGMENT) else {
            return;
        };
        let Some(values) = records.take_column(&column) else {
            return;
        };
        let repaired = values
            .iter()
            .map(|value| self.space_name_boundaries(value))
            .collect();
        records.insert_column_at(1, NAME_COLUMN, repaired);
    }

    pub fn space_name_boundaries(&self, value: &str) -> String {
        self.name_boundary.replace_all(value, "$1 $2").into_owned()
    }

    /// With a dedicated date-of-birth column, both birth date and birthplace
    /// are split out and the source column dropped. With only the general
    /// particulars column, the birth date is extracted and the source column
    /// retained.
    fn split_particulars(&self, records: &mut RecordSet) -> Result<(), HarvestError> {
        if let Some(column) = records.find_column(DATE_FRAGMENT) {
            let Some(values) = records.take_column(&column) else {
                return Ok(());
            };
            let dates = values
                .iter()
                .map(|value| self.birth_date_of(value))
                .collect::<Result<Vec<_>, _>>()?;
            let places = values.iter().map(|value| self.birthplace_of(value)).collect();
            records.insert_column_at(1, BIRTH_DATE_COLUMN, dates);
            records.insert_column_at(1, BIRTHPLACE_COLUMN, places);
            return Ok(());
        }

        if let Some(column) = records.find_column(PARTICULARS_FRAGMENT) {
            if let Some(values) = records.column_values(&column) {
                let dates = values
                    .iter()
                    .map(|value| self.birth_date_of(value))
                    .collect::<Result<Vec<_>, _>>()?;
                records.insert_column_at(1, BIRTH_DATE_COLUMN, dates);
            }
        }

        Ok(())
    }

    /// First strict DD.MM.YYYY match in the field.
    fn birth_date_of(&self, value: &str) -> Result<String, HarvestError> {
        self.birth_date
            .find(value)
            .map(|found| found.as_str().to_string())
            .ok_or_else(|| HarvestError::DateNotFound {
                value: value.to_string(),
            })
    }

    /// The particulars text with digit runs removed and trailing punctuation
    /// stripped.
    fn birthplace_of(&self, value: &str) -> String {
        let stripped = self.digit_run.replace_all(value, "");
        stripped.trim_end_matches(['.', ',', ' ']).trim().to_string()
    }
}
