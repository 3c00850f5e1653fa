/// A single extracted record: one crawled page's worth of field values
///
/// Field order is fixed at construction and matches the resolved output
/// order, so every sink sees the same column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// URL of the page the record was extracted from
    pub url: String,

    fields: Vec<(String, Vec<String>)>,
}

impl Record {
    pub fn new(url: String, fields: Vec<(String, Vec<String>)>) -> Self {
        Self { url, fields }
    }

    /// Values for a named field, if the field exists
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Field names in output order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Fields in output order
    pub fn fields(&self) -> &[(String, Vec<String>)] {
        &self.fields
    }

    /// One cell per field: multiple values joined with `"; "`
    pub fn cells(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(_, values)| values.join("; "))
            .collect()
    }
}
