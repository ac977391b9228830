use super::descriptor::{FieldDescriptor, parse_descriptor};
use crate::IclError;

/// A field as declared to the [`record!`](crate::record) macro.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub annotation: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// Rust field name, used for slot lookup and error paths.
    pub name: &'static str,
    /// `None` for fields without an annotation.
    pub descriptor: Option<FieldDescriptor>,
}

impl SchemaField {
    pub fn is_param(&self) -> bool {
        self.descriptor.as_ref().is_some_and(|d| d.is_param)
    }
}

/// Resolved metadata for one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    record: &'static str,
    fields: Vec<SchemaField>,
    /// Indices into `fields` of the `.param` fields, in declaration order.
    params: Vec<usize>,
}

impl Schema {
    /// Parse every annotation once. A malformed annotation fails the whole
    /// record.
    pub fn resolve(record: &'static str, specs: &[FieldSpec]) -> Result<Self, IclError> {
        let mut fields = Vec::with_capacity(specs.len());
        let mut params = Vec::new();

        for spec in specs {
            let descriptor = spec.annotation.map(parse_descriptor).transpose()?;
            if descriptor.as_ref().is_some_and(|d| d.is_param) {
                params.push(fields.len());
            }
            fields.push(SchemaField {
                name: spec.name,
                descriptor,
            });
        }

        Ok(Self {
            record,
            fields,
            params,
        })
    }

    pub fn record(&self) -> &'static str {
        self.record
    }

    /// All declared fields, annotated or not, in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Annotated fields paired with their descriptor.
    pub fn tagged(&self) -> impl Iterator<Item = (&'static str, &FieldDescriptor)> {
        self.fields
            .iter()
            .filter_map(|f| f.descriptor.as_ref().map(|d| (f.name, d)))
    }

    /// The first keyed field bound to `key`. Parameter fields never match.
    pub fn lookup(&self, key: &str) -> Option<(&'static str, &FieldDescriptor)> {
        self.tagged().find(|(_, d)| !d.is_param && d.key == key)
    }

    /// `.param` fields in the order block parameters bind to them.
    pub fn params(&self) -> impl Iterator<Item = &SchemaField> {
        self.params.iter().map(|&i| &self.fields[i])
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}
