use crate::error::SchemaError;
use crate::schema::{Cardinality, EnumDescriptor, FieldDescriptor, FieldKind, MessageDescriptor};
use std::collections::{HashMap, HashSet};

/// All message and enum types reachable from one schema graph.
///
/// Immutable once built; sharing a `&SchemaRegistry` across threads is
/// sound because nothing here is interior-mutable.
#[derive(Debug)]
pub struct SchemaRegistry {
    messages: HashMap<String, MessageDescriptor>,
    enums: HashMap<String, EnumDescriptor>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            messages: vec![],
            enums: vec![],
        }
    }

    pub fn describe(&self, full_name: &str) -> Result<&MessageDescriptor, SchemaError> {
        self.messages
            .get(full_name)
            .ok_or_else(|| SchemaError::UnknownType(String::from(full_name)))
    }

    pub fn describe_enum(&self, full_name: &str) -> Result<&EnumDescriptor, SchemaError> {
        self.enums
            .get(full_name)
            .ok_or_else(|| SchemaError::UnknownType(String::from(full_name)))
    }

    /// Lookup for kind references inside registered descriptors.
    /// [`RegistryBuilder::build`] verified these resolve.
    pub(crate) fn message_ref(&self, full_name: &str) -> &MessageDescriptor {
        &self.messages[full_name]
    }
}

pub struct RegistryBuilder {
    messages: Vec<MessageDescriptor>,
    enums: Vec<EnumDescriptor>,
}

impl RegistryBuilder {
    pub fn message(mut self, desc: MessageDescriptor) -> Self {
        self.messages.push(desc);
        self
    }

    pub fn enumeration(mut self, desc: EnumDescriptor) -> Self {
        self.enums.push(desc);
        self
    }

    /// Validates the whole graph: unique type names, unique nonzero field
    /// numbers, resolvable kind references, well-formed map declarations.
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let mut messages: HashMap<String, MessageDescriptor> = HashMap::new();
        for desc in self.messages {
            let name = String::from(desc.full_name());
            if messages.insert(name.clone(), desc).is_some() {
                return Err(SchemaError::DuplicateTypeName(name));
            }
        }
        let mut enums: HashMap<String, EnumDescriptor> = HashMap::new();
        for desc in self.enums {
            let name = String::from(desc.full_name());
            if messages.contains_key(&name) || enums.insert(name.clone(), desc).is_some() {
                return Err(SchemaError::DuplicateTypeName(name));
            }
        }

        for desc in messages.values() {
            let mut seen_numbers: HashSet<u32> = HashSet::new();
            for field in desc.fields() {
                Self::validate_field(desc, field, &mut seen_numbers, &messages, &enums)?;
            }
        }

        Ok(SchemaRegistry { messages, enums })
    }

    fn validate_field(
        desc: &MessageDescriptor,
        field: &FieldDescriptor,
        seen_numbers: &mut HashSet<u32>,
        messages: &HashMap<String, MessageDescriptor>,
        enums: &HashMap<String, EnumDescriptor>,
    ) -> Result<(), SchemaError> {
        if *field.number == 0 {
            return Err(SchemaError::ZeroFieldNumber {
                message: String::from(desc.full_name()),
                field_name: field.name.clone(),
            });
        }
        if !seen_numbers.insert(*field.number) {
            return Err(SchemaError::DuplicateFieldNumber {
                message: String::from(desc.full_name()),
                number: *field.number,
            });
        }
        if let FieldKind::Map { .. } = &field.kind {
            if field.cardinality == Cardinality::Repeated {
                return Err(SchemaError::RepeatedMap {
                    message: String::from(desc.full_name()),
                    field_name: field.name.clone(),
                });
            }
        }
        Self::validate_kind(desc, field, &field.kind, messages, enums)
    }

    fn validate_kind(
        desc: &MessageDescriptor,
        field: &FieldDescriptor,
        kind: &FieldKind,
        messages: &HashMap<String, MessageDescriptor>,
        enums: &HashMap<String, EnumDescriptor>,
    ) -> Result<(), SchemaError> {
        match kind {
            FieldKind::Bool
            | FieldKind::Int32
            | FieldKind::Int64
            | FieldKind::Double
            | FieldKind::Bytes
            | FieldKind::Str => Ok(()),
            FieldKind::Enum(referenced) => {
                if enums.contains_key(referenced) {
                    Ok(())
                } else {
                    Err(Self::unresolved(desc, field, referenced))
                }
            }
            FieldKind::Message(referenced) => {
                if messages.contains_key(referenced) {
                    Ok(())
                } else {
                    Err(Self::unresolved(desc, field, referenced))
                }
            }
            FieldKind::Map { value, .. } => {
                if let FieldKind::Map { .. } = value.as_ref() {
                    return Err(SchemaError::NestedMap {
                        message: String::from(desc.full_name()),
                        field_name: field.name.clone(),
                    });
                }
                Self::validate_kind(desc, field, value, messages, enums)
            }
        }
    }

    fn unresolved(
        desc: &MessageDescriptor,
        field: &FieldDescriptor,
        referenced: &str,
    ) -> SchemaError {
        SchemaError::UnresolvedTypeRef {
            message: String::from(desc.full_name()),
            field_name: field.name.clone(),
            referenced: String::from(referenced),
        }
    }
}
