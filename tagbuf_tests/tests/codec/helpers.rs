use tagbuf_types::schema::{
    EnumDescriptor, FieldDescriptor, FieldKind, MapKeyKind, MessageDescriptor, SchemaRegistry,
};

pub const EVERYTHING: &str = "probe.Everything";
pub const POINT: &str = "probe.Point";
pub const COLOR: &str = "probe.Color";

/// One message exercising every field kind the codec supports.
pub fn probe_registry() -> SchemaRegistry {
    SchemaRegistry::builder()
        .enumeration(EnumDescriptor::new(
            COLOR,
            vec![("Red", 0), ("Green", 1), ("Blue", 2)],
        ))
        .message(MessageDescriptor::new(
            POINT,
            vec![
                FieldDescriptor::singular(1, "x", FieldKind::Int64),
                FieldDescriptor::singular(2, "y", FieldKind::Int64),
            ],
        ))
        .message(MessageDescriptor::new(
            EVERYTHING,
            vec![
                FieldDescriptor::singular(1, "flag", FieldKind::Bool),
                FieldDescriptor::singular(2, "count", FieldKind::Int32),
                FieldDescriptor::singular(3, "total", FieldKind::Int64),
                FieldDescriptor::singular(4, "ratio", FieldKind::Double),
                FieldDescriptor::singular(5, "blob", FieldKind::Bytes),
                FieldDescriptor::singular(6, "label", FieldKind::Str),
                FieldDescriptor::singular(7, "color", FieldKind::Enum(String::from(COLOR))),
                FieldDescriptor::singular(8, "origin", FieldKind::Message(String::from(POINT))),
                FieldDescriptor::repeated(9, "tags", FieldKind::Str),
                FieldDescriptor::singular(
                    10,
                    "attrs",
                    FieldKind::map(MapKeyKind::Str, FieldKind::Int64),
                ),
            ],
        ))
        .build()
        .unwrap()
}
