//! Esquema Diesel (mantenido a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    table_metadata (id) {
        id -> Uuid,
        database -> Text,
        schema_name -> Text,
        name -> Text,
        comment -> Nullable<Text>,
        column_defs -> Jsonb,
        signature -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
