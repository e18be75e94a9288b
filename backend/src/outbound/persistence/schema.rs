//! Diesel table definitions. Kept in step with `backend/migrations`.

diesel::table! {
    /// Job applicants. Soft-deleted rows stay in place with `is_deleted` set.
    applicants (id) {
        id -> Int8,
        name -> Text,
        family_name -> Text,
        address -> Text,
        /// Lowercase; unique among rows that are not deleted.
        email_address -> Text,
        phone -> Text,
        age -> Int4,
        country_of_origin -> Text,
        applied_date -> Timestamptz,
        hired -> Bool,
        created_date -> Timestamptz,
        last_modified_date -> Nullable<Timestamptz>,
        created_by -> Text,
        last_modified_by -> Nullable<Text>,
        is_deleted -> Bool,
        deleted_date -> Nullable<Timestamptz>,
        deleted_reason -> Nullable<Text>,
        /// Concurrency token, replaced on every write.
        row_version -> Bytea,
    }
}
