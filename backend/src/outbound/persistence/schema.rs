//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Identity principals. Credentials live in `user_credentials`.
    app_users (id) {
        id -> Uuid,
        user_name -> Varchar,
        email -> Varchar,
        email_confirmed -> Bool,
        created_by -> Varchar,
        created -> Timestamptz,
        updated_by -> Nullable<Varchar>,
        updated -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Salted password digests, one row per principal.
    user_credentials (user_id) {
        user_id -> Uuid,
        password_salt -> Varchar,
        password_hash -> Varchar,
    }
}

diesel::table! {
    roles (id) {
        id -> Uuid,
        name -> Varchar,
    }
}

diesel::table! {
    /// Claims attached to roles; unique per role and claim type.
    role_claims (id) {
        id -> Int4,
        role_id -> Uuid,
        claim_type -> Varchar,
        claim_value -> Varchar,
    }
}

diesel::table! {
    user_roles (user_id, role_id) {
        user_id -> Uuid,
        role_id -> Uuid,
    }
}

diesel::table! {
    /// Patient and employee profiles.
    user_infos (id) {
        id -> Int4,
        app_user_id -> Nullable<Uuid>,
        email -> Varchar,
        first_name -> Nullable<Varchar>,
        second_name -> Nullable<Varchar>,
        birth_date -> Nullable<Timestamptz>,
        notes -> Nullable<Text>,
        address_line1 -> Nullable<Varchar>,
        address_line2 -> Nullable<Varchar>,
        zip_code -> Nullable<Varchar>,
        country -> Nullable<Varchar>,
        city -> Nullable<Varchar>,
        phone_number -> Nullable<Varchar>,
        weight -> Nullable<Float8>,
        created_by -> Varchar,
        created -> Timestamptz,
        updated_by -> Nullable<Varchar>,
        updated -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    medicines (id) {
        id -> Int4,
        title -> Varchar,
        description -> Nullable<Text>,
        created_by -> Varchar,
        created -> Timestamptz,
        updated_by -> Nullable<Varchar>,
        updated -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    disease_histories (id) {
        id -> Int4,
        patient_info_id -> Int4,
        title -> Varchar,
        notes -> Nullable<Text>,
        created_by -> Varchar,
        created -> Timestamptz,
        updated_by -> Nullable<Varchar>,
        updated -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    treatments (id) {
        id -> Int4,
        medicine_id -> Int4,
        disease_history_id -> Int4,
        diagnosis -> Varchar,
        medicine_weight -> Float8,
        solution_volume -> Float8,
        dosage -> Float8,
        is_completed -> Bool,
        created_by -> Varchar,
        created -> Timestamptz,
        updated_by -> Nullable<Varchar>,
        updated -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    metrics (id) {
        id -> Int4,
        name -> Varchar,
        value -> Float8,
        disease_history_id -> Int4,
        created_by -> Varchar,
        created -> Timestamptz,
        updated_by -> Nullable<Varchar>,
        updated -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(user_credentials -> app_users (user_id));
diesel::joinable!(role_claims -> roles (role_id));
diesel::joinable!(user_roles -> app_users (user_id));
diesel::joinable!(user_roles -> roles (role_id));
diesel::joinable!(disease_histories -> user_infos (patient_info_id));
diesel::joinable!(treatments -> medicines (medicine_id));
diesel::joinable!(treatments -> disease_histories (disease_history_id));
diesel::joinable!(metrics -> disease_histories (disease_history_id));

diesel::allow_tables_to_appear_in_same_query!(
    app_users,
    user_credentials,
    roles,
    role_claims,
    user_roles,
    user_infos,
    medicines,
    disease_histories,
    treatments,
    metrics,
);
