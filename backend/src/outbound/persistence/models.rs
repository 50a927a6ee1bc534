//! Internal Diesel row structs and their conversions to domain records.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Changesets treat `None` as `NULL` so an
//! edit can clear an optional column.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AppUser, AppUserId, AuditStamp, DiseaseHistory, DiseaseHistoryId, Dosing, Medicine,
    MedicineId, Metrics, MetricsId, Role, RoleId, StoredRole, Treatment, TreatmentId, UserInfo,
    UserInfoDraft, UserInfoId, UserName,
};

use super::schema::{
    app_users, disease_histories, medicines, metrics, role_claims, roles, treatments,
    user_credentials, user_infos, user_roles,
};

fn audit(
    created_by: String,
    created: DateTime<Utc>,
    updated_by: Option<String>,
    updated: Option<DateTime<Utc>>,
) -> AuditStamp {
    AuditStamp {
        created_by,
        created,
        updated_by,
        updated,
    }
}

// ---------------------------------------------------------------------------
// Medicines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = medicines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MedicineRow {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl From<MedicineRow> for Medicine {
    fn from(row: MedicineRow) -> Self {
        Self {
            id: MedicineId::from_stored(row.id),
            title: row.title,
            description: row.description,
            audit: audit(row.created_by, row.created, row.updated_by, row.updated),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = medicines)]
pub(crate) struct NewMedicineRow<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub created_by: &'a str,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = medicines)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MedicineUpdate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub updated_by: Option<&'a str>,
    pub updated: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Medicine> for MedicineUpdate<'a> {
    fn from(medicine: &'a Medicine) -> Self {
        Self {
            title: &medicine.title,
            description: medicine.description.as_deref(),
            updated_by: medicine.audit.updated_by.as_deref(),
            updated: medicine.audit.updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_infos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserInfoRow {
    pub id: i32,
    pub app_user_id: Option<Uuid>,
    pub email: String,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub weight: Option<f64>,
    pub created_by: String,
    pub created: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl From<UserInfoRow> for UserInfo {
    fn from(row: UserInfoRow) -> Self {
        Self {
            id: UserInfoId::from_stored(row.id),
            app_user_id: row.app_user_id.map(AppUserId::from_uuid),
            details: UserInfoDraft {
                email: row.email,
                first_name: row.first_name,
                second_name: row.second_name,
                birth_date: row.birth_date,
                notes: row.notes,
                address_line1: row.address_line1,
                address_line2: row.address_line2,
                zip_code: row.zip_code,
                country: row.country,
                city: row.city,
                phone_number: row.phone_number,
                weight: row.weight,
            },
            audit: audit(row.created_by, row.created, row.updated_by, row.updated),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_infos)]
pub(crate) struct NewUserInfoRow<'a> {
    pub app_user_id: Option<Uuid>,
    pub email: &'a str,
    pub first_name: Option<&'a str>,
    pub second_name: Option<&'a str>,
    pub birth_date: Option<DateTime<Utc>>,
    pub notes: Option<&'a str>,
    pub address_line1: Option<&'a str>,
    pub address_line2: Option<&'a str>,
    pub zip_code: Option<&'a str>,
    pub country: Option<&'a str>,
    pub city: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub weight: Option<f64>,
    pub created_by: &'a str,
    pub created: DateTime<Utc>,
}

impl<'a> NewUserInfoRow<'a> {
    pub(crate) fn new(
        details: &'a UserInfoDraft,
        app_user_id: Option<AppUserId>,
        stamp: &'a AuditStamp,
    ) -> Self {
        Self {
            app_user_id: app_user_id.map(|id| *id.as_uuid()),
            email: &details.email,
            first_name: details.first_name.as_deref(),
            second_name: details.second_name.as_deref(),
            birth_date: details.birth_date,
            notes: details.notes.as_deref(),
            address_line1: details.address_line1.as_deref(),
            address_line2: details.address_line2.as_deref(),
            zip_code: details.zip_code.as_deref(),
            country: details.country.as_deref(),
            city: details.city.as_deref(),
            phone_number: details.phone_number.as_deref(),
            weight: details.weight,
            created_by: &stamp.created_by,
            created: stamp.created,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = user_infos)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserInfoUpdate<'a> {
    pub email: &'a str,
    pub first_name: Option<&'a str>,
    pub second_name: Option<&'a str>,
    pub birth_date: Option<DateTime<Utc>>,
    pub notes: Option<&'a str>,
    pub address_line1: Option<&'a str>,
    pub address_line2: Option<&'a str>,
    pub zip_code: Option<&'a str>,
    pub country: Option<&'a str>,
    pub city: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub weight: Option<f64>,
    pub updated_by: Option<&'a str>,
    pub updated: Option<DateTime<Utc>>,
}

impl<'a> From<&'a UserInfo> for UserInfoUpdate<'a> {
    fn from(user_info: &'a UserInfo) -> Self {
        let details = &user_info.details;
        Self {
            email: &details.email,
            first_name: details.first_name.as_deref(),
            second_name: details.second_name.as_deref(),
            birth_date: details.birth_date,
            notes: details.notes.as_deref(),
            address_line1: details.address_line1.as_deref(),
            address_line2: details.address_line2.as_deref(),
            zip_code: details.zip_code.as_deref(),
            country: details.country.as_deref(),
            city: details.city.as_deref(),
            phone_number: details.phone_number.as_deref(),
            weight: details.weight,
            updated_by: user_info.audit.updated_by.as_deref(),
            updated: user_info.audit.updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Disease histories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = disease_histories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DiseaseHistoryRow {
    pub id: i32,
    pub patient_info_id: i32,
    pub title: String,
    pub notes: Option<String>,
    pub created_by: String,
    pub created: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl From<DiseaseHistoryRow> for DiseaseHistory {
    fn from(row: DiseaseHistoryRow) -> Self {
        Self {
            id: DiseaseHistoryId::from_stored(row.id),
            patient_info_id: UserInfoId::from_stored(row.patient_info_id),
            title: row.title,
            notes: row.notes,
            audit: audit(row.created_by, row.created, row.updated_by, row.updated),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = disease_histories)]
pub(crate) struct NewDiseaseHistoryRow<'a> {
    pub patient_info_id: i32,
    pub title: &'a str,
    pub notes: Option<&'a str>,
    pub created_by: &'a str,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = disease_histories)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DiseaseHistoryUpdate<'a> {
    pub patient_info_id: i32,
    pub title: &'a str,
    pub notes: Option<&'a str>,
    pub updated_by: Option<&'a str>,
    pub updated: Option<DateTime<Utc>>,
}

impl<'a> From<&'a DiseaseHistory> for DiseaseHistoryUpdate<'a> {
    fn from(history: &'a DiseaseHistory) -> Self {
        Self {
            patient_info_id: history.patient_info_id.get(),
            title: &history.title,
            notes: history.notes.as_deref(),
            updated_by: history.audit.updated_by.as_deref(),
            updated: history.audit.updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Treatments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = treatments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TreatmentRow {
    pub id: i32,
    pub medicine_id: i32,
    pub disease_history_id: i32,
    pub diagnosis: String,
    pub medicine_weight: f64,
    pub solution_volume: f64,
    pub dosage: f64,
    pub is_completed: bool,
    pub created_by: String,
    pub created: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl From<TreatmentRow> for Treatment {
    fn from(row: TreatmentRow) -> Self {
        Self {
            id: TreatmentId::from_stored(row.id),
            medicine_id: MedicineId::from_stored(row.medicine_id),
            disease_history_id: DiseaseHistoryId::from_stored(row.disease_history_id),
            diagnosis: row.diagnosis,
            dosing: Dosing::from_stored(row.medicine_weight, row.solution_volume, row.dosage),
            is_completed: row.is_completed,
            audit: audit(row.created_by, row.created, row.updated_by, row.updated),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = treatments)]
pub(crate) struct NewTreatmentRow<'a> {
    pub medicine_id: i32,
    pub disease_history_id: i32,
    pub diagnosis: &'a str,
    pub medicine_weight: f64,
    pub solution_volume: f64,
    pub dosage: f64,
    pub is_completed: bool,
    pub created_by: &'a str,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = treatments)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TreatmentUpdate<'a> {
    pub medicine_id: i32,
    pub disease_history_id: i32,
    pub diagnosis: &'a str,
    pub medicine_weight: f64,
    pub solution_volume: f64,
    pub dosage: f64,
    pub is_completed: bool,
    pub updated_by: Option<&'a str>,
    pub updated: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Treatment> for TreatmentUpdate<'a> {
    fn from(treatment: &'a Treatment) -> Self {
        Self {
            medicine_id: treatment.medicine_id.get(),
            disease_history_id: treatment.disease_history_id.get(),
            diagnosis: &treatment.diagnosis,
            medicine_weight: treatment.dosing.medicine_weight(),
            solution_volume: treatment.dosing.solution_volume(),
            dosage: treatment.dosing.dosage(),
            is_completed: treatment.is_completed,
            updated_by: treatment.audit.updated_by.as_deref(),
            updated: treatment.audit.updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = metrics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MetricsRow {
    pub id: i32,
    pub name: String,
    pub value: f64,
    pub disease_history_id: i32,
    pub created_by: String,
    pub created: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl From<MetricsRow> for Metrics {
    fn from(row: MetricsRow) -> Self {
        Self {
            id: MetricsId::from_stored(row.id),
            name: row.name,
            value: row.value,
            disease_history_id: DiseaseHistoryId::from_stored(row.disease_history_id),
            audit: audit(row.created_by, row.created, row.updated_by, row.updated),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = metrics)]
pub(crate) struct NewMetricsRow<'a> {
    pub name: &'a str,
    pub value: f64,
    pub disease_history_id: i32,
    pub created_by: &'a str,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = metrics)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct MetricsUpdate<'a> {
    pub name: &'a str,
    pub value: f64,
    pub disease_history_id: i32,
    pub updated_by: Option<&'a str>,
    pub updated: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Metrics> for MetricsUpdate<'a> {
    fn from(reading: &'a Metrics) -> Self {
        Self {
            name: &reading.name,
            value: reading.value,
            disease_history_id: reading.disease_history_id.get(),
            updated_by: reading.audit.updated_by.as_deref(),
            updated: reading.audit.updated,
        }
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = app_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppUserRow {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub email_confirmed: bool,
    pub created_by: String,
    pub created: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub updated: Option<DateTime<Utc>>,
}

impl AppUserRow {
    /// Convert to a domain record; `None` when the stored name is blank.
    pub(crate) fn into_domain(self) -> Option<AppUser> {
        let user_name = UserName::new(&self.user_name).ok()?;
        Some(AppUser {
            id: AppUserId::from_uuid(self.id),
            user_name,
            email: self.email,
            email_confirmed: self.email_confirmed,
            audit: audit(self.created_by, self.created, self.updated_by, self.updated),
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = app_users)]
pub(crate) struct NewAppUserRow<'a> {
    pub id: Uuid,
    pub user_name: &'a str,
    pub email: &'a str,
    pub email_confirmed: bool,
    pub created_by: &'a str,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_credentials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    pub user_id: Uuid,
    pub password_salt: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleRow {
    pub id: Uuid,
    pub name: String,
}

impl RoleRow {
    /// Convert to a domain role; `None` for names outside the role set.
    pub(crate) fn into_domain(self) -> Option<StoredRole> {
        let role: Role = self.name.parse().ok()?;
        Some(StoredRole {
            id: RoleId::from_uuid(self.id),
            role,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = role_claims)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoleClaimRow {
    pub claim_type: String,
    pub claim_value: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = role_claims)]
pub(crate) struct NewRoleClaimRow<'a> {
    pub role_id: Uuid,
    pub claim_type: &'a str,
    pub claim_value: &'a str,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct UserRoleRow {
    pub user_id: Uuid,
    pub role_id: Uuid,
}
